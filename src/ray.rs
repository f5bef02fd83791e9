use std::ops::Mul;

use crate::tuple::{ Tuple3D, Tuple4D };
use crate::matrix::Matrix4D;

/// A ray, cast from `origin` along `direction`.
///
/// The direction is not required to be unit length. Distances reported for a
/// ray are multiples of its own direction, so `position(t)` is always the
/// point that distance `t` refers to.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray3D {
    pub origin: Tuple3D,
    pub direction: Tuple3D,
}

impl Ray3D {
    pub fn new(origin: Tuple3D, direction: Tuple3D) -> Ray3D {
        Ray3D { origin, direction }
    }

    /// Creates a ray which starts `offset` units along `direction` from
    /// `origin`, so that it does not hit the surface it leaves.
    pub fn offset(origin: Tuple3D, direction: Tuple3D, offset: f64) -> Ray3D {
        Ray3D { origin: origin + direction * offset, direction }
    }

    pub fn position(&self, t: f64) -> Tuple3D {
        self.origin + (t * self.direction)
    }

    /// Transforms the origin as a point and the direction as a vector.
    pub fn transform(&self, m: &Matrix4D) -> Ray3D {
        Ray3D {
            origin: (*m * Tuple4D::point(self.origin)).project(),
            direction: (*m * Tuple4D::vector(self.direction)).xyz(),
        }
    }
}

impl Mul<Ray3D> for Matrix4D {
    type Output = Ray3D;

    fn mul(self, other: Ray3D) -> Ray3D {
        other.transform(&self)
    }
}

#[test]
fn ray_position() {
    let r = Ray3D::new(
                Tuple3D::new(2.0, 3.0, 4.0),
                Tuple3D::new(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Tuple3D::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Tuple3D::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Tuple3D::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Tuple3D::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_offset() {
    let r = Ray3D::offset(
                Tuple3D::new(0.0, 0.0, 0.0),
                Tuple3D::new(0.0, 2.0, 0.0),
                0.001
            );

    assert_eq!(r.origin, Tuple3D::new(0.0, 0.002, 0.0));
    assert_eq!(r.direction, Tuple3D::new(0.0, 2.0, 0.0));
}

#[test]
fn ray_translation() {
    let r = Ray3D::new(
                Tuple3D::new(1.0, 2.0, 3.0),
                Tuple3D::new(0.0, 1.0, 0.0)
            );
    let t = Matrix4D::translation(3.0, 4.0, 5.0) * r;

    assert_eq!(t.origin, Tuple3D::new(4.0, 6.0, 8.0));
    assert_eq!(t.direction, Tuple3D::new(0.0, 1.0, 0.0));
}

#[test]
fn ray_scaling() {
    let r = Ray3D::new(
                Tuple3D::new(1.0, 2.0, 3.0),
                Tuple3D::new(0.0, 1.0, 0.0)
            );
    let t = r.transform(&Matrix4D::scaling(2.0, 3.0, 4.0));

    assert_eq!(t.origin, Tuple3D::new(2.0, 6.0, 12.0));
    assert_eq!(t.direction, Tuple3D::new(0.0, 3.0, 0.0));
}
