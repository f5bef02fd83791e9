use std::ops::{ Add, Sub, Neg, Mul, Div };

use crate::feq;

/// A 3D vector or point.
///
/// Rays, vertices, normals and camera corners are all stored as `Tuple3D`s.
/// Whether a `Tuple3D` is a point or a direction only matters when it is
/// multiplied by a matrix; see `Tuple4D::point` and `Tuple4D::vector` for the
/// homogeneous forms used there.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Tuple3D {
    pub x: f64,
    pub y: f64,
    pub z: f64
}

impl PartialEq for Tuple3D {
    fn eq(&self, other: &Tuple3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<[f64; 3]> for Tuple3D {
    fn from(v: [f64; 3]) -> Tuple3D {
        Tuple3D { x: v[0], y: v[1], z: v[2] }
    }
}

impl Tuple3D {
    pub fn new(x: f64, y: f64, z: f64) -> Tuple3D {
        Tuple3D { x, y, z }
    }

    pub fn zero() -> Tuple3D {
        Tuple3D { x: 0.0, y: 0.0, z: 0.0 }
    }

    /// A tuple with all three components set to `v`.
    pub fn splat(v: f64) -> Tuple3D {
        Tuple3D { x: v, y: v, z: v }
    }

    pub fn magnitude(&self) -> f64 {
        f64::sqrt(
            self.x.powi(2)
            + self.y.powi(2)
            + self.z.powi(2)
        )
    }

    /// Scales a tuple to unit length.
    ///
    /// The result is undefined (NaN components) for a zero-length tuple, so
    /// callers must make sure they never normalize one. Use `try_normalize`
    /// where a zero tuple is a possible input.
    pub fn normalize(&self) -> Tuple3D {
        let mag = self.magnitude();

        Tuple3D {
            x: self.x * (1.0 / mag),
            y: self.y * (1.0 / mag),
            z: self.z * (1.0 / mag),
        }
    }

    /// Normalizes a tuple, or returns `None` if it has (almost) no length.
    pub fn try_normalize(&self) -> Option<Tuple3D> {
        let mag = self.magnitude();
        if mag <= f64::EPSILON || !mag.is_finite() {
            None
        } else {
            Some(*self / mag)
        }
    }

    pub fn dot(&self, other: &Tuple3D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    pub fn cross(&self, other: &Tuple3D) -> Tuple3D {
        Tuple3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Component-wise product of two tuples.
    pub fn hadamard(&self, other: &Tuple3D) -> Tuple3D {
        Tuple3D {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }

    /// Component-wise minimum.
    pub fn min(&self, other: &Tuple3D) -> Tuple3D {
        Tuple3D {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            z: self.z.min(other.z),
        }
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &Tuple3D) -> Tuple3D {
        Tuple3D {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
            z: self.z.max(other.z),
        }
    }

    /// Reflects a vector across a normal.
    ///
    /// The normal is expected to be unit length.
    pub fn reflect(&self, normal: &Tuple3D) -> Tuple3D {
        *self - (*normal * 2.0 * self.dot(normal))
    }
}

impl Add for Tuple3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Tuple3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Tuple3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Implements scalar right-multiplication for a 3D tuple.
///
/// ```
/// use phong_tracer::tuple::Tuple3D;
///
/// let t = Tuple3D::new(1.0, 2.0, 3.0);
/// assert_eq!(t * 2.0, Tuple3D::new(2.0, 4.0, 6.0));
/// ```
impl Mul<f64> for Tuple3D {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Implements scalar left-multiplication for a 3D tuple.
impl Mul<Tuple3D> for f64 {
    type Output = Tuple3D;

    fn mul(self, other: Tuple3D) -> Tuple3D {
        other * self
    }
}

impl Div<f64> for Tuple3D {
    type Output = Self;

    fn div(self, other: f64) -> Self {
        Self {
            x: self.x / other,
            y: self.y / other,
            z: self.z / other,
        }
    }
}

/// A homogeneous 4D tuple.
///
/// A `w` of `1.0` marks a point, a `w` of `0.0` marks a direction. Under a
/// 4x4 matrix, points pick up translation while directions do not.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Tuple4D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64
}

impl PartialEq for Tuple4D {
    fn eq(&self, other: &Tuple4D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z) &&
            feq(self.w, other.w)
    }
}

impl Tuple4D {
    pub fn tuple(x: f64, y: f64, z: f64, w: f64) -> Tuple4D {
        Tuple4D { x, y, z, w }
    }

    /// Lifts a 3D point to homogeneous coordinates (`w == 1.0`).
    pub fn point(p: Tuple3D) -> Tuple4D {
        Tuple4D { x: p.x, y: p.y, z: p.z, w: 1.0 }
    }

    /// Lifts a 3D direction to homogeneous coordinates (`w == 0.0`).
    pub fn vector(v: Tuple3D) -> Tuple4D {
        Tuple4D { x: v.x, y: v.y, z: v.z, w: 0.0 }
    }

    pub fn is_point(&self) -> bool {
        self.w == 1.0
    }

    pub fn is_vector(&self) -> bool {
        self.w == 0.0
    }

    /// Drops the `w` component without dividing by it.
    pub fn xyz(&self) -> Tuple3D {
        Tuple3D { x: self.x, y: self.y, z: self.z }
    }

    /// Divides the first three components by `w`.
    ///
    /// Only meaningful for points; a direction (`w == 0.0`) must never be
    /// projected. Use `xyz` for directions.
    pub fn project(&self) -> Tuple3D {
        Tuple3D {
            x: self.x / self.w,
            y: self.y / self.w,
            z: self.z / self.w,
        }
    }
}

/* Tests */

#[test]
fn add_tuples() {
    let a1 = Tuple3D::new(3.0, -2.0, 5.0);
    let a2 = Tuple3D::new(-2.0, 3.0, 1.0);

    assert_eq!(a1 + a2, Tuple3D::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_tuples() {
    let p1 = Tuple3D::new(3.0, 2.0, 1.0);
    let p2 = Tuple3D::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Tuple3D::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_tuple() {
    let a = Tuple3D::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Tuple3D::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_and_div_scalar() {
    let a = Tuple3D::new(1.0, -2.0, 3.0);

    assert_eq!(a * 3.5, Tuple3D::new(3.5, -7.0, 10.5));
    assert_eq!(0.5 * a, Tuple3D::new(0.5, -1.0, 1.5));
    assert_eq!(a / 2.0, Tuple3D::new(0.5, -1.0, 1.5));
}

#[test]
fn hadamard_product() {
    let a = Tuple3D::new(1.0, 0.2, 0.4);
    let b = Tuple3D::new(0.9, 1.0, 0.1);

    assert_eq!(a.hadamard(&b), Tuple3D::new(0.9, 0.2, 0.04));
}

#[test]
fn magnitude_neg() {
    let v = Tuple3D::new(-1.0, -2.0, -3.0);

    assert_eq!(v.magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize_dirty() {
    let v = Tuple3D::new(1.0, 2.0, 3.0);
    let e = Tuple3D::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(v.normalize(), e);
    assert!(crate::feq(v.normalize().magnitude(), 1.0));
}

#[test]
fn try_normalize_zero() {
    assert_eq!(Tuple3D::zero().try_normalize(), None);
    assert_eq!(Tuple3D::new(0.0, 4.0, 0.0).try_normalize(),
        Some(Tuple3D::new(0.0, 1.0, 0.0)));
}

#[test]
fn dot_and_cross() {
    let a = Tuple3D::new(1.0, 2.0, 3.0);
    let b = Tuple3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
    assert_eq!(a.cross(&b), Tuple3D::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Tuple3D::new(1.0, -2.0, 1.0));
}

#[test]
fn reflect_45() {
    let v = Tuple3D::new(1.0, -1.0, 0.0);
    let n = Tuple3D::new(0.0, 1.0, 0.0);

    assert_eq!(v.reflect(&n), Tuple3D::new(1.0, 1.0, 0.0));
}

#[test]
fn project_point() {
    let p = Tuple4D::tuple(2.0, 4.0, 6.0, 2.0);

    assert_eq!(p.project(), Tuple3D::new(1.0, 2.0, 3.0));
    assert!(Tuple4D::point(Tuple3D::zero()).is_point());
    assert!(Tuple4D::vector(Tuple3D::zero()).is_vector());
}
