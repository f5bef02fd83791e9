use crate::ray::Ray3D;
use crate::transform::AffineTransform;
use crate::tuple::Tuple3D;

/// An axis-aligned bounding box.
///
/// An empty box has its minimum at positive infinity and its maximum at
/// negative infinity, so that including any point yields a box around just that point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub minimum: Tuple3D,
    pub maximum: Tuple3D,
}

impl Default for Bounds {
    fn default() -> Bounds {
        Bounds::empty()
    }
}

impl Bounds {
    /// Creates a box from two opposite corners, in any order.
    pub fn new(a: Tuple3D, b: Tuple3D) -> Bounds {
        Bounds { minimum: a.min(&b), maximum: a.max(&b) }
    }

    pub fn empty() -> Bounds {
        Bounds {
            minimum: Tuple3D::splat(std::f64::INFINITY),
            maximum: Tuple3D::splat(std::f64::NEG_INFINITY),
        }
    }

    /// The smallest box containing every point in `points`.
    pub fn from_points<I>(points: I) -> Bounds
    where
        I: IntoIterator<Item = Tuple3D>,
    {
        points.into_iter().fold(Bounds::empty(), |b, p| b.include(p))
    }

    pub fn is_empty(&self) -> bool {
        self.minimum.x > self.maximum.x
            || self.minimum.y > self.maximum.y
            || self.minimum.z > self.maximum.z
    }

    /// Grows the box to contain `p`.
    pub fn include(&self, p: Tuple3D) -> Bounds {
        Bounds { minimum: self.minimum.min(&p), maximum: self.maximum.max(&p) }
    }

    /// Grows the box by `delta` on every side.
    ///
    /// Flat boxes (a triangle lying in an axis plane) are otherwise easy for
    /// the slab test to miss through rounding.
    pub fn padded(&self, delta: f64) -> Bounds {
        if self.is_empty() {
            return *self;
        }

        let d = Tuple3D::splat(delta);
        Bounds { minimum: self.minimum - d, maximum: self.maximum + d }
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Tuple3D; 8] {
        let (lo, hi) = (self.minimum, self.maximum);
        [
            Tuple3D::new(lo.x, lo.y, lo.z),
            Tuple3D::new(hi.x, lo.y, lo.z),
            Tuple3D::new(lo.x, hi.y, lo.z),
            Tuple3D::new(hi.x, hi.y, lo.z),
            Tuple3D::new(lo.x, lo.y, hi.z),
            Tuple3D::new(hi.x, lo.y, hi.z),
            Tuple3D::new(lo.x, hi.y, hi.z),
            Tuple3D::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Bounds of this box after it is moved through `transform`.
    ///
    /// All eight corners are transformed and re-boxed, so a rotated box
    /// grows to stay axis-aligned.
    pub fn transform(&self, transform: &AffineTransform) -> Bounds {
        if self.is_empty() || transform.is_identity() {
            return *self;
        }

        Bounds::from_points(
            self.corners().iter().map(|&c| transform.apply_point(c))
        )
    }

    /// Finds where a ray enters and leaves one axis slab.
    ///
    /// Returns `(tmin, tmax)` with `tmin <= tmax`. A ray parallel to the slab
    /// is either always inside it (`(-inf, inf)`) or never (`(inf, -inf)`).
    pub fn check_axis(minimum: f64, maximum: f64, origin: f64, direction: f64)
        -> (f64, f64) {
        if direction == 0.0 {
            return if minimum <= origin && origin <= maximum {
                (std::f64::NEG_INFINITY, std::f64::INFINITY)
            } else {
                (std::f64::INFINITY, std::f64::NEG_INFINITY)
            };
        }

        let tmin = (minimum - origin) / direction;
        let tmax = (maximum - origin) / direction;

        // If tmin is actually greater than tmax, return tmax first.
        if tmin > tmax {
            (tmax, tmin)
        } else {
            (tmin, tmax)
        }
    }

    /// Checks whether a ray passes through the box at some `t >= 0`.
    pub fn intersects(&self, ray: &Ray3D) -> bool {
        if self.is_empty() {
            return false;
        }

        let (xtmin, xtmax) = Self::check_axis(
            self.minimum.x, self.maximum.x, ray.origin.x, ray.direction.x
        );
        let (ytmin, ytmax) = Self::check_axis(
            self.minimum.y, self.maximum.y, ray.origin.y, ray.direction.y
        );
        let (ztmin, ztmax) = Self::check_axis(
            self.minimum.z, self.maximum.z, ray.origin.z, ray.direction.z
        );

        let tmin = xtmin.max(ytmin).max(ztmin);
        let tmax = xtmax.min(ytmax).min(ztmax);

        tmin <= tmax && tmax >= 0.0
    }
}

#[test]
fn empty_bounds_include() {
    let b = Bounds::new(Tuple3D::new(1.0, 2.0, 3.0), Tuple3D::new(-1.0, 0.0, 5.0));
    let p = Tuple3D::new(4.0, 5.0, 6.0);

    assert!(Bounds::empty().is_empty());
    assert_eq!(Bounds::empty().include(p), Bounds::new(p, p));
    assert_eq!(b.minimum, Tuple3D::new(-1.0, 0.0, 3.0));
    assert_eq!(b.maximum, Tuple3D::new(1.0, 2.0, 5.0));
}

#[test]
fn transformed_bounds() {
    let b = Bounds::new(Tuple3D::splat(-1.0), Tuple3D::splat(1.0));
    let t = AffineTransform::translation(Tuple3D::new(0.0, 0.0, -5.0))
        .compose(&AffineTransform::rotation_degrees(Tuple3D::new(0.0, 45.0, 0.0)));

    let moved = b.transform(&t);
    let half_diagonal = 2.0f64.sqrt();

    assert_eq!(moved.minimum, Tuple3D::new(-half_diagonal, -1.0, -5.0 - half_diagonal));
    assert_eq!(moved.maximum, Tuple3D::new(half_diagonal, 1.0, -5.0 + half_diagonal));
}

#[test]
fn ray_hits_and_misses_box() {
    let b = Bounds::new(Tuple3D::new(-1.0, -1.0, -6.0), Tuple3D::new(1.0, 1.0, -4.0));

    let toward = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0));
    let away = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, 1.0));
    let beside = Ray3D::new(Tuple3D::new(2.0, 0.0, 0.0), Tuple3D::new(0.0, 0.0, -1.0));

    assert!(b.intersects(&toward));
    assert!(!b.intersects(&away));
    assert!(!b.intersects(&beside));
}

#[test]
fn ray_hits_flat_box() {
    let b = Bounds::from_points(vec![
        Tuple3D::new(0.0, 0.0, 0.0),
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 1.0, 0.0),
    ]);
    let r = Ray3D::new(Tuple3D::new(0.25, 0.25, -1.0), Tuple3D::new(0.0, 0.0, 1.0));

    assert!(b.intersects(&r));
}
