use crate::tuple::Tuple3D;
use crate::ray::Ray3D;

/// Blends four corner values across a unit square.
///
/// `u` runs from the left corners to the right ones, `v` from the lower
/// corners to the upper ones.
pub fn bilinear(ll: Tuple3D, lr: Tuple3D, ul: Tuple3D, ur: Tuple3D, u: f64, v: f64)
    -> Tuple3D {
    let lower = ll * (1.0 - u) + lr * u;
    let upper = ul * (1.0 - u) + ur * u;
    lower * (1.0 - v) + upper * v
}

/// A pinhole camera looking through a quadrilateral image plane.
///
/// Rays start at `eye` and pass through the plane spanned by the four
/// corners. The corners need not form a rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Tuple3D,
    pub lower_left: Tuple3D,
    pub lower_right: Tuple3D,
    pub upper_left: Tuple3D,
    pub upper_right: Tuple3D,
}

/// A unit-square image plane one unit down the -Z axis.
impl Default for Camera {
    fn default() -> Camera {
        Camera {
            eye: Tuple3D::zero(),
            lower_left: Tuple3D::new(-0.5, -0.5, -1.0),
            lower_right: Tuple3D::new(0.5, -0.5, -1.0),
            upper_left: Tuple3D::new(-0.5, 0.5, -1.0),
            upper_right: Tuple3D::new(0.5, 0.5, -1.0),
        }
    }
}

/// The patch of image plane covered by one pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Footprint {
    pub lower_left: Tuple3D,
    pub lower_right: Tuple3D,
    pub upper_left: Tuple3D,
    pub upper_right: Tuple3D,
}

impl Footprint {
    /// A point inside the pixel; `(0.5, 0.5)` is its center.
    pub fn point(&self, u: f64, v: f64) -> Tuple3D {
        bilinear(self.lower_left, self.lower_right,
            self.upper_left, self.upper_right, u, v)
    }
}

impl Camera {
    /// A point on the image plane; `(0, 0)` is the lower left corner.
    pub fn plane_point(&self, u: f64, v: f64) -> Tuple3D {
        bilinear(self.lower_left, self.lower_right,
            self.upper_left, self.upper_right, u, v)
    }

    /// Finds the part of the image plane a pixel covers.
    ///
    /// Row 0 is the top of the image, so rows count down from the upper
    /// corners.
    pub fn footprint(&self, row: usize, col: usize, width: usize, height: usize)
        -> Footprint {
        let flipped = height - 1 - row;

        let u0 = col as f64 / width as f64;
        let u1 = (col + 1) as f64 / width as f64;
        let v0 = flipped as f64 / height as f64;
        let v1 = (flipped + 1) as f64 / height as f64;

        Footprint {
            lower_left: self.plane_point(u0, v0),
            lower_right: self.plane_point(u1, v0),
            upper_left: self.plane_point(u0, v1),
            upper_right: self.plane_point(u1, v1),
        }
    }

    /// A ray from the eye through `target`. It is not normalized.
    pub fn ray_through(&self, target: Tuple3D) -> Ray3D {
        Ray3D::new(self.eye, target - self.eye)
    }

    /// A ray from the eye through the center of a pixel.
    pub fn ray_for_pixel(&self, row: usize, col: usize, width: usize, height: usize)
        -> Ray3D {
        self.ray_through(self.footprint(row, col, width, height).point(0.5, 0.5))
    }
}

#[test]
fn bilinear_corners_and_center() {
    let c = Camera::default();

    assert_eq!(c.plane_point(0.0, 0.0), c.lower_left);
    assert_eq!(c.plane_point(1.0, 0.0), c.lower_right);
    assert_eq!(c.plane_point(0.0, 1.0), c.upper_left);
    assert_eq!(c.plane_point(1.0, 1.0), c.upper_right);
    assert_eq!(c.plane_point(0.5, 0.5), Tuple3D::new(0.0, 0.0, -1.0));
}

#[test]
fn row_zero_is_the_top() {
    let c = Camera::default();

    let top_left = c.footprint(0, 0, 2, 2);
    assert_eq!(top_left.upper_left, c.upper_left);
    assert_eq!(top_left.lower_right, Tuple3D::new(0.0, 0.0, -1.0));

    let bottom_right = c.footprint(1, 1, 2, 2);
    assert_eq!(bottom_right.lower_right, c.lower_right);
}

#[test]
fn ray_through_center_of_single_pixel() {
    let c = Camera::default();
    let r = c.ray_for_pixel(0, 0, 1, 1);

    assert_eq!(r.origin, Tuple3D::zero());
    assert_eq!(r.direction, Tuple3D::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_for_corner_pixel() {
    let c = Camera::default();
    let r = c.ray_for_pixel(0, 3, 4, 4);

    assert_eq!(r.direction, Tuple3D::new(0.375, 0.375, -1.0));
}

#[test]
fn skewed_image_plane() {
    let c = Camera {
        eye: Tuple3D::new(0.0, 0.0, 1.0),
        lower_left: Tuple3D::new(0.0, 0.0, 0.0),
        lower_right: Tuple3D::new(2.0, 0.0, 0.0),
        upper_left: Tuple3D::new(0.0, 2.0, 0.0),
        upper_right: Tuple3D::new(4.0, 2.0, 0.0),
    };

    assert_eq!(c.plane_point(0.5, 0.5), Tuple3D::new(1.5, 1.0, 0.0));
    assert_eq!(c.ray_for_pixel(0, 0, 1, 1).direction, Tuple3D::new(1.5, 1.0, -1.0));
}
