use std::ops::{ Add, Index, IndexMut, Mul };
use std::convert::From;

use crate::feq;
use crate::tuple::*;

/// A 2x2 matrix.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
struct Matrix2D {
    data: [f64; 4],
}

impl From<[f64; 4]> for Matrix2D {
    fn from(data: [f64; 4]) -> Matrix2D {
        Matrix2D { data }
    }
}

impl Index<(usize, usize)> for Matrix2D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 2) + index.1]
    }
}

/// A 3x3 matrix.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
struct Matrix3D {
    data: [f64; 9],
}

impl From<[f64; 9]> for Matrix3D {
    fn from(data: [f64; 9]) -> Matrix3D {
        Matrix3D { data }
    }
}

impl Index<(usize, usize)> for Matrix3D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 3) + index.1]
    }
}

impl Matrix2D {
    /// Calculates the determinant of a `Matrix2D`.
    fn determinant(&self) -> f64 {
        self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)]
    }
}

impl Matrix3D {
    /// Returns the submatrix of a `Matrix3D`, removing `row` and `col`.
    fn submatrix(&self, row: usize, col: usize) -> Matrix2D {
        let mut buf: [f64; 4] = [0.0; 4];
        let mut count = 0;

        for r in 0..3 {
            for c in 0..3 {
                if !(r == row || c == col) {
                    buf[count] = self[(r, c)];
                    count += 1;
                }
            }
        }

        Matrix2D { data: buf }
    }

    fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    fn cofactor(&self, row: usize, col: usize) -> f64 {
        let m = self.minor(row, col);
        m * if (row + col) % 2 == 0 { 1.0 } else { -1.0 }
    }

    fn determinant(&self) -> f64 {
        let mut sum = 0.0;
        for c in 0..3 {
            sum += self[(0, c)] * self.cofactor(0, c);
        }

        sum
    }
}

/// A 4x4 matrix.
///
/// These matrices encode the affine transforms applied to scene geometry.
/// Points (`w == 1.0`) pick up the translation column, directions
/// (`w == 0.0`) do not. Matrices compose by multiplication: applying `A`
/// and then `B` to a point is the same as applying `B * A`.
///
/// Rotation matrices expect angles in radians and, for `rotation`, a unit
/// length axis.
///
/// # Examples
///
/// ```
/// # use phong_tracer::tuple::{ Tuple3D, Tuple4D };
/// # use phong_tracer::matrix::Matrix4D;
/// let m = Matrix4D::translation(1.0, 2.0, 3.0) * Matrix4D::scaling(2.0, 2.0, 2.0);
/// let p = Tuple4D::point(Tuple3D::new(1.0, 1.0, 1.0));
/// assert_eq!((m * p).project(), Tuple3D::new(3.0, 4.0, 5.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Matrix4D {
    data: [f64; 16],
}

/// Determines whether two `Matrix4D`s are equal.
///
/// Matrices are compared element-wise. Note that equality is approximate, as
/// `Matrix4D` elements are floating point numbers.
impl PartialEq for Matrix4D {
    fn eq(&self, other: &Matrix4D) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(x, y)| feq(*x, *y))
    }
}

impl Matrix4D {
    /// Creates a new `Matrix4D`. All elements are initialized to `0.0`.
    pub fn zero() -> Matrix4D {
        Matrix4D { data: [0.0; 16] }
    }

    /// Instantiates a 4x4 identity matrix.
    pub fn identity() -> Matrix4D {
        let mut buf = [0.0; 16];
        buf[0] = 1.0; buf[5] = 1.0; buf[10] = 1.0; buf[15] = 1.0;

        Matrix4D { data: buf }
    }

    /// Checks for the identity matrix exactly, without tolerance.
    pub fn is_exact_identity(&self) -> bool {
        self.data == Self::identity().data
    }

    /// Instantiates a 4x4 translation matrix.
    ///
    /// This matrix offsets a point by `x`, `y` and `z`.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut trans = Self::identity();
        trans[(0, 3)] = x;
        trans[(1, 3)] = y;
        trans[(2, 3)] = z;

        trans
    }

    /// Instantiates a 4x4 scaling matrix.
    ///
    /// This matrix scales vectors or points by `x`, `y` and `z` along the X, Y
    /// and Z axes, respectively.
    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut scale = Self::identity();
        scale[(0, 0)] = x;
        scale[(1, 1)] = y;
        scale[(2, 2)] = z;

        scale
    }

    /// Instantiates a 4x4 rotation matrix, rotating about the X axis.
    ///
    /// ```
    /// # use phong_tracer::tuple::{ Tuple3D, Tuple4D };
    /// # use phong_tracer::matrix::Matrix4D;
    /// let point = Tuple4D::point(Tuple3D::new(0.0, 1.0, 0.0));
    /// let m = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
    /// assert_eq!(m * point, Tuple4D::point(Tuple3D::new(0.0, 0.0, 1.0)));
    /// ```
    pub fn rotation_x(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(1, 1)] =  r.cos();
        rotate[(1, 2)] = -r.sin();
        rotate[(2, 1)] =  r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Instantiates a 4x4 rotation matrix, rotating about the Y axis.
    pub fn rotation_y(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 2)] =  r.sin();
        rotate[(2, 0)] = -r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Instantiates a 4x4 rotation matrix, rotating about the Z axis.
    pub fn rotation_z(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 1)] = -r.sin();
        rotate[(1, 0)] =  r.sin();
        rotate[(1, 1)] =  r.cos();

        rotate
    }

    /// Instantiates a rotation of `r` radians about an arbitrary `axis`.
    ///
    /// Built from Rodrigues' formula, `I + sin(r) K + (1 - cos(r)) K^2`,
    /// where `K` is the cross-product matrix of the axis. The axis must
    /// already be normalized.
    pub fn rotation(axis: Tuple3D, r: f64) -> Matrix4D {
        let mut k = Self::zero();
        k[(0, 1)] = -axis.z;
        k[(0, 2)] =  axis.y;
        k[(1, 0)] =  axis.z;
        k[(1, 2)] = -axis.x;
        k[(2, 0)] = -axis.y;
        k[(2, 1)] =  axis.x;

        let mut rotate = Self::identity()
            + k.scaled(r.sin())
            + (k * k).scaled(1.0 - r.cos());
        rotate[(3, 3)] = 1.0;

        rotate
    }

    /// Multiplies every element by `s`.
    pub fn scaled(&self, s: f64) -> Matrix4D {
        let mut buf = self.data;
        for v in buf.iter_mut() {
            *v *= s;
        }

        Matrix4D { data: buf }
    }

    /// Produces the transpose of a matrix, returning a new matrix as a result.
    pub fn transposition(&self) -> Matrix4D {
        let mut buf = *self;

        for r in 0..4 {
            for c in (r+1)..4 {
                let tmp = buf[(r, c)];
                buf[(r, c)] = buf[(c, r)];
                buf[(c, r)] = tmp;
            }
        }

        buf
    }

    /// Returns the 3x3 submatrix left after removing `row` and `col`.
    fn submatrix(&self, row: usize, col: usize) -> Matrix3D {
        let mut buf: [f64; 9] = [0.0; 9];
        let mut count = 0;

        for r in 0..4 {
            for c in 0..4 {
                if !(r == row || c == col) {
                    buf[count] = self[(r, c)];
                    count += 1;
                }
            }
        }

        Matrix3D { data: buf }
    }

    /// Returns the minor of a `Matrix4D` at row and column.
    ///
    /// The "minor" is the determinant of the submatrix at `row` and `col`.
    pub fn minor(&self, row: usize, col: usize) -> f64 {
        self.submatrix(row, col).determinant()
    }

    /// Returns the cofactor of a `Matrix4D` at row and column.
    ///
    /// The "cofactor" is the minor, negated when `row + col` is odd.
    pub fn cofactor(&self, row: usize, col: usize) -> f64 {
        let m = self.minor(row, col);
        m * if (row + col) % 2 == 0 { 1.0 } else { -1.0 }
    }

    /// Calculates the determinant of a `Matrix4D`.
    pub fn determinant(&self) -> f64 {
        let mut sum = 0.0;
        for c in 0..4 {
            sum += self[(0, c)] * self.cofactor(0, c);
        }

        sum
    }

    /// Calculates the inverse of a `Matrix4D`, if it exists.
    ///
    /// If the determinant is zero (or not finite), this function returns
    /// `None`.
    pub fn inverse(&self) -> Option<Matrix4D> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let mut inv = Matrix4D::zero();
        for r in 0..4 {
            for c in 0..4 {
                inv[(c, r)] = self.cofactor(r, c) / det;
            }
        }

        Some(inv)
    }
}

impl From<[f64; 16]> for Matrix4D {
    fn from(data: [f64; 16]) -> Matrix4D {
        Matrix4D { data }
    }
}

impl Index<(usize, usize)> for Matrix4D {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 4) + index.1]
    }
}

impl IndexMut<(usize, usize)> for Matrix4D {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[(index.0 * 4) + index.1]
    }
}

impl Add<Matrix4D> for Matrix4D {
    type Output = Matrix4D;

    fn add(self, other: Matrix4D) -> Matrix4D {
        let mut buf = self.data;
        for (v, o) in buf.iter_mut().zip(other.data.iter()) {
            *v += o;
        }

        Matrix4D { data: buf }
    }
}

/// Multiplication between two matrices.
///
/// Note that matrix multiplication is not commutative; in other words, for
/// matrix `A` and matrix `B`, `A * B` is not necessarily equal to `B * A`.
///
/// ```
/// # use phong_tracer::matrix::Matrix4D;
/// let m1 = Matrix4D::scaling(2.0, 3.0, 4.0);
/// let m2 = Matrix4D::scaling(4.0, 3.0, 2.0);
/// assert_eq!(m1 * m2, Matrix4D::scaling(8.0, 9.0, 8.0));
/// ```
impl Mul<Matrix4D> for Matrix4D {
    type Output = Matrix4D;

    fn mul(self, other: Matrix4D) -> Matrix4D {
        let mut res = Matrix4D::zero();

        for r in 0..4 {
            for c in 0..4 {
                res[(r, c)] = self[(r, 0)] * other[(0, c)]
                    + self[(r, 1)] * other[(1, c)]
                    + self[(r, 2)] * other[(2, c)]
                    + self[(r, 3)] * other[(3, c)]
            }
        }

        res
    }
}

/// Multiplication between a matrix and a `Tuple4D`.
///
/// `Tuple4D`s are multiplied on the right, as column vectors.
impl Mul<Tuple4D> for Matrix4D {
    type Output = Tuple4D;

    fn mul(self, other: Tuple4D) -> Tuple4D {
        let mut buf: [f64; 4] = Default::default();

        for (r, v) in buf.iter_mut().enumerate() {
            *v = self[(r, 0)] * other.x
                + self[(r, 1)] * other.y
                + self[(r, 2)] * other.z
                + self[(r, 3)] * other.w;
        }

        Tuple4D { x: buf[0], y: buf[1], z: buf[2], w: buf[3] }
    }
}

#[cfg(test)]
fn point(x: f64, y: f64, z: f64) -> Tuple4D {
    Tuple4D::tuple(x, y, z, 1.0)
}

#[cfg(test)]
fn vector(x: f64, y: f64, z: f64) -> Tuple4D {
    Tuple4D::tuple(x, y, z, 0.0)
}

#[test]
fn identity() {
    let i = Matrix4D::identity();
    let a: Matrix4D = [ 0.0, 1.0,  2.0,  4.0,
                        1.0, 2.0,  4.0,  8.0,
                        2.0, 4.0,  8.0, 16.0,
                        4.0, 8.0, 16.0, 32.0, ].into();

    assert_eq!(i * a, a);
    assert_eq!(a * i, a);
    assert!(i.is_exact_identity());
    assert!(!Matrix4D::translation(0.0, 0.0, 1e-9).is_exact_identity());
}

#[test]
fn transpose() {
     let a: Matrix4D = [ 0.0, 9.0, 3.0, 0.0,
                         9.0, 8.0, 0.0, 8.0,
                         1.0, 8.0, 5.0, 3.0,
                         0.0, 0.0, 5.0, 8.0, ].into();

     let t: Matrix4D = [ 0.0, 9.0, 1.0, 0.0,
                         9.0, 8.0, 8.0, 0.0,
                         3.0, 0.0, 5.0, 5.0,
                         0.0, 8.0, 3.0, 8.0, ].into();

     assert_eq!(t, a.transposition());
     assert_eq!(t.transposition(), a);
}

#[test]
fn mat3_determinant() {
     let a: Matrix3D = [  1.0, 2.0,  6.0,
                         -5.0, 8.0, -4.0,
                          2.0, 6.0,  4.0, ].into();

     assert_eq!(a.cofactor(0, 0), 56.0);
     assert_eq!(a.cofactor(0, 1), 12.0);
     assert_eq!(a.cofactor(0, 2), -46.0);
     assert_eq!(a.determinant(), -196.0);
}

#[test]
fn mat4_determinant() {
     let a: Matrix4D = [ -2.0, -8.0,  3.0,  5.0,
                         -3.0,  1.0,  7.0,  3.0,
                          1.0,  2.0, -9.0,  6.0,
                         -6.0,  7.0,  7.0, -9.0, ].into();

     assert_eq!(a.cofactor(0, 0), 690.0);
     assert_eq!(a.cofactor(0, 1), 447.0);
     assert_eq!(a.cofactor(0, 2), 210.0);
     assert_eq!(a.cofactor(0, 3), 51.0);
     assert_eq!(a.determinant(), -4071.0);
}

#[test]
fn mat4_inverse_mult() {
     let a: Matrix4D = [  3.0, -9.0,  7.0,  3.0,
                          3.0,  8.0,  2.0, -9.0,
                         -4.0,  4.0,  4.0,  1.0,
                         -6.0,  5.0, -1.0,  1.0, ].into();

     let b: Matrix4D = [ 8.0,  2.0, 2.0, 2.0,
                         3.0, -1.0, 7.0, 0.0,
                         7.0,  0.0, 5.0, 4.0,
                         6.0, -2.0, 0.0, 5.0  ].into();

     let c = a * b;

     assert_eq!(a, c * b.inverse().unwrap());
}

#[test]
fn mat4_singular() {
    assert_eq!(Matrix4D::scaling(1.0, 0.0, 1.0).inverse(), None);
    assert_eq!(Matrix4D::zero().inverse(), None);
}

#[test]
fn mat4_translation() {
    let transform = Matrix4D::translation(5.0, -3.0, 2.0);

    assert_eq!(transform * point(-3.0, 4.0, 5.0), point(2.0, 1.0, 7.0));
    assert_eq!(transform.inverse().unwrap() * point(-3.0, 4.0, 5.0),
        point(-8.0, 7.0, 3.0));
    assert_eq!(transform * vector(-3.0, 4.0, 5.0), vector(-3.0, 4.0, 5.0));
}

#[test]
fn mat4_scaling() {
    let transform = Matrix4D::scaling(2.0, 3.0, 4.0);

    assert_eq!(transform * vector(-4.0, 6.0, 8.0), vector(-8.0, 18.0, 32.0));
    assert_eq!(transform.inverse().unwrap() * vector(-4.0, 6.0, 8.0),
        vector(-2.0, 2.0, 2.0));
}

#[test]
fn mat4_rotate_axes() {
    let quarter = std::f64::consts::PI / 2.0;

    assert_eq!(Matrix4D::rotation_x(quarter) * point(0.0, 1.0, 0.0),
        point(0.0, 0.0, 1.0));
    assert_eq!(Matrix4D::rotation_y(quarter) * point(0.0, 0.0, 1.0),
        point(1.0, 0.0, 0.0));
    assert_eq!(Matrix4D::rotation_z(quarter) * point(0.0, 1.0, 0.0),
        point(-1.0, 0.0, 0.0));
}

#[test]
fn mat4_rotate_arbitrary_axis_matches_principal_axes() {
    let r = 0.7;

    assert_eq!(Matrix4D::rotation(Tuple3D::new(1.0, 0.0, 0.0), r),
        Matrix4D::rotation_x(r));
    assert_eq!(Matrix4D::rotation(Tuple3D::new(0.0, 1.0, 0.0), r),
        Matrix4D::rotation_y(r));
    assert_eq!(Matrix4D::rotation(Tuple3D::new(0.0, 0.0, 1.0), r),
        Matrix4D::rotation_z(r));
}

#[test]
fn mat4_rotate_diagonal_axis() {
    // A third of a turn about (1, 1, 1) cycles the principal axes.
    let axis = Tuple3D::new(1.0, 1.0, 1.0).normalize();
    let m = Matrix4D::rotation(axis, 2.0 * std::f64::consts::PI / 3.0);

    assert_eq!(m * point(1.0, 0.0, 0.0), point(0.0, 1.0, 0.0));
    assert_eq!(m * point(0.0, 1.0, 0.0), point(0.0, 0.0, 1.0));
}

#[test]
fn chained_transforms() {
    let a = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
    let b = Matrix4D::scaling(5.0, 5.0, 5.0);
    let c = Matrix4D::translation(10.0, 5.0, 7.0);

    let t = c * b * a;

    assert_eq!(t * point(1.0, 0.0, 1.0), point(15.0, 0.0, 7.0));
}
