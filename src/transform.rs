use crate::consts::SCALE_EPSILON;
use crate::error::TransformError;
use crate::matrix::Matrix4D;
use crate::ray::Ray3D;
use crate::tuple::{ Tuple3D, Tuple4D };

/// An invertible affine transform with its inverse kept alongside.
///
/// Transforms are built from translations, scalings and rotations, and
/// combined with `compose`. The inverse is maintained as the transform is
/// built, so it is never recomputed while rendering. `identity` caches
/// whether the matrix is exactly the identity; when it is, every `apply_*`
/// method returns its input untouched.
///
/// A transform is used two ways by the renderer: `inverse` maps world-space
/// rays into object space, and `apply_normal` maps object-space normals back
/// with the inverse-transpose rule.
///
/// # Examples
///
/// ```
/// # use phong_tracer::tuple::Tuple3D;
/// # use phong_tracer::transform::AffineTransform;
/// let t = AffineTransform::translation(Tuple3D::new(0.0, 0.0, -5.0))
///     .compose(&AffineTransform::scaling(2.0, 2.0, 2.0).unwrap());
///
/// let p = t.apply_point(Tuple3D::new(1.0, 0.0, 0.0));
/// assert_eq!(p, Tuple3D::new(2.0, 0.0, -5.0));
/// assert_eq!(t.invert().apply_point(p), Tuple3D::new(1.0, 0.0, 0.0));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AffineTransform {
    pub matrix: Matrix4D,
    pub inverse: Matrix4D,
    identity: bool,
}

impl Default for AffineTransform {
    fn default() -> AffineTransform {
        AffineTransform::identity()
    }
}

impl AffineTransform {
    /// The transform which leaves everything in place.
    pub fn identity() -> AffineTransform {
        AffineTransform {
            matrix: Matrix4D::identity(),
            inverse: Matrix4D::identity(),
            identity: true,
        }
    }

    fn from_pair(matrix: Matrix4D, inverse: Matrix4D) -> AffineTransform {
        let identity = matrix.is_exact_identity();
        AffineTransform { matrix, inverse, identity }
    }

    /// Builds a transform from an arbitrary matrix.
    ///
    /// Fails with `TransformError::Singular` if the matrix has no inverse.
    pub fn from_matrix(matrix: Matrix4D) -> Result<AffineTransform, TransformError> {
        let inverse = matrix.inverse().ok_or(TransformError::Singular)?;
        Ok(Self::from_pair(matrix, inverse))
    }

    pub fn translation(offset: Tuple3D) -> AffineTransform {
        Self::from_pair(
            Matrix4D::translation(offset.x, offset.y, offset.z),
            Matrix4D::translation(-offset.x, -offset.y, -offset.z),
        )
    }

    /// Scales along each axis.
    ///
    /// A factor that is zero or nearly zero would collapse space and leave
    /// nothing to invert, so it is rejected here rather than at render time.
    pub fn scaling(x: f64, y: f64, z: f64) -> Result<AffineTransform, TransformError> {
        let degenerate = |s: f64| !s.is_finite() || s.abs() < SCALE_EPSILON;
        if degenerate(x) || degenerate(y) || degenerate(z) {
            return Err(TransformError::DegenerateScale { x, y, z });
        }

        Ok(Self::from_pair(
            Matrix4D::scaling(x, y, z),
            Matrix4D::scaling(1.0 / x, 1.0 / y, 1.0 / z),
        ))
    }

    /// Rotates by `angle` radians about `axis`.
    ///
    /// The axis does not need to be unit length, but it must not be zero.
    pub fn rotation(axis: Tuple3D, angle: f64) -> Result<AffineTransform, TransformError> {
        let axis = axis.try_normalize().ok_or(TransformError::ZeroRotationAxis)?;
        let matrix = Matrix4D::rotation(axis, angle);

        // A rotation matrix is orthonormal, so its transpose is its inverse.
        Ok(Self::from_pair(matrix, matrix.transposition()))
    }

    /// Rotates about the direction of `rotation` by its length, in degrees.
    ///
    /// A zero vector is no rotation at all.
    pub fn rotation_degrees(rotation: Tuple3D) -> AffineTransform {
        match rotation.try_normalize() {
            None => Self::identity(),
            Some(axis) => {
                let matrix = Matrix4D::rotation(axis, rotation.magnitude().to_radians());
                Self::from_pair(matrix, matrix.transposition())
            }
        }
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Returns the transform which undoes this one.
    pub fn invert(&self) -> AffineTransform {
        AffineTransform {
            matrix: self.inverse,
            inverse: self.matrix,
            identity: self.identity,
        }
    }

    /// Returns the transform which applies `other` first, then `self`.
    pub fn compose(&self, other: &AffineTransform) -> AffineTransform {
        if other.identity {
            return *self;
        }
        if self.identity {
            return *other;
        }

        Self::from_pair(self.matrix * other.matrix, other.inverse * self.inverse)
    }

    pub fn apply_point(&self, point: Tuple3D) -> Tuple3D {
        if self.identity {
            return point;
        }

        (self.matrix * Tuple4D::point(point)).project()
    }

    pub fn apply_direction(&self, direction: Tuple3D) -> Tuple3D {
        if self.identity {
            return direction;
        }

        (self.matrix * Tuple4D::vector(direction)).xyz()
    }

    pub fn apply_ray(&self, ray: &Ray3D) -> Ray3D {
        if self.identity {
            return *ray;
        }

        ray.transform(&self.matrix)
    }

    /// Maps a surface normal through this transform.
    ///
    /// Normals are multiplied by the transpose of the inverse; under a
    /// non-uniform scale, transforming them like directions would tilt them
    /// off the surface. The result is renormalized, unless it came out as a
    /// zero vector, in which case it is returned as-is.
    pub fn apply_normal(&self, normal: Tuple3D) -> Tuple3D {
        if self.identity {
            return normal;
        }

        let n = (self.inverse.transposition() * Tuple4D::vector(normal)).xyz();
        n.try_normalize().unwrap_or(n)
    }
}

#[test]
fn identity_short_circuits() {
    let t = AffineTransform::identity();
    let p = Tuple3D::new(1.0, 2.0, 3.0);

    assert!(t.is_identity());
    assert_eq!(t.apply_point(p), p);
    assert_eq!(t.apply_direction(p), p);
    assert_eq!(t.apply_normal(p), p);
}

#[test]
fn zero_translation_is_identity() {
    assert!(AffineTransform::translation(Tuple3D::zero()).is_identity());
    assert!(!AffineTransform::translation(Tuple3D::new(0.0, 1.0, 0.0)).is_identity());
}

#[test]
fn rejects_degenerate_scale() {
    assert_eq!(AffineTransform::scaling(1.0, 0.0, 2.0),
        Err(TransformError::DegenerateScale { x: 1.0, y: 0.0, z: 2.0 }));
    assert!(AffineTransform::scaling(1e-12, 1.0, 1.0).is_err());
    assert!(AffineTransform::scaling(-2.0, 1.0, 1.0).is_ok());
}

#[test]
fn rejects_zero_axis_and_singular_matrix() {
    assert_eq!(AffineTransform::rotation(Tuple3D::zero(), 1.0),
        Err(TransformError::ZeroRotationAxis));
    assert_eq!(AffineTransform::from_matrix(Matrix4D::scaling(1.0, 1.0, 0.0)),
        Err(TransformError::Singular));
}

#[test]
fn zero_degree_rotation_is_identity() {
    assert!(AffineTransform::rotation_degrees(Tuple3D::zero()).is_identity());

    let t = AffineTransform::rotation_degrees(Tuple3D::new(0.0, 0.0, 90.0));
    assert_eq!(t.apply_point(Tuple3D::new(1.0, 0.0, 0.0)),
        Tuple3D::new(0.0, 1.0, 0.0));
}

#[test]
fn compose_applies_other_first() {
    let translate = AffineTransform::translation(Tuple3D::new(10.0, 0.0, 0.0));
    let scale = AffineTransform::scaling(2.0, 2.0, 2.0).unwrap();

    // Scale, then translate.
    let t = translate.compose(&scale);
    assert_eq!(t.apply_point(Tuple3D::new(1.0, 1.0, 1.0)),
        Tuple3D::new(12.0, 2.0, 2.0));

    // Translate, then scale.
    let t = scale.compose(&translate);
    assert_eq!(t.apply_point(Tuple3D::new(1.0, 1.0, 1.0)),
        Tuple3D::new(22.0, 2.0, 2.0));
}

#[test]
fn matrix_times_inverse_is_identity() {
    let t = AffineTransform::translation(Tuple3D::new(1.0, -2.0, 3.0))
        .compose(&AffineTransform::rotation(Tuple3D::new(1.0, 2.0, 3.0), 0.8).unwrap())
        .compose(&AffineTransform::scaling(0.5, 3.0, -2.0).unwrap());

    assert_eq!(t.matrix * t.inverse, Matrix4D::identity());
    assert_eq!(t.inverse * t.matrix, Matrix4D::identity());
    assert_eq!(t.matrix.inverse().unwrap(), t.inverse);
}

#[test]
fn point_round_trip() {
    let chains = vec![
        AffineTransform::scaling(3.0, 0.25, 7.0).unwrap(),
        AffineTransform::rotation_degrees(Tuple3D::new(30.0, -40.0, 10.0))
            .compose(&AffineTransform::translation(Tuple3D::new(5.0, 6.0, 7.0))),
        AffineTransform::translation(Tuple3D::new(-1.0, 0.5, 2.0))
            .compose(&AffineTransform::scaling(-1.5, 2.0, 0.1).unwrap())
            .compose(&AffineTransform::rotation_degrees(Tuple3D::new(0.0, 45.0, 0.0))),
    ];

    let points = [
        Tuple3D::new(0.0, 0.0, 0.0),
        Tuple3D::new(1.0, -2.0, 3.0),
        Tuple3D::new(-7.5, 0.25, 12.0),
    ];

    for t in chains.iter() {
        for &p in points.iter() {
            assert_eq!(t.invert().apply_point(t.apply_point(p)), p);
        }
    }
}

#[test]
fn transformed_ray() {
    let t = AffineTransform::scaling(2.0, 3.0, 4.0).unwrap();
    let r = t.apply_ray(&Ray3D::new(
        Tuple3D::new(1.0, 2.0, 3.0),
        Tuple3D::new(0.0, 1.0, 0.0),
    ));

    assert_eq!(r.origin, Tuple3D::new(2.0, 6.0, 12.0));
    assert_eq!(r.direction, Tuple3D::new(0.0, 3.0, 0.0));
}

#[test]
fn normal_stays_perpendicular_under_non_uniform_scale() {
    let t = AffineTransform::scaling(1.0, 0.5, 3.0).unwrap()
        .compose(&AffineTransform::rotation_degrees(Tuple3D::new(0.0, 0.0, 36.0)));

    // A surface point on the unit sphere, with its normal and two tangents.
    let normal = Tuple3D::new(0.0, 1.0, 1.0).normalize();
    let tangents = [
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 1.0, -1.0),
    ];

    let world_normal = t.apply_normal(normal);
    assert!(crate::feq(world_normal.magnitude(), 1.0));

    for tangent in tangents.iter() {
        let world_tangent = t.apply_direction(*tangent);
        assert!(crate::feq(world_normal.dot(&world_tangent), 0.0));
    }
}
