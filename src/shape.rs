use crate::consts::DEGENERATE_TOLERANCE;
use crate::tuple::Tuple3D;
use crate::ray::Ray3D;
use crate::light::Material;
use crate::bounds::Bounds;
use crate::transform::AffineTransform;
use crate::intersect::SurfaceHit;

/// A sphere given by its center and radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphereInfo {
    pub center: Tuple3D,
    pub radius: f64,
}

/// A triangle with one normal per vertex.
///
/// Hits are shaded with a blend of the three normals weighted by the
/// barycentric coordinates of the hit, so meshes with shared vertex normals
/// look smooth.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleInfo {
    pub vertices: [Tuple3D; 3],
    pub normals: [Tuple3D; 3],
}

/// The primitives a scene can be built from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShapeType {
    Sphere(SphereInfo),
    Triangle(TriangleInfo),
}

/// A primitive placed in the world.
///
/// `transform` maps object space to world space. It is the identity for
/// every primitive which could absorb its transform (see `Shape::new`).
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub ty: ShapeType,
    pub material: Material,
    pub transform: AffineTransform,
}

impl SphereInfo {
    pub fn new(center: Tuple3D, radius: f64) -> SphereInfo {
        SphereInfo { center, radius }
    }

    /// Intersects a ray with a sphere.
    ///
    /// Roots behind the ray origin are discarded, so a ray starting inside
    /// the sphere reports the exit point.
    pub fn ray_test(&self, ray: &Ray3D) -> Option<SurfaceHit> {
        let p = ray.origin - self.center;

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&p);
        let c = p.dot(&p) - self.radius.powi(2);

        let discriminant = b.powi(2) - (4.0 * a * c);
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let behind = |t: f64| if t < 0.0 { std::f64::INFINITY } else { t };
        let t1 = behind((-b - discriminant.sqrt()) / (2.0 * a));
        let t2 = behind((-b + discriminant.sqrt()) / (2.0 * a));

        let t = t1.min(t2);
        if !t.is_finite() {
            return None;
        }

        let normal = (ray.position(t) - self.center).try_normalize()?;
        Some(SurfaceHit { t, normal })
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.center - Tuple3D::splat(self.radius),
            self.center + Tuple3D::splat(self.radius),
        )
    }
}

impl TriangleInfo {
    /// Creates a flat triangle; every vertex gets the face normal.
    pub fn new(v0: Tuple3D, v1: Tuple3D, v2: Tuple3D) -> TriangleInfo {
        let normal = (v0 - v2).cross(&(v1 - v2))
            .try_normalize()
            .unwrap_or_default();

        TriangleInfo {
            vertices: [v0, v1, v2],
            normals: [normal; 3],
        }
    }

    /// Creates a triangle with explicit per-vertex normals.
    pub fn with_normals(vertices: [Tuple3D; 3], normals: [Tuple3D; 3])
        -> TriangleInfo {
        TriangleInfo { vertices, normals }
    }

    /// Computes the barycentric weights of `point` for each vertex.
    ///
    /// `point` is assumed to lie in the triangle's plane. The 2D system is
    /// solved in whichever axis pair gives the largest determinant. Returns
    /// `None` for a degenerate triangle or a point outside the triangle.
    pub fn barycentric(&self, point: Tuple3D) -> Option<[f64; 3]> {
        let [v0, v1, v2] = self.vertices;
        let w1 = v0 - v2;
        let w2 = v1 - v2;
        let rp = point - v2;

        let det_xy = w1.x * w2.y - w2.x * w1.y;
        let det_xz = w1.x * w2.z - w2.x * w1.z;
        let det_yz = w1.y * w2.z - w2.y * w1.z;

        let (t1, t2) = if det_xy.abs() >= det_xz.abs()
            && det_xy.abs() >= det_yz.abs() {
            if det_xy.abs() < DEGENERATE_TOLERANCE {
                return None;
            }
            (
                (w2.y * rp.x - w2.x * rp.y) / det_xy,
                (w1.x * rp.y - w1.y * rp.x) / det_xy,
            )
        } else if det_xz.abs() >= det_yz.abs() {
            if det_xz.abs() < DEGENERATE_TOLERANCE {
                return None;
            }
            (
                (w2.z * rp.x - w2.x * rp.z) / det_xz,
                (w1.x * rp.z - w1.z * rp.x) / det_xz,
            )
        } else {
            if det_yz.abs() < DEGENERATE_TOLERANCE {
                return None;
            }
            (
                (w2.z * rp.y - w2.y * rp.z) / det_yz,
                (w1.y * rp.z - w1.z * rp.y) / det_yz,
            )
        };

        let t3 = 1.0 - t1 - t2;
        let inside = |t: f64| (0.0..=1.0).contains(&t);
        if inside(t1) && inside(t2) && inside(t3) {
            Some([t1, t2, t3])
        } else {
            None
        }
    }

    /// Intersects a ray with a triangle. Both faces can be hit.
    pub fn ray_test(&self, ray: &Ray3D) -> Option<SurfaceHit> {
        let [v0, v1, v2] = self.vertices;
        let n = (v0 - v2).cross(&(v1 - v2));

        let s = n.dot(&(v0 - ray.origin)) / n.dot(&ray.direction);
        if !s.is_finite() || s < 0.0 {
            return None;
        }

        let weights = self.barycentric(ray.position(s))?;
        let normal = self.normals.iter()
            .zip(weights.iter())
            .fold(Tuple3D::zero(), |acc, (&n, &w)| acc + n * w)
            .try_normalize()?;

        Some(SurfaceHit { t: s, normal })
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(self.vertices.iter().cloned())
    }

    /// Moves the triangle through `transform`, in place.
    pub fn bake(&mut self, transform: &AffineTransform) {
        for v in self.vertices.iter_mut() {
            *v = transform.apply_point(*v);
        }

        for n in self.normals.iter_mut() {
            *n = transform.apply_normal(*n);
        }
    }
}

impl ShapeType {
    pub fn ray_test(&self, ray: &Ray3D) -> Option<SurfaceHit> {
        match self {
            ShapeType::Sphere(ref s) => s.ray_test(ray),
            ShapeType::Triangle(ref t) => t.ray_test(ray),
        }
    }

    /// Object-space bounding box.
    pub fn bounds(&self) -> Bounds {
        match self {
            ShapeType::Sphere(ref s) => s.bounds(),
            ShapeType::Triangle(ref t) => t.bounds(),
        }
    }

    /// Tries to apply `transform` directly to the primitive's geometry.
    ///
    /// Returns false if the primitive cannot represent the transformed shape;
    /// a sphere under non-uniform scale is an ellipsoid, so spheres never
    /// bake.
    pub fn bake(&mut self, transform: &AffineTransform) -> bool {
        match self {
            ShapeType::Sphere(_) => false,
            ShapeType::Triangle(ref mut t) => {
                t.bake(transform);
                true
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeType::Sphere(_) => "sphere",
            ShapeType::Triangle(_) => "triangle",
        }
    }
}

impl Shape {
    /// Places a primitive in the world under `transform`.
    ///
    /// The transform is baked into the primitive when it can be, leaving the
    /// shape with an identity transform.
    pub fn new(mut ty: ShapeType, material: Material, transform: AffineTransform)
        -> Shape {
        let transform = if transform.is_identity() {
            transform
        } else if ty.bake(&transform) {
            log::debug!("baked transform into {}", ty.name());
            AffineTransform::identity()
        } else {
            log::debug!("keeping instance transform for {}", ty.name());
            transform
        };

        Shape { ty, material, transform }
    }

    /// Creates a sphere with default material and no transform.
    pub fn sphere(center: Tuple3D, radius: f64) -> Shape {
        Shape {
            ty: ShapeType::Sphere(SphereInfo::new(center, radius)),
            material: Default::default(),
            transform: AffineTransform::identity(),
        }
    }

    /// Creates a flat triangle with default material and no transform.
    pub fn triangle(v0: Tuple3D, v1: Tuple3D, v2: Tuple3D) -> Shape {
        Shape {
            ty: ShapeType::Triangle(TriangleInfo::new(v0, v1, v2)),
            material: Default::default(),
            transform: AffineTransform::identity(),
        }
    }

    pub fn with_material(self, material: Material) -> Shape {
        Shape { material, ..self }
    }

    /// World-space bounding box.
    pub fn bounds(&self) -> Bounds {
        self.ty.bounds().transform(&self.transform)
    }
}

#[cfg(test)]
fn z_ray(x: f64, y: f64, z: f64) -> Ray3D {
    Ray3D::new(Tuple3D::new(x, y, z), Tuple3D::new(0.0, 0.0, 1.0))
}

#[test]
fn ray_misses_sphere_pointing_away() {
    let s = SphereInfo::new(Tuple3D::new(0.0, 0.0, -5.0), 1.0);
    assert_eq!(s.ray_test(&z_ray(0.0, 0.0, 0.0)), None);
}

#[test]
fn ray_misses_sphere_to_the_side() {
    let s = SphereInfo::new(Tuple3D::new(0.0, 0.0, 5.0), 1.0);
    assert_eq!(s.ray_test(&z_ray(0.0, 2.0, 0.0)), None);
}

#[test]
fn ray_through_sphere_center_takes_near_root() {
    let s = SphereInfo::new(Tuple3D::new(0.0, 0.0, 5.0), 1.0);
    let hit = s.ray_test(&z_ray(0.0, 0.0, 0.0)).unwrap();

    // Roots 4 and 6 sit symmetric about -b/2a = 5.
    assert!(crate::feq(hit.t, 4.0));
    assert_eq!(hit.normal, Tuple3D::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_inside_sphere_hits_far_side() {
    let s = SphereInfo::new(Tuple3D::zero(), 1.0);
    let hit = s.ray_test(&z_ray(0.0, 0.0, 0.0)).unwrap();

    assert!(crate::feq(hit.t, 1.0));
    assert_eq!(hit.normal, Tuple3D::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_tangent_to_sphere() {
    let s = SphereInfo::new(Tuple3D::new(0.0, 0.0, 5.0), 1.0);
    let hit = s.ray_test(&z_ray(0.0, 1.0, 0.0)).unwrap();
    assert!(crate::feq(hit.t, 5.0));
}

#[test]
fn unnormalized_direction_scales_distance() {
    let s = SphereInfo::new(Tuple3D::new(0.0, 0.0, 5.0), 1.0);
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, 2.0));
    assert!(crate::feq(s.ray_test(&r).unwrap().t, 2.0));
}

#[test]
fn sphere_bounds() {
    let s = SphereInfo::new(Tuple3D::new(1.0, 2.0, 3.0), 2.0);
    assert_eq!(s.bounds(), Bounds::new(
        Tuple3D::new(-1.0, 0.0, 1.0), Tuple3D::new(3.0, 4.0, 5.0)
    ));
}

#[test]
fn triangle_default_normals() {
    let t = TriangleInfo::new(
        Tuple3D::new(0.0, 0.0, 0.0),
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 1.0, 0.0),
    );

    // (v0 - v2) x (v1 - v2) = (0,-1,0) x (1,-1,0)
    for n in t.normals.iter() {
        assert_eq!(*n, Tuple3D::new(0.0, 0.0, 1.0));
    }
}

#[test]
fn ray_through_triangle_centroid() {
    let t = TriangleInfo::new(
        Tuple3D::new(0.0, 0.0, 2.0),
        Tuple3D::new(3.0, 0.0, 2.0),
        Tuple3D::new(0.0, 3.0, 2.0),
    );

    let hit = t.ray_test(&z_ray(1.0, 1.0, 0.0)).unwrap();
    assert!(crate::feq(hit.t, 2.0));

    let w = t.barycentric(Tuple3D::new(1.0, 1.0, 2.0)).unwrap();
    for weight in w.iter() {
        assert!(crate::feq(*weight, 1.0 / 3.0));
    }
}

#[test]
fn unit_triangle_hit() {
    let t = TriangleInfo::new(
        Tuple3D::new(0.0, 0.0, 0.0),
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 1.0, 0.0),
    );

    let hit = t.ray_test(&z_ray(0.25, 0.25, -1.0)).unwrap();
    assert!(crate::feq(hit.t, 1.0));

    // Weights are listed per vertex: v0 at the origin carries the rest.
    let w = t.barycentric(Tuple3D::new(0.25, 0.25, 0.0)).unwrap();
    assert!(crate::feq(w[0], 0.5));
    assert!(crate::feq(w[1], 0.25));
    assert!(crate::feq(w[2], 0.25));
}

#[test]
fn triangle_is_two_sided() {
    let t = TriangleInfo::new(
        Tuple3D::new(0.0, 0.0, 0.0),
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 1.0, 0.0),
    );

    let r = Ray3D::new(Tuple3D::new(0.25, 0.25, 1.0), Tuple3D::new(0.0, 0.0, -1.0));
    assert!(crate::feq(t.ray_test(&r).unwrap().t, 1.0));
}

#[test]
fn ray_misses_outside_triangle() {
    let t = TriangleInfo::new(
        Tuple3D::new(0.0, 0.0, 0.0),
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 1.0, 0.0),
    );

    assert_eq!(t.ray_test(&z_ray(0.75, 0.75, -1.0)), None);
    assert_eq!(t.ray_test(&z_ray(-0.1, 0.5, -1.0)), None);
}

#[test]
fn ray_parallel_to_triangle() {
    let t = TriangleInfo::new(
        Tuple3D::new(0.0, 0.0, 0.0),
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 1.0, 0.0),
    );

    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, -1.0), Tuple3D::new(1.0, 0.0, 0.0));
    assert_eq!(t.ray_test(&r), None);
}

#[test]
fn triangle_behind_ray() {
    let t = TriangleInfo::new(
        Tuple3D::new(0.0, 0.0, 0.0),
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 1.0, 0.0),
    );

    assert_eq!(t.ray_test(&z_ray(0.25, 0.25, 1.0)), None);
}

#[test]
fn degenerate_triangle_never_hits() {
    let t = TriangleInfo::new(
        Tuple3D::new(0.0, 0.0, 0.0),
        Tuple3D::new(1.0, 1.0, 0.0),
        Tuple3D::new(2.0, 2.0, 0.0),
    );

    assert_eq!(t.ray_test(&z_ray(1.0, 1.0, -1.0)), None);
    assert_eq!(t.barycentric(Tuple3D::new(1.0, 1.0, 0.0)), None);
}

#[test]
fn vertical_triangle_uses_other_axis_pair() {
    // Lies in the plane x = 1, so the xy determinant is zero.
    let t = TriangleInfo::new(
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(1.0, 1.0, 0.0),
        Tuple3D::new(1.0, 0.0, 1.0),
    );

    let r = Ray3D::new(Tuple3D::new(0.0, 0.25, 0.25), Tuple3D::new(1.0, 0.0, 0.0));
    let hit = t.ray_test(&r).unwrap();
    assert!(crate::feq(hit.t, 1.0));
    assert!(feq_abs(hit.normal.x, 1.0));
}

#[cfg(test)]
fn feq_abs(a: f64, b: f64) -> bool {
    crate::feq(a.abs(), b)
}

#[test]
fn smooth_normal_blends_vertex_normals() {
    let t = TriangleInfo::with_normals(
        [
            Tuple3D::new(0.0, 0.0, 0.0),
            Tuple3D::new(1.0, 0.0, 0.0),
            Tuple3D::new(0.0, 1.0, 0.0),
        ],
        [
            Tuple3D::new(0.0, 0.0, 1.0),
            Tuple3D::new(1.0, 0.0, 0.0),
            Tuple3D::new(0.0, 1.0, 0.0),
        ],
    );

    let hit = t.ray_test(&z_ray(0.25, 0.25, -1.0)).unwrap();
    let expected = Tuple3D::new(0.25, 0.25, 0.5).normalize();
    assert_eq!(hit.normal, expected);
}

#[test]
fn triangle_bounds() {
    let t = TriangleInfo::new(
        Tuple3D::new(-1.0, 0.0, 2.0),
        Tuple3D::new(1.0, 3.0, 0.0),
        Tuple3D::new(0.0, -2.0, 1.0),
    );

    assert_eq!(t.bounds(), Bounds::new(
        Tuple3D::new(-1.0, -2.0, 0.0), Tuple3D::new(1.0, 3.0, 2.0)
    ));
}

#[test]
fn triangle_bakes_transform() {
    let transform = AffineTransform::translation(Tuple3D::new(0.0, 0.0, 5.0))
        .compose(&AffineTransform::scaling(2.0, 1.0, 1.0).unwrap());

    let s = Shape::new(
        ShapeType::Triangle(TriangleInfo::new(
            Tuple3D::new(0.0, 0.0, 0.0),
            Tuple3D::new(1.0, 0.0, 0.0),
            Tuple3D::new(0.0, 1.0, 0.0),
        )),
        Material::default(),
        transform,
    );

    assert!(s.transform.is_identity());
    match s.ty {
        ShapeType::Triangle(t) => {
            assert_eq!(t.vertices[1], Tuple3D::new(2.0, 0.0, 5.0));
            assert_eq!(t.normals[0], Tuple3D::new(0.0, 0.0, 1.0));
        }
        _ => panic!("expected a triangle"),
    }
}

#[test]
fn sphere_keeps_transform() {
    let transform = AffineTransform::scaling(2.0, 1.0, 1.0).unwrap();
    let s = Shape::new(
        ShapeType::Sphere(SphereInfo::new(Tuple3D::zero(), 1.0)),
        Material::default(),
        transform,
    );

    assert!(!s.transform.is_identity());
    assert_eq!(s.bounds(), Bounds::new(
        Tuple3D::new(-2.0, -1.0, -1.0), Tuple3D::new(2.0, 1.0, 1.0)
    ));
}
