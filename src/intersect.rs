use crate::tuple::Tuple3D;
use crate::ray::Ray3D;
use crate::shape::Shape;

/// A hit on a bare primitive, in the primitive's own space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceHit {
    pub t: f64,
    pub normal: Tuple3D,
}

/// A hit on a shape in the world.
///
/// `t` is measured in multiples of the world ray's direction, and `normal`
/// is a world-space unit vector. It is not flipped toward the viewer; the
/// shader does that.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub t: f64,
    pub normal: Tuple3D,
    pub what: &'a Shape,
}

/// Intersections are equal if they have the same distance and refer to the
/// same shape (by address, not by value).
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.t == other.t
            && self.normal == other.normal
            && std::ptr::eq(self.what, other.what)
    }
}

impl<'a> Intersection<'a> {
    pub fn new(t: f64, normal: Tuple3D, what: &'a Shape) -> Intersection<'a> {
        Intersection { t, normal, what }
    }
}

/// Intersects a world-space ray with a shape.
///
/// Shapes with an identity transform are tested directly. Otherwise the ray
/// is moved into object space and the object-space hit vector `t * d` is
/// moved back out, so that the returned `t` is comparable with hits on other
/// shapes:
///
/// ```text
/// t_world = |M (t_object d_object)| / |d_world|
/// ```
///
/// The remapping is only exact because `M` is affine, which keeps the world
/// hit on the world ray.
pub fn intersect<'a>(shape: &'a Shape, ray: &Ray3D) -> Option<Intersection<'a>> {
    if shape.transform.is_identity() {
        return shape.ty.ray_test(ray)
            .map(|hit| Intersection::new(hit.t, hit.normal, shape));
    }

    let local_ray = shape.transform.invert().apply_ray(ray);
    let hit = shape.ty.ray_test(&local_ray)?;

    let world_vector = shape.transform.apply_direction(local_ray.direction * hit.t);
    let t = world_vector.magnitude() / ray.direction.magnitude();
    let normal = shape.transform.apply_normal(hit.normal);

    Some(Intersection::new(t, normal, shape))
}

/// Keeps the nearest finite intersection. Ties go to the earliest one.
pub fn nearest<'a, I>(intersections: I) -> Option<Intersection<'a>>
    where I: IntoIterator<Item = Intersection<'a>> {
    intersections.into_iter()
        .filter(|i| i.t.is_finite())
        .fold(None, |best: Option<Intersection<'a>>, i| match best {
            Some(b) if b.t <= i.t => Some(b),
            _ => Some(i),
        })
}

#[cfg(test)]
use crate::transform::AffineTransform;
#[cfg(test)]
use crate::light::Material;
#[cfg(test)]
use crate::shape::{ ShapeType, SphereInfo };

#[cfg(test)]
fn unit_sphere(transform: AffineTransform) -> Shape {
    Shape::new(
        ShapeType::Sphere(SphereInfo::new(Tuple3D::zero(), 1.0)),
        Material::default(),
        transform,
    )
}

#[test]
fn identity_shape_is_tested_directly() {
    let s = Shape::sphere(Tuple3D::new(0.0, 0.0, -5.0), 1.0);
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0));

    let i = intersect(&s, &r).unwrap();
    assert!(crate::feq(i.t, 4.0));
    assert_eq!(i.normal, Tuple3D::new(0.0, 0.0, 1.0));
    assert!(std::ptr::eq(i.what, &s));
}

#[test]
fn translated_sphere_distance() {
    let s = unit_sphere(AffineTransform::translation(Tuple3D::new(0.0, 0.0, -5.0)));
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0));

    let i = intersect(&s, &r).unwrap();
    assert!(crate::feq(i.t, 4.0));
    assert_eq!(i.normal, Tuple3D::new(0.0, 0.0, 1.0));
}

#[test]
fn scaled_sphere_distance_is_in_world_units() {
    let transform = AffineTransform::translation(Tuple3D::new(0.0, 0.0, -10.0))
        .compose(&AffineTransform::scaling(1.0, 1.0, 3.0).unwrap());
    let s = unit_sphere(transform);

    // The ellipsoid spans z in [-13, -7].
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -2.0));
    let i = intersect(&s, &r).unwrap();
    assert!(crate::feq(i.t, 3.5));
    assert_eq!(r.position(i.t), Tuple3D::new(0.0, 0.0, -7.0));
    assert_eq!(i.normal, Tuple3D::new(0.0, 0.0, 1.0));
}

#[test]
fn scaled_sphere_normal_uses_inverse_transpose() {
    let s = unit_sphere(AffineTransform::scaling(1.0, 0.5, 1.0).unwrap());

    let half = std::f64::consts::FRAC_1_SQRT_2;
    let target = Tuple3D::new(0.0, half * 0.5, -half);
    let r = Ray3D::new(target + Tuple3D::new(0.0, 0.0, -5.0), Tuple3D::new(0.0, 0.0, 1.0));

    let i = intersect(&s, &r).unwrap();
    assert_eq!(r.position(i.t), target);

    // Object-space normal (0, h, -h) scaled by (1, 2, 1).
    assert_eq!(i.normal, Tuple3D::new(0.0, 2.0, -1.0).normalize());
}

#[test]
fn nearest_prefers_first_on_ties() {
    let a = Shape::sphere(Tuple3D::zero(), 1.0);
    let b = Shape::sphere(Tuple3D::zero(), 1.0);
    let n = Tuple3D::new(0.0, 0.0, 1.0);

    let hits = vec![
        Intersection::new(3.0, n, &b),
        Intersection::new(2.0, n, &a),
        Intersection::new(2.0, n, &b),
        Intersection::new(std::f64::INFINITY, n, &b),
    ];

    let hit = nearest(hits).unwrap();
    assert!(crate::feq(hit.t, 2.0));
    assert!(std::ptr::eq(hit.what, &a));
}

#[test]
fn nearest_of_nothing() {
    assert_eq!(nearest(Vec::new()), None);
}
