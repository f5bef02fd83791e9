use crate::consts::BOUNCE_OFFSET;
use crate::tuple::Tuple3D;
use crate::ray::Ray3D;
use crate::color::Color;
use crate::shape::Shape;
use crate::light::{ LightSource, Incidence };
use crate::index::{ SpatialIndex, IndexKind };
use crate::intersect::{ Intersection, intersect, nearest };

/// Everything that can be seen or cast light in a render.
///
/// The world owns its objects, its lights and the index over the objects.
/// It is never changed while rendering.
#[derive(Debug)]
pub struct World {
    pub objects: Vec<Shape>,
    pub lights: Vec<LightSource>,
    index: Box<dyn SpatialIndex>,
}

impl Default for World {
    fn default() -> World {
        World::empty()
    }
}

impl World {
    /// Creates a world and builds an index of type `kind` over its objects.
    pub fn new(objects: Vec<Shape>, lights: Vec<LightSource>, kind: IndexKind)
        -> World {
        let index = kind.build(&objects);
        World { objects, lights, index }
    }

    /// Creates a world with a caller-supplied index.
    ///
    /// The index must answer with indices into `objects`.
    pub fn with_index(objects: Vec<Shape>, lights: Vec<LightSource>,
        index: Box<dyn SpatialIndex>) -> World {
        World { objects, lights, index }
    }

    /// Creates a world with no objects and no lights.
    pub fn empty() -> World {
        World::new(Vec::new(), Vec::new(), IndexKind::Exhaustive)
    }

    /// Finds the nearest object hit by a ray.
    pub fn trace_ray(&self, ray: &Ray3D) -> Option<Intersection<'_>> {
        nearest(
            self.index.candidates(ray)
                .into_iter()
                .filter_map(|i| self.objects.get(i))
                .filter_map(|o| intersect(o, ray))
        )
    }

    /// Determines whether something lies between `point` and a light.
    pub fn is_shadowed(&self, point: Tuple3D, incidence: &Incidence) -> bool {
        let r = Ray3D::offset(point, incidence.direction, BOUNCE_OFFSET);

        match self.trace_ray(&r) {
            Some(hit) => hit.t < incidence.distance,
            None => false,
        }
    }

    /// Computes the color leaving `point` toward `eye`.
    ///
    /// Every light adds the material's ambient term; lights with a direction
    /// add diffuse and specular terms unless shadowed. While `bounces` is
    /// above zero, reflective materials trace one more ray.
    pub fn shade(&self, what: &Shape, point: Tuple3D, normal: Tuple3D,
        eye: Tuple3D, bounces: usize) -> Color {
        let material = &what.material;

        let eye_dir = match (eye - point).try_normalize() {
            Some(e) => e,
            None => return Color::black(),
        };

        let normal = if normal.dot(&eye_dir) < 0.0 { -normal } else { normal };

        let mut result = Color::black();
        for light in self.lights.iter() {
            let incidence = light.incidence(point);
            let attenuation = incidence.map_or(1.0, |i| i.attenuation);
            let light_color = light.color();

            result += material.ambient * light_color * attenuation;

            let incidence = match incidence {
                Some(i) => i,
                None => continue,
            };

            if self.is_shadowed(point, &incidence) {
                continue;
            }

            let light_dir = incidence.direction;
            let diffuse = light_dir.dot(&normal).max(0.0);
            result += material.diffuse * light_color * (attenuation * diffuse);

            let reflected = -light_dir + normal * (2.0 * normal.dot(&light_dir));
            let specular = reflected.dot(&eye_dir)
                .max(0.0)
                .powf(material.specular_power);
            result += material.specular * light_color * (attenuation * specular);
        }

        if bounces > 0 && !material.reflective.is_black() {
            let reflected = -eye_dir + normal * (2.0 * normal.dot(&eye_dir));
            let r = Ray3D::offset(point, reflected, BOUNCE_OFFSET);
            result += material.reflective * self.color_at(&r, bounces - 1);
        }

        result
    }

    /// Traces a ray into the world and shades whatever it hits first.
    pub fn color_at(&self, ray: &Ray3D, bounces: usize) -> Color {
        match self.trace_ray(ray) {
            Some(hit) => self.shade(
                hit.what, ray.position(hit.t), hit.normal, ray.origin, bounces
            ),
            None => Color::black(),
        }
    }
}

#[cfg(test)]
use crate::consts::MAX_BOUNCES;
#[cfg(test)]
use crate::light::{ Material, Falloff };
#[cfg(test)]
use std::cell::Cell;

#[cfg(test)]
fn mirror(z: f64, material: Material) -> Shape {
    Shape::triangle(
        Tuple3D::new(-100.0, -100.0, z),
        Tuple3D::new(100.0, -100.0, z),
        Tuple3D::new(0.0, 100.0, z),
    ).with_material(material)
}

/// Passes every object through, counting how often it is asked.
#[cfg(test)]
#[derive(Debug)]
struct CountingIndex {
    count: usize,
    queries: std::rc::Rc<Cell<usize>>,
}

#[cfg(test)]
impl SpatialIndex for CountingIndex {
    fn candidates(&self, _ray: &Ray3D) -> Vec<usize> {
        self.queries.set(self.queries.get() + 1);
        (0..self.count).collect()
    }
}

#[test]
fn sphere_seen_from_origin() {
    let mut material = Material::default();
    material.ambient = Color::gray(1.0);

    let w = World::new(
        vec![Shape::sphere(Tuple3D::new(0.0, 0.0, -5.0), 1.0).with_material(material)],
        vec![LightSource::ambient(Color::gray(0.2))],
        IndexKind::BoundingBoxes,
    );

    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0));
    let hit = w.trace_ray(&r).unwrap();
    assert!(crate::feq(hit.t, 4.0));
    assert_eq!(hit.normal, Tuple3D::new(0.0, 0.0, 1.0));

    assert_eq!(w.color_at(&r, MAX_BOUNCES), Color::gray(0.2));
}

#[test]
fn ray_into_empty_world_is_black() {
    let w = World::empty();
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0));

    assert!(w.trace_ray(&r).is_none());
    assert_eq!(w.color_at(&r, MAX_BOUNCES), Color::black());
}

#[test]
fn occluded_point_light_keeps_ambient() {
    let material = Material {
        ambient: Color::gray(0.5),
        diffuse: Color::white(),
        specular: Color::white(),
        specular_power: 10.0,
        reflective: Color::black(),
    };

    let floor = mirror(0.0, material);
    let occluder = Shape::sphere(Tuple3D::new(0.0, 0.0, 5.0), 1.0);
    let lights = vec![
        LightSource::ambient(Color::gray(0.2)),
        LightSource::point(Tuple3D::new(0.0, 0.0, 10.0), Color::white(), Falloff::None),
    ];

    let point = Tuple3D::zero();
    let normal = Tuple3D::new(0.0, 0.0, 1.0);
    let eye = Tuple3D::new(0.0, 0.0, 1.0);

    let shadowed = World::new(
        vec![floor.clone(), occluder], lights.clone(), IndexKind::BoundingBoxes
    );
    let c = shadowed.shade(&shadowed.objects[0], point, normal, eye, 0);

    // Ambient from both lights, nothing else.
    assert_eq!(c, Color::gray(0.5 * 0.2 + 0.5 * 1.0));

    let lit = World::new(vec![floor], lights, IndexKind::BoundingBoxes);
    let c = lit.shade(&lit.objects[0], point, normal, eye, 0);

    // Diffuse and specular are both 1 straight on.
    assert_eq!(c, Color::gray(0.6 + 1.0 + 1.0));
}

#[test]
fn light_behind_its_target_does_not_shadow() {
    let w = World::new(
        vec![Shape::sphere(Tuple3D::new(0.0, 0.0, 5.0), 1.0)],
        Vec::new(),
        IndexKind::Exhaustive,
    );

    let light = LightSource::point(Tuple3D::new(0.0, 0.0, 2.0), Color::white(), Falloff::None);
    let i = light.incidence(Tuple3D::zero()).unwrap();
    assert!(!w.is_shadowed(Tuple3D::zero(), &i));

    let light = LightSource::directional(Tuple3D::new(0.0, 0.0, -1.0), Color::white()).unwrap();
    let i = light.incidence(Tuple3D::zero()).unwrap();
    assert!(w.is_shadowed(Tuple3D::zero(), &i));
}

#[test]
fn falloff_scales_every_term() {
    let material = Material {
        ambient: Color::white(),
        diffuse: Color::white(),
        ..Material::default()
    };

    let floor = mirror(0.0, material);
    let w = World::new(
        vec![floor],
        vec![LightSource::point(Tuple3D::new(0.0, 0.0, 2.0), Color::white(), Falloff::Quadratic)],
        IndexKind::Exhaustive,
    );

    let c = w.shade(&w.objects[0], Tuple3D::zero(), Tuple3D::new(0.0, 0.0, 1.0),
        Tuple3D::new(0.0, 0.0, 1.0), 0);
    assert_eq!(c, Color::gray(0.25 + 0.25));
}

#[test]
fn normal_is_flipped_toward_eye() {
    let material = Material { diffuse: Color::white(), ..Material::default() };
    let w = World::new(
        vec![mirror(0.0, material)],
        vec![LightSource::directional(Tuple3D::new(0.0, 0.0, 1.0), Color::white()).unwrap()],
        IndexKind::Exhaustive,
    );

    // The light and eye are both below the triangle, whose normal faces up.
    let c = w.shade(&w.objects[0], Tuple3D::zero(), Tuple3D::new(0.0, 0.0, 1.0),
        Tuple3D::new(0.0, 0.0, -3.0), 0);
    assert_eq!(c, Color::white());
}

#[test]
fn reflection_stops_when_bounces_run_out() {
    let material = Material {
        ambient: Color::gray(0.1),
        reflective: Color::gray(0.5),
        ..Material::default()
    };

    let queries = std::rc::Rc::new(Cell::new(0));
    let w = World::with_index(
        vec![mirror(0.0, material), mirror(-2.0, material)],
        vec![LightSource::ambient(Color::white())],
        Box::new(CountingIndex { count: 2, queries: queries.clone() }),
    );

    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, -1.0), Tuple3D::new(0.0, 0.0, -1.0));
    let c = w.color_at(&r, MAX_BOUNCES);

    assert_eq!(queries.get(), MAX_BOUNCES + 1);

    // 0.1 * (1 + 1/2 + ... + 1/32)
    assert_eq!(c, Color::gray(0.1 * (2.0 - 1.0 / 32.0)));
}

#[test]
fn no_reflection_at_zero_bounces() {
    let material = Material {
        ambient: Color::gray(0.1),
        reflective: Color::white(),
        ..Material::default()
    };

    let queries = std::rc::Rc::new(Cell::new(0));
    let w = World::with_index(
        vec![mirror(0.0, material), mirror(-2.0, material)],
        vec![LightSource::ambient(Color::white())],
        Box::new(CountingIndex { count: 2, queries: queries.clone() }),
    );

    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, -1.0), Tuple3D::new(0.0, 0.0, -1.0));
    assert_eq!(w.color_at(&r, 0), Color::gray(0.1));
    assert_eq!(queries.get(), 1);
}

#[test]
fn diffuse_follows_cosine_of_incidence() {
    let material = Material { diffuse: Color::white(), ..Material::default() };
    let w = World::new(
        vec![mirror(0.0, material)],
        vec![LightSource::directional(Tuple3D::new(-1.0, 0.0, -1.0), Color::white()).unwrap()],
        IndexKind::Exhaustive,
    );

    // Light arrives at 45 degrees from the normal.
    let c = w.shade(&w.objects[0], Tuple3D::zero(), Tuple3D::new(0.0, 0.0, 1.0),
        Tuple3D::new(0.0, 0.0, 3.0), 0);
    assert_eq!(c, Color::gray(std::f64::consts::FRAC_1_SQRT_2));
}

#[test]
fn specular_power_sharpens_highlight() {
    let shade_with_power = |power: f64| {
        let material = Material {
            specular: Color::white(),
            specular_power: power,
            ..Material::default()
        };
        let w = World::new(
            vec![mirror(0.0, material)],
            vec![LightSource::directional(Tuple3D::new(-1.0, 0.0, -1.0), Color::white()).unwrap()],
            IndexKind::Exhaustive,
        );

        // The mirror direction is (-1, 0, 1) / sqrt(2); the eye looks straight down.
        w.shade(&w.objects[0], Tuple3D::zero(), Tuple3D::new(0.0, 0.0, 1.0),
            Tuple3D::new(0.0, 0.0, 3.0), 0)
    };

    let cos = std::f64::consts::FRAC_1_SQRT_2;
    assert_eq!(shade_with_power(1.0), Color::gray(cos));
    assert_eq!(shade_with_power(3.0), Color::gray(cos.powi(3)));
    assert_eq!(shade_with_power(10.0), Color::gray(1.0 / 32.0));
}
