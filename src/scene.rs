use std::convert::TryFrom;
use std::fs::File;
use std::io::{ BufReader, Read };
use std::path::{ Path, PathBuf };

use serde::Deserialize;

use crate::error::{ SceneError, TransformError };
use crate::tuple::Tuple3D;
use crate::transform::AffineTransform;
use crate::shape::{ Shape, ShapeType, SphereInfo, TriangleInfo };
use crate::light::{ LightSource, Material, Falloff };
use crate::index::IndexKind;
use crate::world::World;
use crate::camera::Camera;
use crate::obj::ObjParser;

/// A world and the camera it is seen through.
#[derive(Debug)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
}

/// A scene description as stored on disk.
///
/// ```json
/// {
///   "camera": {
///     "eye": [0, 0, 0],
///     "lower_left": [-0.5, -0.5, -1], "lower_right": [0.5, -0.5, -1],
///     "upper_left": [-0.5, 0.5, -1], "upper_right": [0.5, 0.5, -1]
///   },
///   "lights": [
///     { "type": "ambient", "color": [0.2, 0.2, 0.2] },
///     { "type": "point", "position": [0, 5, 0], "color": [1, 1, 1], "falloff": 1 }
///   ],
///   "objects": [
///     {
///       "type": "sphere", "center": [0, 0, -5], "radius": 1,
///       "material": { "diffuse": [1, 0, 0] },
///       "transform": [{ "translate": [0, 1, 0] }, { "scale": [1, 2, 1] }]
///     },
///     { "type": "mesh", "path": "teapot.obj" }
///   ],
///   "index": "bounding_boxes"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct SceneJson {
    camera: Option<CameraJson>,

    #[serde(default)]
    lights: Vec<LightJson>,

    #[serde(default)]
    objects: Vec<ObjectJson>,

    #[serde(default)]
    index: IndexJson,
}

#[derive(Debug, Deserialize)]
struct CameraJson {
    eye: [f64; 3],
    lower_left: [f64; 3],
    lower_right: [f64; 3],
    upper_left: [f64; 3],
    upper_right: [f64; 3],

    #[serde(default)]
    transform: Vec<TransformJson>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum LightJson {
    Ambient {
        color: [f64; 3],
    },
    Directional {
        direction: [f64; 3],
        color: [f64; 3],
        #[serde(default)]
        transform: Vec<TransformJson>,
    },
    Point {
        position: [f64; 3],
        color: [f64; 3],
        #[serde(default)]
        falloff: u8,
        #[serde(default)]
        transform: Vec<TransformJson>,
    },
}

#[derive(Debug, Deserialize)]
struct ObjectJson {
    #[serde(flatten)]
    shape: ShapeJson,

    material: Option<MaterialJson>,

    #[serde(default)]
    transform: Vec<TransformJson>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ShapeJson {
    Sphere {
        center: [f64; 3],
        radius: f64,
    },
    Triangle {
        vertices: [[f64; 3]; 3],
        normals: Option<[[f64; 3]; 3]>,
    },
    Mesh {
        path: PathBuf,
    },
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MaterialJson {
    ambient: [f64; 3],
    diffuse: [f64; 3],
    specular: [f64; 3],
    specular_power: f64,
    reflective: [f64; 3],
}

impl Default for MaterialJson {
    fn default() -> MaterialJson {
        MaterialJson {
            ambient: [0.0; 3],
            diffuse: [0.0; 3],
            specular: [0.0; 3],
            specular_power: 1.0,
            reflective: [0.0; 3],
        }
    }
}

impl From<MaterialJson> for Material {
    fn from(m: MaterialJson) -> Material {
        Material {
            ambient: m.ambient.into(),
            diffuse: m.diffuse.into(),
            specular: m.specular.into(),
            specular_power: m.specular_power,
            reflective: m.reflective.into(),
        }
    }
}

/// One step of an object's transform.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TransformJson {
    Translate([f64; 3]),
    Scale([f64; 3]),

    /// Rotation about the vector's direction by its length in degrees.
    Rotate([f64; 3]),
}

impl TryFrom<&TransformJson> for AffineTransform {
    type Error = TransformError;

    fn try_from(step: &TransformJson) -> Result<AffineTransform, TransformError> {
        match *step {
            TransformJson::Translate(t) => Ok(AffineTransform::translation(t.into())),
            TransformJson::Scale([x, y, z]) => AffineTransform::scaling(x, y, z),
            TransformJson::Rotate(r) => Ok(AffineTransform::rotation_degrees(r.into())),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum IndexJson {
    Exhaustive,
    BoundingBoxes,
}

impl Default for IndexJson {
    fn default() -> IndexJson {
        IndexJson::BoundingBoxes
    }
}

impl From<IndexJson> for IndexKind {
    fn from(index: IndexJson) -> IndexKind {
        match index {
            IndexJson::Exhaustive => IndexKind::Exhaustive,
            IndexJson::BoundingBoxes => IndexKind::BoundingBoxes,
        }
    }
}

/// Combines transform steps like a matrix stack: the first step listed is
/// applied last.
fn build_transform(steps: &[TransformJson]) -> Result<AffineTransform, TransformError> {
    steps.iter().try_fold(AffineTransform::identity(), |acc, step| {
        Ok(acc.compose(&AffineTransform::try_from(step)?))
    })
}

fn build_light(light: LightJson) -> Result<LightSource, SceneError> {
    match light {
        LightJson::Ambient { color } => Ok(LightSource::ambient(color.into())),
        LightJson::Directional { direction, color, transform } => {
            if !transform.is_empty() {
                log::warn!("transforms do not apply to lights; ignoring");
            }

            LightSource::directional(direction.into(), color.into())
                .ok_or_else(|| SceneError::Light("directional light has no direction".into()))
        },
        LightJson::Point { position, color, falloff, transform } => {
            if !transform.is_empty() {
                log::warn!("transforms do not apply to lights; ignoring");
            }

            let falloff = Falloff::try_from(falloff).map_err(SceneError::Light)?;
            Ok(LightSource::point(position.into(), color.into(), falloff))
        },
    }
}

fn triangle_normals(normals: [[f64; 3]; 3]) -> [Tuple3D; 3] {
    [
        Tuple3D::from(normals[0]).try_normalize().unwrap_or_default(),
        Tuple3D::from(normals[1]).try_normalize().unwrap_or_default(),
        Tuple3D::from(normals[2]).try_normalize().unwrap_or_default(),
    ]
}

/// Turns one object entry into shapes. Meshes give one shape per triangle.
fn build_objects(number: usize, object: ObjectJson, directory: &Path)
    -> Result<Vec<Shape>, SceneError> {
    let material: Material = match object.material {
        Some(m) => m.into(),
        None => {
            log::warn!("object {} has no material; using default material", number);
            Material::default()
        },
    };

    let transform = build_transform(&object.transform)?;

    let primitives = match object.shape {
        ShapeJson::Sphere { center, radius } => vec![
            ShapeType::Sphere(SphereInfo::new(center.into(), radius))
        ],
        ShapeJson::Triangle { vertices, normals } => {
            let vertices: [Tuple3D; 3] = [
                vertices[0].into(), vertices[1].into(), vertices[2].into()
            ];
            let triangle = match normals {
                Some(n) => TriangleInfo::with_normals(vertices, triangle_normals(n)),
                None => TriangleInfo::new(vertices[0], vertices[1], vertices[2]),
            };
            vec![ShapeType::Triangle(triangle)]
        },
        ShapeJson::Mesh { path } => {
            let mesh = ObjParser::load(&directory.join(path))?;
            mesh.triangles.into_iter().map(ShapeType::Triangle).collect()
        },
    };

    Ok(primitives.into_iter()
        .map(|ty| Shape::new(ty, material, transform))
        .collect())
}

impl Scene {
    pub fn new(world: World, camera: Camera) -> Scene {
        Scene { world, camera }
    }

    /// Builds a scene from its description. Mesh paths are resolved
    /// relative to `directory`.
    pub fn from_json(json: SceneJson, directory: &Path) -> Result<Scene, SceneError> {
        let camera = match json.camera {
            Some(c) => {
                if !c.transform.is_empty() {
                    log::warn!("transforms do not apply to cameras; ignoring");
                }

                Camera {
                    eye: c.eye.into(),
                    lower_left: c.lower_left.into(),
                    lower_right: c.lower_right.into(),
                    upper_left: c.upper_left.into(),
                    upper_right: c.upper_right.into(),
                }
            },
            None => {
                log::warn!("using default camera");
                Camera::default()
            },
        };

        let lights = json.lights.into_iter()
            .map(build_light)
            .collect::<Result<Vec<_>, _>>()?;

        let mut objects = Vec::new();
        for (number, object) in json.objects.into_iter().enumerate() {
            objects.extend(build_objects(number, object, directory)?);
        }

        log::info!("loaded scene with {} shapes and {} lights", objects.len(), lights.len());

        let world = World::new(objects, lights, json.index.into());
        Ok(Scene::new(world, camera))
    }

    /// Reads a JSON scene description.
    pub fn from_reader<R: Read>(reader: R, directory: &Path) -> Result<Scene, SceneError> {
        let json: SceneJson = serde_json::from_reader(reader)?;
        Scene::from_json(json, directory)
    }

    pub fn parse(source: &str, directory: &Path) -> Result<Scene, SceneError> {
        let json: SceneJson = serde_json::from_str(source)?;
        Scene::from_json(json, directory)
    }

    /// Loads a scene file. Meshes are looked up next to it.
    pub fn load(path: &Path) -> Result<Scene, SceneError> {
        let file = File::open(path).map_err(|source| SceneError::Io {
            path: path.into(),
            source,
        })?;

        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        Scene::from_reader(BufReader::new(file), directory)
    }
}

#[cfg(test)]
use crate::ray::Ray3D;
#[cfg(test)]
use crate::color::Color;

#[test]
fn minimal_scene_uses_defaults() {
    let scene = Scene::parse(r#"{ "objects": [
        { "type": "sphere", "center": [0, 0, -5], "radius": 1 }
    ] }"#, Path::new("")).unwrap();

    assert_eq!(scene.camera, Camera::default());
    assert!(scene.world.lights.is_empty());
    assert_eq!(scene.world.objects.len(), 1);
    assert_eq!(scene.world.objects[0].material, Material::default());
}

#[test]
fn sphere_scene_traces() {
    let scene = Scene::parse(r#"{
        "lights": [{ "type": "ambient", "color": [0.2, 0.2, 0.2] }],
        "objects": [{
            "type": "sphere", "center": [0, 0, -5], "radius": 1,
            "material": { "ambient": [1, 1, 1] }
        }]
    }"#, Path::new("")).unwrap();

    let ray = scene.camera.ray_for_pixel(0, 0, 1, 1);
    let hit = scene.world.trace_ray(&ray).unwrap();
    assert!(crate::feq(hit.t, 4.0));
    assert_eq!(hit.normal, Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(scene.world.color_at(&ray, 5), Color::gray(0.2));
}

#[test]
fn lights_are_parsed() {
    let scene = Scene::parse(r#"{
        "lights": [
            { "type": "ambient", "color": [0.1, 0.1, 0.1] },
            { "type": "directional", "direction": [0, -2, 0], "color": [1, 1, 1] },
            { "type": "point", "position": [1, 2, 3], "color": [1, 0, 0], "falloff": 2 }
        ]
    }"#, Path::new("")).unwrap();

    assert_eq!(scene.world.lights, vec![
        LightSource::ambient(Color::gray(0.1)),
        LightSource::Directional {
            direction: Tuple3D::new(0.0, -1.0, 0.0),
            color: Color::white(),
        },
        LightSource::point(Tuple3D::new(1.0, 2.0, 3.0), Color::rgb(1.0, 0.0, 0.0), Falloff::Quadratic),
    ]);
}

#[test]
fn bad_lights_are_rejected() {
    let falloff = Scene::parse(r#"{ "lights": [
        { "type": "point", "position": [0, 0, 0], "color": [1, 1, 1], "falloff": 3 }
    ] }"#, Path::new(""));
    assert!(matches!(falloff, Err(SceneError::Light(_))));

    let direction = Scene::parse(r#"{ "lights": [
        { "type": "directional", "direction": [0, 0, 0], "color": [1, 1, 1] }
    ] }"#, Path::new(""));
    assert!(matches!(direction, Err(SceneError::Light(_))));
}

#[test]
fn zero_scale_is_rejected() {
    let scene = Scene::parse(r#"{ "objects": [{
        "type": "sphere", "center": [0, 0, 0], "radius": 1,
        "transform": [{ "scale": [1, 0, 1] }]
    }] }"#, Path::new(""));

    assert!(matches!(
        scene, Err(SceneError::Transform(TransformError::DegenerateScale { .. }))
    ));
}

#[test]
fn malformed_json_is_rejected() {
    let scene = Scene::parse(r#"{ "objects": [{ "type": "cube" }] }"#, Path::new(""));
    assert!(matches!(scene, Err(SceneError::Json(_))));
}

#[test]
fn first_transform_step_is_outermost() {
    let steps: Vec<TransformJson> = serde_json::from_str(
        r#"[{ "translate": [0, 0, -5] }, { "scale": [2, 2, 2] }]"#
    ).unwrap();
    let transform = build_transform(&steps).unwrap();

    // Scaled about the origin first, then moved.
    assert_eq!(
        transform.apply_point(Tuple3D::new(1.0, 0.0, 0.0)),
        Tuple3D::new(2.0, 0.0, -5.0)
    );
}

#[test]
fn rotate_step_uses_degrees() {
    let steps: Vec<TransformJson> = serde_json::from_str(
        r#"[{ "rotate": [0, 0, 90] }, { "rotate": [0, 0, 0] }]"#
    ).unwrap();
    let transform = build_transform(&steps).unwrap();

    assert_eq!(
        transform.apply_point(Tuple3D::new(1.0, 0.0, 0.0)),
        Tuple3D::new(0.0, 1.0, 0.0)
    );
}

#[test]
fn transformed_objects() {
    let scene = Scene::parse(r#"{
        "index": "exhaustive",
        "objects": [
            {
                "type": "triangle",
                "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
                "transform": [{ "translate": [0, 0, -1] }]
            },
            {
                "type": "sphere", "center": [0, 0, 0], "radius": 1,
                "transform": [{ "translate": [5, 0, 0] }, { "scale": [1, 1, 2] }]
            }
        ]
    }"#, Path::new("")).unwrap();

    // Triangles absorb their transform; spheres keep it.
    assert!(scene.world.objects[0].transform.is_identity());
    assert!(!scene.world.objects[1].transform.is_identity());

    let r = Ray3D::new(Tuple3D::new(0.25, 0.25, 0.0), Tuple3D::new(0.0, 0.0, -1.0));
    assert!(crate::feq(scene.world.trace_ray(&r).unwrap().t, 1.0));

    let r = Ray3D::new(Tuple3D::new(5.0, 0.0, 5.0), Tuple3D::new(0.0, 0.0, -1.0));
    assert!(crate::feq(scene.world.trace_ray(&r).unwrap().t, 3.0));
}

#[test]
fn meshes_load_relative_to_scene() {
    let directory = std::env::temp_dir().join(format!("phong-tracer-{}", std::process::id()));
    std::fs::create_dir_all(&directory).unwrap();
    std::fs::write(
        directory.join("quad.obj"),
        "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n"
    ).unwrap();

    let scene = Scene::parse(r#"{ "objects": [{
        "type": "mesh", "path": "quad.obj",
        "material": { "diffuse": [1, 1, 1] }
    }] }"#, &directory).unwrap();

    assert_eq!(scene.world.objects.len(), 2);
    assert_eq!(scene.world.objects[1].material.diffuse, Color::white());

    let missing = Scene::parse(r#"{ "objects": [
        { "type": "mesh", "path": "missing.obj" }
    ] }"#, &directory);
    assert!(matches!(missing, Err(SceneError::Io { .. })));

    std::fs::remove_dir_all(&directory).unwrap();
}
