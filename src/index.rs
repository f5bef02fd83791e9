use std::fmt::Debug;

use crate::consts::FEQ_EPSILON;
use crate::bounds::Bounds;
use crate::ray::Ray3D;
use crate::shape::Shape;

/// Finds which objects a ray might hit.
///
/// Implementations return indices into the world's object list. They may
/// return objects the ray misses, but must never leave out one it hits.
pub trait SpatialIndex: Debug {
    fn candidates(&self, ray: &Ray3D) -> Vec<usize>;
}

/// Which index a world builds over its objects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IndexKind {
    Exhaustive,
    BoundingBoxes,
}

impl Default for IndexKind {
    fn default() -> IndexKind {
        IndexKind::BoundingBoxes
    }
}

impl IndexKind {
    pub fn build(&self, objects: &[Shape]) -> Box<dyn SpatialIndex> {
        match self {
            IndexKind::Exhaustive => Box::new(Exhaustive::new(objects.len())),
            IndexKind::BoundingBoxes => Box::new(BoundingBoxes::build(objects)),
        }
    }
}

/// Returns every object, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Exhaustive {
    count: usize,
}

impl Exhaustive {
    pub fn new(count: usize) -> Exhaustive {
        Exhaustive { count }
    }
}

impl SpatialIndex for Exhaustive {
    fn candidates(&self, _ray: &Ray3D) -> Vec<usize> {
        (0..self.count).collect()
    }
}

/// Returns objects whose world-space bounding box the ray passes through.
///
/// Boxes are padded slightly so flat triangles lying in an axis plane are
/// not skipped by the slab test.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBoxes {
    boxes: Vec<Bounds>,
}

impl BoundingBoxes {
    pub fn build(objects: &[Shape]) -> BoundingBoxes {
        BoundingBoxes {
            boxes: objects.iter()
                .map(|o| o.bounds().padded(FEQ_EPSILON))
                .collect(),
        }
    }
}

impl SpatialIndex for BoundingBoxes {
    fn candidates(&self, ray: &Ray3D) -> Vec<usize> {
        self.boxes.iter()
            .enumerate()
            .filter(|(_, b)| b.intersects(ray))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
use crate::tuple::Tuple3D;

#[cfg(test)]
fn test_objects() -> Vec<Shape> {
    vec![
        Shape::sphere(Tuple3D::new(0.0, 0.0, -5.0), 1.0),
        Shape::sphere(Tuple3D::new(5.0, 0.0, -5.0), 1.0),
        Shape::triangle(
            Tuple3D::new(-1.0, -1.0, -10.0),
            Tuple3D::new(1.0, -1.0, -10.0),
            Tuple3D::new(0.0, 1.0, -10.0),
        ),
    ]
}

#[test]
fn exhaustive_returns_everything() {
    let index = IndexKind::Exhaustive.build(&test_objects());
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 1.0, 0.0));
    assert_eq!(index.candidates(&r), vec![0, 1, 2]);
}

#[test]
fn bounding_boxes_filter_candidates() {
    let index = BoundingBoxes::build(&test_objects());

    let forward = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0));
    assert_eq!(index.candidates(&forward), vec![0, 2]);

    let right = Ray3D::new(Tuple3D::new(5.0, 0.0, 0.0), Tuple3D::new(0.0, 0.0, -1.0));
    assert_eq!(index.candidates(&right), vec![1]);

    let up = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 1.0, 0.0));
    assert!(index.candidates(&up).is_empty());
}

#[test]
fn default_index_uses_boxes() {
    assert_eq!(IndexKind::default(), IndexKind::BoundingBoxes);
}
