pub mod consts;
pub mod error;

pub mod tuple;
pub mod matrix;
pub mod ray;
pub mod transform;

pub mod bounds;
pub mod shape;
pub mod intersect;
pub mod index;

pub mod light;
pub mod world;
pub mod camera;
pub mod render;

pub mod color;
pub mod canvas;

pub mod obj;
pub mod scene;

use crate::consts::FEQ_EPSILON;

/// Approximate floating point equality, used by the `PartialEq` impls of the
/// math types.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
