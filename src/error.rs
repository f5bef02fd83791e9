use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building an `AffineTransform`.
///
/// These are configuration errors; a transform which could not be inverted
/// is rejected when it is built, never while a ray is being traced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    #[error("scaling factors must be nonzero, got ({x}, {y}, {z})")]
    DegenerateScale { x: f64, y: f64, z: f64 },

    #[error("rotation axis must have nonzero length")]
    ZeroRotationAxis,

    #[error("transformation matrix is not invertible")]
    Singular,
}

/// Errors raised while loading a scene description.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid transform: {0}")]
    Transform(#[from] TransformError),

    #[error("invalid light: {0}")]
    Light(String),

    #[error("{path:?}, line {line}: {message}")]
    Mesh {
        path: PathBuf,
        line: usize,
        message: String,
    },
}
