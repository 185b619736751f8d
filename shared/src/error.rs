//! Error types for level loading and engine configuration.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Layer `{0}` not found in the level")]
    MissingLayer(String),

    #[error("No item found in layer `{0}`")]
    EmptyLayer(String),

    #[error("Layer `{layer}` must contain exactly one item, found {count}")]
    MultipleItems { layer: String, count: usize },

    #[error("Layer `{layer}` is {found:?} but the walls layer is {expected:?}")]
    DimensionMismatch {
        layer: String,
        expected: (i32, i32),
        found: (i32, i32),
    },

    #[error("Layer `{layer}` is malformed: {reason}")]
    MalformedLayer { layer: String, reason: String },

    #[error("Unknown tile `{tile}` at ({x}, {y})")]
    UnknownTile { tile: char, x: i32, y: i32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
