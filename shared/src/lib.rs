//! Level model, shared types and configuration for the maze evolution engine.

pub mod config;
pub mod error;
pub mod genome;
pub mod grid;
pub mod level;
pub mod types;

pub use config::*;
pub use error::{Error, Result};
pub use genome::Genome;
pub use grid::*;
pub use level::{Layer, LevelDescription};
pub use types::*;
