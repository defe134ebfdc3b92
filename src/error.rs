//! Error types for terramaze

use thiserror::Error;

/// Reasons a generation or solve request is rejected.
///
/// None of these are fatal: the engine leaves the grid untouched and the
/// presentation layer decides how to surface them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("another generation or solve is still running")]
    Busy,

    #[error("no maze to solve yet, generate one first")]
    NotReady,
}

pub type Result<T> = std::result::Result<T, MazeError>;
