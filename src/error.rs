// Error types for snapshot conversion and configuration loading

use thiserror::Error;

use crate::types::Coord;

/// A turn snapshot that cannot be turned into a board state.
/// Fatal for the turn only; the bot substitutes a default move.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("board geometry must be positive, got {width}x{height}")]
    InvalidGeometry { width: i32, height: i32 },
    #[error("controlled snake '{0}' is not on the board")]
    MissingControlledAgent(String),
    #[error("snake '{0}' has an empty body")]
    EmptyBody(String),
    #[error("snake '{id}' has a segment outside the board at ({}, {})", .at.x, .at.y)]
    SegmentOutOfBounds { id: String, at: Coord },
}

/// Failure to load `Snake.toml`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
