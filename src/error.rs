//! Error types for level loading, assets and configuration.

use thiserror::Error;

/// Errors surfaced by the platformer core.
///
/// Only `LevelIndexOutOfRange` reaches the state machine during play, where it
/// means every level has been cleared. Asset errors are recovered where they
/// occur; file errors only come out of setup calls.
#[derive(Debug, Error)]
pub enum GameError {
    /// A sprite, mask or background is not present in the asset table.
    #[error("Asset missing: {0}")]
    AssetMissing(String),

    /// An animation exists but holds no frames.
    #[error("Animation '{0}' has no frames")]
    EmptyAnimationFrames(String),

    /// Requested level index is past the end of the level table.
    #[error("Level {index} not found ({count} levels configured)")]
    LevelIndexOutOfRange { index: usize, count: usize },

    /// Level table content is structurally unusable.
    #[error("Invalid level data: {0}")]
    InvalidLevelData(String),

    /// Settings hold values the simulation cannot run with.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings or level JSON failed to parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A settings or level file could not be read or written.
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, GameError>;
