//! Error types shared across the display, asset and scene layers

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::entities::RocketState;

/// Failures of the LED matrix backends
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("invalid rotation {0}, expected one of 0, 90, 180, 270")]
    InvalidRotation(u16),

    #[error("failed to open LED device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write LED device: {0}")]
    Io(#[from] io::Error),

    #[error("display backend unavailable: {0}")]
    Backend(String),
}

/// Failures while loading or decoding a pre-baked frame feed
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset {0} does not exist")]
    Missing(PathBuf),

    #[error("failed to read asset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed frame file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame {index} is malformed: {reason}")]
    BadFrame { index: usize, reason: String },

    #[error("frame {index} is truncated ({bytes} of 192 bytes)")]
    ShortFrame { index: usize, bytes: usize },

    #[error("failed to read frame {index}: {source}")]
    Read {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("frame feed contains no frames")]
    Empty,

    #[error("invalid frame rate {0}, must be a positive number")]
    InvalidFrameRate(f32),
}

/// Failures of scene construction and of the frame loop
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("depth {0} is outside 1..=10")]
    InvalidDepth(u8),

    #[error("{requested} entities requested but only {available} columns are free")]
    PoolExhausted { requested: usize, available: usize },

    #[error("no free column left to spawn into")]
    NoFreeColumn,

    #[error("column {0} is already free")]
    ColumnAlreadyFree(u8),

    #[error("invalid rocket transition {from:?} -> {to:?}")]
    InvalidTransition { from: RocketState, to: RocketState },

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Failures while reading the optional JSON configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
