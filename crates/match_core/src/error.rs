use thiserror::Error;

/// Errors raised at the I/O and configuration boundary.
///
/// Per-frame evaluation never returns one of these: validation, possession
/// and pass tracking degrade to "no result" for a malformed frame instead.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Frame {frame} out of range (trajectory has {len} frames)")]
    FrameOutOfRange { frame: usize, len: usize },

    #[error("Track collections disagree: {players} player frames, {ball} ball frames")]
    TrajectoryMismatch { players: usize, ball: usize },
}

pub type Result<T> = std::result::Result<T, CoreError>;
