//! Error type shared by the simulation, settings and high score table

use thiserror::Error;

/// Everything that can go wrong inside the core
#[derive(Debug, Error)]
pub enum FlapError {
    /// Playfield width or height is zero, negative or not finite
    #[error("invalid playfield {width}x{height}: both dimensions must be positive")]
    InvalidPlayfield { width: f32, height: f32 },

    /// Obstacle sizing needs a positive player height
    #[error("invalid player height {0}: must be positive")]
    InvalidPlayerHeight(f32),

    /// A settings field is out of range
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSettings {
        field: &'static str,
        reason: &'static str,
    },

    /// Tried to spawn an obstacle pair while one is still live
    #[error("obstacle pair already live (gate body {gate})")]
    ObstacleAlreadyLive { gate: u32 },

    /// Tried to remove an obstacle pair when none is live
    #[error("no live obstacle pair to remove")]
    NoLivePair,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
