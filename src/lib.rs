//! Flappy Core - the deterministic heart of a tap-to-flap arcade game
//!
//! Core modules:
//! - `sim`: Obstacle generation, scoring and the game phase state machine,
//!   plus the physics/render host contract and a headless host
//! - `settings`: JSON-backed tunables
//! - `highscores`: Local best-score table
//! - `error`: Shared error type

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::FlapError;
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Playfield defaults (portrait, y axis up, origin bottom-left)
    pub const PLAYFIELD_WIDTH: f32 = 768.0;
    pub const PLAYFIELD_HEIGHT: f32 = 1024.0;

    /// Player sprite height
    pub const PLAYER_HEIGHT: f32 = 48.0;
    /// Collision circle radius as a fraction of the sprite height
    pub const PLAYER_RADIUS_FACTOR: f32 = 1.0 / 3.0;

    /// Pipe sprite defaults
    pub const PIPE_WIDTH: f32 = 104.0;
    pub const PIPE_HEIGHT: f32 = 640.0;
    /// Gap between the pipes, in player heights
    pub const GAP_RATIO: f32 = 4.0;
    /// Scoring gate is a tenth of the pipe width
    pub const GATE_WIDTH_DIVISOR: f32 = 10.0;
    /// Pipes cover two playfield widths in `width / 100` seconds
    pub const PIPE_SPEED: f32 = 200.0;

    /// Gravity (points/s², y up)
    pub const GRAVITY: f32 = -980.0;
    /// Vertical velocity set by a flap
    pub const FLAP_IMPULSE: f32 = 420.0;

    /// Ground strip thickness
    pub const GROUND_THICKNESS: f32 = 1.0;

    /// Shown when a run ends
    pub const GAME_OVER_TEXT: &str = "Game Over. Tap to restart.";
}
