//! Game settings
//!
//! Tunables for the playfield, player, obstacles and physics. Loaded from and
//! saved to JSON; every field falls back to the defaults when missing.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::FlapError;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    /// Playfield width in points
    pub playfield_width: f32,
    /// Playfield height in points
    pub playfield_height: f32,

    // === Player ===
    /// Player sprite height (drives the gap size)
    pub player_height: f32,

    // === Obstacles ===
    /// Pipe sprite width
    pub pipe_width: f32,
    /// Pipe sprite height
    pub pipe_height: f32,
    /// Gap height as a multiple of the player height
    pub gap_ratio: f32,
    /// Horizontal pipe speed (points/s)
    pub pipe_speed: f32,

    // === Physics ===
    /// Vertical gravity (points/s², negative is down)
    pub gravity: f32,
    /// Upward velocity applied per flap
    pub flap_impulse: f32,

    /// Seed for obstacle placement; `None` picks one per session
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            player_height: PLAYER_HEIGHT,

            pipe_width: PIPE_WIDTH,
            pipe_height: PIPE_HEIGHT,
            gap_ratio: GAP_RATIO,
            pipe_speed: PIPE_SPEED,

            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,

            seed: None,
        }
    }
}

impl Settings {
    /// Check every field, reporting the first bad one
    pub fn validate(&self) -> Result<(), FlapError> {
        if !(positive(self.playfield_width) && positive(self.playfield_height)) {
            return Err(FlapError::InvalidPlayfield {
                width: self.playfield_width,
                height: self.playfield_height,
            });
        }
        if !positive(self.player_height) {
            return Err(FlapError::InvalidPlayerHeight(self.player_height));
        }
        let checks: [(&'static str, bool, &'static str); 5] = [
            ("pipe_width", positive(self.pipe_width), "must be positive"),
            ("pipe_height", positive(self.pipe_height), "must be positive"),
            ("gap_ratio", positive(self.gap_ratio), "must be positive"),
            ("pipe_speed", positive(self.pipe_speed), "must be positive"),
            ("flap_impulse", positive(self.flap_impulse), "must be positive"),
        ];
        for (field, ok, reason) in checks {
            if !ok {
                return Err(FlapError::InvalidSettings { field, reason });
            }
        }
        if !self.gravity.is_finite() || self.gravity > 0.0 {
            return Err(FlapError::InvalidSettings {
                field: "gravity",
                reason: "must point down (zero or negative)",
            });
        }
        Ok(())
    }

    /// Pipe sprite size
    pub fn pipe_size(&self) -> Vec2 {
        Vec2::new(self.pipe_width, self.pipe_height)
    }

    /// Parse settings from JSON text and validate them
    pub fn from_json(json: &str) -> Result<Self, FlapError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, FlapError> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), FlapError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
