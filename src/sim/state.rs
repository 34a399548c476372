//! Run state and entity records
//!
//! The controller owns one [`RunState`]; entities are plain handle bundles
//! pointing into the host.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::host::BodyHandle;
use crate::error::FlapError;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Scene built, waiting for the first tap
    #[default]
    Idle,
    /// Player is flying
    Active,
    /// Run ended, waiting for a tap to restart
    Over,
}

/// Phase and score of the current run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub phase: GamePhase,
    /// Gates passed this run (never decreases until restart)
    pub score: u32,
    /// Runs started since the controller was created
    pub runs: u32,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Award one point and return the new score
    pub fn award_point(&mut self) -> u32 {
        debug_assert_eq!(self.phase, GamePhase::Active, "points only count while active");
        self.score = self.score.saturating_add(1);
        self.score
    }

    /// Text shown on the score label
    pub fn score_text(&self) -> String {
        self.score.to_string()
    }

    /// Back to a fresh, unstarted run
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.score = 0;
    }
}

/// Playfield dimensions (origin bottom-left, y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    /// Create a playfield, rejecting zero, negative or non-finite sizes
    pub fn new(width: f32, height: f32) -> Result<Self, FlapError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(FlapError::InvalidPlayfield { width, height });
        }
        Ok(Self { width, height })
    }

    /// Center of the playfield
    pub fn mid(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The player body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub body: BodyHandle,
}

/// One obstacle pair and its scoring gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstaclePair {
    pub top: BodyHandle,
    pub bottom: BodyHandle,
    pub gate: BodyHandle,
}

impl ObstaclePair {
    /// Bodies in creation order
    pub fn bodies(&self) -> [BodyHandle; 3] {
        [self.top, self.bottom, self.gate]
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.bodies().contains(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_and_reset() {
        let mut run = RunState::new();
        run.phase = GamePhase::Active;
        assert_eq!(run.award_point(), 1);
        assert_eq!(run.award_point(), 2);
        assert_eq!(run.score_text(), "2");

        run.reset();
        assert_eq!(run.phase, GamePhase::Idle);
        assert_eq!(run.score, 0);
    }

    #[test]
    fn test_playfield_validation() {
        assert!(Playfield::new(768.0, 1024.0).is_ok());
        assert!(Playfield::new(0.0, 1024.0).is_err());
        assert!(Playfield::new(768.0, -5.0).is_err());
        assert!(Playfield::new(f32::NAN, 10.0).is_err());
        assert_eq!(Playfield::new(800.0, 600.0).unwrap().mid(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_phase_serializes() {
        let json = serde_json::to_string(&GamePhase::Over).unwrap();
        assert_eq!(json, "\"Over\"");
    }
}
