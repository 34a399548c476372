//! Demo player
//!
//! Keeps the player hovering just under the live gate's center so the game
//! can run unattended (headless demo, soak tests).

use super::controller::GameController;
use super::host::PhysicsHost;
use super::observer::RunObserver;
use super::state::GamePhase;

/// Simple "flap when low and falling" bot
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Flap once this far below the target height
    pub margin: f32,
    /// Stop flapping at this score so runs end on their own
    pub give_up_at: Option<u32>,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            margin: 24.0,
            give_up_at: None,
        }
    }
}

impl Autopilot {
    pub fn new(give_up_at: Option<u32>) -> Self {
        Self {
            give_up_at,
            ..Default::default()
        }
    }

    /// Whether to tap this tick
    ///
    /// Taps to leave Idle, never taps while Over (restarting is the caller's
    /// call), and while Active aims for the live gate, or the playfield middle
    /// when no pair is live.
    pub fn should_tap<H: PhysicsHost, O: RunObserver>(&self, game: &GameController<H, O>) -> bool {
        match game.phase() {
            GamePhase::Idle => true,
            GamePhase::Over => false,
            GamePhase::Active => {
                if self.give_up_at.is_some_and(|limit| game.current_score() >= limit) {
                    return false;
                }
                let host = game.host();
                let body = game.player().body;
                let (Some(pos), Some(vel)) = (host.position(body), host.velocity(body)) else {
                    return false;
                };
                let target = game
                    .live_pair()
                    .and_then(|pair| host.position(pair.gate))
                    .map_or(game.playfield().mid().y, |gate| gate.y);

                pos.y < target - self.margin && vel.y <= 0.0
            }
        }
    }
}
