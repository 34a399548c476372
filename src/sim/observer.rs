//! One-way run notifications
//!
//! Ads, leaderboards and analytics hang off these hooks. The controller never
//! waits on them and nothing they do can change the run.

use serde::{Deserialize, Serialize};

/// Receives run lifecycle notifications
pub trait RunObserver {
    /// A run left Idle
    fn on_run_started(&mut self) {}

    /// A run hit an obstacle or the ground
    fn on_run_ended(&mut self, _score: u32) {}
}

/// Ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl RunObserver for NullObserver {}

/// Recorded lifecycle notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEvent {
    Started,
    Ended { score: u32 },
}

/// Keeps every notification in order
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    pub events: Vec<RunEvent>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores of finished runs, oldest first
    pub fn scores(&self) -> impl Iterator<Item = u32> + '_ {
        self.events.iter().filter_map(|e| match e {
            RunEvent::Ended { score } => Some(*score),
            RunEvent::Started => None,
        })
    }
}

impl RunObserver for RunLog {
    fn on_run_started(&mut self) {
        self.events.push(RunEvent::Started);
    }

    fn on_run_ended(&mut self, score: u32) {
        self.events.push(RunEvent::Ended { score });
    }
}

impl<A: RunObserver, B: RunObserver> RunObserver for (A, B) {
    fn on_run_started(&mut self) {
        self.0.on_run_started();
        self.1.on_run_started();
    }

    fn on_run_ended(&mut self, score: u32) {
        self.0.on_run_ended(score);
        self.1.on_run_ended(score);
    }
}

impl<T: RunObserver + ?Sized> RunObserver for &mut T {
    fn on_run_started(&mut self) {
        (**self).on_run_started();
    }

    fn on_run_ended(&mut self, score: u32) {
        (**self).on_run_ended(score);
    }
}
