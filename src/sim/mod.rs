//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body handle)
//! - No rendering, storage or platform dependencies

pub mod autopilot;
pub mod contact;
pub mod controller;
pub mod host;
pub mod obstacle;
pub mod observer;
pub mod state;
pub mod world;

pub use autopilot::Autopilot;
pub use contact::{ContactKind, classify};
pub use controller::GameController;
pub use host::{BodyDesc, BodyHandle, BodyTag, PhysicsHost, Shape};
pub use obstacle::{ObstacleGenerator, ObstacleLayout};
pub use observer::{NullObserver, RunEvent, RunLog, RunObserver};
pub use state::{GamePhase, ObstaclePair, Player, Playfield, RunState};
pub use world::{HeadlessWorld, StepEvents};
