//! Physics/render host contract
//!
//! The host owns the scene graph, steps the physics, plays animations and
//! detects overlaps. The controller only issues commands through this trait
//! and is told about contacts by whoever drives the host.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle to a body owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// What a body represents in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyTag {
    Player,
    Ground,
    Pipe,
    Gate,
}

impl BodyTag {
    pub const PLAYER_CATEGORY: u32 = 1;
    pub const SOLID_CATEGORY: u32 = 2;
    pub const GATE_CATEGORY: u32 = 4;

    /// Category bit used for contact filtering
    pub fn category(self) -> u32 {
        match self {
            BodyTag::Player => Self::PLAYER_CATEGORY,
            BodyTag::Ground | BodyTag::Pipe => Self::SOLID_CATEGORY,
            BodyTag::Gate => Self::GATE_CATEGORY,
        }
    }

    /// Categories this kind of body wants contact reports for
    pub fn default_contact_mask(self) -> u32 {
        match self {
            BodyTag::Player => Self::SOLID_CATEGORY | Self::GATE_CATEGORY,
            BodyTag::Ground | BodyTag::Pipe => Self::PLAYER_CATEGORY,
            BodyTag::Gate => Self::PLAYER_CATEGORY,
        }
    }
}

/// Collision shape, centered on the body position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { size: Vec2 },
}

/// Everything needed to create a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub tag: BodyTag,
    pub shape: Shape,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Affected by gravity and velocity integration
    pub dynamic: bool,
    pub contact_mask: u32,
}

impl BodyDesc {
    /// Static body with the tag's default contact mask
    pub fn fixed(tag: BodyTag, shape: Shape, position: Vec2) -> Self {
        Self {
            tag,
            shape,
            position,
            velocity: Vec2::ZERO,
            dynamic: false,
            contact_mask: tag.default_contact_mask(),
        }
    }
}

/// Commands the core issues to the physics/render host
pub trait PhysicsHost {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle;

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2);

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    /// Enable or disable gravity and integration for a body
    fn set_dynamic(&mut self, body: BodyHandle, dynamic: bool);

    /// Move a body by `delta` over `duration` seconds of scaled time,
    /// optionally removing it once the move completes
    fn translate(&mut self, body: BodyHandle, delta: Vec2, duration: f32, remove_on_finish: bool);

    /// 0 freezes the simulation, 1 is normal speed
    fn set_time_scale(&mut self, scale: f32);

    /// Remove a body; returns false if it was already gone
    fn destroy(&mut self, body: BodyHandle) -> bool;

    /// Remove every body
    fn clear(&mut self);

    /// Tag of a live body
    fn tag(&self, body: BodyHandle) -> Option<BodyTag>;

    fn position(&self, body: BodyHandle) -> Option<Vec2>;

    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;

    fn set_score_text(&mut self, text: &str);

    /// Show a centered banner, or hide it with `None`
    fn show_banner(&mut self, text: Option<&str>);
}
