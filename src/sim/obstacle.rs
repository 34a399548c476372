//! Obstacle generation
//!
//! Each obstacle pair is two pipes separated by a gap a fixed multiple of the
//! player height, shifted vertically by a seeded uniform offset, with an
//! invisible scoring gate in the middle of the gap. Pairs spawn one playfield
//! width right of center and are translated left by the host.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::host::{BodyDesc, BodyTag, PhysicsHost, Shape};
use super::state::{ObstaclePair, Playfield};
use crate::consts::GATE_WIDTH_DIVISOR;
use crate::error::FlapError;

/// Where one obstacle pair goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleLayout {
    /// Vertical shift shared by both pipes and the gate
    pub offset: f32,
    /// Distance between the two pipes
    pub gap_height: f32,
    /// Center of the upper pipe
    pub top: Vec2,
    /// Center of the lower pipe
    pub bottom: Vec2,
    /// Center of the scoring gate
    pub gate: Vec2,
    pub pipe_size: Vec2,
    pub gate_size: Vec2,
}

/// Seeded obstacle generator
#[derive(Debug, Clone)]
pub struct ObstacleGenerator {
    rng: Pcg32,
    gap_ratio: f32,
}

impl ObstacleGenerator {
    pub fn new(seed: u64, gap_ratio: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            gap_ratio,
        }
    }

    pub fn gap_ratio(&self) -> f32 {
        self.gap_ratio
    }

    /// Draw a vertical offset in `[-height/4, height/4)`
    ///
    /// The draw is a uniform integer in `[0, floor(height/2))`; a playfield too
    /// small for that range yields no offset.
    pub fn vertical_offset(&mut self, playfield_height: f32) -> f32 {
        let range = (playfield_height / 2.0).floor() as u32;
        if range == 0 {
            return 0.0;
        }
        let draw = self.rng.random_range(0..range);
        draw as f32 - playfield_height / 4.0
    }

    /// Compute positions for the next pair
    pub fn layout(
        &mut self,
        playfield: &Playfield,
        player_height: f32,
        pipe_size: Vec2,
    ) -> Result<ObstacleLayout, FlapError> {
        // Re-check: fields are public and feed the offset range
        let playfield = Playfield::new(playfield.width, playfield.height)?;
        if !(player_height.is_finite() && player_height > 0.0) {
            return Err(FlapError::InvalidPlayerHeight(player_height));
        }

        let gap_height = player_height * self.gap_ratio;
        let offset = self.vertical_offset(playfield.height);
        let mid = playfield.mid();
        let x = mid.x + playfield.width;

        let top_y = mid.y + pipe_size.y / 2.0 + gap_height / 2.0 + offset;
        let bottom_y = mid.y - pipe_size.y / 2.0 - gap_height / 2.0 + offset;

        Ok(ObstacleLayout {
            offset,
            gap_height,
            top: Vec2::new(x, top_y),
            bottom: Vec2::new(x, bottom_y),
            gate: Vec2::new(x, mid.y + offset),
            pipe_size,
            gate_size: Vec2::new(pipe_size.x / GATE_WIDTH_DIVISOR, gap_height),
        })
    }
}

/// Create the pair's bodies and send them across the playfield
///
/// The pair travels two playfield widths to the left at `pipe_speed` and is
/// removed by the host when the move ends.
pub fn spawn<H: PhysicsHost>(
    host: &mut H,
    layout: &ObstacleLayout,
    playfield: &Playfield,
    pipe_speed: f32,
) -> ObstaclePair {
    let pipe = Shape::Rect { size: layout.pipe_size };
    let top = host.create_body(BodyDesc::fixed(BodyTag::Pipe, pipe, layout.top));
    let bottom = host.create_body(BodyDesc::fixed(BodyTag::Pipe, pipe, layout.bottom));
    let gate = host.create_body(BodyDesc::fixed(
        BodyTag::Gate,
        Shape::Rect { size: layout.gate_size },
        layout.gate,
    ));

    let delta = Vec2::new(-2.0 * playfield.width, 0.0);
    let duration = delta.x.abs() / pipe_speed;
    let pair = ObstaclePair { top, bottom, gate };
    for body in pair.bodies() {
        host.translate(body, delta, duration, true);
    }

    log::debug!(
        "Spawned obstacle pair {:?} (offset {:.0}, gap {:.0})",
        pair,
        layout.offset,
        layout.gap_height
    );
    pair
}
