//! Headless physics host
//!
//! A minimal kinematic world that implements [`PhysicsHost`] so the core can
//! run without a renderer: gravity on dynamic bodies, linear move actions with
//! optional removal, overlap tests filtered by category/contact masks, and a
//! global time scale. Bodies are kept sorted by handle for deterministic
//! iteration.

use std::collections::BTreeSet;

use glam::Vec2;

use super::host::{BodyDesc, BodyHandle, BodyTag, PhysicsHost, Shape};

/// A linear move in progress
#[derive(Debug, Clone, Copy)]
struct Motion {
    /// Points per second of scaled time
    rate: Vec2,
    remaining: f32,
    remove_on_finish: bool,
}

#[derive(Debug, Clone)]
struct Body {
    handle: BodyHandle,
    tag: BodyTag,
    shape: Shape,
    position: Vec2,
    velocity: Vec2,
    dynamic: bool,
    contact_mask: u32,
    motion: Option<Motion>,
}

impl Body {
    fn wants_contact_with(&self, other: &Body) -> bool {
        self.contact_mask & other.tag.category() != 0 || other.contact_mask & self.tag.category() != 0
    }
}

/// What happened during one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepEvents {
    /// Pairs that started overlapping this step (lower handle first)
    pub contacts: Vec<(BodyHandle, BodyHandle)>,
    /// Bodies removed because their move finished
    pub expired: Vec<BodyHandle>,
}

impl StepEvents {
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty() && self.expired.is_empty()
    }
}

/// Headless world
#[derive(Debug, Clone)]
pub struct HeadlessWorld {
    bodies: Vec<Body>,
    /// Pairs currently overlapping, so each overlap reports once
    touching: BTreeSet<(BodyHandle, BodyHandle)>,
    gravity: Vec2,
    time_scale: f32,
    next_id: u32,
    score_text: String,
    banner: Option<String>,
}

impl HeadlessWorld {
    /// Create an empty world with vertical gravity (negative is down)
    pub fn new(gravity: f32) -> Self {
        Self {
            bodies: Vec::new(),
            touching: BTreeSet::new(),
            gravity: Vec2::new(0.0, gravity),
            time_scale: 1.0,
            next_id: 1,
            score_text: String::new(),
            banner: None,
        }
    }

    /// Advance the world by `dt` seconds (scaled by the time scale)
    pub fn step(&mut self, dt: f32) -> StepEvents {
        let mut events = StepEvents::default();
        let dt = dt * self.time_scale;
        if dt <= 0.0 {
            return events;
        }

        for body in &mut self.bodies {
            if body.dynamic {
                body.velocity += self.gravity * dt;
                body.position += body.velocity * dt;
            }
            if let Some(motion) = body.motion.as_mut() {
                let slice = motion.remaining.min(dt);
                body.position += motion.rate * slice;
                motion.remaining -= slice;
                if motion.remaining <= 0.0 {
                    if motion.remove_on_finish {
                        events.expired.push(body.handle);
                    }
                    body.motion = None;
                }
            }
        }

        if !events.expired.is_empty() {
            let expired = &events.expired;
            self.bodies.retain(|b| !expired.contains(&b.handle));
            self.touching
                .retain(|(a, b)| !expired.contains(a) && !expired.contains(b));
        }

        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                if !a.wants_contact_with(b) {
                    continue;
                }
                let key = (a.handle, b.handle);
                if overlaps(a, b) {
                    if self.touching.insert(key) {
                        events.contacts.push(key);
                    }
                } else {
                    self.touching.remove(&key);
                }
            }
        }

        events
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.find(body).is_some()
    }

    pub fn is_dynamic(&self, body: BodyHandle) -> bool {
        self.find(body).is_some_and(|b| b.dynamic)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of live bodies with the given tag
    pub fn count_tagged(&self, tag: BodyTag) -> usize {
        self.bodies.iter().filter(|b| b.tag == tag).count()
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn score_text(&self) -> &str {
        &self.score_text
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Move a body directly (tests and tooling)
    pub fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(b) = self.find_mut(body) {
            b.position = position;
        }
    }

    fn find(&self, body: BodyHandle) -> Option<&Body> {
        self.bodies
            .binary_search_by_key(&body, |b| b.handle)
            .ok()
            .map(|i| &self.bodies[i])
    }

    fn find_mut(&mut self, body: BodyHandle) -> Option<&mut Body> {
        match self.bodies.binary_search_by_key(&body, |b| b.handle) {
            Ok(i) => Some(&mut self.bodies[i]),
            Err(_) => {
                log::warn!("Command for unknown body {:?}", body);
                None
            }
        }
    }
}

impl PhysicsHost for HeadlessWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        // Handles only grow, so pushing keeps the vec sorted
        self.bodies.push(Body {
            handle,
            tag: desc.tag,
            shape: desc.shape,
            position: desc.position,
            velocity: desc.velocity,
            dynamic: desc.dynamic,
            contact_mask: desc.contact_mask,
            motion: None,
        });
        handle
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        // Unit mass
        if let Some(b) = self.find_mut(body) {
            b.velocity += impulse;
        }
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.find_mut(body) {
            b.velocity = velocity;
        }
    }

    fn set_dynamic(&mut self, body: BodyHandle, dynamic: bool) {
        if let Some(b) = self.find_mut(body) {
            b.dynamic = dynamic;
        }
    }

    fn translate(&mut self, body: BodyHandle, delta: Vec2, duration: f32, remove_on_finish: bool) {
        if let Some(b) = self.find_mut(body) {
            if duration <= 0.0 {
                b.position += delta;
                b.motion = None;
                return;
            }
            b.motion = Some(Motion {
                rate: delta / duration,
                remaining: duration,
                remove_on_finish,
            });
        }
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    fn destroy(&mut self, body: BodyHandle) -> bool {
        match self.bodies.binary_search_by_key(&body, |b| b.handle) {
            Ok(i) => {
                self.bodies.remove(i);
                self.touching.retain(|(a, b)| *a != body && *b != body);
                true
            }
            Err(_) => false,
        }
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.touching.clear();
        self.banner = None;
        self.score_text.clear();
    }

    fn tag(&self, body: BodyHandle) -> Option<BodyTag> {
        self.find(body).map(|b| b.tag)
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.find(body).map(|b| b.position)
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.find(body).map(|b| b.velocity)
    }

    fn set_score_text(&mut self, text: &str) {
        self.score_text.clear();
        self.score_text.push_str(text);
    }

    fn show_banner(&mut self, text: Option<&str>) {
        self.banner = text.map(str::to_owned);
    }
}

/// Strict overlap test between two bodies' shapes
fn overlaps(a: &Body, b: &Body) -> bool {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            a.position.distance_squared(b.position) < (ra + rb) * (ra + rb)
        }
        (Shape::Rect { size: sa }, Shape::Rect { size: sb }) => {
            let d = (a.position - b.position).abs();
            let reach = (sa + sb) / 2.0;
            d.x < reach.x && d.y < reach.y
        }
        (Shape::Circle { radius }, Shape::Rect { size }) => {
            circle_rect(a.position, radius, b.position, size)
        }
        (Shape::Rect { size }, Shape::Circle { radius }) => {
            circle_rect(b.position, radius, a.position, size)
        }
    }
}

fn circle_rect(center: Vec2, radius: f32, rect_center: Vec2, size: Vec2) -> bool {
    let half = size / 2.0;
    let closest = center.clamp(rect_center - half, rect_center + half);
    center.distance_squared(closest) < radius * radius
}
