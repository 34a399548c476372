//! Game phase controller
//!
//! Owns the run state and drives the Idle → Active → Over → Idle cycle:
//! - Idle + tap: enable gravity, unfreeze, spawn the first obstacle pair
//! - Active + tap: reset the player's velocity and flap
//! - Active + lethal contact: freeze and show the game over banner
//! - Active + gate contact: score, replace the obstacle pair
//! - Over + tap: tear the scene down and rebuild it, score back to 0
//!
//! Exactly one obstacle pair is live while Active; none while Idle.

use glam::Vec2;

use super::contact::{ContactKind, classify};
use super::host::{BodyDesc, BodyHandle, BodyTag, PhysicsHost, Shape};
use super::obstacle::{self, ObstacleGenerator};
use super::observer::RunObserver;
use super::state::{GamePhase, ObstaclePair, Playfield, Player, RunState};
use super::world::{HeadlessWorld, StepEvents};
use crate::consts::*;
use crate::error::FlapError;
use crate::settings::Settings;

/// The game phase state machine
#[derive(Debug)]
pub struct GameController<H: PhysicsHost, O: RunObserver> {
    host: H,
    observer: O,
    settings: Settings,
    playfield: Playfield,
    generator: ObstacleGenerator,
    seed: u64,
    run: RunState,
    ground: BodyHandle,
    player: Player,
    pair: Option<ObstaclePair>,
}

impl<H: PhysicsHost, O: RunObserver> GameController<H, O> {
    /// Validate settings and build the initial (Idle) scene on `host`
    pub fn new(mut host: H, settings: Settings, observer: O) -> Result<Self, FlapError> {
        settings.validate()?;
        let playfield = Playfield::new(settings.playfield_width, settings.playfield_height)?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let generator = ObstacleGenerator::new(seed, settings.gap_ratio);

        let (ground, player) = build_scene(&mut host, &settings, &playfield);
        host.set_time_scale(0.0);
        log::info!(
            "Controller ready: playfield {}x{}, seed {}",
            playfield.width,
            playfield.height,
            seed
        );

        Ok(Self {
            host,
            observer,
            settings,
            playfield,
            generator,
            seed,
            run: RunState::new(),
            ground,
            player,
            pair: None,
        })
    }

    /// Tap/press from the player
    pub fn on_input(&mut self) -> Result<(), FlapError> {
        match self.run.phase {
            GamePhase::Idle => self.start_run(),
            GamePhase::Active => {
                self.flap();
                Ok(())
            }
            GamePhase::Over => self.restart(),
        }
    }

    /// Contact begin between two bodies, as reported by the host
    ///
    /// Contacts only matter while Active; anything else is ignored.
    pub fn on_contact(&mut self, a: BodyHandle, b: BodyHandle) -> Result<(), FlapError> {
        if self.run.phase != GamePhase::Active {
            return Ok(());
        }
        let (Some(tag_a), Some(tag_b)) = (self.host.tag(a), self.host.tag(b)) else {
            log::debug!("Ignoring contact with removed body ({:?}, {:?})", a, b);
            return Ok(());
        };

        match classify(tag_a, tag_b) {
            ContactKind::Lethal => {
                self.end_run();
                Ok(())
            }
            ContactKind::ScoreGate => {
                let gate = if tag_a == BodyTag::Gate { a } else { b };
                self.pass_gate(gate)
            }
            ContactKind::Benign => Ok(()),
        }
    }

    /// A body was removed by the host at the end of its move
    ///
    /// If that was the live pair's gate, the pair left the playfield without
    /// being passed and a new one takes its place.
    pub fn on_expired(&mut self, body: BodyHandle) -> Result<(), FlapError> {
        let Some(pair) = self.pair else {
            return Ok(());
        };
        if pair.gate != body {
            return Ok(());
        }

        log::debug!("Obstacle pair {:?} left the playfield", pair);
        self.remove_pair()?;
        if self.run.phase == GamePhase::Active {
            self.spawn_pair()?;
        }
        Ok(())
    }

    /// Feed one step's worth of host events through the state machine
    pub fn handle_events(&mut self, events: &StepEvents) -> Result<(), FlapError> {
        for &body in &events.expired {
            self.on_expired(body)?;
        }
        for &(a, b) in &events.contacts {
            self.on_contact(a, b)?;
        }
        Ok(())
    }

    /// Create the next obstacle pair; fails if one is already live
    pub fn spawn_pair(&mut self) -> Result<ObstaclePair, FlapError> {
        if let Some(live) = self.pair {
            log::error!("Refusing to spawn over live obstacle pair {:?}", live);
            return Err(FlapError::ObstacleAlreadyLive { gate: live.gate.0 });
        }
        let layout = self.generator.layout(
            &self.playfield,
            self.settings.player_height,
            self.settings.pipe_size(),
        )?;
        let pair = obstacle::spawn(&mut self.host, &layout, &self.playfield, self.settings.pipe_speed);
        self.pair = Some(pair);
        Ok(pair)
    }

    /// Remove the live obstacle pair; fails if there is none
    pub fn remove_pair(&mut self) -> Result<ObstaclePair, FlapError> {
        let pair = self.pair.take().ok_or(FlapError::NoLivePair)?;
        for body in pair.bodies() {
            // Bodies that finished their move are already gone
            self.host.destroy(body);
        }
        Ok(pair)
    }

    pub fn phase(&self) -> GamePhase {
        self.run.phase
    }

    pub fn current_score(&self) -> u32 {
        self.run.score
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn live_pair(&self) -> Option<ObstaclePair> {
        self.pair
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn ground(&self) -> BodyHandle {
        self.ground
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Give back the host and observer
    pub fn into_parts(self) -> (H, O) {
        (self.host, self.observer)
    }

    fn start_run(&mut self) -> Result<(), FlapError> {
        self.spawn_pair()?;
        self.host.set_dynamic(self.player.body, true);
        self.host.set_time_scale(1.0);
        self.run.phase = GamePhase::Active;
        self.run.runs += 1;
        log::info!("Run {} started", self.run.runs);
        self.observer.on_run_started();
        Ok(())
    }

    fn flap(&mut self) {
        let body = self.player.body;
        // Zero first so taps never stack
        self.host.set_velocity(body, Vec2::ZERO);
        self.host
            .apply_impulse(body, Vec2::new(0.0, self.settings.flap_impulse));
    }

    fn pass_gate(&mut self, gate: BodyHandle) -> Result<(), FlapError> {
        if self.pair.map(|p| p.gate) != Some(gate) {
            log::warn!("Contact with stale gate {:?}", gate);
            return Ok(());
        }
        let score = self.run.award_point();
        self.host.set_score_text(&self.run.score_text());
        self.remove_pair()?;
        self.spawn_pair()?;
        log::debug!("Gate passed, score {}", score);
        Ok(())
    }

    fn end_run(&mut self) {
        self.run.phase = GamePhase::Over;
        self.host.set_time_scale(0.0);
        self.host.show_banner(Some(GAME_OVER_TEXT));
        log::info!("Run {} over with score {}", self.run.runs, self.run.score);
        self.observer.on_run_ended(self.run.score);
    }

    fn restart(&mut self) -> Result<(), FlapError> {
        self.host.clear();
        self.pair = None;
        let (ground, player) = build_scene(&mut self.host, &self.settings, &self.playfield);
        self.ground = ground;
        self.player = player;
        self.host.set_time_scale(0.0);
        self.run.reset();
        log::info!("Scene reset, waiting for tap");
        Ok(())
    }
}

impl<O: RunObserver> GameController<HeadlessWorld, O> {
    /// Step the headless world and dispatch what happened
    pub fn step(&mut self, dt: f32) -> Result<StepEvents, FlapError> {
        let events = self.host.step(dt);
        self.handle_events(&events)?;
        Ok(events)
    }
}

/// Ground, player and score label; the player starts without gravity
fn build_scene<H: PhysicsHost>(
    host: &mut H,
    settings: &Settings,
    playfield: &Playfield,
) -> (BodyHandle, Player) {
    let mid = playfield.mid();

    let ground = host.create_body(BodyDesc::fixed(
        BodyTag::Ground,
        Shape::Rect {
            size: Vec2::new(playfield.width, GROUND_THICKNESS),
        },
        Vec2::new(mid.x, 0.0),
    ));

    let body = host.create_body(BodyDesc {
        tag: BodyTag::Player,
        shape: Shape::Circle {
            radius: settings.player_height * PLAYER_RADIUS_FACTOR,
        },
        position: mid,
        velocity: Vec2::ZERO,
        dynamic: false,
        contact_mask: BodyTag::Player.default_contact_mask(),
    });

    host.set_score_text("0");
    host.show_banner(None);
    (ground, Player { body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::observer::{NullObserver, RunEvent, RunLog};
    use proptest::prelude::*;

    fn settings() -> Settings {
        Settings {
            seed: Some(12345),
            ..Default::default()
        }
    }

    fn controller() -> GameController<HeadlessWorld, RunLog> {
        let world = HeadlessWorld::new(GRAVITY);
        GameController::new(world, settings(), RunLog::new()).unwrap()
    }

    #[test]
    fn test_starts_idle_and_frozen() {
        let c = controller();
        assert_eq!(c.phase(), GamePhase::Idle);
        assert_eq!(c.current_score(), 0);
        assert!(c.live_pair().is_none());
        assert_eq!(c.host().time_scale(), 0.0);
        assert!(!c.host().is_dynamic(c.player().body));
        assert_eq!(c.host().score_text(), "0");
    }

    #[test]
    fn test_idle_tap_activates() {
        let mut c = controller();
        c.on_input().unwrap();
        assert_eq!(c.phase(), GamePhase::Active);
        assert!(c.host().is_dynamic(c.player().body));
        assert_eq!(c.host().time_scale(), 1.0);
        assert!(c.live_pair().is_some());
        assert_eq!(c.host().count_tagged(BodyTag::Pipe), 2);
        assert_eq!(c.host().count_tagged(BodyTag::Gate), 1);
        assert_eq!(c.observer().events, vec![RunEvent::Started]);
    }

    #[test]
    fn test_active_tap_resets_velocity_before_flap() {
        let mut c = controller();
        c.on_input().unwrap();
        let body = c.player().body;
        c.host_mut().set_velocity(body, Vec2::new(0.0, 900.0));
        c.on_input().unwrap();
        assert_eq!(c.host().velocity(body), Some(Vec2::new(0.0, FLAP_IMPULSE)));
        c.on_input().unwrap();
        assert_eq!(c.host().velocity(body), Some(Vec2::new(0.0, FLAP_IMPULSE)));
        assert_eq!(c.phase(), GamePhase::Active);
    }

    #[test]
    fn test_gate_contact_scores_and_replaces_pair() {
        let mut c = controller();
        c.on_input().unwrap();
        let old = c.live_pair().unwrap();

        c.on_contact(c.player().body, old.gate).unwrap();
        assert_eq!(c.current_score(), 1);
        assert_eq!(c.phase(), GamePhase::Active);
        assert_eq!(c.host().score_text(), "1");
        for body in old.bodies() {
            assert!(!c.host().contains(body));
        }
        let new = c.live_pair().unwrap();
        assert_ne!(new, old);
        assert_eq!(c.host().count_tagged(BodyTag::Pipe), 2);
        assert_eq!(c.host().count_tagged(BodyTag::Gate), 1);
    }

    #[test]
    fn test_stale_gate_contact_is_ignored() {
        let mut c = controller();
        c.on_input().unwrap();
        let old = c.live_pair().unwrap();
        c.on_contact(old.gate, c.player().body).unwrap();
        // Same gate again: already removed
        c.on_contact(old.gate, c.player().body).unwrap();
        assert_eq!(c.current_score(), 1);
    }

    #[test]
    fn test_ground_contact_ends_run() {
        let mut c = controller();
        c.on_input().unwrap();
        let gate = c.live_pair().unwrap().gate;
        c.on_contact(c.player().body, gate).unwrap();

        let ground = c.ground();
        c.on_contact(ground, c.player().body).unwrap();
        assert_eq!(c.phase(), GamePhase::Over);
        assert_eq!(c.host().time_scale(), 0.0);
        assert_eq!(c.host().banner(), Some(GAME_OVER_TEXT));
        assert_eq!(
            c.observer().events,
            vec![RunEvent::Started, RunEvent::Ended { score: 1 }]
        );

        // No more scoring once over
        let gate = c.live_pair().unwrap().gate;
        c.on_contact(c.player().body, gate).unwrap();
        assert_eq!(c.current_score(), 1);
    }

    #[test]
    fn test_pipe_contact_ends_run() {
        let mut c = controller();
        c.on_input().unwrap();
        let pipe = c.live_pair().unwrap().top;
        c.on_contact(pipe, c.player().body).unwrap();
        assert_eq!(c.phase(), GamePhase::Over);
    }

    #[test]
    fn test_over_tap_restarts_idle() {
        let mut c = controller();
        c.on_input().unwrap();
        let gate = c.live_pair().unwrap().gate;
        c.on_contact(c.player().body, gate).unwrap();
        let pipe = c.live_pair().unwrap().bottom;
        c.on_contact(c.player().body, pipe).unwrap();
        assert_eq!(c.phase(), GamePhase::Over);

        c.on_input().unwrap();
        assert_eq!(c.phase(), GamePhase::Idle);
        assert_eq!(c.current_score(), 0);
        assert!(c.live_pair().is_none());
        assert_eq!(c.host().count_tagged(BodyTag::Pipe), 0);
        assert_eq!(c.host().count_tagged(BodyTag::Gate), 0);
        assert_eq!(c.host().count_tagged(BodyTag::Player), 1);
        assert_eq!(c.host().count_tagged(BodyTag::Ground), 1);
        assert_eq!(c.host().banner(), None);
        assert_eq!(c.host().score_text(), "0");

        // Next tap is the activation tap
        c.on_input().unwrap();
        assert_eq!(c.phase(), GamePhase::Active);
        assert_eq!(c.run().runs, 2);
    }

    #[test]
    fn test_contacts_ignored_while_idle() {
        let mut c = controller();
        let player = c.player().body;
        let ground = c.ground();
        c.on_contact(player, ground).unwrap();
        assert_eq!(c.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_double_spawn_fails() {
        let mut c = controller();
        c.on_input().unwrap();
        assert!(matches!(
            c.spawn_pair(),
            Err(FlapError::ObstacleAlreadyLive { .. })
        ));
        c.remove_pair().unwrap();
        assert!(matches!(c.remove_pair(), Err(FlapError::NoLivePair)));
    }

    #[test]
    fn test_expired_pair_is_replaced() {
        let mut c = controller();
        c.on_input().unwrap();
        let old = c.live_pair().unwrap();
        for body in old.bodies() {
            c.host_mut().destroy(body);
        }
        c.on_expired(old.gate).unwrap();
        let new = c.live_pair().unwrap();
        assert_ne!(new, old);
        assert_eq!(c.host().count_tagged(BodyTag::Gate), 1);
    }

    #[test]
    fn test_falling_player_hits_ground() {
        let mut c = controller();
        c.on_input().unwrap();
        let mut steps = 0;
        while c.phase() == GamePhase::Active && steps < 10 * 120 {
            c.step(SIM_DT).unwrap();
            steps += 1;
        }
        assert_eq!(c.phase(), GamePhase::Over);
        assert_eq!(c.current_score(), 0);
    }

    #[test]
    fn test_frozen_after_over() {
        let mut c = controller();
        c.on_input().unwrap();
        let pipe = c.live_pair().unwrap().top;
        c.on_contact(c.player().body, pipe).unwrap();
        let before = c.host().position(c.player().body);
        c.step(1.0).unwrap();
        assert_eq!(c.host().position(c.player().body), before);
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let bad = Settings {
            playfield_width: 0.0,
            ..settings()
        };
        let result = GameController::new(HeadlessWorld::new(GRAVITY), bad, NullObserver);
        assert!(matches!(result, Err(FlapError::InvalidPlayfield { .. })));
    }

    #[test]
    fn test_determinism() {
        let mut a = controller();
        let mut b = controller();
        for c in [&mut a, &mut b] {
            c.on_input().unwrap();
            for i in 0..600 {
                if i % 40 == 0 {
                    c.on_input().unwrap();
                }
                c.step(SIM_DT).unwrap();
            }
        }
        assert_eq!(a.phase(), b.phase());
        assert_eq!(a.current_score(), b.current_score());
        let gate_a = a.live_pair().map(|p| a.host().position(p.gate));
        let gate_b = b.live_pair().map(|p| b.host().position(p.gate));
        assert_eq!(gate_a, gate_b);
    }

    #[derive(Debug, Clone)]
    enum Action {
        Tap,
        PassGate,
        HitPipe,
        HitGround,
        Step(u32),
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            3 => Just(Action::Tap),
            3 => Just(Action::PassGate),
            1 => Just(Action::HitPipe),
            1 => Just(Action::HitGround),
            2 => (1u32..240).prop_map(Action::Step),
        ]
    }

    proptest! {
        #[test]
        fn run_invariants_hold(seed in any::<u64>(), actions in proptest::collection::vec(action(), 0..80)) {
            let settings = Settings { seed: Some(seed), ..Default::default() };
            let mut c = GameController::new(HeadlessWorld::new(GRAVITY), settings, NullObserver).unwrap();

            for action in actions {
                let before_phase = c.phase();
                let before_score = c.current_score();
                let player = c.player().body;

                match action {
                    Action::Tap => c.on_input().unwrap(),
                    Action::PassGate => {
                        if let Some(pair) = c.live_pair() {
                            c.on_contact(player, pair.gate).unwrap();
                        }
                    }
                    Action::HitPipe => {
                        if let Some(pair) = c.live_pair() {
                            c.on_contact(pair.top, player).unwrap();
                        }
                    }
                    Action::HitGround => {
                        let ground = c.ground();
                        c.on_contact(player, ground).unwrap();
                    }
                    Action::Step(ticks) => {
                        for _ in 0..ticks {
                            c.step(SIM_DT).unwrap();
                        }
                    }
                }

                match c.phase() {
                    GamePhase::Idle => {
                        prop_assert!(c.live_pair().is_none());
                        prop_assert_eq!(c.host().count_tagged(BodyTag::Gate), 0);
                        prop_assert_eq!(c.current_score(), 0);
                    }
                    GamePhase::Active => {
                        prop_assert!(c.live_pair().is_some());
                        prop_assert_eq!(c.host().count_tagged(BodyTag::Gate), 1);
                        prop_assert_eq!(c.host().count_tagged(BodyTag::Pipe), 2);
                    }
                    GamePhase::Over => {}
                }

                if before_phase == GamePhase::Over && c.phase() == GamePhase::Idle {
                    prop_assert_eq!(c.current_score(), 0);
                } else {
                    prop_assert!(c.current_score() >= before_score);
                }
                if before_phase != GamePhase::Active {
                    prop_assert!(c.current_score() == before_score || c.current_score() == 0);
                }
                prop_assert!(c.host().count_tagged(BodyTag::Gate) <= 1);
            }
        }
    }
}
