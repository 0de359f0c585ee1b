//! Game state and the round state machine
//!
//! Everything one game needs lives in [`GameState`]: score, ball count,
//! bouncers, in-flight balls, the deferred-action queue and the event stream
//! the host drains. The round phase can only change through the transition
//! methods here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bouncer::{Bouncer, Tier};
use super::difficulty::generate_round;
use super::schedule::{DeferredAction, Scheduler};
use crate::audio::BounceCue;
use crate::config::GameConfig;
use crate::aim_direction;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Launcher idle, waiting for the player to aim
    Waiting,
    /// Balls in flight
    Bouncing,
    /// New row rising, no input
    Advancing,
    /// Run ended; next input starts a new game
    GameOver,
}

impl RoundPhase {
    /// Legal transitions of the round state machine
    pub fn can_transition_to(self, next: RoundPhase) -> bool {
        use RoundPhase::*;
        matches!(
            (self, next),
            (Waiting, Bouncing)
                | (Waiting, Advancing)
                | (Bouncing, Advancing)
                | (Advancing, Waiting)
                | (Waiting | Bouncing | Advancing, GameOver)
        )
    }

    /// Whether the launcher is shown
    pub fn launcher_visible(self) -> bool {
        self == RoundPhase::Waiting
    }
}

/// Something that happened during a tick, for the host to present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: RoundPhase, to: RoundPhase },
    RoundStarted { generation: u64, spawned: usize },
    BallLaunched { id: u32 },
    /// Ball fell out of the arena
    BallLost { id: u32 },
    BouncerHit { id: u32, remaining: u32, tier: Tier },
    BouncerDestroyed { id: u32 },
    /// Bouncer fell out of the arena without being destroyed
    BouncerLost { id: u32 },
    ScoreChanged { score: u64 },
    BonusBall { number_of_balls: u32 },
    Cue(BounceCue),
    GameOver { score: u64 },
    Restarted { seed: u64 },
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Bouncer IDs the ball currently overlaps (contact begins once per touch)
    #[serde(default)]
    pub touching: Vec<u32>,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            touching: Vec::new(),
        }
    }
}

/// Overlay kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BannerKind {
    ExtraBall,
    GameOver,
}

/// Banner appear time (alpha 0 → 1, scale 2 → 1)
pub const BANNER_APPEAR: f32 = 0.2;
/// Extra-ball banner hold time
pub const BANNER_HOLD: f32 = 0.5;
/// Extra-ball banner disappear time (alpha → 0, scale → 0.5)
pub const BANNER_DISAPPEAR: f32 = 0.2;

/// Transient overlay shown on top of the arena
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub age: f32,
}

impl Banner {
    pub fn new(kind: BannerKind) -> Self {
        Self { kind, age: 0.0 }
    }

    fn disappear_start(&self) -> f32 {
        BANNER_APPEAR + BANNER_HOLD
    }

    pub fn alpha(&self) -> f32 {
        if self.age < BANNER_APPEAR {
            return self.age / BANNER_APPEAR;
        }
        match self.kind {
            BannerKind::GameOver => 1.0,
            BannerKind::ExtraBall => {
                let t = (self.age - self.disappear_start()) / BANNER_DISAPPEAR;
                (1.0 - t.max(0.0)).max(0.0)
            }
        }
    }

    pub fn scale(&self) -> f32 {
        if self.age < BANNER_APPEAR {
            return 2.0 - self.age / BANNER_APPEAR;
        }
        match self.kind {
            BannerKind::GameOver => 1.0,
            BannerKind::ExtraBall => {
                let t = ((self.age - self.disappear_start()) / BANNER_DISAPPEAR).clamp(0.0, 1.0);
                1.0 - 0.5 * t
            }
        }
    }

    /// Extra-ball banners are removed once faded; game over stays
    pub fn is_finished(&self) -> bool {
        self.kind == BannerKind::ExtraBall
            && self.age >= self.disappear_start() + BANNER_DISAPPEAR
    }
}

/// Serializable summary for hosts and debugging
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub seed: u64,
    pub phase: RoundPhase,
    pub score: u64,
    pub number_of_balls: u32,
    pub score_from_current_ball: u8,
    pub generation: u64,
    pub time: f64,
    pub bouncers: Vec<Bouncer>,
    pub balls: Vec<Ball>,
}

/// Complete round context for one game
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    seed: u64,
    pub(crate) rng: Pcg32,
    phase: RoundPhase,
    pub(crate) score: u64,
    pub(crate) number_of_balls: u32,
    /// Hits since the last launch, saturating at the cue bank size
    pub(crate) score_from_current_ball: u8,
    /// Round counter keying deferred actions
    pub(crate) generation: u64,
    /// Simulation clock (seconds)
    pub(crate) time: f64,
    pub(crate) time_ticks: u64,
    /// Current gravity in points/s²
    pub(crate) gravity: Vec2,
    /// Active balls (sorted by id for determinism)
    pub(crate) balls: Vec<Ball>,
    /// Active bouncers (sorted by id for determinism)
    pub(crate) bouncers: Vec<Bouncer>,
    pub(crate) banners: Vec<Banner>,
    pub(crate) scheduler: Scheduler,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Start a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, GameConfig::default())
    }

    /// Start a new game; the first row begins rising immediately
    pub fn with_config(seed: u64, config: GameConfig) -> Self {
        let mut state = Self::blank(seed, config, 0);
        state.advance();
        state
    }

    fn blank(seed: u64, config: GameConfig, generation: u64) -> Self {
        let gravity = config.gravity(0.0);
        Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RoundPhase::Waiting,
            score: 0,
            number_of_balls: 1,
            score_from_current_ball: 0,
            generation,
            time: 0.0,
            time_ticks: 0,
            gravity,
            balls: Vec::new(),
            bouncers: Vec::new(),
            banners: Vec::new(),
            scheduler: Scheduler::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn number_of_balls(&self) -> u32 {
        self.number_of_balls
    }

    pub fn score_from_current_ball(&self) -> u8 {
        self.score_from_current_ball
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn bouncers(&self) -> &[Bouncer] {
        &self.bouncers
    }

    pub fn banners(&self) -> &[Banner] {
        &self.banners
    }

    /// Launches still waiting on their stagger delay
    pub fn pending_launches(&self) -> usize {
        self.scheduler.pending_launches(self.generation)
    }

    /// Take all events produced since the last call
    ///
    /// Events queue up until taken, so a host should drain once per frame.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn set_phase(&mut self, to: RoundPhase) -> bool {
        let from = self.phase;
        if !from.can_transition_to(to) {
            log::warn!("Rejected phase transition {:?} -> {:?}", from, to);
            return false;
        }
        self.phase = to;
        self.emit(GameEvent::PhaseChanged { from, to });
        true
    }

    /// Primary input (tap/click) at `location` in arena coordinates
    ///
    /// Launches while waiting, restarts after game over, ignored otherwise.
    /// Returns whether the input was consumed.
    pub fn on_primary_input_down(&mut self, location: Vec2) -> bool {
        match self.phase {
            RoundPhase::Waiting => {
                self.launch(location);
                true
            }
            RoundPhase::GameOver => {
                self.restart();
                true
            }
            RoundPhase::Bouncing | RoundPhase::Advancing => {
                log::trace!("Ignoring input during {:?}", self.phase);
                false
            }
        }
    }

    fn launch(&mut self, target: Vec2) {
        self.score_from_current_ball = 0;
        self.launch_ball(target);
        self.set_phase(RoundPhase::Bouncing);

        let stagger = self.config.launch_stagger as f64;
        for i in 1..self.number_of_balls {
            let due = self.time + stagger * i as f64;
            self.scheduler
                .schedule(due, self.generation, DeferredAction::LaunchBall { target });
        }
    }

    /// Spawn one ball at the launcher aimed at `target`
    pub(crate) fn launch_ball(&mut self, target: Vec2) -> u32 {
        let id = self.next_entity_id();
        let origin = self.config.launcher_pos();
        let vel = aim_direction(origin, target) * self.config.launch_speed;
        self.balls
            .push(Ball::new(id, origin, vel, self.config.ball_radius));
        self.emit(GameEvent::BallLaunched { id });
        id
    }

    /// Start a new round: spawn a row and raise every bouncer
    ///
    /// Legal from Waiting (first round) and Bouncing. Returns false if the
    /// current phase doesn't allow it.
    pub fn advance(&mut self) -> bool {
        if !self.set_phase(RoundPhase::Advancing) {
            return false;
        }
        self.generation += 1;
        self.scheduler.cancel_stale(self.generation);

        let spawns = generate_round(self.score, &mut self.rng);
        let spawn_y = self.config.spawn_y();
        for spawn in &spawns {
            let id = self.next_entity_id();
            self.bouncers.push(Bouncer::new(
                id,
                spawn.lane,
                Vec2::new(spawn.x(), spawn_y),
                self.config.bouncer_radius,
                spawn.hits,
            ));
        }

        let (distance, duration) = (self.config.rise_distance, self.config.rise_duration);
        for bouncer in &mut self.bouncers {
            bouncer.start_rise(distance, duration);
        }

        let due = self.time + self.config.end_check_delay as f64;
        self.scheduler
            .schedule(due, self.generation, DeferredAction::CheckForEnd);

        log::info!(
            "Round {}: spawned {:?} at score {}",
            self.generation,
            spawns.iter().map(|s| (s.lane, s.hits)).collect::<Vec<_>>(),
            self.score
        );
        self.emit(GameEvent::RoundStarted {
            generation: self.generation,
            spawned: spawns.len(),
        });
        true
    }

    /// End of an advance: game over if a bouncer reached the top bar
    pub(crate) fn check_for_end(&mut self) {
        if self.phase != RoundPhase::Advancing {
            return;
        }
        for bouncer in &mut self.bouncers {
            bouncer.finish_rise();
        }
        let half = self.config.half_width();
        let bar_min = Vec2::new(-half, self.config.top_bar_bottom());
        let bar_max = Vec2::new(half, self.config.max_y());
        let reached_top = self
            .bouncers
            .iter()
            .any(|b| b.overlaps_rect(bar_min, bar_max));

        if reached_top {
            self.game_over();
        } else {
            self.set_phase(RoundPhase::Waiting);
        }
    }

    /// End the run. Calling it again while already over does nothing.
    pub fn game_over(&mut self) {
        if self.phase == RoundPhase::GameOver {
            return;
        }
        if !self.set_phase(RoundPhase::GameOver) {
            return;
        }
        // Balls still in flight can't score once the game is over
        self.balls.clear();
        let fade = self.config.fade_duration;
        for bouncer in &mut self.bouncers {
            bouncer.start_fade(fade);
        }
        self.banners.push(Banner::new(BannerKind::GameOver));
        log::info!(
            "Game over at score {} after {} rounds",
            self.score,
            self.generation
        );
        self.emit(GameEvent::GameOver { score: self.score });
    }

    /// Replace this game with a fresh one (same tuning, new seed)
    pub fn restart(&mut self) {
        let seed: u64 = self.rng.random();
        let pending = std::mem::take(&mut self.events);
        let mut fresh = Self::blank(seed, self.config.clone(), self.generation);
        fresh.events = pending;
        fresh.emit(GameEvent::Restarted { seed });
        fresh.advance();
        log::info!("Restarted with seed {}", seed);
        *self = fresh;
    }

    /// Grant one extra ball
    pub(crate) fn bonus_ball(&mut self) {
        self.number_of_balls += 1;
        self.banners.push(Banner::new(BannerKind::ExtraBall));
        log::info!(
            "Bonus ball at score {}: now {} balls",
            self.score,
            self.number_of_balls
        );
        self.emit(GameEvent::BonusBall {
            number_of_balls: self.number_of_balls,
        });
    }

    /// Run deferred actions that have come due
    pub(crate) fn run_deferred(&mut self) {
        for action in self.scheduler.drain_due(self.time, self.generation) {
            match action {
                DeferredAction::LaunchBall { target } => {
                    if self.phase == RoundPhase::Bouncing {
                        self.launch_ball(target);
                    }
                }
                DeferredAction::CheckForEnd => self.check_for_end(),
            }
        }
    }

    /// Advance cosmetic animations
    pub(crate) fn animate(&mut self, dt: f32) {
        for bouncer in &mut self.bouncers {
            bouncer.animate(dt);
        }
        for banner in &mut self.banners {
            banner.age += dt;
        }
        self.banners.retain(|b| !b.is_finished());
    }

    /// Remove anything that fell below the arena
    pub(crate) fn cull_out_of_bounds(&mut self) {
        let cull_y = self.config.cull_y();
        let mut lost = Vec::new();
        self.balls.retain(|b| {
            let keep = b.pos.y >= cull_y;
            if !keep {
                lost.push(GameEvent::BallLost { id: b.id });
            }
            keep
        });
        self.bouncers.retain(|b| {
            let keep = b.pos.y >= cull_y;
            if !keep {
                lost.push(GameEvent::BouncerLost { id: b.id });
            }
            keep
        });
        self.events.extend(lost);
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
        self.bouncers.sort_by_key(|b| b.id);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            seed: self.seed,
            phase: self.phase,
            score: self.score,
            number_of_balls: self.number_of_balls,
            score_from_current_ball: self.score_from_current_ball,
            generation: self.generation,
            time: self.time,
            bouncers: self.bouncers.clone(),
            balls: self.balls.clone(),
        }
    }

    /// Place a bouncer directly (test setup)
    #[cfg(test)]
    pub(crate) fn spawn_bouncer_at(&mut self, pos: Vec2, hits: u32) -> u32 {
        let id = self.next_entity_id();
        let radius = self.config.bouncer_radius;
        self.bouncers.push(Bouncer::new(id, 2, pos, radius, hits));
        id
    }

    /// Force a phase for test setup, bypassing the transition table
    #[cfg(test)]
    pub(crate) fn force_phase(&mut self, phase: RoundPhase) {
        self.phase = phase;
    }
}
