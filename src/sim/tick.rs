//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::physics;
use super::state::{GameState, RoundPhase};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Primary input (tap/click) location in arena coordinates
    pub touch: Option<Vec2>,
    /// Device tilt; only `x` is used, to bias horizontal gravity
    pub tilt: Option<Vec2>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time += dt as f64;
    state.time_ticks += 1;

    if let Some(location) = input.touch {
        state.on_primary_input_down(location);
    }

    if state.phase() == RoundPhase::Bouncing {
        if let Some(tilt) = input.tilt {
            state.gravity = state.config.gravity(tilt.x);
        }
    }

    state.run_deferred();

    if !state.balls.is_empty() {
        physics::step(state, dt);
    }

    state.animate(dt);
    state.cull_out_of_bounds();

    if state.phase() == RoundPhase::Bouncing
        && state.balls.is_empty()
        && state.pending_launches() == 0
    {
        state.advance();
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Converts host frame times into fixed ticks
#[derive(Debug, Clone, Default)]
pub struct Stepper {
    accumulator: f32,
    last_time: Option<f64>,
}

impl Stepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-frame hook: run as many fixed ticks as `current_time` (seconds)
    /// allows. One-shot input (`touch`) is consumed by the first tick.
    /// Returns the number of ticks run.
    pub fn update(&mut self, state: &mut GameState, input: &mut TickInput, current_time: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => (current_time - last) as f32,
            None => 0.0,
        };
        self.last_time = Some(current_time);
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.touch = None;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }
}
