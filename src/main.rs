//! Infinite Bounce headless runner
//!
//! Plays one game with a simple aiming bot and prints the final state as
//! JSON. Usage: `infinite-bounce [seed]`

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use infinite_bounce::consts::SIM_DT;
use infinite_bounce::sim::{GameEvent, GameState, RoundPhase, TickInput, tick};
use infinite_bounce::{AudioManager, CuePlayer};

/// Hard stop for a runaway game (ten simulated minutes)
const MAX_TICKS: u64 = 10 * 60 * 120;

/// Logs cues instead of playing them
struct LogPlayer;

impl CuePlayer for LogPlayer {
    fn play(&mut self, asset: &str, volume: f32) {
        log::trace!("cue {} @ {:.2}", asset, volume);
    }
}

/// Aim at a random live bouncer, or straight down if there are none
fn pick_target(state: &GameState, rng: &mut Pcg32) -> Vec2 {
    let bouncers = state.bouncers();
    if bouncers.is_empty() {
        return Vec2::new(0.0, state.config.min_y());
    }
    let target = &bouncers[rng.random_range(0..bouncers.len())];
    target.pos + Vec2::new(rng.random_range(-20.0..=20.0), 0.0)
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(0x1B0_0CE);
    log::info!("Infinite Bounce (headless) starting with seed {}", seed);

    let mut state = GameState::new(seed);
    let mut audio = AudioManager::new(LogPlayer);
    let mut aim = Pcg32::seed_from_u64(seed.wrapping_add(1));
    let mut input = TickInput::default();
    let mut bonus_balls = 0u32;

    while state.phase() != RoundPhase::GameOver && state.time_ticks() < MAX_TICKS {
        input.touch = (state.phase() == RoundPhase::Waiting).then(|| pick_target(&state, &mut aim));
        tick(&mut state, &input, SIM_DT);

        let events = state.drain_events();
        audio.handle_events(&events);
        bonus_balls += events
            .iter()
            .filter(|e| matches!(e, GameEvent::BonusBall { .. }))
            .count() as u32;
    }

    if state.phase() != RoundPhase::GameOver {
        log::warn!("Stopped after {} ticks without reaching game over", MAX_TICKS);
    }
    log::info!(
        "Final score {} over {} rounds ({} bonus balls)",
        state.score(),
        state.generation(),
        bonus_balls
    );

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize final state: {}", err),
    }
}
