//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod bouncer;
pub mod collision;
pub mod contact;
pub mod difficulty;
pub mod physics;
pub mod schedule;
pub mod state;
pub mod tick;

pub use bouncer::{Bouncer, HitResult, Tier};
pub use collision::{CollisionResult, ball_circle_collision, ball_edge_loop_collision};
pub use contact::{ContactOutcome, EntityKind, EntityRef};
pub use difficulty::{BouncerSpawn, generate_round};
pub use schedule::{DeferredAction, Scheduler};
pub use state::{Ball, Banner, BannerKind, GameEvent, GameState, RoundPhase, Snapshot};
pub use tick::{Stepper, TickInput, tick};
