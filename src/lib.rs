//! Infinite Bounce - game-loop core for a rising-bouncer arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bouncers, difficulty, round state, contacts)
//! - `audio`: Bounce cue bank and host playback bridge
//! - `config`: Data-driven tuning

pub mod audio;
pub mod config;
pub mod sim;

pub use audio::{AudioManager, BounceCue, CuePlayer};
pub use config::{ConfigError, GameConfig};

use glam::Vec2;

/// Fixed game rules
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will accept before clamping (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Horizontal lane positions a bouncer may spawn in
    pub const LANE_POSITIONS: [f32; 5] = [-110.0, -55.0, 0.0, 55.0, 110.0];
    /// Lanes used when three bouncers spawn at once (outer, center, outer)
    pub const TRIPLE_LANES: [usize; 3] = [0, 2, 4];

    /// Scores that grant an extra ball when reached
    pub const EXTRA_BALL_THRESHOLDS: [u64; 15] = [
        10, 50, 100, 150, 250, 350, 500, 750, 1000, 1250, 1500, 2000, 2500, 3500, 5000,
    ];

    /// Number of distinct bounce cues; the per-ball streak saturates here
    pub const CUE_BANK_SIZE: u8 = 22;
}

/// Returns true if reaching `score` grants a bonus ball
#[inline]
pub fn is_extra_ball_threshold(score: u64) -> bool {
    consts::EXTRA_BALL_THRESHOLDS.binary_search(&score).is_ok()
}

/// Unit direction from `from` toward `to` (falls back to straight down)
#[inline]
pub fn aim_direction(from: Vec2, to: Vec2) -> Vec2 {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    let dir = Vec2::new(angle.cos(), angle.sin());
    if dir.is_finite() { dir } else { Vec2::NEG_Y }
}

/// Sine ease-in-ease-out over t in [0, 1]
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    0.5 - 0.5 * (t * std::f32::consts::PI).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_sorted_for_binary_search() {
        assert!(consts::EXTRA_BALL_THRESHOLDS.windows(2).all(|w| w[0] < w[1]));
        assert!(is_extra_ball_threshold(10));
        assert!(is_extra_ball_threshold(5000));
        assert!(!is_extra_ball_threshold(9));
        assert!(!is_extra_ball_threshold(0));
    }

    #[test]
    fn test_aim_points_at_target() {
        let dir = aim_direction(Vec2::new(0.0, 300.0), Vec2::new(0.0, 0.0));
        assert!((dir - Vec2::NEG_Y).length() < 1e-5);
        let dir = aim_direction(Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!((dir - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_ease_hits_endpoints() {
        assert!(ease_in_out(0.0).abs() < 1e-6);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(ease_in_out(2.0), ease_in_out(1.0));
    }
}
