//! Game tuning
//!
//! Every number that shapes feel (arena size, launch speed, timings) lives
//! here so a host can override it from JSON. Rules that define the game
//! itself (lanes, thresholds, cue bank) are in [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tuning values for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    /// Visible area width (centered on x = 0)
    pub arena_width: f32,
    /// Visible area height (centered on y = 0)
    pub arena_height: f32,
    /// Edge loop extends this far above and below the visible area
    pub edge_overhang: f32,
    /// Height of the top bar; a bouncer touching it ends the game
    pub top_bar_height: f32,
    /// Launcher sits this far below the top of the visible area
    pub launcher_drop: f32,
    /// Entities more than this far below the visible area are removed
    pub cull_margin: f32,
    /// New bouncers spawn this far below the visible area
    pub spawn_depth: f32,

    // === Physics ===
    /// Points per physics metre
    pub pixels_per_meter: f32,
    /// Vertical gravity (m/s²)
    pub gravity_y: f32,
    /// Horizontal gravity per unit of tilt (m/s²)
    pub tilt_gravity: f32,
    pub launch_speed: f32,
    pub ball_radius: f32,
    pub bouncer_radius: f32,
    pub bouncer_restitution: f32,
    pub wall_restitution: f32,

    // === Timing (seconds) ===
    /// Gap between staggered launches of extra balls
    pub launch_stagger: f32,
    /// Distance a row rises each round
    pub rise_distance: f32,
    pub rise_duration: f32,
    /// Delay between starting a rise and checking for game over
    pub end_check_delay: f32,
    pub pulse_duration: f32,
    pub fade_duration: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: 500.0,
            arena_height: 800.0,
            edge_overhang: 200.0,
            top_bar_height: 100.0,
            launcher_drop: 100.0,
            cull_margin: 50.0,
            spawn_depth: 50.0,

            pixels_per_meter: 150.0,
            gravity_y: -9.8,
            tilt_gravity: 15.0,
            launch_speed: 1000.0,
            ball_radius: 16.0,
            bouncer_radius: 32.0,
            bouncer_restitution: 0.75,
            wall_restitution: 0.2,

            launch_stagger: 0.25,
            rise_distance: 100.0,
            rise_duration: 0.5,
            end_check_delay: 0.5,
            pulse_duration: 0.1,
            fade_duration: 0.5,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("pixels_per_meter", self.pixels_per_meter),
            ("launch_speed", self.launch_speed),
            ("ball_radius", self.ball_radius),
            ("bouncer_radius", self.bouncer_radius),
            ("rise_distance", self.rise_distance),
            ("rise_duration", self.rise_duration),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }
        // Rows spawn below the visible area; culling must not eat them
        if !(self.spawn_depth >= 0.0 && self.spawn_depth <= self.cull_margin) {
            return Err(ConfigError::Invalid {
                field: "spawn_depth",
                reason: "must be within 0..=cull_margin",
            });
        }
        if !(self.edge_overhang >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "edge_overhang",
                reason: "cannot be negative",
            });
        }
        if self.top_bar_height >= self.arena_height {
            return Err(ConfigError::Invalid {
                field: "top_bar_height",
                reason: "must be smaller than arena_height",
            });
        }
        if !(0.0..=1.0).contains(&self.bouncer_restitution)
            || !(0.0..=1.0).contains(&self.wall_restitution)
        {
            return Err(ConfigError::Invalid {
                field: "restitution",
                reason: "must be within 0..=1",
            });
        }
        if self.launch_stagger < 0.0 || self.end_check_delay < 0.0 {
            return Err(ConfigError::Invalid {
                field: "timing",
                reason: "delays cannot be negative",
            });
        }
        Ok(())
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        -self.arena_height / 2.0
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.arena_height / 2.0
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.arena_width / 2.0
    }

    /// Where balls are launched from
    pub fn launcher_pos(&self) -> Vec2 {
        Vec2::new(0.0, self.max_y() - self.launcher_drop)
    }

    /// Vertical line new bouncers spawn on
    pub fn spawn_y(&self) -> f32 {
        self.min_y() - self.spawn_depth
    }

    /// Anything with y below this is culled
    pub fn cull_y(&self) -> f32 {
        self.min_y() - self.cull_margin
    }

    /// Lower edge of the top bar zone
    pub fn top_bar_bottom(&self) -> f32 {
        self.max_y() - self.top_bar_height
    }

    /// Gravity in points/s² for a given horizontal tilt
    pub fn gravity(&self, tilt_x: f32) -> Vec2 {
        Vec2::new(tilt_x * self.tilt_gravity, self.gravity_y) * self.pixels_per_meter
    }
}
