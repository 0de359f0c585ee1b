//! Bouncer targets
//!
//! A bouncer is a static circle with a remaining-hit counter. Its tier (and
//! therefore its color) is derived from that counter and escalates every
//! two hits.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ease_in_out;

/// Severity bucket derived from remaining hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tier(u8);

impl Tier {
    /// Highest tier (13+ remaining hits)
    pub const MAX: Tier = Tier(6);

    /// Bucket remaining hits in steps of two, overflow at 13+
    pub fn for_hits(remaining: u32) -> Self {
        match remaining {
            0..=2 => Tier(0),
            3..=4 => Tier(1),
            5..=6 => Tier(2),
            7..=8 => Tier(3),
            9..=10 => Tier(4),
            11..=12 => Tier(5),
            _ => Tier::MAX,
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Palette name hosts can map to a color
    pub fn color_name(self) -> &'static str {
        match self.0 {
            0 => "red",
            1 => "orange",
            2 => "yellow",
            3 => "green",
            4 => "cyan",
            5 => "blue",
            _ => "indigo",
        }
    }
}

/// Upward move in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rise {
    pub from_y: f32,
    pub to_y: f32,
    pub elapsed: f32,
    pub duration: f32,
}

impl Rise {
    fn y_at(&self, elapsed: f32) -> f32 {
        let t = if self.duration > 0.0 { elapsed / self.duration } else { 1.0 };
        self.from_y + (self.to_y - self.from_y) * ease_in_out(t)
    }
}

/// Outcome of a single hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitResult {
    pub remaining: u32,
    pub destroyed: bool,
}

/// A destructible target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bouncer {
    pub id: u32,
    /// Index into [`crate::consts::LANE_POSITIONS`]
    pub lane: usize,
    pub pos: Vec2,
    pub radius: f32,
    remaining: u32,
    tier: Tier,
    /// Active rise animation, if any
    pub rise: Option<Rise>,
    /// Hit pulse time remaining (seconds)
    #[serde(default)]
    pub pulse: f32,
    /// Fade-out time remaining; `None` until the game ends
    #[serde(default)]
    pub fade: Option<f32>,
}

impl Bouncer {
    pub fn new(id: u32, lane: usize, pos: Vec2, radius: f32, hits: u32) -> Self {
        let remaining = hits.max(1);
        Self {
            id,
            lane,
            pos,
            radius,
            remaining,
            tier: Tier::for_hits(remaining),
            rise: None,
            pulse: 0.0,
            fade: None,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn is_destroyed(&self) -> bool {
        self.remaining == 0
    }

    /// Take one hit. `pulse_duration` starts the cosmetic pulse on survival.
    pub fn hit(&mut self, pulse_duration: f32) -> HitResult {
        if self.remaining == 0 {
            return HitResult {
                remaining: 0,
                destroyed: true,
            };
        }
        self.remaining -= 1;
        self.tier = Tier::for_hits(self.remaining);
        let destroyed = self.remaining == 0;
        if !destroyed {
            self.pulse = pulse_duration;
        }
        HitResult {
            remaining: self.remaining,
            destroyed,
        }
    }

    /// Begin moving up by `distance` over `duration` seconds
    pub fn start_rise(&mut self, distance: f32, duration: f32) {
        // Chain from wherever an unfinished rise was heading
        let from_y = self.rise.map(|r| r.to_y).unwrap_or(self.pos.y);
        self.pos.y = from_y;
        self.rise = Some(Rise {
            from_y,
            to_y: from_y + distance,
            elapsed: 0.0,
            duration,
        });
    }

    /// Jump any in-flight rise to its end position
    pub fn finish_rise(&mut self) {
        if let Some(rise) = self.rise.take() {
            self.pos.y = rise.to_y;
        }
    }

    pub fn start_fade(&mut self, duration: f32) {
        if self.fade.is_none() {
            self.fade = Some(duration);
        }
    }

    /// Advance cosmetic animations
    pub fn animate(&mut self, dt: f32) {
        if let Some(rise) = &mut self.rise {
            rise.elapsed += dt;
            if rise.elapsed >= rise.duration {
                self.pos.y = rise.to_y;
                self.rise = None;
            } else {
                self.pos.y = rise.y_at(rise.elapsed);
            }
        }
        if self.pulse > 0.0 {
            self.pulse = (self.pulse - dt).max(0.0);
        }
        if let Some(fade) = &mut self.fade {
            *fade = (*fade - dt).max(0.0);
        }
    }

    /// Render scale: 1.0 at rest, peaking at 1.2 mid-pulse
    pub fn scale(&self, pulse_duration: f32) -> f32 {
        if self.pulse <= 0.0 || pulse_duration <= 0.0 {
            return 1.0;
        }
        let t = 1.0 - self.pulse / pulse_duration;
        1.0 + 0.2 * (1.0 - (2.0 * t - 1.0).abs())
    }

    /// Render alpha (fades out after game over)
    pub fn alpha(&self, fade_duration: f32) -> f32 {
        match self.fade {
            Some(left) if fade_duration > 0.0 => (left / fade_duration).clamp(0.0, 1.0),
            Some(_) => 0.0,
            None => 1.0,
        }
    }

    /// Axis-aligned overlap with a rectangle given by its min/max corners
    pub fn overlaps_rect(&self, min: Vec2, max: Vec2) -> bool {
        self.pos.x + self.radius > min.x
            && self.pos.x - self.radius < max.x
            && self.pos.y + self.radius > min.y
            && self.pos.y - self.radius < max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bouncer(hits: u32) -> Bouncer {
        Bouncer::new(1, 2, Vec2::ZERO, 32.0, hits)
    }

    #[test]
    fn test_tier_buckets() {
        let expected = [
            (1, 0),
            (2, 0),
            (3, 1),
            (4, 1),
            (5, 2),
            (6, 2),
            (7, 3),
            (8, 3),
            (9, 4),
            (10, 4),
            (11, 5),
            (12, 5),
            (13, 6),
            (40, 6),
        ];
        for (hits, tier) in expected {
            assert_eq!(Tier::for_hits(hits).index(), tier, "hits = {hits}");
        }
        assert_eq!(Tier::for_hits(13).color_name(), "indigo");
        assert_eq!(Tier::for_hits(1).color_name(), "red");
    }

    #[test]
    fn test_single_hit_destroys() {
        let mut b = bouncer(1);
        let result = b.hit(0.1);
        assert_eq!(
            result,
            HitResult {
                remaining: 0,
                destroyed: true
            }
        );
        assert_eq!(b.pulse, 0.0, "destroyed bouncers don't pulse");
    }

    #[test]
    fn test_hit_after_destroyed_is_noop() {
        let mut b = bouncer(1);
        b.hit(0.1);
        assert!(b.hit(0.1).destroyed);
        assert_eq!(b.remaining(), 0);
    }

    #[test]
    fn test_surviving_hit_pulses() {
        let mut b = bouncer(3);
        assert_eq!(b.tier().index(), 1);
        let result = b.hit(0.1);
        assert!(!result.destroyed);
        assert_eq!(b.tier().index(), 0);
        assert!(b.pulse > 0.0);
        b.animate(0.05);
        assert!((b.scale(0.1) - 1.2).abs() < 1e-4);
        b.animate(0.05);
        assert_eq!(b.scale(0.1), 1.0);
    }

    #[test]
    fn test_rise_eases_to_target() {
        let mut b = bouncer(2);
        b.pos.y = -450.0;
        b.start_rise(100.0, 0.5);
        b.animate(0.25);
        assert!((b.pos.y - (-400.0)).abs() < 1e-3);
        b.animate(0.3);
        assert_eq!(b.pos.y, -350.0);
        assert!(b.rise.is_none());
    }

    #[test]
    fn test_overlapping_rises_chain() {
        let mut b = bouncer(2);
        b.start_rise(100.0, 0.5);
        b.animate(0.1);
        b.start_rise(100.0, 0.5);
        b.finish_rise();
        assert_eq!(b.pos.y, 200.0);
    }

    #[test]
    fn test_fade() {
        let mut b = bouncer(2);
        assert_eq!(b.alpha(0.5), 1.0);
        b.start_fade(0.5);
        b.animate(0.25);
        assert!((b.alpha(0.5) - 0.5).abs() < 1e-5);
        b.start_fade(0.5);
        assert!((b.alpha(0.5) - 0.5).abs() < 1e-5, "fade is not restarted");
    }

    proptest! {
        #[test]
        fn destroyed_after_exactly_k_hits(k in 1u32..60) {
            let mut b = bouncer(k);
            for i in 1..k {
                let r = b.hit(0.1);
                prop_assert!(!r.destroyed, "destroyed early at hit {}", i);
                prop_assert_eq!(r.remaining, k - i);
            }
            prop_assert!(b.hit(0.1).destroyed);
        }

        #[test]
        fn tier_never_increases_while_hit(k in 1u32..60) {
            let mut b = bouncer(k);
            let mut last = b.tier();
            while !b.is_destroyed() {
                b.hit(0.1);
                prop_assert!(b.tier() <= last);
                prop_assert_eq!(b.tier(), Tier::for_hits(b.remaining()));
                last = b.tier();
            }
        }
    }
}
