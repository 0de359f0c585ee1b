//! Round generation
//!
//! Decides how many bouncers a new row gets, which lanes they occupy and how
//! many hits each one takes, all as a function of the cumulative score. The
//! random source is a parameter so tests can drive it deterministically.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{LANE_POSITIONS, TRIPLE_LANES};

/// One bouncer to spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BouncerSpawn {
    /// Index into [`LANE_POSITIONS`]
    pub lane: usize,
    pub hits: u32,
}

impl BouncerSpawn {
    /// Horizontal position of this spawn's lane
    pub fn x(&self) -> f32 {
        LANE_POSITIONS[self.lane]
    }
}

/// Generate the bouncers for a new row
pub fn generate_round<R: Rng + ?Sized>(score: u64, rng: &mut R) -> Vec<BouncerSpawn> {
    let count = bouncer_count(score, rng);
    pick_lanes(count, rng)
        .into_iter()
        .map(|lane| BouncerSpawn {
            lane,
            hits: hit_count(score, rng),
        })
        .collect()
}

/// How many bouncers the next row gets
pub fn bouncer_count<R: Rng + ?Sized>(score: u64, rng: &mut R) -> usize {
    if score < 5 {
        1
    } else if score < 200 {
        rng.random_range(1..=2)
    } else {
        rng.random_range(1..=3)
    }
}

/// Choose lanes for `count` bouncers
///
/// Pairs are always two or three lanes apart (wrapping), so they never sit
/// side by side. Three bouncers always take the outer and center lanes.
pub fn pick_lanes<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<usize> {
    let lanes = LANE_POSITIONS.len();
    match count {
        0 => Vec::new(),
        1 => vec![rng.random_range(0..lanes)],
        2 => {
            let first = rng.random_range(0..lanes);
            let second = (first + rng.random_range(2..=3)) % lanes;
            vec![first, second]
        }
        _ => TRIPLE_LANES.to_vec(),
    }
}

/// Inclusive range a single bouncer's hit count is drawn from
///
/// Past a score of 50 the range is `[score/30, score/25]`. Should the upper
/// bound ever fall below the lower one it is clamped to it, and the lower
/// bound never drops below one hit.
pub fn hit_range(score: u64) -> (u32, u32) {
    match score {
        0..=1 => (1, 1),
        3 => (2, 2),
        2..=4 => (2, 3),
        5..=9 => (2, 4),
        10..=49 => (3, 5),
        _ => {
            let lo = (score / 30).clamp(1, u32::MAX as u64) as u32;
            let hi = (score / 25).clamp(1, u32::MAX as u64) as u32;
            (lo, hi.max(lo))
        }
    }
}

/// Draw one bouncer's hit count
pub fn hit_count<R: Rng + ?Sized>(score: u64, rng: &mut R) -> u32 {
    let (lo, hi) = hit_range(score);
    if lo == hi { lo } else { rng.random_range(lo..=hi) }
}
