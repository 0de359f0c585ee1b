//! Bounce cues
//!
//! Each hit during one launch plays the next cue in a bank of 22 rising
//! sounds; past the end of the bank the last cue repeats. Actual playback is
//! the host's job, reached through [`CuePlayer`].

use serde::{Deserialize, Serialize};

use crate::consts::CUE_BANK_SIZE;
use crate::sim::GameEvent;

/// One entry of the bounce cue bank (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BounceCue(u8);

impl BounceCue {
    /// Cue at `index`, if it exists in the bank
    pub fn new(index: u8) -> Option<Self> {
        (1..=CUE_BANK_SIZE).contains(&index).then_some(Self(index))
    }

    /// Cue for the given per-ball hit streak, saturating at the bank size
    pub fn for_streak(streak: u8) -> Self {
        Self(streak.clamp(1, CUE_BANK_SIZE))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Asset name the host loads for this cue
    pub fn file_name(self) -> String {
        format!("{}.wav", self.0)
    }

    /// Every cue in the bank, lowest first
    pub fn all() -> impl Iterator<Item = BounceCue> {
        (1..=CUE_BANK_SIZE).map(BounceCue)
    }
}

/// Host-side sound playback
pub trait CuePlayer {
    fn play(&mut self, asset: &str, volume: f32);
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager<P: CuePlayer> {
    player: P,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<P: CuePlayer> AudioManager<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue; returns false if silenced
    pub fn play_cue(&mut self, cue: BounceCue) -> bool {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return false;
        }
        self.player.play(&cue.file_name(), vol);
        true
    }

    /// Play every cue in a batch of drained events; returns how many played
    pub fn handle_events(&mut self, events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Cue(cue) => Some(*cue),
                _ => None,
            })
            .filter(|cue| self.play_cue(*cue))
            .count()
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        played: Vec<(String, f32)>,
    }

    impl CuePlayer for Recorder {
        fn play(&mut self, asset: &str, volume: f32) {
            self.played.push((asset.to_string(), volume));
        }
    }

    #[test]
    fn test_bank_bounds() {
        assert!(BounceCue::new(0).is_none());
        assert_eq!(BounceCue::new(1).map(BounceCue::index), Some(1));
        assert_eq!(BounceCue::new(22).map(BounceCue::index), Some(22));
        assert!(BounceCue::new(23).is_none());
        assert_eq!(BounceCue::all().count(), 22);
    }

    #[test]
    fn test_streak_saturates() {
        assert_eq!(BounceCue::for_streak(5).index(), 5);
        assert_eq!(BounceCue::for_streak(40).index(), 22);
        assert_eq!(BounceCue::for_streak(40).file_name(), "22.wav");
    }

    #[test]
    fn test_handle_events_plays_cues_only() {
        let mut audio = AudioManager::new(Recorder::default());
        let events = [
            GameEvent::ScoreChanged { score: 1 },
            GameEvent::Cue(BounceCue::for_streak(1)),
            GameEvent::Cue(BounceCue::for_streak(2)),
        ];
        assert_eq!(audio.handle_events(&events), 2);
        let names: Vec<_> = audio.player().played.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["1.wav", "2.wav"]);
        assert!((audio.player().played[0].1 - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_muted(true);
        assert!(!audio.play_cue(BounceCue::for_streak(3)));
        audio.set_muted(false);
        audio.set_sfx_volume(0.0);
        assert!(!audio.play_cue(BounceCue::for_streak(3)));
        assert!(audio.player().played.is_empty());
    }
}
