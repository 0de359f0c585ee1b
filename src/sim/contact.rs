//! Contact resolution and scoring
//!
//! Physics reports contact-begin pairs; this turns a ball/bouncer pair into
//! a hit, a point, a possible bonus ball and a bounce cue.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, RoundPhase};
use crate::audio::BounceCue;
use crate::consts::CUE_BANK_SIZE;
use crate::is_extra_ball_threshold;

/// What a contact participant is tagged as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ball,
    Bouncer,
    /// Walls and anything else that doesn't score
    Other,
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: u32,
}

impl EntityRef {
    pub fn ball(id: u32) -> Self {
        Self {
            kind: EntityKind::Ball,
            id,
        }
    }

    pub fn bouncer(id: u32) -> Self {
        Self {
            kind: EntityKind::Bouncer,
            id,
        }
    }

    pub fn other(id: u32) -> Self {
        Self {
            kind: EntityKind::Other,
            id,
        }
    }
}

/// Result of a scoring contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactOutcome {
    pub bouncer_id: u32,
    pub remaining: u32,
    pub destroyed: bool,
    /// Score after this hit
    pub score: u64,
    pub bonus_ball: bool,
    pub cue: BounceCue,
}

impl GameState {
    /// Resolve a contact-begin between two entities (order doesn't matter)
    ///
    /// Anything other than exactly one ball and one live bouncer is ignored,
    /// as is every contact after game over.
    pub fn on_contact(&mut self, a: EntityRef, b: EntityRef) -> Option<ContactOutcome> {
        if self.phase() == RoundPhase::GameOver {
            log::debug!("Ignoring contact {:?} / {:?} after game over", a, b);
            return None;
        }
        let bouncer = match (a.kind, b.kind) {
            (EntityKind::Ball, EntityKind::Bouncer) => b,
            (EntityKind::Bouncer, EntityKind::Ball) => a,
            _ => {
                log::debug!("Ignoring contact {:?} / {:?}", a, b);
                return None;
            }
        };
        let Some(index) = self.bouncers.iter().position(|x| x.id == bouncer.id) else {
            log::debug!("Ignoring contact with missing bouncer {}", bouncer.id);
            return None;
        };

        let pulse = self.config.pulse_duration;
        let hit = self.bouncers[index].hit(pulse);
        if hit.destroyed {
            self.bouncers.remove(index);
            self.emit(GameEvent::BouncerDestroyed { id: bouncer.id });
        } else {
            let tier = self.bouncers[index].tier();
            self.emit(GameEvent::BouncerHit {
                id: bouncer.id,
                remaining: hit.remaining,
                tier,
            });
        }

        self.score += 1;
        self.emit(GameEvent::ScoreChanged { score: self.score });

        let bonus_ball = is_extra_ball_threshold(self.score);
        if bonus_ball {
            self.bonus_ball();
        }

        self.score_from_current_ball = (self.score_from_current_ball + 1).min(CUE_BANK_SIZE);
        let cue = BounceCue::for_streak(self.score_from_current_ball);
        self.emit(GameEvent::Cue(cue));

        Some(ContactOutcome {
            bouncer_id: bouncer.id,
            remaining: hit.remaining,
            destroyed: hit.destroyed,
            score: self.score,
            bonus_ball,
            cue,
        })
    }
}
