//! Deferred actions
//!
//! Timed sequences (staggered launches, the end-of-advance check) are queued
//! here instead of running as free-floating callbacks. Every entry carries
//! the round generation it was scheduled in; once the game moves to a new
//! generation, older entries are dropped without running.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Something the round state machine wants done later
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Launch another ball toward the given point
    LaunchBall { target: Vec2 },
    /// Finish an advance: game over or back to waiting
    CheckForEnd,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    due: f64,
    generation: u64,
    seq: u64,
    action: DeferredAction,
}

/// Queue of deferred actions keyed by round generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to run at time `due` within `generation`
    pub fn schedule(&mut self, due: f64, generation: u64, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            due,
            generation,
            seq,
            action,
        });
    }

    /// Remove and return every action due at `now` for `generation`, in
    /// (due, scheduling) order. Due entries from other generations are
    /// discarded.
    pub fn drain_due(&mut self, now: f64, generation: u64) -> Vec<DeferredAction> {
        let mut due = Vec::new();
        self.entries.retain(|entry| {
            if entry.due > now {
                return true;
            }
            if entry.generation == generation {
                due.push(entry.clone());
            } else {
                log::debug!(
                    "Dropping stale {:?} from generation {} (now {})",
                    entry.action,
                    entry.generation,
                    generation
                );
            }
            false
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|entry| entry.action).collect()
    }

    /// Drop everything not scheduled in `generation`
    pub fn cancel_stale(&mut self, generation: u64) {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.generation == generation);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            log::debug!("Cancelled {} stale deferred action(s)", dropped);
        }
    }

    /// Launches still queued for `generation`
    pub fn pending_launches(&self, generation: u64) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                e.generation == generation && matches!(e.action, DeferredAction::LaunchBall { .. })
            })
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch(x: f32) -> DeferredAction {
        DeferredAction::LaunchBall {
            target: Vec2::new(x, 0.0),
        }
    }

    #[test]
    fn test_drain_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(0.5, 1, launch(2.0));
        s.schedule(0.25, 1, launch(1.0));
        s.schedule(0.5, 1, DeferredAction::CheckForEnd);
        s.schedule(0.75, 1, launch(3.0));

        assert!(s.drain_due(0.1, 1).is_empty());
        let due = s.drain_due(0.5, 1);
        assert_eq!(due, vec![launch(1.0), launch(2.0), DeferredAction::CheckForEnd]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.pending_launches(1), 1);
    }

    #[test]
    fn test_stale_generation_never_fires() {
        let mut s = Scheduler::new();
        s.schedule(0.25, 1, launch(0.0));
        s.schedule(0.5, 1, DeferredAction::CheckForEnd);
        s.schedule(0.5, 2, DeferredAction::CheckForEnd);

        let due = s.drain_due(1.0, 2);
        assert_eq!(due, vec![DeferredAction::CheckForEnd]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_cancel_stale() {
        let mut s = Scheduler::new();
        s.schedule(5.0, 1, launch(0.0));
        s.schedule(5.0, 2, launch(0.0));
        s.cancel_stale(2);
        assert_eq!(s.pending_launches(1), 0);
        assert_eq!(s.pending_launches(2), 1);
    }
}
