//! Deferred actions keyed by tick and run generation
//!
//! Dash reverts and death reports fire a fixed time after they are armed. They
//! sit in this queue until their tick comes up and are polled at the start of
//! each simulation tick. Every entry carries the run generation it was armed
//! in; entries from an earlier run are discarded when they come due, so a
//! restart can never be undone by a timer from the previous run.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

/// Something to do later
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Revert the active dash
    EndDash,
    /// Report the final score of a dead run
    ReportDeath,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
struct Entry {
    due_tick: u64,
    /// Insertion order, for stable ordering within a tick
    seq: u64,
    generation: u32,
    action: ScheduledAction,
}

/// Time-ordered queue of deferred actions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    queue: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `action` to fire at `due_tick` for run `generation`
    pub fn schedule(&mut self, due_tick: u64, generation: u32, action: ScheduledAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry {
            due_tick,
            seq,
            generation,
            action,
        }));
    }

    /// Pop every action due at or before `now`, in due order.
    ///
    /// Actions armed in any generation other than `generation` are dropped.
    pub fn poll(&mut self, now: u64, generation: u32) -> Vec<ScheduledAction> {
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.due_tick > now {
                break;
            }
            let Some(Reverse(entry)) = self.queue.pop() else {
                break;
            };
            if entry.generation == generation {
                due.push(entry.action);
            } else {
                log::debug!(
                    "Dropped stale {:?} from run {} (current run {})",
                    entry.action,
                    entry.generation,
                    generation
                );
            }
        }
        due
    }

    /// Whether `action` is pending for `generation`
    pub fn is_pending(&self, action: ScheduledAction, generation: u32) -> bool {
        self.queue
            .iter()
            .any(|Reverse(e)| e.action == action && e.generation == generation)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_returns_due_in_order() {
        let mut schedule = Schedule::new();
        schedule.schedule(10, 0, ScheduledAction::ReportDeath);
        schedule.schedule(5, 0, ScheduledAction::EndDash);

        assert!(schedule.poll(4, 0).is_empty());
        assert_eq!(schedule.poll(5, 0), vec![ScheduledAction::EndDash]);
        assert_eq!(schedule.poll(20, 0), vec![ScheduledAction::ReportDeath]);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_same_tick_keeps_insertion_order() {
        let mut schedule = Schedule::new();
        schedule.schedule(3, 0, ScheduledAction::ReportDeath);
        schedule.schedule(3, 0, ScheduledAction::EndDash);
        assert_eq!(
            schedule.poll(3, 0),
            vec![ScheduledAction::ReportDeath, ScheduledAction::EndDash]
        );
    }

    #[test]
    fn test_stale_generation_dropped() {
        let mut schedule = Schedule::new();
        schedule.schedule(5, 0, ScheduledAction::EndDash);
        schedule.schedule(6, 1, ScheduledAction::EndDash);
        assert!(schedule.is_pending(ScheduledAction::EndDash, 0));

        assert!(schedule.poll(5, 1).is_empty());
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.poll(6, 1), vec![ScheduledAction::EndDash]);
    }
}
