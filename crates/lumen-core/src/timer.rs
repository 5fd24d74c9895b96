//! Time-ordered task queue for deferred and periodic work.
//!
//! The engine keeps every pending task (ripple expiry, counter ticks) in one
//! [`TimerQueue`] and sweeps it from [`advance`]. This replaces independent
//! per-item timers: cancellation is a map removal, and [`cancel_all`] drops
//! every pending task as a group on teardown.
//!
//! # Ordering
//!
//! - A task with an earlier due time always fires first.
//! - Tasks with equal due times fire in scheduling order (FIFO).
//! - A periodic task is re-armed from its previous due time, not from the
//!   time it was popped, so a late sweep catches up without drift.
//!
//! Cancelled tasks leave stale heap entries behind; they are skipped lazily
//! when they reach the top.
//!
//! [`advance`]: crate::engine::EffectsEngine::advance
//! [`cancel_all`]: TimerQueue::cancel_all

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::time::Duration;

use crate::clock::Timestamp;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl core::fmt::Display for TimerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// A task popped from the queue because its due time was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    /// Handle of the task; still valid for periodic tasks.
    pub id: TimerId,
    /// The time the task was due (not the time of the sweep).
    pub due: Timestamp,
    /// The task payload.
    pub task: T,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    due: Timestamp,
    every: Option<Duration>,
    task: T,
}

/// Min-heap of pending tasks keyed by due time.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    /// `(due, sequence, id)`; the sequence number breaks ties FIFO.
    heap: BinaryHeap<Reverse<(Timestamp, u64, TimerId)>>,
    /// Live tasks. Anything in the heap but not here was cancelled.
    live: BTreeMap<TimerId, Entry<T>>,
    next_id: u64,
    next_seq: u64,
}

impl<T: Clone> TimerQueue<T> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: BTreeMap::new(),
            next_id: 0,
            next_seq: 0,
        }
    }

    /// Schedule `task` to fire once at `now + delay`.
    pub fn schedule_once(&mut self, now: Timestamp, delay: Duration, task: T) -> TimerId {
        self.insert(now.saturating_add(delay), None, task)
    }

    /// Schedule `task` to fire every `interval`, first at `now + interval`,
    /// until cancelled.
    ///
    /// A zero interval is treated as one nanosecond so a sweep always
    /// terminates.
    pub fn schedule_every(&mut self, now: Timestamp, interval: Duration, task: T) -> TimerId {
        let interval = interval.max(Duration::from_nanos(1));
        self.insert(now.saturating_add(interval), Some(interval), task)
    }

    /// Cancel a pending task. Returns `true` if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id).is_some()
    }

    /// Cancel every pending task. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.live.len();
        self.live.clear();
        self.heap.clear();
        dropped
    }

    /// Whether `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.live.contains_key(&id)
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no task is pending.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&mut self) -> Option<Timestamp> {
        self.discard_stale();
        self.heap.peek().map(|Reverse((due, _, _))| *due)
    }

    /// Pop the earliest task due at or before `now`.
    ///
    /// Periodic tasks are re-armed before being returned, so the caller may
    /// cancel them from inside its dispatch.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<Fired<T>> {
        self.discard_stale();
        let Reverse((due, _, id)) = *self.heap.peek()?;
        if due > now {
            return None;
        }
        self.heap.pop();

        let entry = self.live.get(&id)?;
        let task = entry.task.clone();
        match entry.every {
            Some(interval) => {
                let next_due = due.saturating_add(interval);
                if let Some(entry) = self.live.get_mut(&id) {
                    entry.due = next_due;
                }
                let seq = self.bump_seq();
                self.heap.push(Reverse((next_due, seq, id)));
            }
            None => {
                self.live.remove(&id);
            }
        }

        Some(Fired { id, due, task })
    }

    fn insert(&mut self, due: Timestamp, every: Option<Duration>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let seq = self.bump_seq();
        self.live.insert(id, Entry { due, every, task });
        self.heap.push(Reverse((due, seq, id)));
        id
    }

    const fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        seq
    }

    /// Drop heap entries whose task was cancelled or re-armed elsewhere.
    fn discard_stale(&mut self) {
        while let Some(Reverse((due, _, id))) = self.heap.peek() {
            match self.live.get(id) {
                Some(entry) if entry.due == *due => break,
                _ => {
                    self.heap.pop();
                }
            }
        }
    }
}

impl<T: Clone> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
