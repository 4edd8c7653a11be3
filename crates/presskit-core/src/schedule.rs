//! Deadline bookkeeping: generation tokens and the pending-deadline queue.
//!
//! Deadlines are never revoked. Each carries whatever it needs to decide, at
//! fire time, whether it is still relevant (a [`Token`] compared against the
//! session's current generation, plus for stuck checks the sample position
//! it was scheduled against). Ending a gesture makes the outstanding entries
//! stale.

use crate::geometry::Point;
use crate::time::Timestamp;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Opaque generation marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Token(u64);

impl Token {
    /// The token following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// What a deadline does when it fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeadlineKind {
    /// Long press check for the gesture stamped with this token.
    LongPress(Token),
    /// Start auto-repeat for the gesture stamped with this token.
    RepeatStart(Token),
    /// Stuck-gesture check for the gesture stamped with `token`, comparing
    /// against the last sample position `seen` when it was scheduled.
    StuckCheck {
        /// Gesture generation
        token: Token,
        /// Last sample position at scheduling time
        seen: Option<Point>,
    },
}

/// A scheduled "fire no earlier than `at`" entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadline {
    /// Earliest time the deadline may fire.
    pub at: Timestamp,
    /// Effect to evaluate on fire.
    pub kind: DeadlineKind,
}

#[derive(Debug)]
struct Queued {
    deadline: Deadline,
    seq: u64,
}

impl Queued {
    const fn key(&self) -> (Timestamp, u64) {
        (self.deadline.at, self.seq)
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    // Reversed so the max-heap yields the earliest deadline first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Pending deadlines ordered by due time, ties broken by scheduling order.
#[derive(Debug, Default)]
pub struct DeadlineQueue {
    heap: BinaryHeap<Queued>,
    next_seq: u64,
}

impl DeadlineQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire no earlier than `at`.
    pub fn schedule(&mut self, at: Timestamp, kind: DeadlineKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Queued {
            deadline: Deadline { at, kind },
            seq,
        });
    }

    /// Remove and return the earliest deadline due at or before `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<Deadline> {
        if self.heap.peek()?.deadline.at > now {
            return None;
        }
        self.heap.pop().map(|queued| queued.deadline)
    }

    /// Due time of the earliest pending deadline, stale or not.
    #[must_use]
    pub fn next_due(&self) -> Option<Timestamp> {
        self.heap.peek().map(|queued| queued.deadline.at)
    }

    /// Number of pending deadlines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if no deadlines are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
