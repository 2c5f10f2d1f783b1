//! Deferred work keyed by deadline.
//!
//! Effects expire on a virtual clock supplied by the caller. Nothing here
//! reads the wall clock, so expiry order can be tested by stepping time.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// Source of the current virtual time.
pub trait Clock {
    /// Time elapsed since the clock started.
    fn now(&self) -> Duration;
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Moves time forward by fractional seconds.
    pub fn advance_secs(&mut self, secs: f32) {
        self.advance(Duration::from_secs_f32(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }
}

#[derive(Debug)]
struct Entry<T> {
    deadline: Duration,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Min-heap of items waiting for a deadline.
///
/// Items sharing a deadline come out in the order they were scheduled.
#[derive(Debug)]
pub struct ExpiryQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    next_seq: u64,
}

impl<T> Default for ExpiryQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> ExpiryQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `item` to come due at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            deadline,
            seq,
            item,
        }));
    }

    /// Removes and returns every item whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Vec<T> {
        let mut due = Vec::new();
        while self
            .heap
            .peek()
            .is_some_and(|Reverse(entry)| entry.deadline <= now)
        {
            if let Some(Reverse(entry)) = self.heap.pop() {
                due.push(entry.item);
            }
        }
        due
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse(entry)| entry.deadline)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every pending item.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
