//! Deterministic deferred actions.
//!
//! Every timed effect in the game (power-up expiry, ability cooldowns, level
//! transition pauses, boss entry) is a record in this queue instead of a
//! free-floating callback. Records are popped in due-time order against the
//! simulation clock; equal due times pop in insertion order. Clearing the queue
//! cancels everything that is still pending.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<A> {
    due_us: u64,
    seq: u64,
    action: A,
}

impl<A> PartialEq for Entry<A> {
    fn eq(&self, other: &Self) -> bool {
        self.due_us == other.due_us && self.seq == other.seq
    }
}

impl<A> Eq for Entry<A> {}

impl<A> Ord for Entry<A> {
    // Reversed so the max-heap yields the earliest record first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_us
            .cmp(&self.due_us)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<A> PartialOrd for Entry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
pub struct Scheduler<A> {
    heap: BinaryHeap<Entry<A>>,
    next_seq: u64,
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule_at(&mut self, due_us: u64, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            due_us,
            seq,
            action,
        });
    }

    pub fn schedule_after(&mut self, now_us: u64, delay_us: u64, action: A) {
        self.schedule_at(now_us.saturating_add(delay_us), action);
    }

    /// Remove and return the earliest record that is due at `now_us`.
    pub fn pop_due(&mut self, now_us: u64) -> Option<A> {
        if self.heap.peek()?.due_us > now_us {
            return None;
        }
        self.heap.pop().map(|entry| entry.action)
    }

    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|entry| entry.due_us)
    }

    pub fn clear(&mut self) {
        if !self.heap.is_empty() {
            log::debug!("Cancelling {} pending scheduled action(s)", self.heap.len());
        }
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}
