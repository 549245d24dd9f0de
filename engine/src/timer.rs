use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::timer_log;

/// Handle returned by `TimerQueue::schedule`, used to cancel a pending entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

struct Deadline<T> {
    at: OrderedFloat<f64>,
    seq: u64,
    tag: T,
}

impl<T> PartialEq for Deadline<T> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl<T> Eq for Deadline<T> {}

impl<T> PartialOrd for Deadline<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Deadline<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Equal deadlines fire in scheduling order
        self.at.cmp(&other.at).then(self.seq.cmp(&other.seq))
    }
}

/// One-shot delayed callbacks as a deadline queue.
///
/// Each entry carries a continuation tag `T`; the owner advances the clock
/// once per frame and drains the tags that came due. Nothing fires on its
/// own, so dropping or `cancel_all`-ing the queue guarantees no continuation
/// runs after the owner is gone.
pub struct TimerQueue<T> {
    // f64 so long sessions keep sub-frame resolution
    now: f64,
    next_seq: u64,
    pending: BinaryHeap<Reverse<Deadline<T>>>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            pending: BinaryHeap::new(),
        }
    }

    /// Seconds elapsed since the queue was created
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `tag` to come due `delay` seconds from now. Negative delays
    /// are treated as zero.
    pub fn schedule(&mut self, delay: f32, tag: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;

        let at = self.now + f64::from(delay.max(0.0));
        self.pending.push(Reverse(Deadline {
            at: OrderedFloat(at),
            seq,
            tag,
        }));

        timer_log!(TRACE, "scheduled timer {} at {:.3}s", seq, at);
        TimerHandle(seq)
    }

    /// Remove a pending entry. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|Reverse(d)| d.seq != handle.0);
        before != self.pending.len()
    }

    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            timer_log!(DEBUG, "cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|Reverse(d)| d.seq == handle.0)
    }

    /// Seconds until `handle` comes due, or None if it is not pending
    pub fn time_remaining(&self, handle: TimerHandle) -> Option<f32> {
        self.pending
            .iter()
            .find(|Reverse(d)| d.seq == handle.0)
            .map(|Reverse(d)| (d.at.0 - self.now).max(0.0) as f32)
    }

    /// Move the clock forward. Call `pop_due` afterwards to collect what fired.
    pub fn advance(&mut self, delta_time: f32) {
        self.now += f64::from(delta_time.max(0.0));
    }

    /// Next due tag in deadline order. Entries scheduled while draining with a
    /// zero delay come due in the same drain.
    pub fn pop_due(&mut self) -> Option<T> {
        let is_due = matches!(self.pending.peek(), Some(Reverse(d)) if d.at.0 <= self.now);
        if !is_due {
            return None;
        }
        self.pending.pop().map(|Reverse(d)| d.tag)
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
