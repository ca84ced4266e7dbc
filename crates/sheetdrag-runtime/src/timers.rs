#![forbid(unsafe_code)]

//! Deterministic deadlines for lifecycle completions.
//!
//! The controller never sleeps. It registers a deadline per pending
//! [`Transition`] and the host drives time forward with
//! [`TimerQueue::pop_due`]. Each deadline stands in for a completion event
//! the host may also report directly; whichever arrives first advances the
//! lifecycle and the other is ignored as stale.
//!
//! [`FrameRequest`] is the matching single-slot stand-in for
//! `requestAnimationFrame`: at most one frame is outstanding at a time.
//!
//! # Invariants
//!
//! 1. Deadlines pop in ascending `at_ms`; ties pop in scheduling order.
//! 2. After [`clear`](TimerQueue::clear) nothing pops until a new schedule.
//! 3. [`FrameRequest::request`] returns `true` only when no frame is pending.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use sheetdrag_core::animation::Transition;

/// One pending completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadline {
    pub at_ms: f64,
    pub transition: Transition,
    seq: u64,
}

impl Eq for Deadline {}

impl PartialOrd for Deadline {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Deadline {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest deadline on top of the max-heap.
        other
            .at_ms
            .partial_cmp(&self.at_ms)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-ordered queue of lifecycle deadlines.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Deadline>,
    next_seq: u64,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `transition` once the clock reaches `at_ms`.
    pub fn schedule(&mut self, at_ms: f64, transition: Transition) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Deadline {
            at_ms,
            transition,
            seq,
        });
    }

    /// Pop the earliest deadline if it is due at `now_ms`.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<Transition> {
        if self.heap.peek()?.at_ms > now_ms {
            return None;
        }
        self.heap.pop().map(|d| d.transition)
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.heap.peek().map(|d| d.at_ms)
    }

    /// Drop every pending deadline.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Single outstanding animation-frame request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameRequest {
    pending: bool,
}

impl FrameRequest {
    /// Ask for a frame. Returns `true` if the host must schedule one.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Consume the request when the frame fires. Returns whether one was pending.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Forget the request; a frame that still fires finds nothing to do.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(500.0, Transition::Exit);
        q.schedule(10.0, Transition::Enter);
        assert_eq!(q.next_deadline(), Some(10.0));
        assert_eq!(q.pop_due(1_000.0), Some(Transition::Enter));
        assert_eq!(q.pop_due(1_000.0), Some(Transition::Exit));
        assert_eq!(q.pop_due(1_000.0), None);
    }

    #[test]
    fn nothing_pops_early() {
        let mut q = TimerQueue::new();
        q.schedule(500.0, Transition::Exit);
        assert_eq!(q.pop_due(499.9), None);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(500.0), Some(Transition::Exit));
    }

    #[test]
    fn ties_keep_scheduling_order() {
        let mut q = TimerQueue::new();
        q.schedule(10.0, Transition::Exit);
        q.schedule(10.0, Transition::Enter);
        assert_eq!(q.pop_due(10.0), Some(Transition::Exit));
        assert_eq!(q.pop_due(10.0), Some(Transition::Enter));
    }

    #[test]
    fn clear_drops_everything() {
        let mut q = TimerQueue::new();
        q.schedule(1.0, Transition::Enter);
        q.schedule(2.0, Transition::Exit);
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.pop_due(f64::MAX), None);
    }

    #[test]
    fn frame_request_single_slot() {
        let mut f = FrameRequest::default();
        assert!(f.request());
        assert!(!f.request());
        assert!(f.take());
        assert!(!f.take());
        assert!(f.request());
        f.cancel();
        assert!(!f.is_pending());
    }
}
