#![forbid(unsafe_code)]

//! Scroll-phase classification: native content scroll vs. sheet drag.
//!
//! Each move is classified from the live `scroll_top` of the sheet's content
//! container and the direction of the move:
//!
//! | `scroll_top` | delta  | session | phase  | intercept |
//! |--------------|--------|---------|--------|-----------|
//! | `> 0`        | any    | any     | Scroll | no        |
//! | `<= 0`       | any    | active  | Drag   | yes       |
//! | `<= 0`       | `> 0`  | none    | Overscroll (session anchored), then Drag | yes |
//! | `<= 0`       | `<= 0` | none    | Scroll | no        |
//!
//! Nothing is cached across moves except the previous y, so a gesture that
//! scrolls content up to the top and keeps pulling down moves through
//! `Scroll → Overscroll → Drag` inside one continuous touch.
//!
//! # Invariants
//!
//! 1. A move observed with `scroll_top > 0` is never `Drag` and never
//!    intercepted.
//! 2. `Drag` is entered only through `Overscroll`. The anchoring move's
//!    [`PhaseStep`] reports `Overscroll` with [`PhaseStep::anchor`] set to
//!    the gesture's initial sample; the coordinator is in `Drag` after it.
//! 3. The session anchor is the gesture's initial sample, not the move that
//!    triggered overscroll, so pixels spent on scroll detection still count
//!    toward the drag distance.
//!
//! Negative `scroll_top` (elastic overscroll on some platforms) counts as
//! "at top".

use crate::pointer::PointerSample;

/// Classification of an in-progress gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollPhase {
    /// Native scrolling of the content container.
    #[default]
    Scroll,
    /// Content is at its top and the finger keeps pulling down.
    ///
    /// Lasts exactly one move: only the [`PhaseStep`] of the move that
    /// anchors a session carries it, and the coordinator is in `Drag` after.
    Overscroll,
    /// The sheet itself is being dragged.
    Drag,
}

impl ScrollPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Overscroll => "overscroll",
            Self::Drag => "drag",
        }
    }
}

/// Result of classifying one move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseStep {
    pub phase: ScrollPhase,
    /// Whether the host must suppress the native event.
    pub intercept: bool,
    /// Set when this move crossed into overscroll: the sample a new drag
    /// session must be anchored at.
    pub anchor: Option<PointerSample>,
    /// `y - previous y`.
    pub delta_y: f64,
}

impl PhaseStep {
    const fn native(delta_y: f64) -> Self {
        Self {
            phase: ScrollPhase::Scroll,
            intercept: false,
            anchor: None,
            delta_y,
        }
    }
}

/// Per-gesture scroll/drag disambiguation.
#[derive(Debug, Clone, Default)]
pub struct ScrollPhaseCoordinator {
    initial: Option<PointerSample>,
    start_scroll_top: f64,
    last_y: f64,
    phase: ScrollPhase,
}

impl ScrollPhaseCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the gesture start.
    pub fn begin(&mut self, sample: PointerSample, scroll_top: f64) {
        self.initial = Some(sample);
        self.start_scroll_top = scroll_top;
        self.last_y = sample.y;
        self.phase = ScrollPhase::Scroll;
    }

    /// Classify one move. `session_active` is whether a drag session exists.
    pub fn classify(
        &mut self,
        sample: PointerSample,
        scroll_top: f64,
        session_active: bool,
    ) -> PhaseStep {
        let Some(initial) = self.initial else {
            return PhaseStep::native(0.0);
        };

        let delta_y = sample.y - self.last_y;
        self.last_y = sample.y;

        if scroll_top > 0.0 {
            self.phase = ScrollPhase::Scroll;
            return PhaseStep::native(delta_y);
        }

        if session_active {
            self.phase = ScrollPhase::Drag;
            return PhaseStep {
                phase: ScrollPhase::Drag,
                intercept: true,
                anchor: None,
                delta_y,
            };
        }

        if delta_y > 0.0 {
            // The qualifying move itself confirms the drag.
            self.phase = ScrollPhase::Drag;
            return PhaseStep {
                phase: ScrollPhase::Overscroll,
                intercept: true,
                anchor: Some(initial),
                delta_y,
            };
        }

        self.phase = ScrollPhase::Scroll;
        PhaseStep::native(delta_y)
    }

    /// Close the gesture.
    pub fn end(&mut self) {
        self.initial = None;
        self.phase = ScrollPhase::Scroll;
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Sample recorded by [`begin`](Self::begin), if a gesture is open.
    #[inline]
    #[must_use]
    pub fn initial(&self) -> Option<PointerSample> {
        self.initial
    }

    /// Content `scroll_top` at gesture start.
    #[inline]
    #[must_use]
    pub fn start_scroll_top(&self) -> f64 {
        self.start_scroll_top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(y: f64) -> PointerSample {
        PointerSample::new(y, 0.0)
    }

    #[test]
    fn scrolled_content_keeps_native_scroll() {
        let mut c = ScrollPhaseCoordinator::new();
        c.begin(s(100.0), 40.0);
        let step = c.classify(s(130.0), 40.0, false);
        assert_eq!(step.phase, ScrollPhase::Scroll);
        assert!(!step.intercept);
        assert!(step.anchor.is_none());
    }

    #[test]
    fn upward_at_top_is_native() {
        let mut c = ScrollPhaseCoordinator::new();
        c.begin(s(100.0), 0.0);
        let step = c.classify(s(90.0), 0.0, false);
        assert_eq!(step.phase, ScrollPhase::Scroll);
        assert!(!step.intercept);
    }

    #[test]
    fn downward_at_top_anchors_at_initial_sample() {
        let mut c = ScrollPhaseCoordinator::new();
        c.begin(PointerSample::new(100.0, 5.0), 0.0);
        let step = c.classify(PointerSample::new(104.0, 21.0), 0.0, false);
        assert_eq!(step.phase, ScrollPhase::Overscroll);
        assert!(step.intercept);
        assert_eq!(step.anchor, Some(PointerSample::new(100.0, 5.0)));
        assert_eq!(c.phase(), ScrollPhase::Drag);
    }

    #[test]
    fn active_session_persists_through_upward_moves() {
        let mut c = ScrollPhaseCoordinator::new();
        c.begin(s(100.0), 0.0);
        c.classify(s(150.0), 0.0, false);
        let step = c.classify(s(120.0), 0.0, true);
        assert_eq!(step.phase, ScrollPhase::Drag);
        assert!(step.intercept);
        assert!(step.anchor.is_none());
    }

    #[test]
    fn scroll_reverse_then_drag_in_one_gesture() {
        let mut c = ScrollPhaseCoordinator::new();
        c.begin(s(300.0), 60.0);
        // Finger moves down: content scrolls back toward the top.
        assert_eq!(c.classify(s(330.0), 30.0, false).phase, ScrollPhase::Scroll);
        assert_eq!(c.classify(s(360.0), 0.0, false).phase, ScrollPhase::Overscroll);
        assert_eq!(c.phase(), ScrollPhase::Drag);
        assert_eq!(c.classify(s(380.0), 0.0, true).phase, ScrollPhase::Drag);
    }

    #[test]
    fn positive_scroll_top_reverts_active_drag() {
        let mut c = ScrollPhaseCoordinator::new();
        c.begin(s(0.0), 0.0);
        c.classify(s(10.0), 0.0, false);
        let step = c.classify(s(20.0), 5.0, true);
        assert_eq!(step.phase, ScrollPhase::Scroll);
        assert!(!step.intercept);
    }

    #[test]
    fn elastic_negative_scroll_top_counts_as_top() {
        let mut c = ScrollPhaseCoordinator::new();
        c.begin(s(0.0), -12.0);
        assert_eq!(c.classify(s(8.0), -12.0, false).phase, ScrollPhase::Overscroll);
    }

    #[test]
    fn classify_without_gesture_is_native() {
        let mut c = ScrollPhaseCoordinator::new();
        let step = c.classify(s(50.0), 0.0, false);
        assert!(!step.intercept);
    }

    #[test]
    fn end_resets_phase() {
        let mut c = ScrollPhaseCoordinator::new();
        c.begin(s(0.0), 0.0);
        c.classify(s(10.0), 0.0, false);
        c.end();
        assert_eq!(c.phase(), ScrollPhase::Scroll);
        assert!(c.initial().is_none());
    }
}
