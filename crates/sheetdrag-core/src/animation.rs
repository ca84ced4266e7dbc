#![forbid(unsafe_code)]

//! Sheet lifecycle state machine and derived frame styling.
//!
//! ```text
//!  Entering ──Enter──▶ Visible ◀──restore── Dragging
//!     │                  │  └──begin_drag──▶   │
//!     └────begin_exit────┴────────┬────────────┘
//!                                 ▼
//!                              Exiting ──Exit──▶ Closed
//! ```
//!
//! Transitions out of `Entering` and `Exiting` are driven by completion
//! events ([`Transition`]), never by the coordinator keeping time. The caller
//! reports completion when the host says the transition finished, or when its
//! own deadline for [`TimingConfig`] elapses, whichever comes first.
//!
//! # Invariants
//!
//! 1. `Closed` is terminal. A reopened sheet gets a new coordinator.
//! 2. [`begin_exit`](AnimationCoordinator::begin_exit) succeeds at most once
//!    per lifecycle.
//! 3. While `Dragging`, frames carry [`TransitionHint::None`] so the host
//!    tracks the finger without easing.
//! 4. A completion event that does not match the current phase is ignored.

use bitflags::bitflags;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Visible lifecycle of one sheet instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    /// Mounted off-screen; waiting for the first frame to commit.
    Entering,
    /// Resting at offset 0.
    Visible,
    /// Following an active drag session.
    Dragging,
    /// Sliding off-screen.
    Exiting,
    /// Gone. Terminal.
    Closed,
}

impl AnimationPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entering => "entering",
            Self::Visible => "visible",
            Self::Dragging => "dragging",
            Self::Exiting => "exiting",
            Self::Closed => "closed",
        }
    }
}

/// Completion events that advance the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// The off-screen mount frame is committed; slide in.
    Enter,
    /// The slide-out finished.
    Exit,
}

/// Lifecycle timings. Shared by every sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingConfig {
    /// Delay between mount and the slide-in (default: 10ms).
    pub enter_delay_ms: f64,
    /// Duration of the slide-in and slide-out (default: 500ms).
    pub slide_duration_ms: f64,
    /// Duration of the eased spring-back after a release (default: 300ms).
    pub restore_duration_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            enter_delay_ms: 10.0,
            slide_duration_ms: 500.0,
            restore_duration_ms: 300.0,
        }
    }
}

impl TimingConfig {
    /// Validate parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, value) in [
            ("timing.enter_delay_ms", self.enter_delay_ms),
            ("timing.slide_duration_ms", self.slide_duration_ms),
            ("timing.restore_duration_ms", self.restore_duration_ms),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                errors.push(format!("{name} must be a finite value >= 0, got {value}"));
            }
        }
        errors
    }
}

/// Vertical placement of the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetTransform {
    /// Translated 100% of its own height, below the screen edge.
    OffScreen,
    /// Translated down by this many pixels from the resting position.
    Offset(f64),
}

/// How the host should animate toward the frame's values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionHint {
    /// Apply immediately (direct manipulation).
    None,
    /// Ease over the given duration.
    Eased { duration_ms: f64 },
}

bitflags! {
    /// Which [`SheetFrame`] fields changed since the previous frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FrameChanges: u8 {
        const TRANSFORM  = 0b0000_0001;
        const BACKDROP   = 0b0000_0010;
        const MASK       = 0b0000_0100;
        const DRAGGING   = 0b0000_1000;
        const TRANSITION = 0b0001_0000;
    }
}

/// Per-frame output for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetFrame {
    pub transform: SheetTransform,
    pub backdrop_opacity: f64,
    pub mask_opacity: f64,
    /// True during direct manipulation; hosts disable CSS transitions.
    pub dragging: bool,
    pub transition: TransitionHint,
}

impl SheetFrame {
    /// Frame of a sheet that is not mounted.
    pub const HIDDEN: SheetFrame = SheetFrame {
        transform: SheetTransform::OffScreen,
        backdrop_opacity: 0.0,
        mask_opacity: 0.0,
        dragging: false,
        transition: TransitionHint::None,
    };

    /// Fields that differ between `self` and `previous`.
    #[must_use]
    pub fn changes_since(&self, previous: &SheetFrame) -> FrameChanges {
        let mut changes = FrameChanges::empty();
        if self.transform != previous.transform {
            changes |= FrameChanges::TRANSFORM;
        }
        if self.backdrop_opacity != previous.backdrop_opacity {
            changes |= FrameChanges::BACKDROP;
        }
        if self.mask_opacity != previous.mask_opacity {
            changes |= FrameChanges::MASK;
        }
        if self.dragging != previous.dragging {
            changes |= FrameChanges::DRAGGING;
        }
        if self.transition != previous.transition {
            changes |= FrameChanges::TRANSITION;
        }
        changes
    }
}

// ---------------------------------------------------------------------------
// AnimationCoordinator
// ---------------------------------------------------------------------------

/// Owns the lifecycle phase and derives frame styling from it.
#[derive(Debug, Clone)]
pub struct AnimationCoordinator {
    phase: AnimationPhase,
    timing: TimingConfig,
    screen_height: f64,
    visual_offset: f64,
    mask_opacity: f64,
    restoring: bool,
    last_frame: Option<SheetFrame>,
}

impl AnimationCoordinator {
    /// A freshly mounted sheet in `Entering`.
    #[must_use]
    pub fn new(timing: TimingConfig, screen_height: f64) -> Self {
        Self {
            phase: AnimationPhase::Entering,
            timing,
            screen_height,
            visual_offset: 0.0,
            mask_opacity: 0.0,
            restoring: false,
            last_frame: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    #[inline]
    #[must_use]
    pub fn visual_offset(&self) -> f64 {
        self.visual_offset
    }

    /// Deliver a completion event. Returns whether the phase changed.
    pub fn transition_complete(&mut self, transition: Transition) -> bool {
        match (transition, self.phase) {
            (Transition::Enter, AnimationPhase::Entering) => {
                self.phase = AnimationPhase::Visible;
                true
            }
            (Transition::Exit, AnimationPhase::Exiting) => {
                self.phase = AnimationPhase::Closed;
                true
            }
            _ => false,
        }
    }

    /// `Visible → Dragging`. Returns whether the phase changed.
    pub fn begin_drag(&mut self) -> bool {
        if self.phase != AnimationPhase::Visible {
            return false;
        }
        self.phase = AnimationPhase::Dragging;
        self.restoring = false;
        true
    }

    /// Follow the finger. Ignored outside `Dragging`.
    pub fn drag_to(&mut self, visual_offset: f64) {
        if self.phase == AnimationPhase::Dragging {
            self.visual_offset = visual_offset.max(0.0);
        }
    }

    /// `Dragging → Visible` with an eased return to offset 0.
    pub fn restore(&mut self) -> bool {
        if self.phase != AnimationPhase::Dragging {
            return false;
        }
        self.phase = AnimationPhase::Visible;
        self.visual_offset = 0.0;
        self.restoring = true;
        true
    }

    /// `Entering | Visible | Dragging → Exiting`. Returns `false` when the
    /// sheet is already exiting or closed, making repeated closes no-ops.
    pub fn begin_exit(&mut self) -> bool {
        match self.phase {
            AnimationPhase::Entering | AnimationPhase::Visible | AnimationPhase::Dragging => {
                self.phase = AnimationPhase::Exiting;
                self.restoring = false;
                true
            }
            AnimationPhase::Exiting | AnimationPhase::Closed => false,
        }
    }

    /// Update the scroll-fade mask value carried by frames.
    pub fn set_mask_opacity(&mut self, opacity: f64) {
        self.mask_opacity = opacity.clamp(0.0, 1.0);
    }

    /// Update the viewport height used by the backdrop fade.
    pub fn set_screen_height(&mut self, screen_height: f64) {
        self.screen_height = screen_height;
    }

    /// Frame for the current state.
    #[must_use]
    pub fn frame(&self) -> SheetFrame {
        let slide = TransitionHint::Eased {
            duration_ms: self.timing.slide_duration_ms,
        };
        match self.phase {
            AnimationPhase::Entering | AnimationPhase::Exiting => SheetFrame {
                transform: SheetTransform::OffScreen,
                backdrop_opacity: 0.0,
                mask_opacity: self.mask_opacity,
                dragging: false,
                transition: slide,
            },
            AnimationPhase::Visible => SheetFrame {
                transform: SheetTransform::Offset(0.0),
                backdrop_opacity: 1.0,
                mask_opacity: self.mask_opacity,
                dragging: false,
                transition: if self.restoring {
                    TransitionHint::Eased {
                        duration_ms: self.timing.restore_duration_ms,
                    }
                } else {
                    slide
                },
            },
            AnimationPhase::Dragging => SheetFrame {
                transform: SheetTransform::Offset(self.visual_offset),
                backdrop_opacity: self.drag_backdrop_opacity(),
                mask_opacity: self.mask_opacity,
                dragging: true,
                transition: TransitionHint::None,
            },
            AnimationPhase::Closed => SheetFrame {
                transform: SheetTransform::OffScreen,
                backdrop_opacity: 0.0,
                mask_opacity: self.mask_opacity,
                dragging: false,
                transition: TransitionHint::None,
            },
        }
    }

    /// Current frame plus what changed since the last call.
    ///
    /// The first call reports every field as changed.
    pub fn take_frame(&mut self) -> (SheetFrame, FrameChanges) {
        let frame = self.frame();
        let changes = match &self.last_frame {
            Some(previous) => frame.changes_since(previous),
            None => FrameChanges::all(),
        };
        self.last_frame = Some(frame);
        (frame, changes)
    }

    fn drag_backdrop_opacity(&self) -> f64 {
        if self.screen_height <= 0.0 {
            return 1.0;
        }
        1.0 - (self.visual_offset / self.screen_height).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible() -> AnimationCoordinator {
        let mut a = AnimationCoordinator::new(TimingConfig::default(), 800.0);
        assert!(a.transition_complete(Transition::Enter));
        a
    }

    #[test]
    fn mounts_off_screen() {
        let a = AnimationCoordinator::new(TimingConfig::default(), 800.0);
        let f = a.frame();
        assert_eq!(a.phase(), AnimationPhase::Entering);
        assert_eq!(f.transform, SheetTransform::OffScreen);
        assert_eq!(f.backdrop_opacity, 0.0);
    }

    #[test]
    fn enter_completion_shows_sheet() {
        let a = visible();
        let f = a.frame();
        assert_eq!(f.transform, SheetTransform::Offset(0.0));
        assert_eq!(f.backdrop_opacity, 1.0);
        assert_eq!(f.transition, TransitionHint::Eased { duration_ms: 500.0 });
    }

    #[test]
    fn dragging_frames_are_direct() {
        let mut a = visible();
        assert!(a.begin_drag());
        a.drag_to(200.0);
        let f = a.frame();
        assert!(f.dragging);
        assert_eq!(f.transition, TransitionHint::None);
        assert_eq!(f.transform, SheetTransform::Offset(200.0));
        assert!((f.backdrop_opacity - 0.75).abs() < 1e-12);
    }

    #[test]
    fn restore_eases_back_to_zero() {
        let mut a = visible();
        a.begin_drag();
        a.drag_to(60.0);
        assert!(a.restore());
        let f = a.frame();
        assert_eq!(a.phase(), AnimationPhase::Visible);
        assert_eq!(f.transform, SheetTransform::Offset(0.0));
        assert_eq!(f.transition, TransitionHint::Eased { duration_ms: 300.0 });
    }

    #[test]
    fn exit_is_idempotent() {
        let mut a = visible();
        assert!(a.begin_exit());
        assert!(!a.begin_exit());
        assert!(a.transition_complete(Transition::Exit));
        assert!(!a.begin_exit());
        assert_eq!(a.phase(), AnimationPhase::Closed);
    }

    #[test]
    fn mismatched_completion_ignored() {
        let mut a = visible();
        assert!(!a.transition_complete(Transition::Exit));
        assert!(!a.transition_complete(Transition::Enter));
        assert_eq!(a.phase(), AnimationPhase::Visible);
    }

    #[test]
    fn drag_requires_visible() {
        let mut a = AnimationCoordinator::new(TimingConfig::default(), 800.0);
        assert!(!a.begin_drag());
        a.drag_to(50.0);
        assert_eq!(a.visual_offset(), 0.0);
    }

    #[test]
    fn take_frame_reports_changes() {
        let mut a = visible();
        let (_, first) = a.take_frame();
        assert_eq!(first, FrameChanges::all());

        let (_, none) = a.take_frame();
        assert!(none.is_empty());

        a.set_mask_opacity(0.5);
        let (_, mask) = a.take_frame();
        assert_eq!(mask, FrameChanges::MASK);

        a.begin_drag();
        a.drag_to(10.0);
        let (_, drag) = a.take_frame();
        assert!(drag.contains(FrameChanges::TRANSFORM | FrameChanges::DRAGGING));
    }

    #[test]
    fn zero_screen_height_keeps_backdrop() {
        let mut a = visible();
        a.set_screen_height(0.0);
        a.begin_drag();
        a.drag_to(100.0);
        assert_eq!(a.frame().backdrop_opacity, 1.0);
    }
}
