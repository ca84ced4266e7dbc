#![forbid(unsafe_code)]

//! Sheet gesture recognition: pointer events to drag signals.
//!
//! [`SheetGesture`] composes the [`ScrollPhaseCoordinator`], the
//! [`DragSession`], the rubber band and the dismissal thresholds into one
//! stateful processor. Feed it normalized [`PointerEvent`]s together with the
//! live content `scroll_top`; it answers with whether to suppress the native
//! event and a list of [`SheetSignal`]s for the caller to act on.
//!
//! # State Machine
//!
//! ```text
//!   idle ──Down──▶ tracking ──Move (top, downward)──▶ dragging
//!    ▲                │                                 │
//!    └────Up/Cancel───┴──────────Up: Released──────────┘
//!                                Cancel: Cancelled
//! ```
//!
//! # Invariants
//!
//! 1. `DragStarted` precedes every `DragMoved` of the same gesture.
//! 2. Every `DragStarted` is eventually followed by exactly one `Released`
//!    or `Cancelled`.
//! 3. `Haptic(Medium)` is the only pulse emitted here. Release pulses depend
//!    on the decision and are fired by the caller.
//! 4. After [`reset`](SheetGesture::reset) or [`cancel`](SheetGesture::cancel)
//!    no session exists.

#[cfg(feature = "tracing")]
use crate::logging::debug;
#[cfg(not(feature = "tracing"))]
use crate::debug;

use crate::dismissal::{DismissalDecision, DismissalThresholds};
use crate::drag_session::DragSession;
use crate::haptics::{HapticConfig, HapticIntensity};
use crate::pointer::{PointerEvent, PointerPhase, PointerSample};
use crate::rubber_band::RubberBandConfig;
use crate::scroll_phase::{ScrollPhase, ScrollPhaseCoordinator};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// All tuning a gesture needs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureConfig {
    pub rubber_band: RubberBandConfig,
    pub dismissal: DismissalThresholds,
    pub haptics: HapticConfig,
}

impl GestureConfig {
    /// Validate every section. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.rubber_band.validate();
        errors.extend(self.dismissal.validate());
        errors.extend(self.haptics.validate());
        errors
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Something the caller must react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetSignal {
    /// A drag session was created, anchored at `anchor`.
    DragStarted { anchor: PointerSample },
    /// The session advanced.
    DragMoved { raw_distance: f64, visual_offset: f64 },
    /// Fire a haptic pulse.
    Haptic(HapticIntensity),
    /// The gesture ended with a session; the decision says close or restore.
    Released(DismissalDecision),
    /// The session was discarded without a decision.
    Cancelled,
}

/// Response to one pointer event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GestureOutput {
    /// Whether the host must suppress the native event (`preventDefault`).
    pub intercept: bool,
    /// Scroll phase after this event.
    pub phase: ScrollPhase,
    pub signals: Vec<SheetSignal>,
}

// ---------------------------------------------------------------------------
// SheetGesture
// ---------------------------------------------------------------------------

/// Stateful recognizer for the sheet's dismiss drag.
#[derive(Debug, Clone, Default)]
pub struct SheetGesture {
    config: GestureConfig,
    coordinator: ScrollPhaseCoordinator,
    session: Option<DragSession>,
}

impl SheetGesture {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            coordinator: ScrollPhaseCoordinator::new(),
            session: None,
        }
    }

    /// Process one normalized pointer event.
    ///
    /// `scroll_top` is the live scroll offset of the sheet's content
    /// container; `screen_height` feeds the screen-fraction dismissal rule.
    pub fn process(
        &mut self,
        event: &PointerEvent,
        scroll_top: f64,
        screen_height: f64,
    ) -> GestureOutput {
        let mut out = GestureOutput::default();

        match event.phase {
            PointerPhase::Down => {
                // A Down while a session lingers means the host lost the
                // previous Up. Discard it rather than decide on stale data.
                if self.session.take().is_some() {
                    out.signals.push(SheetSignal::Cancelled);
                }
                self.coordinator.begin(event.sample, scroll_top);
            }
            PointerPhase::Move => {
                self.on_move(event.sample, scroll_top, &mut out);
            }
            PointerPhase::Up => {
                if let Some(session) = self.session.take() {
                    let decision = self.config.dismissal.decide_release(
                        &session,
                        event.sample.timestamp_ms,
                        screen_height,
                    );
                    debug!(
                        target: "sheetdrag.gesture",
                        raw_distance = decision.raw_distance,
                        duration_ms = decision.duration_ms,
                        velocity = decision.velocity_px_per_ms,
                        should_close = decision.should_close,
                        "drag released"
                    );
                    out.signals.push(SheetSignal::Released(decision));
                }
                self.coordinator.end();
            }
            PointerPhase::Cancel => {
                if self.session.take().is_some() {
                    out.signals.push(SheetSignal::Cancelled);
                }
                self.coordinator.end();
            }
        }

        out.phase = self.coordinator.phase();
        out
    }

    fn on_move(&mut self, sample: PointerSample, scroll_top: f64, out: &mut GestureOutput) {
        let step = self
            .coordinator
            .classify(sample, scroll_top, self.session.is_some());
        out.intercept = step.intercept;

        if let Some(anchor) = step.anchor {
            debug!(
                target: "sheetdrag.gesture",
                anchor_y = anchor.y,
                scroll_top = scroll_top,
                "overscroll entered, drag session started"
            );
            self.session = Some(DragSession::new(anchor));
            out.signals.push(SheetSignal::DragStarted { anchor });
        }

        if !matches!(step.phase, ScrollPhase::Overscroll | ScrollPhase::Drag) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let update = session.update(sample, &self.config.rubber_band, &self.config.haptics);
        out.signals.push(SheetSignal::DragMoved {
            raw_distance: update.raw_distance,
            visual_offset: update.visual_offset,
        });
        if let Some(intensity) = update.haptic {
            out.signals.push(SheetSignal::Haptic(intensity));
        }
    }

    /// Discard any session without a decision (component teardown).
    ///
    /// Returns `Some(Cancelled)` if a session existed.
    pub fn cancel(&mut self) -> Option<SheetSignal> {
        self.coordinator.end();
        self.session.take().map(|_| SheetSignal::Cancelled)
    }

    /// Whether a drag session is active.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// The active session, if any.
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> ScrollPhase {
        self.coordinator.phase()
    }

    /// Reset all gesture state to idle.
    pub fn reset(&mut self) {
        self.coordinator = ScrollPhaseCoordinator::new();
        self.session = None;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect from the next event.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
