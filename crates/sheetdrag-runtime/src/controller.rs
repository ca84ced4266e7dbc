#![forbid(unsafe_code)]

//! The bottom-sheet controller.
//!
//! One [`SheetController`] drives one sheet through its whole lifecycle.
//! Every concrete sheet shares this implementation and supplies only its
//! [`SheetKind`] and `on_close` callback; content and success callbacks live
//! outside.
//!
//! # Lifecycle
//!
//! ```text
//! set_open(true) ── lock scroll, Entering ──(enter delay)──▶ Visible
//!      drag release (close) / request_close / set_open(false)
//!                 ── heavy pulse, Exiting ──(slide duration)──▶ Closed
//!                                          unlock scroll, detach, on_close
//! ```
//!
//! Completions arrive either from the host via
//! [`transition_complete`](SheetController::transition_complete) or from
//! the controller's own deadlines via [`tick`](SheetController::tick).
//! Whichever comes first advances the phase; the other is stale and ignored.
//!
//! # Invariants
//!
//! 1. `on_close` runs at most once per lifecycle, strictly after the exit
//!    completion, the scroll-lock release and the listener teardown.
//! 2. The heavy pulse fires exactly once per lifecycle that closes.
//! 3. A non-closing release fires one light pulse and springs back.
//! 4. [`teardown`](SheetController::teardown) (and `Drop`) releases every
//!    resource synchronously and never calls `on_close`.
//! 5. `set_open(true)` during the exit is queued: the closing lifecycle
//!    finishes (including `on_close`) and a fresh one starts right after.
//!
//! # Time
//!
//! Pointer timestamps, `now_ms` arguments and [`tick`](SheetController::tick)
//! must come from the same millisecond clock.

use tracing::{debug, warn};

use sheetdrag_core::SheetError;
use sheetdrag_core::animation::{
    AnimationCoordinator, AnimationPhase, SheetFrame, TimingConfig, Transition,
};
use sheetdrag_core::dismissal::DismissalDecision;
use sheetdrag_core::gesture::{GestureConfig, SheetGesture, SheetSignal};
use sheetdrag_core::haptics::{HapticFeedback, HapticIntensity, HapticPort};
use sheetdrag_core::pointer::{
    Clock, InputSource, PointerPhase, PointerSampler, RawPointerEvent,
};
use sheetdrag_core::scroll_fade::{ScrollFadeConfig, ScrollFadeMask};
use sheetdrag_core::scroll_lock::{PageSurface, SharedScrollLock};

use crate::listeners::{DocumentListeners, DragListeners};
use crate::observable::Observable;
use crate::sequencer::SheetKind;
use crate::timers::{FrameRequest, TimerQueue};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// All tuning for one controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SheetSettings {
    pub gesture: GestureConfig,
    pub timing: TimingConfig,
    pub scroll_fade: ScrollFadeConfig,
}

impl SheetSettings {
    /// Validate every section. An empty list means the settings are valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.gesture.validate();
        errors.extend(self.timing.validate());
        errors.extend(self.scroll_fade.validate());
        errors
    }
}

/// Why a close was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// Tap on the backdrop.
    Backdrop,
    /// The sheet's explicit close control.
    CloseControl,
    /// A drag release crossed a dismissal threshold.
    Dismissed,
    /// The host flipped `is_open` to false.
    Host,
}

impl CloseReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backdrop => "backdrop",
            Self::CloseControl => "close_control",
            Self::Dismissed => "dismissed",
            Self::Host => "host",
        }
    }
}

// ---------------------------------------------------------------------------
// SheetController
// ---------------------------------------------------------------------------

/// Drives one sheet: gesture, animation, haptics, scroll lock and timers.
pub struct SheetController<P: PageSurface> {
    kind: SheetKind,
    settings: SheetSettings,
    screen_height: f64,
    sampler: PointerSampler,
    gesture: SheetGesture,
    animation: Option<AnimationCoordinator>,
    fade: ScrollFadeMask,
    haptics: HapticPort,
    scroll_lock: SharedScrollLock<P>,
    holds_lock: bool,
    listeners: DragListeners,
    timers: TimerQueue,
    frame_request: FrameRequest,
    frames: Observable<SheetFrame>,
    last_decision: Option<DismissalDecision>,
    reopen_requested: bool,
    exit_due_ms: f64,
    on_close: Box<dyn FnMut()>,
}

impl<P: PageSurface> std::fmt::Debug for SheetController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetController")
            .field("kind", &self.kind)
            .field("phase", &self.phase())
            .field("holds_lock", &self.holds_lock)
            .field("pending_timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}

impl<P: PageSurface> SheetController<P> {
    /// Controller for `kind` sharing the page's `scroll_lock`.
    ///
    /// Fails with [`SheetError::InvalidConfig`] when `settings` are out of range.
    pub fn new(
        kind: SheetKind,
        settings: SheetSettings,
        scroll_lock: SharedScrollLock<P>,
        on_close: impl FnMut() + 'static,
    ) -> Result<Self, SheetError> {
        let errors = settings.validate();
        if !errors.is_empty() {
            return Err(SheetError::InvalidConfig(errors));
        }
        Ok(Self {
            kind,
            settings,
            screen_height: 0.0,
            sampler: PointerSampler::new(),
            gesture: SheetGesture::new(settings.gesture),
            animation: None,
            fade: ScrollFadeMask::new(settings.scroll_fade),
            haptics: HapticPort::default(),
            scroll_lock,
            holds_lock: false,
            listeners: DragListeners::default(),
            timers: TimerQueue::new(),
            frame_request: FrameRequest::default(),
            frames: Observable::new(SheetFrame::HIDDEN),
            last_decision: None,
            reopen_requested: false,
            exit_due_ms: 0.0,
            on_close: Box::new(on_close),
        })
    }

    /// Route pulses to the host's haptic capability.
    #[must_use]
    pub fn with_haptics(mut self, haptics: impl HapticFeedback + 'static) -> Self {
        self.haptics = HapticPort::new(haptics);
        self
    }

    /// Register mouse drags with the host's document listeners.
    #[must_use]
    pub fn with_listeners(mut self, listeners: impl DocumentListeners + 'static) -> Self {
        self.listeners = DragListeners::new(listeners);
        self
    }

    /// Clock used for pointer events that carry no timestamp.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.sampler = PointerSampler::with_clock(clock);
        self
    }

    /// Viewport height feeding the screen-fraction rule and backdrop fade.
    #[must_use]
    pub fn with_screen_height(mut self, screen_height: f64) -> Self {
        self.screen_height = screen_height;
        self
    }

    // -- host inputs -------------------------------------------------------

    /// Start (`true`) or end (`false`) the sheet's lifecycle.
    ///
    /// Opening an already open sheet is a no-op. Opening while the sheet
    /// is exiting queues a new lifecycle behind the exit. Opening fails with
    /// [`SheetError::ScrollLockHeld`] when another sheet pins the page.
    pub fn set_open(&mut self, open: bool, now_ms: f64) -> Result<(), SheetError> {
        if !open {
            self.reopen_requested = false;
            self.request_close(CloseReason::Host, now_ms);
            return Ok(());
        }
        if self.phase() == AnimationPhase::Exiting {
            if !self.reopen_requested {
                self.reopen_requested = true;
                debug!(
                    target: "sheetdrag.sheet",
                    sheet = self.kind.as_str(),
                    "reopen queued behind exit"
                );
            }
            return Ok(());
        }
        if self.is_open() {
            return Ok(());
        }

        self.scroll_lock.borrow_mut().lock()?;
        self.holds_lock = true;

        self.sampler.reset();
        self.gesture.reset();
        self.fade.clear();
        self.timers.clear();
        self.frame_request.cancel();
        self.last_decision = None;
        self.animation = Some(AnimationCoordinator::new(
            self.settings.timing,
            self.screen_height,
        ));
        self.timers
            .schedule(now_ms + self.settings.timing.enter_delay_ms, Transition::Enter);

        debug!(
            target: "sheetdrag.sheet",
            sheet = self.kind.as_str(),
            phase = AnimationPhase::Entering.as_str(),
            "sheet opened"
        );
        self.publish();
        Ok(())
    }

    /// Feed one pointer event with the content container's live `scroll_top`.
    ///
    /// Returns whether the host must suppress the native event.
    pub fn pointer(&mut self, raw: &RawPointerEvent, scroll_top: f64) -> bool {
        if !self.is_interactive() {
            return false;
        }
        let Some(event) = self.sampler.sample(raw) else {
            return false;
        };

        match (event.source, event.phase) {
            (InputSource::Mouse, PointerPhase::Down) => self.listeners.attach(),
            // A touch taking over a stale mouse gesture.
            (InputSource::Touch, PointerPhase::Down)
            | (_, PointerPhase::Up | PointerPhase::Cancel) => self.listeners.detach(),
            _ => {}
        }

        let out = self
            .gesture
            .process(&event, scroll_top, self.screen_height);
        for signal in out.signals {
            self.apply(signal, event.sample.timestamp_ms);
        }
        self.publish();
        out.intercept
    }

    /// Record a content scroll. Returns `true` when the host must schedule
    /// an animation frame; further scrolls in the same burst return `false`.
    pub fn on_content_scroll(&mut self, scroll_top: f64) -> bool {
        if !self.is_open() {
            return false;
        }
        self.fade.push(scroll_top) && self.frame_request.request()
    }

    /// The host's animation frame fired.
    pub fn animation_frame(&mut self) {
        if !self.frame_request.take() {
            return;
        }
        if let Some(opacity) = self.fade.flush()
            && let Some(animation) = self.animation.as_mut()
        {
            animation.set_mask_opacity(opacity);
        }
        self.publish();
    }

    /// Close the sheet (backdrop tap, close control, host).
    ///
    /// Returns `false` when a close is already under way or the sheet is not
    /// open, in which case nothing happens.
    pub fn request_close(&mut self, reason: CloseReason, now_ms: f64) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        if !animation.begin_exit() {
            return false;
        }

        self.gesture.cancel();
        self.sampler.reset();
        self.listeners.detach();
        self.timers.clear();
        self.exit_due_ms = now_ms + self.settings.timing.slide_duration_ms;
        self.timers.schedule(self.exit_due_ms, Transition::Exit);
        self.haptics.pulse(HapticIntensity::Heavy);

        debug!(
            target: "sheetdrag.sheet",
            sheet = self.kind.as_str(),
            reason = reason.as_str(),
            "sheet close requested"
        );
        self.publish();
        true
    }

    /// The host reports that a CSS transition finished.
    pub fn transition_complete(&mut self, transition: Transition) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        if !animation.transition_complete(transition) {
            return;
        }
        match transition {
            Transition::Enter => {
                debug!(
                    target: "sheetdrag.sheet",
                    sheet = self.kind.as_str(),
                    phase = AnimationPhase::Visible.as_str(),
                    "sheet visible"
                );
                self.publish();
            }
            Transition::Exit => self.finish_close(),
        }
    }

    /// Advance the controller's own deadlines to `now_ms`.
    pub fn tick(&mut self, now_ms: f64) {
        while let Some(transition) = self.timers.pop_due(now_ms) {
            self.transition_complete(transition);
        }
    }

    /// Update the viewport height.
    pub fn set_screen_height(&mut self, screen_height: f64) {
        self.screen_height = screen_height;
        if let Some(animation) = self.animation.as_mut() {
            animation.set_screen_height(screen_height);
        }
        self.publish();
    }

    /// Release every resource without running `on_close`.
    ///
    /// Used when the host unmounts the sheet mid-lifecycle. Idempotent.
    pub fn teardown(&mut self) {
        if self.gesture.cancel().is_some() {
            debug!(
                target: "sheetdrag.sheet",
                sheet = self.kind.as_str(),
                "drag discarded by teardown"
            );
        }
        self.reopen_requested = false;
        self.sampler.reset();
        self.listeners.detach();
        self.timers.clear();
        self.frame_request.cancel();
        self.fade.clear();
        self.release_scroll_lock();
        if self.animation.take().is_some() {
            self.frames.set(SheetFrame::HIDDEN);
        }
    }

    // -- outputs -----------------------------------------------------------

    #[must_use]
    pub fn kind(&self) -> SheetKind {
        self.kind
    }

    /// Lifecycle phase. `Closed` when no lifecycle is running.
    #[must_use]
    pub fn phase(&self) -> AnimationPhase {
        self.animation
            .as_ref()
            .map_or(AnimationPhase::Closed, AnimationCoordinator::phase)
    }

    /// Whether a lifecycle is running and has not reached `Closed`.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.phase() != AnimationPhase::Closed
    }

    /// Frame for the current state.
    #[must_use]
    pub fn frame(&self) -> SheetFrame {
        self.animation
            .as_ref()
            .map_or(SheetFrame::HIDDEN, AnimationCoordinator::frame)
    }

    /// Handle to the published frame stream.
    #[must_use]
    pub fn frames(&self) -> Observable<SheetFrame> {
        self.frames.clone()
    }

    /// Decision of the most recent release in this lifecycle.
    #[must_use]
    pub fn last_decision(&self) -> Option<DismissalDecision> {
        self.last_decision
    }

    /// Whether a reopen is waiting for the exit to finish.
    #[must_use]
    pub fn reopen_pending(&self) -> bool {
        self.reopen_requested
    }

    /// Earliest pending deadline, for hosts that sleep until the next tick.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    #[must_use]
    pub fn haptics(&self) -> &HapticPort {
        &self.haptics
    }

    #[must_use]
    pub fn settings(&self) -> &SheetSettings {
        &self.settings
    }

    // -- internals ---------------------------------------------------------

    fn is_interactive(&self) -> bool {
        matches!(
            self.phase(),
            AnimationPhase::Visible | AnimationPhase::Dragging
        )
    }

    fn apply(&mut self, signal: SheetSignal, now_ms: f64) {
        match signal {
            SheetSignal::DragStarted { .. } => {
                if let Some(animation) = self.animation.as_mut() {
                    animation.begin_drag();
                }
            }
            SheetSignal::DragMoved { visual_offset, .. } => {
                if let Some(animation) = self.animation.as_mut() {
                    animation.drag_to(visual_offset);
                }
            }
            SheetSignal::Haptic(intensity) => self.haptics.pulse(intensity),
            SheetSignal::Released(decision) => {
                self.last_decision = Some(decision);
                debug!(
                    target: "sheetdrag.sheet",
                    sheet = self.kind.as_str(),
                    raw_distance = decision.raw_distance,
                    duration_ms = decision.duration_ms,
                    velocity = decision.velocity_px_per_ms,
                    should_close = decision.should_close,
                    "drag released"
                );
                if decision.should_close {
                    self.request_close(CloseReason::Dismissed, now_ms);
                } else {
                    self.haptics.pulse(HapticIntensity::Light);
                    if let Some(animation) = self.animation.as_mut() {
                        animation.restore();
                    }
                }
            }
            SheetSignal::Cancelled => {
                if let Some(animation) = self.animation.as_mut() {
                    animation.restore();
                }
            }
        }
    }

    fn finish_close(&mut self) {
        self.release_scroll_lock();
        self.listeners.detach();
        self.timers.clear();
        self.frame_request.cancel();
        self.fade.clear();
        self.publish();
        debug!(
            target: "sheetdrag.sheet",
            sheet = self.kind.as_str(),
            phase = AnimationPhase::Closed.as_str(),
            "sheet closed"
        );
        (self.on_close)();

        if std::mem::take(&mut self.reopen_requested)
            && let Err(err) = self.set_open(true, self.exit_due_ms)
        {
            warn!(
                target: "sheetdrag.sheet",
                sheet = self.kind.as_str(),
                error = %err,
                "queued reopen failed"
            );
        }
    }

    fn release_scroll_lock(&mut self) {
        if !std::mem::take(&mut self.holds_lock) {
            return;
        }
        match self.scroll_lock.try_borrow_mut() {
            Ok(mut lock) => lock.unlock(),
            Err(_) => warn!(
                target: "sheetdrag.sheet",
                sheet = self.kind.as_str(),
                "scroll lock busy during release"
            ),
        }
    }

    fn publish(&mut self) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        let (frame, changes) = animation.take_frame();
        if !changes.is_empty() {
            self.frames.set(frame);
        }
    }
}

impl<P: PageSurface> Drop for SheetController<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
