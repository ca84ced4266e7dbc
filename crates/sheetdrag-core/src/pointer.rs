#![forbid(unsafe_code)]

//! Pointer sampling: touch and mouse input normalized to one sample stream.
//!
//! Hosts deliver touch-start/move/end and mouse-down/move/up events with
//! different shapes. [`PointerSampler`] reduces both to a [`PointerEvent`]
//! carrying a [`PointerSample`] `(y, timestamp_ms)`, so everything downstream
//! is written once against a device-agnostic record.
//!
//! # Invariants
//!
//! 1. A `Down` or `Move` without a y coordinate produces no event.
//! 2. An `Up` or `Cancel` without a y coordinate reuses the last sampled y
//!    (touch-end events carry no active touches).
//! 3. While a gesture is active, events from the other input source are
//!    dropped. Browsers emit compatibility mouse events after a touch; they
//!    must not start a second gesture. The exception is a `Down` arriving
//!    [`STALE_GESTURE_MS`] or more after the gesture's last sample: the
//!    gesture lost its end event and the new source takes over.
//! 4. A missing timestamp is filled from the sampler's [`Clock`].

use web_time::Instant;

/// Silence after which an open gesture yields to a `Down` from the other
/// input source.
pub const STALE_GESTURE_MS: f64 = 1_000.0;

/// One normalized pointer position. Immutable once captured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Vertical client coordinate in CSS pixels.
    pub y: f64,
    /// Host timestamp in milliseconds.
    pub timestamp_ms: f64,
}

impl PointerSample {
    #[must_use]
    pub const fn new(y: f64, timestamp_ms: f64) -> Self {
        Self { y, timestamp_ms }
    }
}

/// Which device produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Touch,
    Mouse,
}

/// Gesture stage of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Touch-start or mouse-down.
    Down,
    /// Touch-move or mouse-move.
    Move,
    /// Touch-end or mouse-up.
    Up,
    /// Touch-cancel, focus loss or any host-initiated abort.
    Cancel,
}

/// A pointer event as the host sees it, before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerEvent {
    pub source: InputSource,
    pub phase: PointerPhase,
    /// `clientY` of the first touch or of the mouse, if present.
    pub client_y: Option<f64>,
    /// Host event timestamp in milliseconds, if present.
    pub timestamp_ms: Option<f64>,
}

impl RawPointerEvent {
    /// A touch event with a known position and timestamp.
    #[must_use]
    pub const fn touch(phase: PointerPhase, y: f64, timestamp_ms: f64) -> Self {
        Self {
            source: InputSource::Touch,
            phase,
            client_y: Some(y),
            timestamp_ms: Some(timestamp_ms),
        }
    }

    /// A mouse event with a known position and timestamp.
    #[must_use]
    pub const fn mouse(phase: PointerPhase, y: f64, timestamp_ms: f64) -> Self {
        Self {
            source: InputSource::Mouse,
            phase,
            client_y: Some(y),
            timestamp_ms: Some(timestamp_ms),
        }
    }

    /// A touch-end carrying no touch list.
    #[must_use]
    pub const fn touch_end(timestamp_ms: f64) -> Self {
        Self {
            source: InputSource::Touch,
            phase: PointerPhase::Up,
            client_y: None,
            timestamp_ms: Some(timestamp_ms),
        }
    }
}

/// A normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub source: InputSource,
    pub phase: PointerPhase,
    pub sample: PointerSample,
}

/// Millisecond time source used when an event carries no timestamp.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

impl<F> Clock for F
where
    F: Fn() -> f64,
{
    fn now_ms(&self) -> f64 {
        self()
    }
}

/// Monotonic clock measuring milliseconds since its creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Stateful normalizer from [`RawPointerEvent`] to [`PointerEvent`].
pub struct PointerSampler {
    clock: Box<dyn Clock>,
    active: Option<InputSource>,
    last: Option<PointerSample>,
}

impl std::fmt::Debug for PointerSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerSampler")
            .field("active", &self.active)
            .field("last", &self.last)
            .finish()
    }
}

impl Default for PointerSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSampler {
    /// Sampler backed by a [`MonotonicClock`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }

    /// Sampler backed by a custom clock.
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            active: None,
            last: None,
        }
    }

    /// Normalize one raw event. Returns `None` when the event is dropped.
    pub fn sample(&mut self, raw: &RawPointerEvent) -> Option<PointerEvent> {
        let timestamp_ms = raw.timestamp_ms.unwrap_or_else(|| self.clock.now_ms());

        if let Some(active) = self.active
            && active != raw.source
            && !self.is_stale_takeover(raw.phase, timestamp_ms)
        {
            return None;
        }

        match raw.phase {
            PointerPhase::Down => {
                let sample = PointerSample::new(raw.client_y?, timestamp_ms);
                self.active = Some(raw.source);
                self.last = Some(sample);
                Some(PointerEvent {
                    source: raw.source,
                    phase: PointerPhase::Down,
                    sample,
                })
            }
            PointerPhase::Move => {
                // Moves only count inside a gesture; a hovering mouse is noise.
                self.active?;
                let sample = PointerSample::new(raw.client_y?, timestamp_ms);
                self.last = Some(sample);
                Some(PointerEvent {
                    source: raw.source,
                    phase: PointerPhase::Move,
                    sample,
                })
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                self.active.take()?;
                let y = raw.client_y.or(self.last.map(|s| s.y))?;
                self.last = None;
                Some(PointerEvent {
                    source: raw.source,
                    phase: raw.phase,
                    sample: PointerSample::new(y, timestamp_ms),
                })
            }
        }
    }

    /// Whether a gesture is currently open.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Source of the open gesture, if any.
    #[inline]
    #[must_use]
    pub fn active_source(&self) -> Option<InputSource> {
        self.active
    }

    fn is_stale_takeover(&self, phase: PointerPhase, timestamp_ms: f64) -> bool {
        phase == PointerPhase::Down
            && self
                .last
                .is_some_and(|last| timestamp_ms - last.timestamp_ms >= STALE_GESTURE_MS)
    }

    /// Forget any open gesture.
    pub fn reset(&mut self) {
        self.active = None;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_clock() -> PointerSampler {
        PointerSampler::with_clock(|| 1234.0)
    }

    #[test]
    fn touch_and_mouse_normalize_to_same_shape() {
        let mut touch = fixed_clock();
        let mut mouse = fixed_clock();

        let t = touch
            .sample(&RawPointerEvent::touch(PointerPhase::Down, 40.0, 10.0))
            .unwrap();
        let m = mouse
            .sample(&RawPointerEvent::mouse(PointerPhase::Down, 40.0, 10.0))
            .unwrap();

        assert_eq!(t.sample, m.sample);
        assert_eq!(t.phase, m.phase);
    }

    #[test]
    fn down_without_y_is_dropped() {
        let mut sampler = fixed_clock();
        let raw = RawPointerEvent {
            source: InputSource::Touch,
            phase: PointerPhase::Down,
            client_y: None,
            timestamp_ms: Some(0.0),
        };
        assert!(sampler.sample(&raw).is_none());
        assert!(!sampler.is_active());
    }

    #[test]
    fn move_without_gesture_is_dropped() {
        let mut sampler = fixed_clock();
        let raw = RawPointerEvent::mouse(PointerPhase::Move, 10.0, 0.0);
        assert!(sampler.sample(&raw).is_none());
    }

    #[test]
    fn touch_end_reuses_last_y() {
        let mut sampler = fixed_clock();
        sampler.sample(&RawPointerEvent::touch(PointerPhase::Down, 10.0, 0.0));
        sampler.sample(&RawPointerEvent::touch(PointerPhase::Move, 90.0, 16.0));
        let up = sampler.sample(&RawPointerEvent::touch_end(200.0)).unwrap();

        assert_eq!(up.phase, PointerPhase::Up);
        assert_eq!(up.sample, PointerSample::new(90.0, 200.0));
        assert!(!sampler.is_active());
    }

    #[test]
    fn missing_timestamp_comes_from_clock() {
        let mut sampler = fixed_clock();
        let raw = RawPointerEvent {
            source: InputSource::Mouse,
            phase: PointerPhase::Down,
            client_y: Some(5.0),
            timestamp_ms: None,
        };
        let ev = sampler.sample(&raw).unwrap();
        assert_eq!(ev.sample.timestamp_ms, 1234.0);
    }

    #[test]
    fn compatibility_mouse_events_ignored_during_touch() {
        let mut sampler = fixed_clock();
        sampler.sample(&RawPointerEvent::touch(PointerPhase::Down, 10.0, 0.0));

        let ghost = RawPointerEvent::mouse(PointerPhase::Down, 10.0, 1.0);
        assert!(sampler.sample(&ghost).is_none());
        assert_eq!(sampler.active_source(), Some(InputSource::Touch));
    }

    #[test]
    fn mouse_down_takes_over_touch_that_lost_its_end() {
        let mut sampler = fixed_clock();
        sampler.sample(&RawPointerEvent::touch(PointerPhase::Down, 10.0, 0.0));
        sampler.sample(&RawPointerEvent::touch(PointerPhase::Move, 40.0, 100.0));

        // Still inside the window: the mouse is ignored.
        let early = RawPointerEvent::mouse(PointerPhase::Down, 200.0, 100.0 + STALE_GESTURE_MS - 1.0);
        assert!(sampler.sample(&early).is_none());

        let late = RawPointerEvent::mouse(PointerPhase::Down, 200.0, 100.0 + STALE_GESTURE_MS);
        let ev = sampler.sample(&late).unwrap();
        assert_eq!(ev.source, InputSource::Mouse);
        assert_eq!(ev.phase, PointerPhase::Down);
        assert_eq!(sampler.active_source(), Some(InputSource::Mouse));

        // The stale touch can no longer move or end the gesture.
        assert!(
            sampler
                .sample(&RawPointerEvent::touch(PointerPhase::Move, 50.0, 1_200.0))
                .is_none()
        );
        assert!(
            sampler
                .sample(&RawPointerEvent::mouse(PointerPhase::Move, 230.0, 1_210.0))
                .is_some()
        );
    }

    #[test]
    fn up_without_gesture_is_dropped() {
        let mut sampler = fixed_clock();
        assert!(
            sampler
                .sample(&RawPointerEvent::mouse(PointerPhase::Up, 0.0, 0.0))
                .is_none()
        );
    }
}
