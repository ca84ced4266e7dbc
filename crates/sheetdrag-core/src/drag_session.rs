#![forbid(unsafe_code)]

//! The active drag: anchor sample, distances, and the haptic re-arm latch.

use crate::haptics::{HapticConfig, HapticIntensity};
use crate::pointer::PointerSample;
use crate::rubber_band::RubberBandConfig;

/// Mutable record of one drag gesture.
///
/// Created when the gesture enters overscroll, destroyed on release, cancel
/// or teardown.
///
/// # Invariants
///
/// 1. `raw_distance() >= 0`: the sheet never drags above its resting position.
/// 2. `visual_offset()` is always `resist(raw_distance())` under the config
///    passed to the last [`update`](DragSession::update).
/// 3. The haptic latch is set only while `raw_distance() > rearm_px`.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    start: PointerSample,
    raw_distance: f64,
    visual_offset: f64,
    haptic_fired: bool,
}

/// Result of feeding one sample to a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub raw_distance: f64,
    pub visual_offset: f64,
    /// Pulse to fire for this update, if the re-arm threshold was crossed.
    pub haptic: Option<HapticIntensity>,
}

impl DragSession {
    /// Start a session anchored at `start`.
    #[must_use]
    pub fn new(start: PointerSample) -> Self {
        Self {
            start,
            raw_distance: 0.0,
            visual_offset: 0.0,
            haptic_fired: false,
        }
    }

    /// Advance the session to `sample`.
    ///
    /// The medium pulse fires once per crossing of `rearm_px`. Falling back to
    /// or below the threshold re-arms it with no hysteresis band.
    pub fn update(
        &mut self,
        sample: PointerSample,
        rubber_band: &RubberBandConfig,
        haptics: &HapticConfig,
    ) -> DragUpdate {
        self.raw_distance = (sample.y - self.start.y).max(0.0);
        self.visual_offset = rubber_band.resist(self.raw_distance);

        let haptic = if self.raw_distance > haptics.rearm_px {
            if self.haptic_fired {
                None
            } else {
                self.haptic_fired = true;
                Some(HapticIntensity::Medium)
            }
        } else {
            self.haptic_fired = false;
            None
        };

        DragUpdate {
            raw_distance: self.raw_distance,
            visual_offset: self.visual_offset,
            haptic,
        }
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> PointerSample {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn raw_distance(&self) -> f64 {
        self.raw_distance
    }

    #[inline]
    #[must_use]
    pub fn visual_offset(&self) -> f64 {
        self.visual_offset
    }

    #[inline]
    #[must_use]
    pub fn haptic_fired(&self) -> bool {
        self.haptic_fired
    }
}
