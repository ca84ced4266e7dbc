#![forbid(unsafe_code)]

//! Release decision: close the sheet or spring it back.
//!
//! ```text
//! duration = max(duration_ms, 1)
//! velocity = raw_distance / duration
//! close    = duration >= min_duration_ms && (
//!                raw_distance > distance_px
//!             || velocity     > velocity_px_per_ms
//!             || (screen_height > 0 && raw_distance > screen_fraction * screen_height))
//! ```
//!
//! The duration gate wins over every other trigger: a release completed in
//! under `min_duration_ms` is an accidental tap, never a dismissal.
//!
//! An unknown viewport (`screen_height <= 0` or NaN) disables the
//! screen-fraction trigger; distance and velocity still apply.

use crate::drag_session::DragSession;

/// Thresholds for the release decision. Shared by every sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissalThresholds {
    /// Gestures shorter than this never close (default: 150ms).
    pub min_duration_ms: f64,
    /// Raw distance beyond which a release closes (default: 150px).
    pub distance_px: f64,
    /// Average velocity beyond which a release closes (default: 0.5px/ms).
    pub velocity_px_per_ms: f64,
    /// Fraction of the screen height beyond which a release closes (default: 0.25).
    pub screen_fraction: f64,
}

impl Default for DismissalThresholds {
    fn default() -> Self {
        Self {
            min_duration_ms: 150.0,
            distance_px: 150.0,
            velocity_px_per_ms: 0.5,
            screen_fraction: 0.25,
        }
    }
}

/// Which condition carried a closing decision. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissTrigger {
    Distance,
    Velocity,
    ScreenFraction,
}

/// Outcome of [`DismissalThresholds::decide`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissalDecision {
    pub should_close: bool,
    /// First trigger that fired, `None` when the sheet springs back.
    pub trigger: Option<DismissTrigger>,
    pub raw_distance: f64,
    /// Gesture duration after clamping to at least 1ms.
    pub duration_ms: f64,
    pub velocity_px_per_ms: f64,
}

impl DismissalThresholds {
    /// Decide a release from distance, duration and screen height.
    #[must_use]
    pub fn decide(&self, raw_distance: f64, duration_ms: f64, screen_height: f64) -> DismissalDecision {
        let duration_ms = duration_ms.max(1.0);
        let velocity = raw_distance / duration_ms;

        let trigger = if duration_ms < self.min_duration_ms {
            None
        } else if raw_distance > self.distance_px {
            Some(DismissTrigger::Distance)
        } else if velocity > self.velocity_px_per_ms {
            Some(DismissTrigger::Velocity)
        } else if screen_height > 0.0 && raw_distance > self.screen_fraction * screen_height {
            Some(DismissTrigger::ScreenFraction)
        } else {
            None
        };

        DismissalDecision {
            should_close: trigger.is_some(),
            trigger,
            raw_distance,
            duration_ms,
            velocity_px_per_ms: velocity,
        }
    }

    /// Decide the release of `session` at `release_ms`.
    #[must_use]
    pub fn decide_release(
        &self,
        session: &DragSession,
        release_ms: f64,
        screen_height: f64,
    ) -> DismissalDecision {
        let duration_ms = release_ms - session.start().timestamp_ms;
        self.decide(session.raw_distance(), duration_ms, screen_height)
    }

    /// Validate parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.min_duration_ms >= 0.0) {
            errors.push(format!(
                "dismissal.min_duration_ms must be >= 0, got {}",
                self.min_duration_ms
            ));
        }
        if !(self.distance_px > 0.0) {
            errors.push(format!(
                "dismissal.distance_px must be > 0, got {}",
                self.distance_px
            ));
        }
        if !(self.velocity_px_per_ms > 0.0) {
            errors.push(format!(
                "dismissal.velocity_px_per_ms must be > 0, got {}",
                self.velocity_px_per_ms
            ));
        }
        if !(self.screen_fraction > 0.0 && self.screen_fraction <= 1.0) {
            errors.push(format!(
                "dismissal.screen_fraction must be in (0, 1], got {}",
                self.screen_fraction
            ));
        }
        errors
    }
}

/// [`DismissalThresholds::decide`] with the default thresholds.
#[must_use]
pub fn decide(raw_distance: f64, duration_ms: f64, screen_height: f64) -> DismissalDecision {
    DismissalThresholds::default().decide(raw_distance, duration_ms, screen_height)
}
