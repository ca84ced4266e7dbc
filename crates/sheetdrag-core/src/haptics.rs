#![forbid(unsafe_code)]

//! Best-effort haptic feedback.
//!
//! [`HapticFeedback`] is the host capability; [`HapticPort`] wraps it and
//! swallows every failure. Absence of the capability is expected on most
//! desktop hosts and is never surfaced to callers or logged as an error.

#[cfg(feature = "tracing")]
use crate::logging::trace;
#[cfg(not(feature = "tracing"))]
use crate::trace;

use crate::error::SheetError;

/// Pulse strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticIntensity {
    /// Spring-back after a release that does not close.
    Light,
    /// Drag crossed the re-arm threshold.
    Medium,
    /// Sheet is closing.
    Heavy,
}

impl HapticIntensity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }
}

/// Haptic thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticConfig {
    /// Raw distance past which the medium pulse fires (default: 100px).
    pub rearm_px: f64,
}

impl Default for HapticConfig {
    fn default() -> Self {
        Self { rearm_px: 100.0 }
    }
}

impl HapticConfig {
    /// Validate parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        if self.rearm_px >= 0.0 {
            Vec::new()
        } else {
            vec![format!("haptics.rearm_px must be >= 0, got {}", self.rearm_px)]
        }
    }
}

/// Host haptic capability.
pub trait HapticFeedback {
    /// Deliver one pulse. Hosts without the capability return
    /// [`SheetError::HapticUnavailable`].
    fn pulse(&mut self, intensity: HapticIntensity) -> Result<(), SheetError>;
}

/// Capability stand-in for hosts with no haptics at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn pulse(&mut self, _intensity: HapticIntensity) -> Result<(), SheetError> {
        Err(SheetError::HapticUnavailable)
    }
}

/// Failure-swallowing front for a [`HapticFeedback`] capability.
pub struct HapticPort {
    inner: Box<dyn HapticFeedback>,
    delivered: u64,
    dropped: u64,
}

impl std::fmt::Debug for HapticPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HapticPort")
            .field("delivered", &self.delivered)
            .field("dropped", &self.dropped)
            .finish()
    }
}

impl Default for HapticPort {
    fn default() -> Self {
        Self::new(NoHaptics)
    }
}

impl HapticPort {
    #[must_use]
    pub fn new(inner: impl HapticFeedback + 'static) -> Self {
        Self {
            inner: Box::new(inner),
            delivered: 0,
            dropped: 0,
        }
    }

    /// Fire a pulse. Never fails.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn pulse(&mut self, intensity: HapticIntensity) {
        match self.inner.pulse(intensity) {
            Ok(()) => self.delivered += 1,
            Err(err) => {
                self.dropped += 1;
                trace!(
                    target: "sheetdrag.haptics",
                    intensity = intensity.as_str(),
                    error = %err,
                    "haptic pulse dropped"
                );
            }
        }
    }

    /// Pulses the capability accepted.
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Pulses the capability rejected.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Records every pulse into a shared log. Clones share the log.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Default)]
pub struct RecordingHaptics {
    log: std::rc::Rc<std::cell::RefCell<Vec<HapticIntensity>>>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl RecordingHaptics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pulse received so far, oldest first.
    #[must_use]
    pub fn pulses(&self) -> Vec<HapticIntensity> {
        self.log.borrow().clone()
    }

    /// Number of pulses of the given intensity.
    #[must_use]
    pub fn count(&self, intensity: HapticIntensity) -> usize {
        self.log.borrow().iter().filter(|&&i| i == intensity).count()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl HapticFeedback for RecordingHaptics {
    fn pulse(&mut self, intensity: HapticIntensity) -> Result<(), SheetError> {
        self.log.borrow_mut().push(intensity);
        Ok(())
    }
}
