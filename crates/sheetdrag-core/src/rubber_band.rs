#![forbid(unsafe_code)]

//! Rubber-band resistance: raw drag distance to resisted visual offset.
//!
//! Up to `threshold_px` the sheet tracks the finger 1:1. Past it, the excess
//! is attenuated by `excess * (1 - (excess / max_excess)^exponent)` with the
//! normalized term capped at 1.
//!
//! # Invariants
//!
//! 1. `resist(d) == d` for every `d` in `[0, threshold_px]`.
//! 2. `resist` is monotonically non-decreasing.
//! 3. `resist(d) < threshold_px + max_excess_px` for every finite `d`.
//!
//! The attenuation curve rises, peaks, then falls back toward zero as the
//! excess approaches `max_excess_px`. Invariant 2 is kept by holding the
//! offset at the curve's peak once the excess passes it; below the peak the
//! curve is reproduced exactly. With the default constants the peak sits at
//! an excess of ~129.4px (raw ~209.4px) and a visual offset of ~116.96px.
//!
//! # Failure Modes
//!
//! - Negative or NaN input is treated as zero distance.
//! - `+inf` maps to the held peak.

/// Resistance curve parameters. Shared by every sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RubberBandConfig {
    /// Distance tracked without resistance (default: 80px).
    pub threshold_px: f64,
    /// Excess distance at which the normalized term saturates (default: 300px).
    pub max_excess_px: f64,
    /// Exponent of the attenuation curve (default: 0.4).
    pub resistance_exponent: f64,
}

impl Default for RubberBandConfig {
    fn default() -> Self {
        Self {
            threshold_px: 80.0,
            max_excess_px: 300.0,
            resistance_exponent: 0.4,
        }
    }
}

impl RubberBandConfig {
    /// Map raw drag distance to the resisted visual offset.
    #[must_use]
    pub fn resist(&self, raw_distance: f64) -> f64 {
        // `max` maps NaN to 0 as well as clamping negatives.
        let raw = raw_distance.max(0.0);
        if raw <= self.threshold_px {
            return raw;
        }
        let excess = (raw - self.threshold_px).min(self.peak_excess());
        self.threshold_px + self.attenuate(excess)
    }

    /// Excess at which the attenuation curve reaches its maximum.
    ///
    /// Solves `d/de [e * (1 - (e/m)^p)] = 0`, giving `m * (1 / (1 + p))^(1/p)`.
    #[must_use]
    pub fn peak_excess(&self) -> f64 {
        let p = self.resistance_exponent;
        self.max_excess_px * (1.0 / (1.0 + p)).powf(1.0 / p)
    }

    /// Visual offset the sheet approaches as the drag grows without bound.
    #[must_use]
    pub fn ceiling(&self) -> f64 {
        self.threshold_px + self.attenuate(self.peak_excess())
    }

    fn attenuate(&self, excess: f64) -> f64 {
        let normalized = (excess / self.max_excess_px).min(1.0);
        excess * (1.0 - normalized.powf(self.resistance_exponent))
    }

    /// Validate parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.threshold_px >= 0.0) {
            errors.push(format!(
                "rubber_band.threshold_px must be >= 0, got {}",
                self.threshold_px
            ));
        }
        if !(self.max_excess_px > 0.0) {
            errors.push(format!(
                "rubber_band.max_excess_px must be > 0, got {}",
                self.max_excess_px
            ));
        }
        if !(self.resistance_exponent > 0.0) {
            errors.push(format!(
                "rubber_band.resistance_exponent must be > 0, got {}",
                self.resistance_exponent
            ));
        }
        errors
    }
}

/// [`RubberBandConfig::resist`] with the default constants.
#[must_use]
pub fn resist(raw_distance: f64) -> f64 {
    RubberBandConfig::default().resist(raw_distance)
}
