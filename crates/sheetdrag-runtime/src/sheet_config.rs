#![forbid(unsafe_code)]

//! Policy-as-data configuration for sheet controllers.
//!
//! Captures every tuning constant of the sheet engine as one [`SheetPolicy`]
//! that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # sheet-policy.toml
//! [dismissal]
//! distance_px = 150.0
//! velocity_px_per_ms = 0.5
//!
//! [timing]
//! slide_duration_ms = 500.0
//! ```
//!
//! ```rust,ignore
//! let policy = SheetPolicy::from_toml_file("sheet-policy.toml")?;
//! let settings = policy.into_settings()?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the value of the matching core config, so
//! `SheetPolicy::default()` behaves exactly like `SheetSettings::default()`.
//! Partial files override only the fields they name.

#[cfg(feature = "sheet-config")]
use std::path::Path;

#[cfg(feature = "sheet-config")]
use serde::{Deserialize, Serialize};

use sheetdrag_core::animation::TimingConfig;
use sheetdrag_core::dismissal::DismissalThresholds;
use sheetdrag_core::gesture::GestureConfig;
use sheetdrag_core::haptics::HapticConfig;
use sheetdrag_core::rubber_band::RubberBandConfig;
use sheetdrag_core::scroll_fade::ScrollFadeConfig;

use crate::controller::SheetSettings;

// ---------------------------------------------------------------------------
// Top-level SheetPolicy
// ---------------------------------------------------------------------------

/// Every tunable parameter of a sheet controller.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "sheet-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "sheet-config", serde(default))]
pub struct SheetPolicy {
    pub rubber_band: RubberBandPolicy,
    pub dismissal: DismissalPolicy,
    pub haptics: HapticPolicy,
    pub timing: TimingPolicy,
    pub scroll_fade: ScrollFadePolicy,
}

impl SheetPolicy {
    /// Load from a TOML string.
    #[cfg(feature = "sheet-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, SheetConfigError> {
        toml::from_str(s).map_err(SheetConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "sheet-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SheetConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SheetConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "sheet-config")]
    pub fn from_json_str(s: &str) -> Result<Self, SheetConfigError> {
        serde_json::from_str(s).map_err(SheetConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "sheet-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SheetConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SheetConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters. An empty list means the policy is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        self.to_settings().validate()
    }

    /// Validated settings, or every problem found.
    pub fn into_settings(self) -> Result<SheetSettings, SheetConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self.to_settings())
        } else {
            Err(SheetConfigError::Validation(errors))
        }
    }

    /// Settings without validation.
    #[must_use]
    pub fn to_settings(&self) -> SheetSettings {
        SheetSettings {
            gesture: self.to_gesture_config(),
            timing: self.to_timing_config(),
            scroll_fade: self.to_scroll_fade_config(),
        }
    }

    #[must_use]
    pub fn to_gesture_config(&self) -> GestureConfig {
        GestureConfig {
            rubber_band: self.to_rubber_band_config(),
            dismissal: self.to_dismissal_thresholds(),
            haptics: self.to_haptic_config(),
        }
    }

    #[must_use]
    pub fn to_rubber_band_config(&self) -> RubberBandConfig {
        RubberBandConfig {
            threshold_px: self.rubber_band.threshold_px,
            max_excess_px: self.rubber_band.max_excess_px,
            resistance_exponent: self.rubber_band.resistance_exponent,
        }
    }

    #[must_use]
    pub fn to_dismissal_thresholds(&self) -> DismissalThresholds {
        DismissalThresholds {
            min_duration_ms: self.dismissal.min_duration_ms,
            distance_px: self.dismissal.distance_px,
            velocity_px_per_ms: self.dismissal.velocity_px_per_ms,
            screen_fraction: self.dismissal.screen_fraction,
        }
    }

    #[must_use]
    pub fn to_haptic_config(&self) -> HapticConfig {
        HapticConfig {
            rearm_px: self.haptics.rearm_px,
        }
    }

    #[must_use]
    pub fn to_timing_config(&self) -> TimingConfig {
        TimingConfig {
            enter_delay_ms: self.timing.enter_delay_ms,
            slide_duration_ms: self.timing.slide_duration_ms,
            restore_duration_ms: self.timing.restore_duration_ms,
        }
    }

    #[must_use]
    pub fn to_scroll_fade_config(&self) -> ScrollFadeConfig {
        ScrollFadeConfig {
            fade_distance_px: self.scroll_fade.fade_distance_px,
        }
    }

    /// One-line JSON summary for structured logs.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        format!(
            r#"{{"schema":"sheet-policy-v1","threshold_px":{},"resistance_exponent":{},"distance_px":{},"velocity_px_per_ms":{},"min_duration_ms":{},"slide_duration_ms":{}}}"#,
            self.rubber_band.threshold_px,
            self.rubber_band.resistance_exponent,
            self.dismissal.distance_px,
            self.dismissal.velocity_px_per_ms,
            self.dismissal.min_duration_ms,
            self.timing.slide_duration_ms,
        )
    }
}

// ---------------------------------------------------------------------------
// Sections (flat, serde-friendly)
// ---------------------------------------------------------------------------

/// Rubber-band resistance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sheet-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "sheet-config", serde(default))]
pub struct RubberBandPolicy {
    /// Default: 80.
    pub threshold_px: f64,
    /// Default: 300.
    pub max_excess_px: f64,
    /// Default: 0.4.
    pub resistance_exponent: f64,
}

impl Default for RubberBandPolicy {
    fn default() -> Self {
        let c = RubberBandConfig::default();
        Self {
            threshold_px: c.threshold_px,
            max_excess_px: c.max_excess_px,
            resistance_exponent: c.resistance_exponent,
        }
    }
}

/// Release decision thresholds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sheet-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "sheet-config", serde(default))]
pub struct DismissalPolicy {
    /// Default: 150.
    pub min_duration_ms: f64,
    /// Default: 150.
    pub distance_px: f64,
    /// Default: 0.5.
    pub velocity_px_per_ms: f64,
    /// Default: 0.25.
    pub screen_fraction: f64,
}

impl Default for DismissalPolicy {
    fn default() -> Self {
        let c = DismissalThresholds::default();
        Self {
            min_duration_ms: c.min_duration_ms,
            distance_px: c.distance_px,
            velocity_px_per_ms: c.velocity_px_per_ms,
            screen_fraction: c.screen_fraction,
        }
    }
}

/// Haptic re-arm point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sheet-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "sheet-config", serde(default))]
pub struct HapticPolicy {
    /// Default: 100.
    pub rearm_px: f64,
}

impl Default for HapticPolicy {
    fn default() -> Self {
        Self {
            rearm_px: HapticConfig::default().rearm_px,
        }
    }
}

/// Lifecycle timings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sheet-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "sheet-config", serde(default))]
pub struct TimingPolicy {
    /// Default: 10.
    pub enter_delay_ms: f64,
    /// Default: 500.
    pub slide_duration_ms: f64,
    /// Default: 300.
    pub restore_duration_ms: f64,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        let c = TimingConfig::default();
        Self {
            enter_delay_ms: c.enter_delay_ms,
            slide_duration_ms: c.slide_duration_ms,
            restore_duration_ms: c.restore_duration_ms,
        }
    }
}

/// Scroll-fade mask.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sheet-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "sheet-config", serde(default))]
pub struct ScrollFadePolicy {
    /// Default: 50.
    pub fade_distance_px: f64,
}

impl Default for ScrollFadePolicy {
    fn default() -> Self {
        Self {
            fade_distance_px: ScrollFadeConfig::default().fade_distance_px,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a sheet policy.
#[derive(Debug)]
pub enum SheetConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "sheet-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "sheet-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for SheetConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "sheet-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "sheet-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for SheetConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "sheet-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "sheet-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
