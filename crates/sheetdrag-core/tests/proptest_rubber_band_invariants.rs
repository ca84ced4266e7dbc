//! Property-based invariant tests for the rubber-band resistance curve.
//!
//! 1. Identity region: `resist(d) == d` for `d` in `[0, threshold]`
//! 2. Monotonicity: `a < b` implies `resist(a) <= resist(b)`
//! 3. Bounded: `resist(d)` never exceeds `threshold + max_excess`
//! 4. Saturation: far-out distances differ by less than a pixel
//! 5. Never below zero, never NaN

use proptest::prelude::*;
use sheetdrag_core::rubber_band::{RubberBandConfig, resist};

// ── Strategies ──────────────────────────────────────────────────────────

fn distance() -> impl Strategy<Value = f64> {
    prop_oneof![0.0f64..=80.0, 80.0f64..=400.0, 400.0f64..=1.0e6]
}

fn ordered_pair() -> impl Strategy<Value = (f64, f64)> {
    (distance(), distance()).prop_map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Identity region
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn identity_below_threshold(d in 0.0f64..=80.0) {
        prop_assert_eq!(resist(d), d);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Monotonicity
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn monotone_non_decreasing((a, b) in ordered_pair()) {
        prop_assert!(resist(a) <= resist(b), "resist({a}) = {} > resist({b}) = {}", resist(a), resist(b));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3–5. Bounds
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn bounded_by_threshold_plus_max_excess(d in distance()) {
        let v = resist(d);
        prop_assert!(v <= 80.0 + 300.0);
        prop_assert!(v <= RubberBandConfig::default().ceiling() + 1e-9);
    }

    #[test]
    fn finite_and_non_negative(d in any::<f64>()) {
        let v = resist(d);
        prop_assert!(v.is_finite(), "resist({d}) = {v}");
        prop_assert!(v >= 0.0);
    }

    #[test]
    fn resisted_never_exceeds_raw(d in distance()) {
        prop_assert!(resist(d) <= d);
    }
}

#[test]
fn saturation_within_one_pixel() {
    assert!(resist(80.0 + 3_000.0) - resist(80.0 + 300_000.0) < 1.0);
    assert!((resist(80.0 + 300_000.0) - resist(80.0 + 3_000.0)).abs() < 1.0);
}

#[test]
fn custom_config_shifts_identity_region() {
    let config = RubberBandConfig {
        threshold_px: 40.0,
        ..RubberBandConfig::default()
    };
    assert_eq!(config.resist(40.0), 40.0);
    assert!(config.resist(100.0) < 100.0);
}
