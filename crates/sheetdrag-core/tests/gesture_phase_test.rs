//! Scroll-vs-drag disambiguation across whole gestures.
//!
//! Drives [`SheetGesture`] with sampled touch and mouse streams and checks
//! the phase rules that only show up over many events:
//!
//! - once content is scrolled (`scroll_top > 0`), no move is a drag until
//!   the content is back at the top
//! - only drag moves are intercepted
//! - every session opened is closed exactly once
//! - scroll, reverse, reach the top, pull down: one continuous gesture
//!   becomes a drag

use proptest::prelude::*;
use sheetdrag_core::gesture::{GestureConfig, SheetGesture, SheetSignal};
use sheetdrag_core::haptics::HapticIntensity;
use sheetdrag_core::pointer::{PointerPhase, PointerSampler, RawPointerEvent};
use sheetdrag_core::scroll_phase::ScrollPhase;

const SCREEN: f64 = 800.0;

struct Driver {
    sampler: PointerSampler,
    gesture: SheetGesture,
    signals: Vec<SheetSignal>,
}

impl Driver {
    fn new() -> Self {
        Self {
            sampler: PointerSampler::with_clock(|| 0.0),
            gesture: SheetGesture::new(GestureConfig::default()),
            signals: Vec::new(),
        }
    }

    fn feed(&mut self, raw: RawPointerEvent, scroll_top: f64) -> (bool, ScrollPhase) {
        let Some(event) = self.sampler.sample(&raw) else {
            return (false, self.gesture.phase());
        };
        let out = self.gesture.process(&event, scroll_top, SCREEN);
        self.signals.extend(out.signals);
        (out.intercept, out.phase)
    }
}

// ── Scenario ────────────────────────────────────────────────────────────

#[test]
fn scroll_then_reverse_then_drag_in_one_gesture() {
    let mut d = Driver::new();
    d.feed(RawPointerEvent::touch(PointerPhase::Down, 400.0, 0.0), 120.0);

    // Finger moves up: content scrolls further.
    let (i, p) = d.feed(RawPointerEvent::touch(PointerPhase::Move, 380.0, 16.0), 140.0);
    assert!(!i);
    assert_eq!(p, ScrollPhase::Scroll);

    // Reverse: content scrolls back toward the top.
    let (i, p) = d.feed(RawPointerEvent::touch(PointerPhase::Move, 420.0, 32.0), 60.0);
    assert!(!i);
    assert_eq!(p, ScrollPhase::Scroll);

    // Top reached, still pulling down: the sheet takes over.
    let (i, p) = d.feed(RawPointerEvent::touch(PointerPhase::Move, 500.0, 48.0), 0.0);
    assert!(i);
    assert_eq!(p, ScrollPhase::Drag);

    // Anchored at the gesture's first touch, not the takeover point.
    assert!(matches!(
        d.signals.first(),
        Some(SheetSignal::DragStarted { anchor }) if anchor.y == 400.0
    ));
    assert!(matches!(
        d.signals.get(1),
        Some(SheetSignal::DragMoved { raw_distance, .. }) if *raw_distance == 100.0
    ));
}

#[test]
fn mouse_drag_matches_touch_drag() {
    let run = |make: fn(PointerPhase, f64, f64) -> RawPointerEvent| {
        let mut d = Driver::new();
        d.feed(make(PointerPhase::Down, 100.0, 0.0), 0.0);
        for (i, y) in [110.0, 150.0, 260.0].into_iter().enumerate() {
            d.feed(make(PointerPhase::Move, y, 50.0 * (i as f64 + 1.0)), 0.0);
        }
        d.feed(make(PointerPhase::Up, 260.0, 400.0), 0.0);
        d.signals
    };
    assert_eq!(run(RawPointerEvent::touch), run(RawPointerEvent::mouse));
}

#[test]
fn crossing_rearm_point_twice_pulses_twice() {
    let mut d = Driver::new();
    d.feed(RawPointerEvent::touch(PointerPhase::Down, 0.0, 0.0), 0.0);
    for (i, y) in [10.0, 120.0, 90.0, 130.0].into_iter().enumerate() {
        d.feed(RawPointerEvent::touch(PointerPhase::Move, y, i as f64 * 10.0 + 10.0), 0.0);
    }
    let mediums = d
        .signals
        .iter()
        .filter(|s| matches!(s, SheetSignal::Haptic(HapticIntensity::Medium)))
        .count();
    assert_eq!(mediums, 2);
}

// ── Properties ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Step {
    Move { dy: f64, scroll_top: f64 },
    Up,
    Down { y: f64, scroll_top: f64 },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let scroll_top = prop_oneof![3 => Just(0.0), 2 => 1.0f64..400.0];
    prop_oneof![
        8 => (-60.0f64..60.0, scroll_top.clone())
            .prop_map(|(dy, scroll_top)| Step::Move { dy, scroll_top }),
        1 => Just(Step::Up),
        1 => (0.0f64..800.0, scroll_top).prop_map(|(y, scroll_top)| Step::Down { y, scroll_top }),
    ]
}

proptest! {
    #[test]
    fn phase_invariants_hold(steps in prop::collection::vec(step_strategy(), 1..80)) {
        let mut d = Driver::new();
        let mut y = 300.0;
        let mut t = 0.0;

        d.feed(RawPointerEvent::touch(PointerPhase::Down, y, t), 0.0);

        for step in steps {
            t += 16.0;
            match step {
                Step::Move { dy, scroll_top } => {
                    y += dy;
                    let (intercept, phase) =
                        d.feed(RawPointerEvent::touch(PointerPhase::Move, y, t), scroll_top);
                    // Scrolled content always keeps the native scroll.
                    if scroll_top > 0.0 {
                        prop_assert_ne!(phase, ScrollPhase::Drag);
                    }
                    prop_assert_eq!(intercept, phase == ScrollPhase::Drag);
                }
                Step::Up => {
                    let (intercept, phase) =
                        d.feed(RawPointerEvent::touch_end(t), 0.0);
                    prop_assert!(!intercept);
                    prop_assert_eq!(phase, ScrollPhase::Scroll);
                    prop_assert!(!d.gesture.is_dragging());
                }
                Step::Down { y: start, scroll_top } => {
                    y = start;
                    d.feed(RawPointerEvent::touch(PointerPhase::Down, y, t), scroll_top);
                }
            }
        }
        d.feed(RawPointerEvent::touch_end(t + 16.0), 0.0);

        // Sessions open and close in strict alternation.
        let mut open = false;
        for s in &d.signals {
            match s {
                SheetSignal::DragStarted { .. } => {
                    prop_assert!(!open);
                    open = true;
                }
                SheetSignal::DragMoved { raw_distance, visual_offset } => {
                    prop_assert!(open);
                    prop_assert!(*raw_distance >= 0.0);
                    prop_assert!(*visual_offset <= *raw_distance);
                }
                SheetSignal::Released(_) | SheetSignal::Cancelled => {
                    prop_assert!(open);
                    open = false;
                }
                SheetSignal::Haptic(i) => prop_assert_eq!(*i, HapticIntensity::Medium),
            }
        }
        prop_assert!(!open);
    }
}
