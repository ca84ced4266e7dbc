#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sheetdrag_core::animation::{AnimationPhase, SheetTransform, Transition};
use sheetdrag_core::pointer::{InputSource, PointerPhase, RawPointerEvent};
use sheetdrag_core::scroll_lock::{BodyScrollLock, FakePage};
use sheetdrag_runtime::{CloseReason, SheetController, SheetKind, SheetSettings};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Arbitrary)]
enum Op {
    Pointer {
        mouse: bool,
        phase: u8,
        y: Option<i16>,
        dt: u8,
        scroll_top: i16,
    },
    Scroll(i16),
    Frame,
    Tick(u16),
    Complete(bool),
    Close,
    Open(bool),
}

fuzz_target!(|ops: Vec<Op>| {
    let lock = BodyScrollLock::shared(FakePage::scrolled_to(321.0));
    let closes = Rc::new(Cell::new(0u32));
    let c = Rc::clone(&closes);
    let Ok(sheet) = SheetController::new(
        SheetKind::Subscription,
        SheetSettings::default(),
        Rc::clone(&lock),
        move || c.set(c.get() + 1),
    ) else {
        return;
    };
    let mut sheet = sheet.with_screen_height(800.0);
    let mut now = 0.0;
    let mut lifecycles = 0u32;

    for op in ops.into_iter().take(512) {
        let before = sheet.phase();
        match op {
            Op::Pointer {
                mouse,
                phase,
                y,
                dt,
                scroll_top,
            } => {
                now += f64::from(dt);
                let raw = RawPointerEvent {
                    source: if mouse {
                        InputSource::Mouse
                    } else {
                        InputSource::Touch
                    },
                    phase: match phase % 4 {
                        0 => PointerPhase::Down,
                        1 => PointerPhase::Move,
                        2 => PointerPhase::Up,
                        _ => PointerPhase::Cancel,
                    },
                    client_y: y.map(f64::from),
                    timestamp_ms: Some(now),
                };
                let intercept = sheet.pointer(&raw, f64::from(scroll_top));
                if intercept {
                    assert!(scroll_top <= 0, "intercepted a scrolled container");
                }
            }
            Op::Scroll(top) => {
                sheet.on_content_scroll(f64::from(top));
            }
            Op::Frame => sheet.animation_frame(),
            Op::Tick(dt) => {
                now += f64::from(dt);
                sheet.tick(now);
            }
            Op::Complete(enter) => sheet.transition_complete(if enter {
                Transition::Enter
            } else {
                Transition::Exit
            }),
            Op::Close => {
                sheet.request_close(CloseReason::Backdrop, now);
            }
            Op::Open(open) => {
                let _ = sheet.set_open(open, now);
            }
        }

        // A lifecycle starts whenever the sheet leaves Closed, or a queued
        // reopen takes over straight from Exiting.
        let after = sheet.phase();
        let winding_down = |p: AnimationPhase| matches!(p, AnimationPhase::Closed | AnimationPhase::Exiting);
        if winding_down(before) && !winding_down(after) {
            lifecycles += 1;
        }

        // Post-conditions after every operation.
        let frame = sheet.frame();
        assert!((0.0..=1.0).contains(&frame.backdrop_opacity));
        assert!((0.0..=1.0).contains(&frame.mask_opacity));
        if let SheetTransform::Offset(offset) = frame.transform {
            assert!(offset >= 0.0, "sheet dragged above rest: {offset}");
        }
        assert_eq!(frame.dragging, sheet.phase() == AnimationPhase::Dragging);
        assert_eq!(lock.borrow().is_locked(), sheet.is_open());
        assert!(closes.get() <= lifecycles, "on_close ran more than once per lifecycle");
    }

    drop(sheet);
    assert!(!lock.borrow().is_locked());
    assert_eq!(lock.borrow().page().scroll_y, 321.0);
});
