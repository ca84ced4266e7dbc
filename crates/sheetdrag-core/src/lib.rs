// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: gesture math, scroll-phase disambiguation and sheet animation state.
//!
//! # Role in sheetdrag
//! `sheetdrag-core` is the host-agnostic half of the bottom-sheet engine. It
//! knows nothing about the DOM, timers or callbacks; every type here is driven
//! by plain values (pointer samples, scroll offsets, millisecond timestamps)
//! and answers with plain values (signals, decisions, frame styling).
//!
//! # Primary responsibilities
//! - **PointerSampler**: touch and mouse input normalized to `(y, timestamp)`.
//! - **ScrollPhaseCoordinator**: native scroll vs. sheet drag, per move.
//! - **RubberBandModel** / **DismissalDecisionEngine**: the pure math.
//! - **SheetGesture**: the recognizer composing the pieces above.
//! - **AnimationCoordinator**: lifecycle phases and derived frame values.
//! - **BodyScrollLock**: exclusive page scroll pinning with exact restore.
//!
//! # How it fits in the system
//! `sheetdrag-runtime` owns one [`gesture::SheetGesture`] and one
//! [`animation::AnimationCoordinator`] per open sheet, feeds them host events
//! and timer completions, and forwards the resulting haptic pulses and frames.

pub mod animation;
pub mod dismissal;
pub mod drag_session;
pub mod error;
pub mod gesture;
pub mod haptics;
pub mod logging;
pub mod pointer;
pub mod rubber_band;
pub mod scroll_fade;
pub mod scroll_lock;
pub mod scroll_phase;

pub use error::SheetError;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};
