#![forbid(unsafe_code)]

//! Runtime: the bottom-sheet controller and its host-facing plumbing.
//!
//! # Role in sheetdrag
//! `sheetdrag-runtime` turns the pure engine in `sheetdrag-core` into a
//! controller a UI layer can mount. It owns the lifecycle timers, the shared
//! body scroll lock, haptic delivery, document listeners for mouse drags and
//! the published frame stream.
//!
//! # Primary responsibilities
//! - **SheetController**: one sheet lifecycle, open to closed.
//! - **ModalSequencer**: a single active-sheet slot with close-then-open
//!   chaining.
//! - **PressedRegistry**: per-button pressed flags cleared on modal open.
//! - **SheetPolicy**: TOML/JSON tuning behind the `sheet-config` feature.

pub mod controller;
pub mod listeners;
pub mod observable;
pub mod pressed;
pub mod sequencer;
pub mod sheet_config;
pub mod timers;

pub use controller::{CloseReason, SheetController, SheetSettings};
pub use listeners::{DocumentListeners, ListenerId};
pub use observable::{Observable, Subscription};
pub use pressed::PressedRegistry;
pub use sequencer::{ModalSequencer, SequencerError, SheetKind, SwitchOutcome};
pub use sheet_config::{SheetConfigError, SheetPolicy};
