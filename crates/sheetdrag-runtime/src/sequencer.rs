#![forbid(unsafe_code)]

//! Single active-sheet slot and close-then-open chaining.
//!
//! Only one sheet may be visible at a time. [`ModalSequencer`] makes that
//! explicit: [`open`](ModalSequencer::open) claims the slot and fails while
//! another sheet holds it. [`switch_to`](ModalSequencer::switch_to) queues
//! the next sheet behind the current one; the queued sheet only gets the
//! slot when the current one reports [`closed`](ModalSequencer::closed)
//! from its `on_close` callback, after its exit animation and scroll
//! restoration have finished.
//!
//! ```text
//!   idle ──open(a)──▶ active(a) ──switch_to(b)──▶ active(a), pending(b)
//!    ▲                   │                                │
//!    └────closed(a)──────┘                     closed(a): active(b)
//! ```

use tracing::{debug, warn};

use crate::pressed::PressedRegistry;

/// The concrete sheets of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKind {
    Subscription,
    Login,
    SignUp,
    PasswordReset,
}

impl SheetKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::Login => "login",
            Self::SignUp => "sign_up",
            Self::PasswordReset => "password_reset",
        }
    }
}

impl std::fmt::Display for SheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerError {
    /// A sheet was opened while another holds the slot.
    SheetAlreadyActive {
        active: SheetKind,
        requested: SheetKind,
    },
}

impl std::fmt::Display for SequencerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SheetAlreadyActive { active, requested } => write!(
                f,
                "cannot open {requested}: {active} is still active"
            ),
        }
    }
}

impl std::error::Error for SequencerError {}

/// Result of [`ModalSequencer::switch_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The slot was free; the sheet owns it now and may open immediately.
    Opened(SheetKind),
    /// The caller must close `closing`; the next sheet opens after it closes.
    Deferred { closing: SheetKind },
}

/// Owner of the single active-sheet slot.
#[derive(Debug, Clone, Default)]
pub struct ModalSequencer {
    active: Option<SheetKind>,
    pending: Option<SheetKind>,
    pressed: Option<PressedRegistry>,
}

impl ModalSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the flags in `pressed` whenever a sheet claims the slot.
    ///
    /// The registry is shared: buttons registered on any clone later are
    /// cleared too.
    #[must_use]
    pub fn with_pressed(mut self, pressed: PressedRegistry) -> Self {
        self.pressed = Some(pressed);
        self
    }

    /// Claim the slot for `kind`.
    pub fn open(&mut self, kind: SheetKind) -> Result<(), SequencerError> {
        if let Some(active) = self.active {
            warn!(
                target: "sheetdrag.sheet",
                active = active.as_str(),
                requested = kind.as_str(),
                "second sheet rejected while one is active"
            );
            return Err(SequencerError::SheetAlreadyActive {
                active,
                requested: kind,
            });
        }
        self.claim(kind);
        Ok(())
    }

    /// Open `next` now if the slot is free, otherwise after the active sheet
    /// closes. A later `switch_to` replaces an earlier pending sheet.
    pub fn switch_to(&mut self, next: SheetKind) -> SwitchOutcome {
        match self.active {
            None => {
                self.claim(next);
                SwitchOutcome::Opened(next)
            }
            Some(closing) => {
                self.pending = Some(next);
                debug!(
                    target: "sheetdrag.sheet",
                    sheet = closing.as_str(),
                    next = next.as_str(),
                    "sheet switch queued behind close"
                );
                SwitchOutcome::Deferred { closing }
            }
        }
    }

    /// Report that `kind` finished closing. Returns the sheet that now owns
    /// the slot and must be opened, if one was queued.
    pub fn closed(&mut self, kind: SheetKind) -> Option<SheetKind> {
        if self.active != Some(kind) {
            return None;
        }
        self.active = None;
        let next = self.pending.take()?;
        self.claim(next);
        Some(next)
    }

    #[must_use]
    pub fn active(&self) -> Option<SheetKind> {
        self.active
    }

    #[must_use]
    pub fn pending(&self) -> Option<SheetKind> {
        self.pending
    }

    /// The registry cleared on open, if any.
    #[must_use]
    pub fn pressed(&self) -> Option<&PressedRegistry> {
        self.pressed.as_ref()
    }

    fn claim(&mut self, kind: SheetKind) {
        self.active = Some(kind);
        if let Some(pressed) = &self.pressed {
            pressed.reset_all();
        }
        debug!(target: "sheetdrag.sheet", sheet = kind.as_str(), "sheet slot claimed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_open_rejected() {
        let mut seq = ModalSequencer::new();
        seq.open(SheetKind::Login).unwrap();
        assert_eq!(
            seq.open(SheetKind::SignUp),
            Err(SequencerError::SheetAlreadyActive {
                active: SheetKind::Login,
                requested: SheetKind::SignUp,
            })
        );
        assert_eq!(seq.active(), Some(SheetKind::Login));
    }

    #[test]
    fn switch_waits_for_close() {
        let mut seq = ModalSequencer::new();
        seq.open(SheetKind::Login).unwrap();
        assert_eq!(
            seq.switch_to(SheetKind::PasswordReset),
            SwitchOutcome::Deferred {
                closing: SheetKind::Login
            }
        );
        assert_eq!(seq.active(), Some(SheetKind::Login));
        assert_eq!(seq.closed(SheetKind::Login), Some(SheetKind::PasswordReset));
        assert_eq!(seq.active(), Some(SheetKind::PasswordReset));
        assert_eq!(seq.pending(), None);
    }

    #[test]
    fn switch_on_free_slot_opens() {
        let mut seq = ModalSequencer::new();
        assert_eq!(
            seq.switch_to(SheetKind::Subscription),
            SwitchOutcome::Opened(SheetKind::Subscription)
        );
    }

    #[test]
    fn closed_for_inactive_sheet_ignored() {
        let mut seq = ModalSequencer::new();
        seq.open(SheetKind::Login).unwrap();
        seq.switch_to(SheetKind::SignUp);
        assert_eq!(seq.closed(SheetKind::Subscription), None);
        assert_eq!(seq.pending(), Some(SheetKind::SignUp));
    }

    #[test]
    fn claim_resets_pressed() {
        let pressed = PressedRegistry::new();
        let button = pressed.register("open_login");
        pressed.press("open_login");
        let mut seq = ModalSequencer::new().with_pressed(pressed);
        seq.open(SheetKind::Login).unwrap();
        assert!(!button.get());
    }

    #[test]
    fn button_mounted_after_wiring_is_reset() {
        let pressed = PressedRegistry::new();
        let mut seq = ModalSequencer::new().with_pressed(pressed.clone());
        let button = pressed.register("open_signup");
        pressed.press("open_signup");
        seq.open(SheetKind::SignUp).unwrap();
        assert!(!button.get());
        assert!(!pressed.is_pressed("open_signup"));

        // Buttons can also be mounted through the sequencer's handle.
        let late = seq.pressed().unwrap().register("open_reset");
        late.set(true);
        seq.closed(SheetKind::SignUp);
        seq.open(SheetKind::PasswordReset).unwrap();
        assert!(!late.get());
    }

    #[test]
    fn error_display_names_both_sheets() {
        let err = SequencerError::SheetAlreadyActive {
            active: SheetKind::Login,
            requested: SheetKind::SignUp,
        };
        assert_eq!(err.to_string(), "cannot open sign_up: login is still active");
    }
}
