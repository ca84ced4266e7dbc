#![forbid(unsafe_code)]

//! Per-button pressed state.
//!
//! Buttons that trigger a modal can be left visually pressed when the modal
//! steals the pointer before `pointerup` arrives. Each button owns an
//! [`Observable<bool>`] registered here, and opening a modal clears every
//! flag at once through [`PressedRegistry::reset_all`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

use crate::observable::Observable;

/// Named pressed flags for the interactive elements of one screen.
///
/// Clones share one set of flags, so a button mounted after the registry was
/// handed to a [`ModalSequencer`](crate::ModalSequencer) is still cleared.
#[derive(Debug, Clone, Default)]
pub struct PressedRegistry {
    flags: Rc<RefCell<BTreeMap<String, Observable<bool>>>>,
}

impl PressedRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag for `name`, created unpressed on first use.
    pub fn register(&self, name: &str) -> Observable<bool> {
        self.flags
            .borrow_mut()
            .entry(name.to_owned())
            .or_insert_with(|| Observable::new(false))
            .clone()
    }

    /// Mark `name` pressed. Unknown names are registered.
    pub fn press(&self, name: &str) {
        self.register(name).set(true);
    }

    /// Mark `name` released. Unknown names are ignored.
    pub fn release(&self, name: &str) {
        if let Some(flag) = self.flag(name) {
            flag.set(false);
        }
    }

    #[must_use]
    pub fn is_pressed(&self, name: &str) -> bool {
        self.flag(name).is_some_and(|flag| flag.get())
    }

    /// Release every flag. Returns how many were pressed.
    pub fn reset_all(&self) -> usize {
        // Subscribers may register buttons; no borrow is held while notifying.
        let pressed: Vec<Observable<bool>> = self
            .flags
            .borrow()
            .values()
            .filter(|flag| flag.get())
            .cloned()
            .collect();
        for flag in &pressed {
            flag.set(false);
        }
        if !pressed.is_empty() {
            debug!(
                target: "sheetdrag.sheet",
                released = pressed.len(),
                "stale pressed states cleared"
            );
        }
        pressed.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.borrow().is_empty()
    }

    fn flag(&self, name: &str) -> Option<Observable<bool>> {
        self.flags.borrow().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_returns_shared_flag() {
        let reg = PressedRegistry::new();
        let a = reg.register("login");
        reg.press("login");
        assert!(a.get());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn reset_all_releases_pressed_only() {
        let reg = PressedRegistry::new();
        let login = reg.register("login");
        let signup = reg.register("signup");
        reg.press("login");
        assert_eq!(reg.reset_all(), 1);
        assert!(!login.get());
        assert!(!signup.get());
        assert_eq!(signup.version(), 0);
    }

    #[test]
    fn clones_share_flags() {
        let reg = PressedRegistry::new();
        let handle = reg.clone();
        let late = handle.register("open_signup");
        handle.press("open_signup");
        assert!(reg.is_pressed("open_signup"));
        assert_eq!(reg.reset_all(), 1);
        assert!(!late.get());
        assert_eq!(handle.len(), 1);
    }

    #[test]
    fn subscriber_may_register_during_reset() {
        let reg = PressedRegistry::new();
        let flag = reg.register("login");
        let inner = reg.clone();
        let _sub = flag.subscribe(move |_| {
            inner.register("mounted_by_subscriber");
        });
        reg.press("login");
        assert_eq!(reg.reset_all(), 1);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn release_unknown_is_ignored() {
        let reg = PressedRegistry::new();
        reg.release("missing");
        assert!(!reg.is_pressed("missing"));
        assert!(reg.is_empty());
    }
}
