#![forbid(unsafe_code)]

//! Published controller state.
//!
//! The renderer never polls the controller. It subscribes to an
//! [`Observable`]: the controller's [`SheetFrame`](sheetdrag_core::animation::SheetFrame)
//! stream, or a button's pressed flag in the
//! [`PressedRegistry`](crate::PressedRegistry). Publishing an unchanged frame
//! is free: equal values neither bump the version nor wake subscribers, so a
//! drag move that lands on the same offset repaints nothing.
//!
//! # Failure Modes
//!
//! - **Nested publish**: a subscriber reacting to a frame may publish again
//!   (for example, clear a pressed flag). No borrow is held while callbacks
//!   run, so the nested `set()` succeeds and notifies in turn.
//! - **Forgotten guard**: a renderer that unmounts without dropping its
//!   [`Subscription`] keeps its callback alive. Entries whose guard is gone
//!   are swept on the next publish.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;
use web_time::Instant;

type Listener<T> = Rc<dyn Fn(&T)>;
type ListenerRef<T> = Weak<dyn Fn(&T)>;

struct Slot<T> {
    value: T,
    version: u64,
    subscribers: Vec<ListenerRef<T>>,
}

/// One published value plus its subscribers.
///
/// Every clone is a handle to the same slot: the controller keeps one handle
/// and hands the others to renderers.
///
/// The version counts actual changes, so tests and hosts can tell whether a
/// call published anything.
pub struct Observable<T> {
    inner: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Slot {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Store `value` and notify if it differs from the current one.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Register `callback` for changes. Dropping the guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Listener<T> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        let (callbacks, value): (Vec<Listener<T>>, T) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let live = inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect();
            (live, inner.value.clone())
        };
        if callbacks.is_empty() {
            return;
        }

        let start = Instant::now();
        for cb in &callbacks {
            cb(&value);
        }
        trace!(
            target: "sheetdrag.observable",
            subscribers = callbacks.len(),
            duration_us = start.elapsed().as_micros() as u64,
            "observable propagated"
        );
    }
}

/// RAII guard for a subscriber callback.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
