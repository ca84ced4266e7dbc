#![forbid(unsafe_code)]

//! Body scroll lock: pin the page while a sheet is open, restore it exactly.
//!
//! Opening a sheet captures the page's scroll offset, pins the document body
//! at `top = -offset` and blocks touch-driven page scroll, leaving the sheet's
//! own container as the only scrollable region. Releasing undoes all three
//! and scrolls the page back to the captured offset.
//!
//! # Invariants
//!
//! 1. At most one lock is held per page. A second [`lock`](BodyScrollLock::lock)
//!    fails with [`SheetError::ScrollLockHeld`] and leaves the page untouched.
//! 2. [`unlock`](BodyScrollLock::unlock) without a held lock is a no-op.
//! 3. After `lock` then `unlock`, the page offset equals the captured
//!    offset, whatever happened to the sheet's own scroll container.
//! 4. Dropping a [`BodyScrollLock`] releases a held lock.
//!
//! # Sharing
//!
//! The page body is one global resource, so sheets share one lock through
//! [`SharedScrollLock`]. Everything runs on the UI event loop; `Rc<RefCell<_>>`
//! is the sharing primitive.

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(feature = "tracing")]
use crate::logging::{debug, warn};
#[cfg(not(feature = "tracing"))]
use crate::{debug, warn};

use crate::error::SheetError;

/// The host page as seen by the scroll lock.
pub trait PageSurface {
    /// Current page scroll offset.
    fn scroll_y(&self) -> f64;
    /// Scroll the page to `y`.
    fn scroll_to(&mut self, y: f64);
    /// Fix the body in place, offset by `top` (negative of the scroll offset).
    fn pin_body(&mut self, top: f64);
    /// Undo [`pin_body`](PageSurface::pin_body).
    fn unpin_body(&mut self);
    /// Block or allow touch-driven page scrolling.
    fn set_touch_scroll_blocked(&mut self, blocked: bool);
}

/// Exclusive scroll lock over one page.
#[derive(Debug)]
pub struct BodyScrollLock<P: PageSurface> {
    page: P,
    captured: Option<f64>,
}

/// The page's single lock, shared by every sheet on it.
pub type SharedScrollLock<P> = Rc<RefCell<BodyScrollLock<P>>>;

impl<P: PageSurface> BodyScrollLock<P> {
    #[must_use]
    pub fn new(page: P) -> Self {
        Self {
            page,
            captured: None,
        }
    }

    /// Wrap `page` in a shareable lock.
    #[must_use]
    pub fn shared(page: P) -> SharedScrollLock<P> {
        Rc::new(RefCell::new(Self::new(page)))
    }

    /// Capture the offset and pin the page.
    pub fn lock(&mut self) -> Result<(), SheetError> {
        if let Some(captured_offset) = self.captured {
            warn!(
                target: "sheetdrag.scroll_lock",
                captured_offset = captured_offset,
                "nested body scroll lock rejected"
            );
            return Err(SheetError::ScrollLockHeld { captured_offset });
        }

        let offset = self.page.scroll_y();
        self.page.pin_body(-offset);
        self.page.set_touch_scroll_blocked(true);
        self.captured = Some(offset);
        debug!(
            target: "sheetdrag.scroll_lock",
            offset = offset,
            "body scroll pinned"
        );
        Ok(())
    }

    /// Release the pin and restore the captured offset. No-op when unlocked.
    pub fn unlock(&mut self) {
        let Some(offset) = self.captured.take() else {
            return;
        };
        // Reverse order of `lock`.
        self.page.set_touch_scroll_blocked(false);
        self.page.unpin_body();
        self.page.scroll_to(offset);
        debug!(
            target: "sheetdrag.scroll_lock",
            offset = offset,
            "body scroll released"
        );
    }

    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.captured.is_some()
    }

    /// Offset captured by the held lock.
    #[inline]
    #[must_use]
    pub fn captured_offset(&self) -> Option<f64> {
        self.captured
    }

    #[inline]
    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    #[inline]
    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }
}

impl<P: PageSurface> Drop for BodyScrollLock<P> {
    fn drop(&mut self) {
        self.unlock();
    }
}

/// In-memory page for tests. Pinning freezes `scroll_y` the way a
/// `position: fixed` body does.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakePage {
    pub scroll_y: f64,
    pub pinned_top: Option<f64>,
    pub touch_blocked: bool,
}

#[cfg(any(test, feature = "test-helpers"))]
impl FakePage {
    #[must_use]
    pub fn scrolled_to(scroll_y: f64) -> Self {
        Self {
            scroll_y,
            ..Self::default()
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl PageSurface for FakePage {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y;
    }

    fn pin_body(&mut self, top: f64) {
        self.pinned_top = Some(top);
        // A fixed body reports no document scroll.
        self.scroll_y = 0.0;
    }

    fn unpin_body(&mut self) {
        self.pinned_top = None;
    }

    fn set_touch_scroll_blocked(&mut self, blocked: bool) {
        self.touch_blocked = blocked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_pins_at_negative_offset() {
        let mut lock = BodyScrollLock::new(FakePage::scrolled_to(640.0));
        lock.lock().unwrap();
        assert_eq!(lock.page().pinned_top, Some(-640.0));
        assert!(lock.page().touch_blocked);
        assert_eq!(lock.captured_offset(), Some(640.0));
    }

    #[test]
    fn unlock_restores_exact_offset() {
        let mut lock = BodyScrollLock::new(FakePage::scrolled_to(640.0));
        lock.lock().unwrap();
        lock.page_mut().scroll_y = 3.0;
        lock.unlock();
        assert_eq!(lock.page().scroll_y, 640.0);
        assert_eq!(lock.page().pinned_top, None);
        assert!(!lock.page().touch_blocked);
    }

    #[test]
    fn nested_lock_rejected() {
        let mut lock = BodyScrollLock::new(FakePage::scrolled_to(10.0));
        lock.lock().unwrap();
        assert_eq!(
            lock.lock(),
            Err(SheetError::ScrollLockHeld {
                captured_offset: 10.0
            })
        );
        assert_eq!(lock.page().pinned_top, Some(-10.0));
    }

    #[test]
    fn unlock_without_lock_is_noop() {
        let mut lock = BodyScrollLock::new(FakePage::scrolled_to(42.0));
        lock.unlock();
        assert_eq!(lock.page(), &FakePage::scrolled_to(42.0));
    }

    #[test]
    fn relock_after_unlock_captures_fresh_offset() {
        let mut lock = BodyScrollLock::new(FakePage::scrolled_to(100.0));
        lock.lock().unwrap();
        lock.unlock();
        lock.page_mut().scroll_y = 250.0;
        lock.lock().unwrap();
        assert_eq!(lock.captured_offset(), Some(250.0));
    }

    #[test]
    fn shared_lock_released_on_last_drop() {
        let shared = BodyScrollLock::shared(FakePage::scrolled_to(75.0));
        shared.borrow_mut().lock().unwrap();
        let other = Rc::clone(&shared);
        drop(shared);
        assert!(other.borrow().is_locked());
        other.borrow_mut().unlock();
        assert_eq!(other.borrow().page().scroll_y, 75.0);
    }
}
