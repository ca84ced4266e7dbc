#![forbid(unsafe_code)]

//! Scroll-fade mask with per-frame coalescing.
//!
//! The mask over the top of the sheet's content fades in as the content
//! scrolls: `opacity = min(scroll_top / fade_distance_px, 1)`.
//!
//! Scroll events arrive far faster than frames. [`ScrollFadeMask`] keeps only
//! the latest offset of a burst and asks the caller to schedule one
//! animation-frame callback for the whole burst:
//!
//! ```
//! use sheetdrag_core::scroll_fade::ScrollFadeMask;
//!
//! let mut mask = ScrollFadeMask::default();
//!
//! // First scroll of a burst requests a frame; later ones coalesce.
//! assert!(mask.push(10.0));
//! assert!(!mask.push(20.0));
//! assert!(!mask.push(25.0));
//!
//! // On the frame callback, only the latest offset is evaluated.
//! assert_eq!(mask.flush(), Some(0.5));
//! assert!(!mask.has_pending());
//! ```
//!
//! # Thread Safety
//!
//! Not thread-safe. Driven from the single UI event loop.

/// Scroll-fade parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollFadeConfig {
    /// Scroll distance over which the mask reaches full opacity (default: 50px).
    pub fade_distance_px: f64,
}

impl Default for ScrollFadeConfig {
    fn default() -> Self {
        Self {
            fade_distance_px: 50.0,
        }
    }
}

impl ScrollFadeConfig {
    /// Opacity for a given content scroll offset.
    #[must_use]
    pub fn opacity(&self, scroll_top: f64) -> f64 {
        if self.fade_distance_px <= 0.0 {
            return if scroll_top > 0.0 { 1.0 } else { 0.0 };
        }
        (scroll_top / self.fade_distance_px).clamp(0.0, 1.0)
    }

    /// Validate parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        if self.fade_distance_px > 0.0 {
            Vec::new()
        } else {
            vec![format!(
                "scroll_fade.fade_distance_px must be > 0, got {}",
                self.fade_distance_px
            )]
        }
    }
}

/// Coalescing evaluator for the scroll-fade mask.
#[derive(Debug, Clone, Default)]
pub struct ScrollFadeMask {
    config: ScrollFadeConfig,
    pending: Option<f64>,
    opacity: f64,
    coalesced: u32,
}

impl ScrollFadeMask {
    #[must_use]
    pub fn new(config: ScrollFadeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Record a scroll offset.
    ///
    /// Returns `true` when this is the first offset since the last flush,
    /// meaning the caller must schedule a frame callback.
    pub fn push(&mut self, scroll_top: f64) -> bool {
        let first = self.pending.is_none();
        if !first {
            self.coalesced = self.coalesced.saturating_add(1);
        }
        self.pending = Some(scroll_top);
        first
    }

    /// Evaluate the latest pending offset. Call from the frame callback.
    ///
    /// Returns the new opacity, or `None` if nothing was pending.
    pub fn flush(&mut self) -> Option<f64> {
        let scroll_top = self.pending.take()?;
        self.opacity = self.config.opacity(scroll_top);
        Some(self.opacity)
    }

    /// Whether a frame callback is outstanding.
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Opacity as of the last flush.
    #[inline]
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Scroll events absorbed into an already-pending frame.
    #[inline]
    #[must_use]
    pub fn coalesced_count(&self) -> u32 {
        self.coalesced
    }

    /// Drop any pending offset (teardown).
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_ramps_over_fade_distance() {
        let cfg = ScrollFadeConfig::default();
        assert_eq!(cfg.opacity(0.0), 0.0);
        assert_eq!(cfg.opacity(25.0), 0.5);
        assert_eq!(cfg.opacity(50.0), 1.0);
        assert_eq!(cfg.opacity(400.0), 1.0);
        assert_eq!(cfg.opacity(-8.0), 0.0);
    }

    #[test]
    fn burst_requests_one_frame() {
        let mut mask = ScrollFadeMask::default();
        let requests = (0..10).filter(|i| mask.push(f64::from(*i) * 3.0)).count();
        assert_eq!(requests, 1);
        assert_eq!(mask.coalesced_count(), 9);
        assert_eq!(mask.flush(), Some(27.0 / 50.0));
    }

    #[test]
    fn flush_without_pending_is_none() {
        let mut mask = ScrollFadeMask::default();
        assert_eq!(mask.flush(), None);
        assert_eq!(mask.opacity(), 0.0);
    }

    #[test]
    fn new_burst_after_flush_requests_again() {
        let mut mask = ScrollFadeMask::default();
        assert!(mask.push(10.0));
        mask.flush();
        assert!(mask.push(60.0));
        assert_eq!(mask.flush(), Some(1.0));
    }

    #[test]
    fn clear_drops_pending() {
        let mut mask = ScrollFadeMask::default();
        mask.push(10.0);
        mask.clear();
        assert!(!mask.has_pending());
        assert_eq!(mask.flush(), None);
    }
}
