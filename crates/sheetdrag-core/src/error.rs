#![forbid(unsafe_code)]

//! Error taxonomy for the sheet engine.
//!
//! The taxonomy is deliberately narrow. Invalid release timing is clamped
//! rather than reported, and a redundant close is a no-op rather than an
//! error, so neither appears here.

/// Errors surfaced by the sheet engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetError {
    /// A second body scroll lock was requested while one is already held.
    ///
    /// Nested locks are a precondition violation: only one sheet may pin the
    /// page at a time.
    ScrollLockHeld {
        /// Page offset captured by the lock that is already active.
        captured_offset: f64,
    },
    /// The host has no haptic capability. Always swallowed by
    /// [`HapticPort`](crate::haptics::HapticPort).
    HapticUnavailable,
    /// Configuration values out of range.
    InvalidConfig(Vec<String>),
}

impl std::fmt::Display for SheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScrollLockHeld { captured_offset } => write!(
                f,
                "body scroll lock already held (captured offset {captured_offset}px)"
            ),
            Self::HapticUnavailable => write!(f, "haptic feedback unavailable"),
            Self::InvalidConfig(errors) => {
                write!(f, "invalid sheet config: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for SheetError {}
