//! # Error types reported by host environments.
//!
//! The engine itself never raises: every edge case on its operation surface
//! (disposed subscribe, unknown unsubscribe id, unmapped signal kind) resolves
//! to a silent, documented fallback. [`HostError`] exists for [`Host`]
//! implementations — listener registration against a real environment can
//! fail, and the capability layer logs such failures at `warn` and moves on.
//!
//! [`Host`]: crate::Host

use thiserror::Error;

/// # Errors produced by host listener registration.
///
/// Returned by [`Host`](crate::Host) registration methods. The tracker never
/// propagates these; they surface only in logs.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HostError {
    /// The host does not support this registration mechanism at all.
    #[error("listener registration not supported for '{event}'")]
    Unsupported {
        /// The event name that was being registered.
        event: String,
    },

    /// Registration was attempted but the host rejected it.
    #[error("listener registration failed for '{event}': {reason}")]
    Registration {
        /// The event name that was being registered.
        event: String,
        /// Host-specific failure description.
        reason: String,
    },
}

impl HostError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use pagevisor::HostError;
    ///
    /// let err = HostError::Unsupported { event: "focusin".into() };
    /// assert_eq!(err.as_label(), "host_unsupported");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HostError::Unsupported { .. } => "host_unsupported",
            HostError::Registration { .. } => "host_registration_failed",
        }
    }

    /// Shorthand for an [`HostError::Unsupported`] value.
    pub fn unsupported(event: impl Into<String>) -> Self {
        HostError::Unsupported {
            event: event.into(),
        }
    }
}
