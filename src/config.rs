//! # Tracker configuration.
//!
//! [`TrackerConfig`] centralizes the two knobs the engine exposes: the
//! namespace used for generated subscription ids and the policy applied to
//! signals with no entry in the kind-to-state table.
//!
//! # Example
//! ```rust
//! use pagevisor::{TrackerConfig, UnmappedPolicy};
//!
//! let mut cfg = TrackerConfig::default();
//! cfg.id_prefix = "overlay-visibility".into();
//! cfg.unmapped = UnmappedPolicy::NoChange;
//!
//! assert_eq!(cfg.unmapped, UnmappedPolicy::NoChange);
//! ```

use std::sync::Arc;

/// Resolution policy for signals with no entry in the kind-to-state table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnmappedPolicy {
    /// Treat an unmapped signal as a transition to `Visible`.
    ///
    /// This is the historical behavior of focus-based visibility shims and
    /// the default here. It errs toward "shown": a surface that receives
    /// events it cannot classify is assumed to be in front of the user.
    #[default]
    AssumeVisible,
    /// Leave the state pair untouched. Subscribers are still notified, with
    /// the unchanged state.
    NoChange,
}

impl UnmappedPolicy {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            UnmappedPolicy::AssumeVisible => "assume_visible",
            UnmappedPolicy::NoChange => "no_change",
        }
    }
}

/// Configuration for a [`VisibilityTracker`](crate::VisibilityTracker).
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    /// Namespace prefix for generated subscription ids
    /// (ids look like `page-visibility-0`, `page-visibility-1`, …).
    pub id_prefix: Arc<str>,
    /// Policy for signals the kind-to-state table does not cover.
    pub unmapped: UnmappedPolicy,
}

impl Default for TrackerConfig {
    /// Provides a default configuration:
    /// - `id_prefix = "page-visibility"`
    /// - `unmapped = UnmappedPolicy::AssumeVisible`
    fn default() -> Self {
        Self {
            id_prefix: Arc::from("page-visibility"),
            unmapped: UnmappedPolicy::default(),
        }
    }
}
