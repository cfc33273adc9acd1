//! # Visibility state domain.
//!
//! Two types model the whole state of the engine:
//! - [`Visibility`] — the two-value state domain (`Visible` / `Hidden`);
//! - [`VisibilityState`] — the `current`/`previous` pair owned by the tracker.
//!
//! `None` in either field means "no signal processed yet". Once the first
//! signal has been processed (under the default unmapped policy), `current`
//! is always `Some(_)` and stays that way for the life of the tracker.
//!
//! # Example
//! ```rust
//! use pagevisor::{Visibility, VisibilityState};
//!
//! let mut state = VisibilityState::default();
//! assert_eq!(state.current, None);
//! assert!(!state.is_hidden());
//!
//! state.apply(Visibility::Hidden);
//! assert_eq!(state.current, Some(Visibility::Hidden));
//! assert_eq!(state.previous, None);
//! assert!(state.is_hidden());
//!
//! state.apply(Visibility::Visible);
//! assert_eq!(state.previous, Some(Visibility::Hidden));
//! ```

use std::fmt;

/// The two-value visibility domain.
///
/// There is deliberately no third variant: partially occluded surfaces
/// report as `Visible`, and the pre-init "unknown" condition is modeled as
/// `Option<Visibility>::None`, never as a state of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// The surface is currently shown to the user.
    Visible,
    /// The surface is currently hidden from the user.
    Hidden,
}

impl Visibility {
    /// Returns the lowercase wire name (`"visible"` / `"hidden"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::Hidden => "hidden",
        }
    }

    /// Parses a host-reported state string.
    ///
    /// Anything other than the two known names is `None`; hosts reporting
    /// extended states (`"prerender"` and friends) are treated as unknown.
    pub fn from_name(name: &str) -> Option<Visibility> {
        match name {
            "visible" => Some(Visibility::Visible),
            "hidden" => Some(Visibility::Hidden),
            _ => None,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `current`/`previous` state pair.
///
/// Owned exclusively by the tracker and mutated only inside its change
/// handler. Public callers always receive this by value — it is `Copy`, so a
/// held snapshot never observes later mutations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityState {
    /// State after the most recent processed signal (`None` before the first).
    pub current: Option<Visibility>,
    /// Value `current` held immediately before the most recent update.
    pub previous: Option<Visibility>,
}

impl VisibilityState {
    /// True when the most recent signal resolved to [`Visibility::Hidden`].
    ///
    /// Before the first signal this is `false` (an untracked surface is not
    /// reported as hidden).
    pub fn is_hidden(&self) -> bool {
        self.current == Some(Visibility::Hidden)
    }

    /// Shifts `current` into `previous` and records the new state.
    pub fn apply(&mut self, next: Visibility) {
        self.previous = self.current;
        self.current = Some(next);
    }
}
