//! # Raw signals delivered by the host environment.
//!
//! A [`Signal`] is one raw event as the host delivered it: its [`SignalKind`]
//! plus a monotonic sequence number and a wall-clock timestamp. The tracker
//! never mutates signals; it maps them into the visibility domain and hands
//! them to subscribers as-is.
//!
//! ## Mapping rules
//! The fixed kind-to-state table lives in [`SignalKind::mapped_state`]:
//! ```text
//! focus, focusin, pageshow   → visible
//! blur, focusout, pagehide   → hidden
//! visibilitychange, other    → unmapped (resolved by the tracker's policy;
//!                              in native mode the live flag is re-read and
//!                              the signal payload is ignored entirely)
//! ```
//!
//! # Example
//! ```rust
//! use pagevisor::{SignalKind, Visibility};
//!
//! assert_eq!(SignalKind::Blur.mapped_state(), Some(Visibility::Hidden));
//! assert_eq!(SignalKind::PageShow.mapped_state(), Some(Visibility::Visible));
//! assert_eq!(SignalKind::VisibilityChange.mapped_state(), None);
//!
//! assert_eq!(SignalKind::from_name("focusin"), SignalKind::FocusIn);
//! assert_eq!(SignalKind::from_name("onfocusout"), SignalKind::FocusOut);
//! assert_eq!(SignalKind::from_name("webkitvisibilitychange"), SignalKind::VisibilityChange);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::state::Visibility;

/// Global sequence counter for signal ordering.
static SIGNAL_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of raw host events.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Window or element gained focus.
    Focus,
    /// Focus entered the document (legacy focus-tracking notification).
    FocusIn,
    /// The page was shown (navigation/bfcache restore).
    PageShow,
    /// Window or element lost focus.
    Blur,
    /// Focus left the document (legacy focus-tracking notification).
    FocusOut,
    /// The page was hidden (navigation away).
    PageHide,
    /// The native visibility flag changed. Carries no state itself — the
    /// tracker re-reads the live flag instead.
    VisibilityChange,
    /// Any event type the engine has no mapping for.
    Other(Arc<str>),
}

impl SignalKind {
    /// Resolves a host event name, accepting both modern names and the
    /// `on`-prefixed forms used by the legacy attach mechanism.
    pub fn from_name(name: &str) -> SignalKind {
        let name = name.strip_prefix("on").unwrap_or(name);
        match name {
            "focus" => SignalKind::Focus,
            "focusin" => SignalKind::FocusIn,
            "pageshow" => SignalKind::PageShow,
            "blur" => SignalKind::Blur,
            "focusout" => SignalKind::FocusOut,
            "pagehide" => SignalKind::PageHide,
            "visibilitychange" | "webkitvisibilitychange" => SignalKind::VisibilityChange,
            other => SignalKind::Other(Arc::from(other)),
        }
    }

    /// Canonical event name (for logs).
    pub fn name(&self) -> &str {
        match self {
            SignalKind::Focus => "focus",
            SignalKind::FocusIn => "focusin",
            SignalKind::PageShow => "pageshow",
            SignalKind::Blur => "blur",
            SignalKind::FocusOut => "focusout",
            SignalKind::PageHide => "pagehide",
            SignalKind::VisibilityChange => "visibilitychange",
            SignalKind::Other(name) => name,
        }
    }

    /// The fixed kind-to-state lookup table.
    ///
    /// `None` means unmapped: [`SignalKind::VisibilityChange`] (state lives in
    /// the native flag, not the event) and [`SignalKind::Other`].
    pub fn mapped_state(&self) -> Option<Visibility> {
        match self {
            SignalKind::Focus | SignalKind::FocusIn | SignalKind::PageShow => {
                Some(Visibility::Visible)
            }
            SignalKind::Blur | SignalKind::FocusOut | SignalKind::PageHide => {
                Some(Visibility::Hidden)
            }
            SignalKind::VisibilityChange | SignalKind::Other(_) => None,
        }
    }
}

/// One raw event as delivered by the host environment.
///
/// - `seq`: globally unique, monotonically increasing sequence number;
/// - `at`: wall-clock timestamp (for logs);
/// - `kind`: the event classification the mapping operates on.
#[derive(Clone, Debug)]
pub struct Signal {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: SignalKind,
}

impl Signal {
    /// Creates a signal of the given kind with the current timestamp and the
    /// next sequence number.
    pub fn new(kind: SignalKind) -> Self {
        Self {
            seq: SIGNAL_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
        }
    }

    /// Shorthand for building a signal from a raw host event name.
    pub fn from_name(name: &str) -> Self {
        Self::new(SignalKind::from_name(name))
    }
}
