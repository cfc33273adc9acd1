//! # Signal pathway selection.
//!
//! [`Capability`] names the three interchangeable signal sources the engine
//! can run on. Exactly one is chosen per tracker, by a priority-ordered probe
//! that runs once during `initialize()`, and the choice never changes
//! afterwards.
//!
//! ## Probe order
//! ```text
//! 1. native flag present (standard or vendor-prefixed name)
//!        → Native { vendor }   (one document-level change listener)
//! 2. legacy attach mechanism supported
//!        → LegacyAttach        (attach "gained focus" + "lost focus")
//! 3. otherwise
//!        → WindowFocus         (window focus + blur, capturing phase)
//! ```
//!
//! Branch 3 is the universal fallback; probing never fails. Listener
//! registration against the chosen pathway can fail on a real host — such
//! failures are logged and swallowed, the chosen capability stands.

use std::sync::{Arc, Weak};

use tracing::warn;

use crate::host::{
    Host, HostListener, LEGACY_FOCUS_IN, LEGACY_FOCUS_OUT, VENDOR_VISIBILITY_CHANGE,
    VISIBILITY_CHANGE, WINDOW_BLUR, WINDOW_FOCUS,
};
use crate::tracker::VisibilityTracker;

/// The signal source a tracker runs on.
///
/// Selected once at initialization and stored as a set-once value; the
/// engine depends only on this abstract choice, never on how the host
/// implements it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// The host exposes a live native visibility flag with change
    /// notifications. `vendor` records whether the flag was found under the
    /// vendor-prefixed name (which also selects the vendor-prefixed event).
    Native {
        /// Vendor-prefixed flag present.
        vendor: bool,
    },
    /// Legacy attach-style focus tracking (document-level focus pair).
    LegacyAttach,
    /// Generic window focus/blur with capturing-phase registration.
    WindowFocus,
}

impl Capability {
    /// Runs the priority-ordered probe against a host.
    ///
    /// # Example
    /// ```
    /// use pagevisor::{Capability, SimulatedHost, Visibility};
    ///
    /// let native = SimulatedHost::with_native(Visibility::Visible);
    /// assert_eq!(Capability::probe(&native), Capability::Native { vendor: false });
    ///
    /// let legacy = SimulatedHost::with_attach_events();
    /// assert_eq!(Capability::probe(&legacy), Capability::LegacyAttach);
    ///
    /// let bare = SimulatedHost::without_native();
    /// assert_eq!(Capability::probe(&bare), Capability::WindowFocus);
    /// ```
    pub fn probe(host: &dyn Host) -> Capability {
        let vendor = host.vendor_visibility_state().is_some();
        if vendor || host.visibility_state().is_some() {
            Capability::Native { vendor }
        } else if host.supports_attach_events() {
            Capability::LegacyAttach
        } else {
            Capability::WindowFocus
        }
    }

    /// True for the [`Capability::Native`] variant.
    pub fn is_native(&self) -> bool {
        matches!(self, Capability::Native { .. })
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Capability::Native { vendor: false } => "native",
            Capability::Native { vendor: true } => "native_vendor",
            Capability::LegacyAttach => "legacy_attach",
            Capability::WindowFocus => "window_focus",
        }
    }
}

/// Installs the listener pathway for the chosen capability.
///
/// Called exactly once per tracker, from `initialize()`. Listener closures
/// hold only a [`Weak`] tracker reference: a host that outlives its tracker
/// delivers signals into a silent no-op instead of keeping the engine alive.
pub(crate) fn install(
    capability: Capability,
    host: &Arc<dyn Host>,
    tracker: &Arc<VisibilityTracker>,
) {
    match capability {
        Capability::Native { vendor } => {
            let event = if vendor {
                VENDOR_VISIBILITY_CHANGE
            } else {
                VISIBILITY_CHANGE
            };
            register(
                host.add_document_listener(event, listener(tracker)),
                event,
            );
        }
        Capability::LegacyAttach => {
            register(
                host.attach_event(LEGACY_FOCUS_IN, listener(tracker)),
                LEGACY_FOCUS_IN,
            );
            register(
                host.attach_event(LEGACY_FOCUS_OUT, listener(tracker)),
                LEGACY_FOCUS_OUT,
            );
        }
        Capability::WindowFocus => {
            register(
                host.add_window_listener(WINDOW_FOCUS, true, listener(tracker)),
                WINDOW_FOCUS,
            );
            register(
                host.add_window_listener(WINDOW_BLUR, true, listener(tracker)),
                WINDOW_BLUR,
            );
        }
    }
}

fn listener(tracker: &Arc<VisibilityTracker>) -> HostListener {
    let weak: Weak<VisibilityTracker> = Arc::downgrade(tracker);
    Box::new(move |signal| {
        if let Some(tracker) = weak.upgrade() {
            tracker.handle_signal(signal);
        }
    })
}

fn register(result: Result<(), crate::error::HostError>, event: &str) {
    if let Err(err) = result {
        warn!(event, error = %err, label = err.as_label(), "listener registration failed");
    }
}
