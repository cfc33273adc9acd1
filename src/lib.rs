//! # pagevisor
//!
//! **Pagevisor** is a small visibility-tracking library: it detects whether a
//! host application's visible surface is currently shown to or hidden from
//! the user, normalizing several underlying signal sources into one
//! consistent state machine with a subscription mechanism.
//!
//! It does not render anything, persist anything, or debounce anything — it
//! is the normalization layer only, designed to be embedded and never to be
//! the reason the host application fails.
//!
//! ## Architecture
//! ```text
//!  Host environment (webview bridge, windowing shell, SimulatedHost, …)
//!  ┌───────────────────────────────────────────────────────────────────┐
//!  │ native visibility flag     legacy attach pair     window focus/blur│
//!  │ (standard / vendor name)   (onfocusin/onfocusout) (capturing phase)│
//!  └──────────┬──────────────────────┬──────────────────────┬──────────┘
//!             │  probed once, in priority order, by initialize()
//!             ▼
//!      Capability::probe ──► exactly ONE pathway installed
//!             │
//!             ▼  raw Signal
//!  ┌───────────────────────────────────────────────────────────────────┐
//!  │ VisibilityTracker                                                 │
//!  │  - native mode: re-read live flag (event payload ignored)         │
//!  │  - fallback:    kind-to-state table, unmapped per policy          │
//!  │  - state: previous ← current, current ← mapped                    │
//!  └──────────┬────────────────────────────────────────────────────────┘
//!             ▼  synchronous, registration order
//!       subscriber 1 … subscriber N   (Subscribe impls; panics isolated)
//! ```
//!
//! ## Features
//! | Area               | Description                                              | Key types / traits                  |
//! |--------------------|----------------------------------------------------------|-------------------------------------|
//! | **State**          | Two-value visibility domain and current/previous pair.   | [`Visibility`], [`VisibilityState`] |
//! | **Signals**        | Raw host events and the fixed kind-to-state mapping.     | [`Signal`], [`SignalKind`]          |
//! | **Host surface**   | What the engine needs from its environment.              | [`Host`], [`SimulatedHost`]         |
//! | **Capability**     | Priority-ordered pathway probing, chosen once.           | [`Capability`]                      |
//! | **Subscriptions**  | Synchronous fan-out in registration order.               | [`Subscribe`], [`SubscriptionId`]   |
//! | **Engine**         | Lifecycle, state queries, notification.                  | [`VisibilityTracker`]               |
//! | **Configuration**  | Id namespace and unmapped-signal policy.                 | [`TrackerConfig`], [`UnmappedPolicy`] |
//! | **Errors**         | Host-side registration failures (logged, never raised).  | [`HostError`]                       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use pagevisor::{Signal, SimulatedHost, Visibility, VisibilityState, VisibilityTracker};
//!
//! // Hosts with a native visibility flag get the native pathway; everything
//! // else falls back to focus-style signals.
//! let host = Arc::new(SimulatedHost::with_native(Visibility::Visible));
//! let tracker = VisibilityTracker::new(host.clone());
//! tracker.initialize();
//! assert!(tracker.is_natively_supported());
//!
//! let id = tracker
//!     .subscribe(|signal: &Signal, state: VisibilityState| {
//!         println!("{}: now {:?}", signal.kind.name(), state.current);
//!     })
//!     .expect("tracker is live");
//!
//! // The host flips its flag and fires the change notification; the tracker
//! // re-reads the flag and fans out.
//! host.set_native_state(Visibility::Hidden);
//! host.emit("visibilitychange");
//! assert!(tracker.is_hidden());
//!
//! tracker.unsubscribe(&id);
//! tracker.dispose();
//! ```

mod capability;
mod config;
mod error;
mod host;
mod signals;
mod state;
mod subscribers;
mod tracker;

// ---- Public re-exports ----

pub use capability::Capability;
pub use config::{TrackerConfig, UnmappedPolicy};
pub use error::HostError;
pub use host::{
    Host, HostListener, SimulatedHost, LEGACY_FOCUS_IN, LEGACY_FOCUS_OUT,
    VENDOR_VISIBILITY_CHANGE, VISIBILITY_CHANGE, WINDOW_BLUR, WINDOW_FOCUS,
};
pub use signals::{Signal, SignalKind};
pub use state::{Visibility, VisibilityState};
pub use subscribers::{Subscribe, SubscriptionId};
pub use tracker::VisibilityTracker;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
