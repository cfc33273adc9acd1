//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for reacting to visibility changes.
//! Subscribers are invoked synchronously, on the thread that delivered the
//! raw signal, in registration order.
//!
//! ## Contract
//! - Implementations must be fast: they run inside the signal's
//!   run-to-completion handler and delay every later subscriber.
//! - A panicking subscriber is isolated: the panic is caught and logged, and
//!   the remaining subscribers are still notified.
//! - Subscribers may call `subscribe`/`unsubscribe` on the tracker from
//!   inside [`Subscribe::on_signal`]; registry changes take effect from the
//!   next signal.
//!
//! Closures implement the trait directly:
//! ```rust
//! use std::sync::Arc;
//! use pagevisor::{Signal, SimulatedHost, VisibilityState, VisibilityTracker};
//!
//! let host = Arc::new(SimulatedHost::without_native());
//! let tracker = VisibilityTracker::new(host.clone());
//! tracker.initialize();
//!
//! let id = tracker
//!     .subscribe(|signal: &Signal, state: VisibilityState| {
//!         println!("{} -> {:?}", signal.kind.name(), state.current);
//!     })
//!     .expect("tracker is live");
//! # tracker.unsubscribe(&id);
//! ```

use crate::signals::Signal;
use crate::state::VisibilityState;

/// Contract for visibility-change subscribers.
///
/// Receives the raw signal that caused the update and the state snapshot
/// computed from it (`current`/`previous` already reflect this signal).
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single visibility signal.
    ///
    /// # Parameters
    /// - `signal`: the raw host event, as delivered;
    /// - `state`: snapshot taken after this signal was applied.
    fn on_signal(&self, signal: &Signal, state: VisibilityState);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> Subscribe for F
where
    F: Fn(&Signal, VisibilityState) + Send + Sync + 'static,
{
    fn on_signal(&self, signal: &Signal, state: VisibilityState) {
        self(signal, state)
    }
}
