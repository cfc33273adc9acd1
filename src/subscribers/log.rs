//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints every visibility signal to stdout in a one-line
//! human-readable format.
//!
//! ## Output format
//! ```text
//! [visibility] signal=blur current=hidden previous=visible
//! [visibility] signal=focus current=visible previous=hidden
//! [visibility] signal=visibilitychange current=hidden previous=visible
//! ```

use crate::signals::Signal;
use crate::state::VisibilityState;
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Useful for development and demos; for
/// production, implement a custom [`Subscribe`] that feeds structured logging
/// or metrics instead.
#[derive(Default)]
pub struct LogWriter;

impl Subscribe for LogWriter {
    fn on_signal(&self, signal: &Signal, state: VisibilityState) {
        let current = state.current.map_or("undefined", |v| v.as_str());
        let previous = state.previous.map_or("undefined", |v| v.as_str());
        println!(
            "[visibility] signal={} current={current} previous={previous}",
            signal.kind.name()
        );
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
