//! Fallback pathway demo: a host with no native visibility flag.
//!
//! The tracker probes the host, finds nothing better, and installs the
//! generic window focus/blur pair. Run with:
//! `cargo run --example fallback_focus`

use std::sync::Arc;

use pagevisor::{Signal, SimulatedHost, VisibilityState, VisibilityTracker};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let host = Arc::new(SimulatedHost::without_native());
    let tracker = VisibilityTracker::new(host.clone());
    tracker.initialize();

    println!("natively supported: {}", tracker.is_natively_supported());

    let id = tracker
        .subscribe(|signal: &Signal, state: VisibilityState| {
            println!(
                "signal={} current={:?} previous={:?}",
                signal.kind.name(),
                state.current,
                state.previous
            );
        })
        .expect("tracker is live");

    // Simulate the user switching away and back.
    host.emit("blur");
    println!("hidden after blur: {}", tracker.is_hidden());

    host.emit("focus");
    println!("hidden after focus: {}", tracker.is_hidden());

    tracker.unsubscribe(&id);
    tracker.dispose();
}
