//! Native pathway demo: a host exposing a live visibility flag.
//!
//! The tracker reads the flag eagerly at initialization and re-reads it on
//! every change notification, ignoring the event payload. Run with:
//! `cargo run --example native_flag`

use std::sync::Arc;

use pagevisor::{Signal, SimulatedHost, Visibility, VisibilityState, VisibilityTracker};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let host = Arc::new(SimulatedHost::with_native(Visibility::Visible));
    let tracker = VisibilityTracker::new(host.clone());
    tracker.initialize();

    println!("natively supported: {}", tracker.is_natively_supported());
    println!("eager state: {:?}", tracker.visibility_state());

    tracker
        .subscribe(|signal: &Signal, state: VisibilityState| {
            println!(
                "signal={} current={:?} previous={:?}",
                signal.kind.name(),
                state.current,
                state.previous
            );
        })
        .expect("tracker is live");

    host.set_native_state(Visibility::Hidden);
    host.emit("visibilitychange");

    host.set_native_state(Visibility::Visible);
    host.emit("visibilitychange");

    tracker.dispose();
}
