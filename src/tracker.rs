//! # The visibility tracker: state engine and notification fan-out.
//!
//! [`VisibilityTracker`] owns the `current`/`previous` state pair, maps raw
//! host signals into the two-value visibility domain, and notifies registered
//! subscribers synchronously in registration order.
//!
//! ## Architecture
//! ```text
//! host raw event
//!     │  (listener installed by the capability layer, Weak-backed)
//!     ▼
//! VisibilityTracker::handle_signal(signal)
//!     ├─ disposed? ──► drop silently
//!     ├─ native capability ──► re-read live flag (signal payload ignored)
//!     ├─ else ──► kind-to-state table, unmapped per TrackerConfig policy
//!     ├─ state.apply(next)       previous ← current, current ← next
//!     └─ for (id, sub) in registry snapshot (registration order):
//!            sub.on_signal(&signal, state)     panic → caught, logged
//! ```
//!
//! ## Rules
//! - **Run-to-completion**: every public operation and the whole notification
//!   pass complete synchronously on the calling thread.
//! - **No raised faults**: disposed `subscribe` returns `None`, unknown
//!   `unsubscribe` ids are ignored, unmapped signals fall back per policy.
//!   Visibility tracking is auxiliary; it must never be the reason the
//!   embedder fails.
//! - **Snapshots, not aliases**: [`VisibilityTracker::visibility_state`]
//!   returns a `Copy` snapshot; held values never observe later signals.
//! - **Re-entrancy**: the registry lock is not held while subscribers run, so
//!   subscribers may call `subscribe`/`unsubscribe` from inside a callback;
//!   such changes take effect from the next signal.
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use pagevisor::{SimulatedHost, Visibility, VisibilityTracker};
//!
//! let host = Arc::new(SimulatedHost::without_native());
//! let tracker = VisibilityTracker::new(host.clone());
//! tracker.initialize();
//! assert!(!tracker.is_natively_supported());
//!
//! host.emit("blur");
//! assert!(tracker.is_hidden());
//!
//! host.emit("focus");
//! let state = tracker.visibility_state();
//! assert_eq!(state.current, Some(Visibility::Visible));
//! assert_eq!(state.previous, Some(Visibility::Hidden));
//! ```

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::capability::{Capability, install};
use crate::config::{TrackerConfig, UnmappedPolicy};
use crate::host::Host;
use crate::signals::Signal;
use crate::state::{Visibility, VisibilityState};
use crate::subscribers::{Subscribe, SubscriberRegistry, SubscriptionId};

/// State and registry, mutated together under one lock.
struct Inner {
    state: VisibilityState,
    registry: SubscriberRegistry,
}

/// Visibility state engine with subscriber fan-out.
///
/// Construct with [`VisibilityTracker::new`], call
/// [`initialize`](VisibilityTracker::initialize) once to probe the host and
/// install the signal pathway, and tear down with
/// [`dispose`](VisibilityTracker::dispose). One instance tracks one host
/// surface for the life of the process; the pair is meant to be created once
/// and passed by reference to consumers.
pub struct VisibilityTracker {
    host: Arc<dyn Host>,
    config: TrackerConfig,
    capability: OnceCell<Capability>,
    disposed: AtomicBool,
    next_subscription: AtomicU64,
    inner: Mutex<Inner>,
}

impl VisibilityTracker {
    /// Creates a tracker over the given host with the default configuration.
    ///
    /// No probing happens yet; the tracker is inert until
    /// [`initialize`](VisibilityTracker::initialize).
    #[must_use]
    pub fn new(host: Arc<dyn Host>) -> Arc<Self> {
        Self::with_config(host, TrackerConfig::default())
    }

    /// Creates a tracker with an explicit [`TrackerConfig`].
    #[must_use]
    pub fn with_config(host: Arc<dyn Host>, config: TrackerConfig) -> Arc<Self> {
        Arc::new(Self {
            host,
            config,
            capability: OnceCell::new(),
            disposed: AtomicBool::new(false),
            next_subscription: AtomicU64::new(0),
            inner: Mutex::new(Inner {
                state: VisibilityState::default(),
                registry: SubscriberRegistry::new(),
            }),
        })
    }

    /// Probes the host and installs exactly one listener pathway.
    ///
    /// Idempotent: only the first call has any effect. When the native
    /// pathway is selected, the live flag is read eagerly into `current`
    /// (`previous` stays `None` until the first signal).
    ///
    /// A disposed tracker ignores this call.
    pub fn initialize(self: &Arc<Self>) {
        if self.is_disposed() {
            warn!("initialize ignored: tracker already disposed");
            return;
        }

        self.capability.get_or_init(|| {
            let capability = Capability::probe(self.host.as_ref());
            if capability.is_native() {
                self.inner.lock().state.current = self.read_native();
            }
            install(capability, &self.host, self);
            debug!(pathway = capability.as_label(), "signal pathway installed");
            capability
        });
    }

    /// True when the most recent signal resolved to hidden.
    pub fn is_hidden(&self) -> bool {
        self.inner.lock().state.is_hidden()
    }

    /// Snapshot of the `current`/`previous` pair.
    ///
    /// The returned value is a copy; it never changes as further signals are
    /// processed.
    pub fn visibility_state(&self) -> VisibilityState {
        self.inner.lock().state
    }

    /// Whether the native pathway was selected at initialization.
    ///
    /// `false` before [`initialize`](VisibilityTracker::initialize).
    pub fn is_natively_supported(&self) -> bool {
        self.capability.get().is_some_and(Capability::is_native)
    }

    /// The pathway selected at initialization, if any.
    pub fn capability(&self) -> Option<Capability> {
        self.capability.get().copied()
    }

    /// Registers a subscriber and returns its id.
    ///
    /// Returns `None` — the explicit "no subscription" sentinel — when the
    /// tracker has been disposed; callers must check. Registering the same
    /// callback twice yields two independent ids, each notified once per
    /// signal.
    pub fn subscribe<S: Subscribe>(&self, subscriber: S) -> Option<SubscriptionId> {
        self.subscribe_arc(Arc::new(subscriber))
    }

    /// Registers a pre-allocated `Arc<dyn Subscribe>`.
    ///
    /// Same semantics as [`subscribe`](VisibilityTracker::subscribe); useful
    /// when one subscriber instance is shared or registered repeatedly.
    pub fn subscribe_arc(&self, subscriber: Arc<dyn Subscribe>) -> Option<SubscriptionId> {
        if self.is_disposed() {
            trace!("subscribe declined: tracker disposed");
            return None;
        }

        let id = SubscriptionId::new(
            &self.config.id_prefix,
            self.next_subscription.fetch_add(1, AtomicOrdering::Relaxed),
        );
        self.inner.lock().registry.insert(id.clone(), subscriber);
        Some(id)
    }

    /// Removes a subscription.
    ///
    /// Unknown or already-removed ids are not errors; the call is a silent
    /// no-op, as is any call after [`dispose`](VisibilityTracker::dispose).
    pub fn unsubscribe(&self, id: &SubscriptionId) {
        if self.is_disposed() {
            return;
        }
        if !self.inner.lock().registry.remove(id) {
            trace!(%id, "unsubscribe ignored unknown id");
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().registry.len()
    }

    /// Tears the tracker down.
    ///
    /// Idempotent. Drains the registry; afterwards the change handler,
    /// [`subscribe`](VisibilityTracker::subscribe), and
    /// [`unsubscribe`](VisibilityTracker::unsubscribe) are all no-ops.
    /// Listeners already handed to the host keep only a weak reference and
    /// go silent.
    pub fn dispose(&self) {
        if self.disposed.swap(true, AtomicOrdering::SeqCst) {
            return;
        }
        let drained = self.inner.lock().registry.clear();
        debug!(subscribers = drained, "tracker disposed");
    }

    /// Whether [`dispose`](VisibilityTracker::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(AtomicOrdering::SeqCst)
    }

    /// Change handler: maps one raw signal and fans out to subscribers.
    ///
    /// Invoked by whichever listener the capability layer installed.
    pub(crate) fn handle_signal(&self, signal: &Signal) {
        if self.is_disposed() {
            return;
        }
        let Some(capability) = self.capability.get().copied() else {
            return;
        };

        let (snapshot, subscribers) = {
            let mut inner = self.inner.lock();
            let resolved = if capability.is_native() {
                // The live flag is the ground truth; the event payload is
                // ignored entirely in native mode.
                self.read_native()
            } else {
                signal.kind.mapped_state()
            };

            match resolved {
                Some(next) => inner.state.apply(next),
                None => match self.config.unmapped {
                    UnmappedPolicy::AssumeVisible => inner.state.apply(Visibility::Visible),
                    UnmappedPolicy::NoChange => {}
                },
            }
            (inner.state, inner.registry.snapshot())
        };

        trace!(
            seq = signal.seq,
            kind = signal.kind.name(),
            current = snapshot.current.map(|v| v.as_str()),
            previous = snapshot.previous.map(|v| v.as_str()),
            "signal processed"
        );

        for (id, subscriber) in subscribers {
            let notify = AssertUnwindSafe(|| subscriber.on_signal(signal, snapshot));
            if let Err(panic) = catch_unwind(notify) {
                warn!(
                    subscription = %id,
                    subscriber = subscriber.name(),
                    info = %describe_panic(&panic),
                    "subscriber panicked during notification"
                );
            }
        }
    }

    /// Reads the live native flag, preferring the vendor-prefixed name.
    fn read_native(&self) -> Option<Visibility> {
        self.host
            .vendor_visibility_state()
            .or_else(|| self.host.visibility_state())
    }
}

fn describe_panic(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SimulatedHost;
    use std::sync::Weak;

    /// Recording subscriber: remembers every (kind, state) it was handed.
    struct Recorder {
        calls: Mutex<Vec<(String, VisibilityState)>>,
    }

    impl Recorder {
        fn arc() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, VisibilityState)> {
            self.calls.lock().clone()
        }

        fn count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    impl Subscribe for Recorder {
        fn on_signal(&self, signal: &Signal, state: VisibilityState) {
            self.calls
                .lock()
                .push((signal.kind.name().to_string(), state));
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    fn fallback_tracker() -> (Arc<SimulatedHost>, Arc<VisibilityTracker>) {
        let host = Arc::new(SimulatedHost::without_native());
        let tracker = VisibilityTracker::new(host.clone());
        tracker.initialize();
        (host, tracker)
    }

    #[test]
    fn test_fallback_blur_then_focus_scenario() {
        let (host, tracker) = fallback_tracker();
        assert_eq!(tracker.visibility_state(), VisibilityState::default());

        host.emit("blur");
        assert!(tracker.is_hidden());
        let state = tracker.visibility_state();
        assert_eq!(state.current, Some(Visibility::Hidden));
        assert_eq!(state.previous, None);

        host.emit("focus");
        assert!(!tracker.is_hidden());
        let state = tracker.visibility_state();
        assert_eq!(state.current, Some(Visibility::Visible));
        assert_eq!(state.previous, Some(Visibility::Hidden));
    }

    #[test]
    fn test_previous_always_tracks_prior_current() {
        let (host, tracker) = fallback_tracker();
        let sequence = [
            "blur", "focus", "focus", "pagehide", "pageshow", "scroll", "blur",
        ];

        let mut prior = None;
        for event in sequence {
            host.emit(event);
            let state = tracker.visibility_state();
            assert_eq!(state.previous, prior, "after '{event}'");
            assert!(
                matches!(state.current, Some(Visibility::Visible | Visibility::Hidden)),
                "current must stay in the two-value domain after '{event}'",
            );
            prior = state.current;
        }
    }

    #[test]
    fn test_unmapped_kind_defaults_to_visible() {
        let (host, tracker) = fallback_tracker();
        host.emit("blur");
        assert!(tracker.is_hidden());

        // "scroll" has no mapping; default policy resolves it to visible.
        host.add_window_listener("scroll", true, {
            let weak = Arc::downgrade(&tracker);
            Box::new(move |signal| {
                if let Some(t) = weak.upgrade() {
                    t.handle_signal(signal);
                }
            })
        })
        .unwrap();
        host.emit("scroll");

        let state = tracker.visibility_state();
        assert_eq!(state.current, Some(Visibility::Visible));
        assert_eq!(state.previous, Some(Visibility::Hidden));
    }

    #[test]
    fn test_unmapped_policy_no_change_leaves_state() {
        let host = Arc::new(SimulatedHost::without_native());
        let config = TrackerConfig {
            unmapped: UnmappedPolicy::NoChange,
            ..TrackerConfig::default()
        };
        let tracker = VisibilityTracker::with_config(host.clone(), config);
        tracker.initialize();

        let recorder = Recorder::arc();
        tracker.subscribe_arc(recorder.clone()).unwrap();

        host.emit("blur");
        host.add_window_listener("scroll", true, {
            let weak = Arc::downgrade(&tracker);
            Box::new(move |signal| {
                if let Some(t) = weak.upgrade() {
                    t.handle_signal(signal);
                }
            })
        })
        .unwrap();
        host.emit("scroll");

        // State untouched by the unmapped signal, but subscribers still saw it.
        let state = tracker.visibility_state();
        assert_eq!(state.current, Some(Visibility::Hidden));
        assert_eq!(state.previous, None);
        let calls = recorder.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, "scroll");
        assert_eq!(calls[1].1, state);
    }

    #[test]
    fn test_native_initialize_reads_flag_eagerly() {
        let host = Arc::new(SimulatedHost::with_native(Visibility::Hidden));
        let tracker = VisibilityTracker::new(host);
        tracker.initialize();

        assert!(tracker.is_natively_supported());
        assert!(tracker.is_hidden());
        let state = tracker.visibility_state();
        assert_eq!(state.current, Some(Visibility::Hidden));
        assert_eq!(state.previous, None);
    }

    #[test]
    fn test_native_mode_reads_live_flag_ignoring_event() {
        let host = Arc::new(SimulatedHost::with_native(Visibility::Visible));
        let tracker = VisibilityTracker::new(host.clone());
        tracker.initialize();
        assert!(!tracker.is_hidden());

        host.set_native_state(Visibility::Hidden);
        host.emit("visibilitychange");
        assert!(tracker.is_hidden());

        host.set_native_state(Visibility::Visible);
        host.emit("visibilitychange");
        let state = tracker.visibility_state();
        assert_eq!(state.current, Some(Visibility::Visible));
        assert_eq!(state.previous, Some(Visibility::Hidden));
    }

    #[test]
    fn test_vendor_prefixed_flag_selects_vendor_event() {
        let host = Arc::new(SimulatedHost::with_vendor_native(Visibility::Visible));
        let tracker = VisibilityTracker::new(host.clone());
        tracker.initialize();

        assert!(tracker.is_natively_supported());
        assert_eq!(tracker.capability(), Some(Capability::Native { vendor: true }));
        assert_eq!(host.document_events(), vec!["webkitvisibilitychange"]);

        host.set_native_state(Visibility::Hidden);
        host.emit("webkitvisibilitychange");
        assert!(tracker.is_hidden());
    }

    #[test]
    fn test_legacy_attach_pathway_installs_focus_pair() {
        let host = Arc::new(SimulatedHost::with_attach_events());
        let tracker = VisibilityTracker::new(host.clone());
        tracker.initialize();

        assert!(!tracker.is_natively_supported());
        assert_eq!(tracker.capability(), Some(Capability::LegacyAttach));
        assert_eq!(host.attach_events(), vec!["onfocusin", "onfocusout"]);
        assert!(host.document_events().is_empty());
        assert!(host.window_events().is_empty());

        host.emit("onfocusout");
        assert!(tracker.is_hidden());
        host.emit("onfocusin");
        assert!(!tracker.is_hidden());
    }

    #[test]
    fn test_window_fallback_registers_capturing_pair() {
        let (host, tracker) = fallback_tracker();
        assert_eq!(tracker.capability(), Some(Capability::WindowFocus));
        assert_eq!(
            host.window_events(),
            vec![("focus".to_string(), true), ("blur".to_string(), true)]
        );
        assert!(host.document_events().is_empty());
        assert!(host.attach_events().is_empty());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let host = Arc::new(SimulatedHost::with_native(Visibility::Visible));
        let tracker = VisibilityTracker::new(host.clone());
        tracker.initialize();
        let installed = host.listener_count();
        assert_eq!(installed, 1);

        tracker.initialize();
        tracker.initialize();
        assert_eq!(host.listener_count(), installed);
        assert_eq!(tracker.capability(), Some(Capability::Native { vendor: false }));
    }

    #[test]
    fn test_subscribe_notifies_once_per_signal_until_unsubscribed() {
        let (host, tracker) = fallback_tracker();
        let recorder = Recorder::arc();
        let id = tracker.subscribe_arc(recorder.clone()).unwrap();

        host.emit("blur");
        host.emit("focus");
        assert_eq!(recorder.count(), 2);

        tracker.unsubscribe(&id);
        host.emit("blur");
        assert_eq!(recorder.count(), 2);
        assert_eq!(tracker.subscriber_count(), 0);
    }

    #[test]
    fn test_same_subscriber_twice_gets_two_independent_ids() {
        let (host, tracker) = fallback_tracker();
        let recorder = Recorder::arc();

        let first = tracker.subscribe_arc(recorder.clone()).unwrap();
        let second = tracker.subscribe_arc(recorder.clone()).unwrap();
        assert_ne!(first, second);

        host.emit("blur");
        assert_eq!(recorder.count(), 2);

        tracker.unsubscribe(&first);
        host.emit("focus");
        assert_eq!(recorder.count(), 3);
    }

    #[test]
    fn test_unsubscribe_unknown_id_is_noop() {
        let (host, tracker) = fallback_tracker();
        let recorder = Recorder::arc();
        tracker.subscribe_arc(recorder.clone()).unwrap();

        tracker.unsubscribe(&SubscriptionId::new("page-visibility", 999));
        assert_eq!(tracker.subscriber_count(), 1);

        host.emit("blur");
        assert_eq!(recorder.count(), 1);
    }

    #[test]
    fn test_notification_runs_in_registration_order() {
        let (host, tracker) = fallback_tracker();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = order.clone();
            tracker
                .subscribe(move |_: &Signal, _: VisibilityState| {
                    order.lock().push(tag);
                })
                .unwrap();
        }

        host.emit("blur");
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_subscriber_sees_just_computed_state() {
        let (host, tracker) = fallback_tracker();
        let recorder = Recorder::arc();
        tracker.subscribe_arc(recorder.clone()).unwrap();

        host.emit("blur");
        let calls = recorder.calls();
        assert_eq!(calls[0].0, "blur");
        assert_eq!(calls[0].1.current, Some(Visibility::Hidden));
        assert_eq!(calls[0].1.previous, None);
    }

    #[test]
    fn test_subscriber_panic_is_isolated() {
        let (host, tracker) = fallback_tracker();
        let recorder = Recorder::arc();

        tracker
            .subscribe(|_: &Signal, _: VisibilityState| {
                panic!("subscriber boom");
            })
            .unwrap();
        tracker.subscribe_arc(recorder.clone()).unwrap();

        host.emit("blur");
        assert_eq!(recorder.count(), 1);
        assert!(tracker.is_hidden());

        // The panicking subscriber stays registered and keeps panicking;
        // later subscribers keep getting notified.
        host.emit("focus");
        assert_eq!(recorder.count(), 2);
    }

    #[test]
    fn test_subscriber_can_unsubscribe_itself_reentrantly() {
        let (host, tracker) = fallback_tracker();
        let recorder = Recorder::arc();

        let weak: Weak<VisibilityTracker> = Arc::downgrade(&tracker);
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
        let slot_for_sub = slot.clone();
        let rec = recorder.clone();
        let id = tracker
            .subscribe(move |signal: &Signal, state: VisibilityState| {
                rec.on_signal(signal, state);
                if let (Some(tracker), Some(id)) = (weak.upgrade(), slot_for_sub.lock().clone()) {
                    tracker.unsubscribe(&id);
                }
            })
            .unwrap();
        *slot.lock() = Some(id);

        host.emit("blur");
        assert_eq!(recorder.count(), 1);
        assert_eq!(tracker.subscriber_count(), 0);

        host.emit("focus");
        assert_eq!(recorder.count(), 1);
    }

    #[test]
    fn test_dispose_makes_engine_inert() {
        let (host, tracker) = fallback_tracker();
        let recorder = Recorder::arc();
        let id = tracker.subscribe_arc(recorder.clone()).unwrap();

        host.emit("blur");
        assert!(tracker.is_hidden());

        tracker.dispose();
        assert!(tracker.is_disposed());
        assert_eq!(tracker.subscriber_count(), 0);

        host.emit("focus");
        assert!(tracker.is_hidden(), "handler must be a no-op after dispose");
        assert_eq!(recorder.count(), 1);

        assert!(tracker.subscribe_arc(recorder.clone()).is_none());
        tracker.unsubscribe(&id);

        tracker.dispose();
        assert!(tracker.is_disposed());
    }

    #[test]
    fn test_ids_are_monotonic_and_namespaced() {
        let host = Arc::new(SimulatedHost::without_native());
        let config = TrackerConfig {
            id_prefix: "overlay".into(),
            ..TrackerConfig::default()
        };
        let tracker = VisibilityTracker::with_config(host, config);
        tracker.initialize();

        let a = tracker.subscribe(|_: &Signal, _: VisibilityState| {}).unwrap();
        let b = tracker.subscribe(|_: &Signal, _: VisibilityState| {}).unwrap();
        assert_eq!(a.as_str(), "overlay-0");
        assert_eq!(b.as_str(), "overlay-1");

        // Removing a subscription never frees its id for reuse.
        tracker.unsubscribe(&a);
        let c = tracker.subscribe(|_: &Signal, _: VisibilityState| {}).unwrap();
        assert_eq!(c.as_str(), "overlay-2");
    }

    #[test]
    fn test_visibility_state_returns_snapshot() {
        let (host, tracker) = fallback_tracker();
        host.emit("blur");
        let held = tracker.visibility_state();

        host.emit("focus");
        assert_eq!(held.current, Some(Visibility::Hidden));
        assert_eq!(tracker.visibility_state().current, Some(Visibility::Visible));
    }

    #[test]
    fn test_queries_before_initialize_are_inert() {
        let host = Arc::new(SimulatedHost::with_native(Visibility::Hidden));
        let tracker = VisibilityTracker::new(host);

        assert!(!tracker.is_natively_supported());
        assert_eq!(tracker.capability(), None);
        assert!(!tracker.is_hidden());
        assert_eq!(tracker.visibility_state(), VisibilityState::default());
    }
}
