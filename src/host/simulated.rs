//! # In-memory host for tests, demos, and programmatic embedders.
//!
//! [`SimulatedHost`] implements [`Host`] over plain shared state: the native
//! flags are settable fields, and registered listeners are kept in a table
//! that [`SimulatedHost::emit`] drives by event name. Each capability mode the
//! engine supports can be reproduced by constructing the host accordingly:
//!
//! ```text
//! SimulatedHost::with_native(v)         → native pathway, standard names
//! SimulatedHost::with_vendor_native(v)  → native pathway, vendor-prefixed names
//! SimulatedHost::with_attach_events()   → legacy attach pathway
//! SimulatedHost::without_native()       → generic window focus/blur pathway
//! ```
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use pagevisor::{SimulatedHost, VisibilityTracker};
//!
//! let host = Arc::new(SimulatedHost::without_native());
//! let tracker = VisibilityTracker::new(host.clone());
//! tracker.initialize();
//!
//! host.emit("blur");
//! assert!(tracker.is_hidden());
//! ```

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::HostError;
use crate::host::environment::{Host, HostListener};
use crate::signals::Signal;
use crate::state::Visibility;

/// Which registration surface a listener went through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Channel {
    Document,
    Attach,
    Window,
}

struct Registration {
    channel: Channel,
    event: String,
    capture: bool,
    listener: Arc<dyn Fn(&Signal) + Send + Sync>,
}

/// Programmable in-memory [`Host`].
///
/// Thread-safe; listeners are invoked on the thread that calls
/// [`SimulatedHost::emit`], without any host lock held.
pub struct SimulatedHost {
    standard_flag: RwLock<Option<Visibility>>,
    vendor_flag: RwLock<Option<Visibility>>,
    attach_supported: bool,
    registrations: RwLock<Vec<Registration>>,
}

impl SimulatedHost {
    /// Host with no native flag and no legacy attach mechanism.
    ///
    /// Probing such a host always selects the generic window focus/blur
    /// pathway.
    pub fn without_native() -> Self {
        Self {
            standard_flag: RwLock::new(None),
            vendor_flag: RwLock::new(None),
            attach_supported: false,
            registrations: RwLock::new(Vec::new()),
        }
    }

    /// Host exposing the native flag under its standard name.
    pub fn with_native(initial: Visibility) -> Self {
        let host = Self::without_native();
        *host.standard_flag.write() = Some(initial);
        host
    }

    /// Host exposing the native flag only under the vendor-prefixed name.
    pub fn with_vendor_native(initial: Visibility) -> Self {
        let host = Self::without_native();
        *host.vendor_flag.write() = Some(initial);
        host
    }

    /// Host with no native flag but with the legacy attach mechanism.
    pub fn with_attach_events() -> Self {
        Self::without_native().and_attach_events()
    }

    /// Adds legacy attach support to any construction (builder-style).
    pub fn and_attach_events(mut self) -> Self {
        self.attach_supported = true;
        self
    }

    /// Updates every native flag the host exposes.
    ///
    /// A no-op on hosts constructed without a native flag — a host cannot
    /// grow a capability after the tracker has probed it.
    pub fn set_native_state(&self, state: Visibility) {
        let mut standard = self.standard_flag.write();
        if standard.is_some() {
            *standard = Some(state);
        }
        let mut vendor = self.vendor_flag.write();
        if vendor.is_some() {
            *vendor = Some(state);
        }
    }

    /// Fires every listener registered under `event`, in registration order.
    ///
    /// Builds one [`Signal`] from the event name and delivers a reference to
    /// it to each matching listener. Returns the number of listeners invoked.
    pub fn emit(&self, event: &str) -> usize {
        let matching: Vec<_> = self
            .registrations
            .read()
            .iter()
            .filter(|r| r.event == event)
            .map(|r| Arc::clone(&r.listener))
            .collect();

        let signal = Signal::from_name(event);
        for listener in &matching {
            listener(&signal);
        }
        matching.len()
    }

    /// Total number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registrations.read().len()
    }

    /// Event names registered through the document-level surface.
    pub fn document_events(&self) -> Vec<String> {
        self.events_on(Channel::Document)
    }

    /// Event names registered through the legacy attach surface.
    pub fn attach_events(&self) -> Vec<String> {
        self.events_on(Channel::Attach)
    }

    /// Event names and capture flags registered through the window surface.
    pub fn window_events(&self) -> Vec<(String, bool)> {
        self.registrations
            .read()
            .iter()
            .filter(|r| r.channel == Channel::Window)
            .map(|r| (r.event.clone(), r.capture))
            .collect()
    }

    fn events_on(&self, channel: Channel) -> Vec<String> {
        self.registrations
            .read()
            .iter()
            .filter(|r| r.channel == channel)
            .map(|r| r.event.clone())
            .collect()
    }

    fn register(&self, channel: Channel, event: &str, capture: bool, listener: HostListener) {
        self.registrations.write().push(Registration {
            channel,
            event: event.to_string(),
            capture,
            listener: Arc::from(listener),
        });
    }
}

impl Host for SimulatedHost {
    fn visibility_state(&self) -> Option<Visibility> {
        *self.standard_flag.read()
    }

    fn vendor_visibility_state(&self) -> Option<Visibility> {
        *self.vendor_flag.read()
    }

    fn supports_attach_events(&self) -> bool {
        self.attach_supported
    }

    fn attach_event(&self, event: &str, listener: HostListener) -> Result<(), HostError> {
        if !self.attach_supported {
            return Err(HostError::unsupported(event));
        }
        self.register(Channel::Attach, event, false, listener);
        Ok(())
    }

    fn add_document_listener(&self, event: &str, listener: HostListener) -> Result<(), HostError> {
        self.register(Channel::Document, event, false, listener);
        Ok(())
    }

    fn add_window_listener(
        &self,
        event: &str,
        capture: bool,
        listener: HostListener,
    ) -> Result<(), HostError> {
        self.register(Channel::Window, event, capture, listener);
        Ok(())
    }
}
