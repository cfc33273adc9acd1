//! # The `Host` trait: what the engine needs from its environment.
//!
//! A host is anything that can report a native visibility flag and register
//! listeners for the raw notifications the engine normalizes. Real embedders
//! implement [`Host`] over their platform surface (a webview bridge, a
//! windowing shell, an overlay compositor); tests and demos use
//! [`SimulatedHost`](crate::SimulatedHost).
//!
//! ## Contract
//! - The flag readers are cheap, synchronous probes. `None` means "this host
//!   has no such flag", not "currently unknown".
//! - Registration hands the host a [`HostListener`] closure. The host calls it
//!   once per matching raw event, from whatever thread owns its event loop.
//! - Registration may fail with [`HostError`]; the engine logs and continues,
//!   it never propagates the failure.

use crate::error::HostError;
use crate::signals::Signal;
use crate::state::Visibility;

/// Standard name of the native visibility change notification.
pub const VISIBILITY_CHANGE: &str = "visibilitychange";
/// Vendor-prefixed alternative of [`VISIBILITY_CHANGE`].
pub const VENDOR_VISIBILITY_CHANGE: &str = "webkitvisibilitychange";
/// Legacy attach-style "gained focus" notification.
pub const LEGACY_FOCUS_IN: &str = "onfocusin";
/// Legacy attach-style "lost focus" notification.
pub const LEGACY_FOCUS_OUT: &str = "onfocusout";
/// Generic window "gained focus" notification.
pub const WINDOW_FOCUS: &str = "focus";
/// Generic window "lost focus" notification.
pub const WINDOW_BLUR: &str = "blur";

/// Listener closure handed to the host at registration time.
///
/// The host invokes it once per matching raw event.
pub type HostListener = Box<dyn Fn(&Signal) + Send + Sync>;

/// # Abstraction over the host environment's visibility surface.
///
/// Default method bodies describe a minimal host: no native flag under a
/// vendor-prefixed name and no legacy attach mechanism. Every host must
/// provide modern document-level and window-level registration — the generic
/// window focus/blur pathway is the universal fallback and is assumed to
/// always be available.
pub trait Host: Send + Sync + 'static {
    /// Live native visibility flag under its standard name, if the host
    /// exposes one.
    fn visibility_state(&self) -> Option<Visibility>;

    /// Live native visibility flag under the vendor-prefixed name.
    fn vendor_visibility_state(&self) -> Option<Visibility> {
        None
    }

    /// Whether the legacy attach-style registration mechanism is available.
    fn supports_attach_events(&self) -> bool {
        false
    }

    /// Legacy attach-style listener registration (document-level, uses
    /// `on`-prefixed event names).
    fn attach_event(&self, event: &str, listener: HostListener) -> Result<(), HostError> {
        let _ = listener;
        Err(HostError::unsupported(event))
    }

    /// Modern document-level listener registration.
    fn add_document_listener(&self, event: &str, listener: HostListener) -> Result<(), HostError>;

    /// Window-level listener registration.
    ///
    /// `capture` requests capturing-phase delivery, so the listener fires even
    /// when the focus change happens on a nested element.
    fn add_window_listener(
        &self,
        event: &str,
        capture: bool,
        listener: HostListener,
    ) -> Result<(), HostError>;
}
