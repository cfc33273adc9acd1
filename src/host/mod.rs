//! # Host environment abstraction.
//!
//! This module and its submodules are responsible ONLY for describing what a
//! host environment can do (expose a native visibility flag, register
//! listeners) and for delivering raw [`Signal`](crate::Signal)s into listener
//! closures. Which pathway gets installed, and what a signal means, is decided
//! entirely by the capability and tracker layers.

mod environment;
mod simulated;

pub use environment::{
    Host, HostListener, LEGACY_FOCUS_IN, LEGACY_FOCUS_OUT, VENDOR_VISIBILITY_CHANGE,
    VISIBILITY_CHANGE, WINDOW_BLUR, WINDOW_FOCUS,
};
pub use simulated::SimulatedHost;
