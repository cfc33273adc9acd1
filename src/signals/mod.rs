//! # Raw host signals and their mapping into the visibility domain.

mod signal;

pub use signal::{Signal, SignalKind};
