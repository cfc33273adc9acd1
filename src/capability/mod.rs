//! # Capability detection and listener installation.

mod pathway;

pub use pathway::Capability;
pub(crate) use pathway::install;
