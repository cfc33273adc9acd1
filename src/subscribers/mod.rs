//! # Subscription surface: the `Subscribe` trait and the ordered registry.

mod registry;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use registry::SubscriptionId;
pub(crate) use registry::SubscriberRegistry;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
