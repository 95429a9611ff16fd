//! # Activity subscribers.
//!
//! ```text
//! fire / listener tasks / sinks ── publish(Activity) ──► Bus ──► forwarder ──► SubscriberSet
//!                                                         │                      ├──► LogWriter
//!                                                         │                      └──► custom ...
//!                                                         └──► Dispatcher::subscribe() receivers
//! ```
//!
//! - [`Subscribe`]: trait for custom subscribers
//! - [`SubscriberSet`]: per-subscriber queues and workers
//! - `LogWriter` (feature `logging`): built-in `tracing` subscriber

#[cfg(feature = "logging")]
mod embedded;
mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
