//! Dispatcher activity: record types and broadcast bus.
//!
//! ## Contents
//! - [`ActivityKind`], [`Activity`] classification and metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Dispatcher::fire`, listener tasks (`runner::run_listener`),
//!   the `ReportSink` worker, `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the dispatcher's forwarder (fans out to `SubscriberSet`) and
//!   any receiver obtained through `Dispatcher::subscribe`.

mod activity;
mod bus;

pub use activity::{Activity, ActivityKind};
pub use bus::Bus;
