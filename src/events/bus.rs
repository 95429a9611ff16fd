//! # Activity bus for broadcasting dispatcher activity.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking publishing from many sources (fire calls, listener tasks,
//! the reporting sink worker, subscriber workers).
//!
//! ## Architecture
//! ```text
//! Publishers (many):                  Receivers:
//!   fire()        ──┐
//!   listener task ──┼──────► Bus ───┬──► forwarder ────► SubscriberSet
//!   ReportSink    ──┤  (broadcast)  │    (in Dispatcher)
//!   sub workers   ──┘               └──► Dispatcher::subscribe() (user receivers)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks.
//! - **Bounded capacity**: one ring buffer stores recent records for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: records are lost if there are no receivers at send time.

use tokio::sync::broadcast;

use super::activity::Activity;

/// Broadcast channel for dispatcher activity.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Activity>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Activity>(capacity.max(1));
        Self { tx }
    }

    /// Publishes a record to all active receivers.
    ///
    /// If there are no receivers, the record is dropped.
    pub fn publish(&self, activity: Activity) {
        let _ = self.tx.send(activity);
    }

    /// Creates a new receiver that observes records sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Activity> {
        self.tx.subscribe()
    }
}
