//! # Non-blocking activity fan-out to multiple subscribers.
//!
//! ```text
//! emit(activity)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_activity()
//!     │    (bounded)         └──────► panic → SubscriberPanicked
//!     ├──► [queue 2] ──► worker 2 ──► subscriber2.on_activity()
//!     └──► [queue N] ──► worker N ──► subscriberN.on_activity()
//! ```
//!
//! ## Rules
//! - **No cross-subscriber ordering**: subscriber A may process record N while B processes N+5
//! - **Overflow**: record dropped for that subscriber only, `SubscriberOverflow` published
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Per-subscriber FIFO**: each subscriber sees records in order
//!
//! A panicking subscriber is contained with `catch_unwind`; its worker keeps
//! processing the next record.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::core::panic_message;
use crate::events::{Activity, Bus};
use crate::subscribers::Subscribe;

struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Activity>>,
}

/// Fan-out coordinator for activity subscribers.
///
/// Each subscriber gets a dedicated bounded queue and worker task.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Queue capacity comes from [`Subscribe::queue_capacity`], minimum 1.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Activity>>(cap);
            let bus_for_worker = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(activity) = rx.recv().await {
                    let fut = sub.on_activity(activity.as_ref());

                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = panic_message(&*panic_err);
                        bus_for_worker.publish(Activity::subscriber_panicked(name, info));
                    }
                }
            });
            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }
        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Returns `true` if the set has no subscribers.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Emits a record to all subscribers (one shared copy).
    ///
    /// Overflow records are not re-published when they themselves overflow.
    pub fn emit(&self, activity: &Activity) {
        let is_overflow = activity.is_subscriber_overflow();
        let shared = Arc::new(activity.clone());

        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&shared)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !is_overflow {
                self.bus
                    .publish(Activity::subscriber_overflow(channel.name, reason));
            }
        }
    }

    /// Closes every queue and waits for the workers to drain.
    pub async fn shutdown(self) {
        drop(self.channels);

        for h in self.workers {
            let _ = h.await;
        }
    }
}
