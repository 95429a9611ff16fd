//! # Per-fire output aggregation.
//!
//! Listener results are collected by message passing into one aggregator task
//! per fire call; no map is shared between listener tasks.
//!
//! ## Architecture
//! ```text
//! listener A ── OutputHandle::put ──┐
//! listener B ── OutputHandle::put ──┼──► [unbounded queue] ──► aggregator task
//! listener N ── OutputHandle::put ──┘                           (owns Output)
//!                                                                    │
//! fire() after join ── OutputCollector::seal ── Seal(reply) ─────────┘──► Output
//! ```
//!
//! ## Rules
//! - Every put sent before `seal` is part of the sealed output (single FIFO queue).
//! - After `seal` the aggregator exits; later puts fail with [`OutputError::Sealed`].
//! - Writing a key twice keeps the last value.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::error::OutputError;

/// Type-erased output value.
pub type OutputValue = Arc<dyn Any + Send + Sync>;

/// Results recorded by listeners during one fire, keyed by listener identifier.
///
/// ```rust
/// use eventvisor::Output;
///
/// let out = Output::default();
/// assert!(out.is_empty());
/// assert_eq!(out.get::<u64>("createAccount"), None);
/// ```
#[derive(Clone, Default)]
pub struct Output {
    entries: HashMap<String, OutputValue>,
}

impl Output {
    /// Returns the value under `key` if it exists and has type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns the type-erased value under `key`.
    pub fn get_value(&self, key: &str) -> Option<&OutputValue> {
        self.entries.get(key)
    }

    /// Returns true if `key` was recorded.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns sorted list of recorded keys.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    fn insert(&mut self, key: String, value: OutputValue) -> Option<OutputValue> {
        self.entries.insert(key, value)
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output").field("keys", &self.keys()).finish()
    }
}

enum Command {
    Put { key: String, value: OutputValue },
    Seal(oneshot::Sender<Output>),
}

/// Owner side of one fire's aggregator.
pub(crate) struct OutputCollector {
    tx: mpsc::UnboundedSender<Command>,
    event: Arc<str>,
}

impl OutputCollector {
    /// Spawns the aggregator task for one fire of `event`.
    pub(crate) fn spawn(event: Arc<str>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Command>();
        let ev = Arc::clone(&event);

        tokio::spawn(async move {
            let mut output = Output::default();
            while let Some(cmd) = rx.recv().await {
                match cmd {
                    Command::Put { key, value } => {
                        if output.insert(key.clone(), value).is_some() {
                            tracing::debug!(event = %ev, key = %key, "output key overwritten");
                        }
                    }
                    Command::Seal(reply) => {
                        let _ = reply.send(output);
                        return;
                    }
                }
            }
        });

        Self { tx, event }
    }

    /// Returns a writer handle for one listener task.
    pub(crate) fn handle(&self) -> OutputHandle {
        OutputHandle {
            tx: self.tx.clone(),
            event: Arc::clone(&self.event),
        }
    }

    /// Stops accepting writes and returns everything recorded so far.
    pub(crate) async fn seal(self) -> Output {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::Seal(reply)).is_err() {
            tracing::warn!(event = %self.event, "output aggregator gone before seal");
            return Output::default();
        }
        rx.await.unwrap_or_default()
    }
}

/// Writer side handed to listener tasks.
#[derive(Clone)]
pub(crate) struct OutputHandle {
    tx: mpsc::UnboundedSender<Command>,
    event: Arc<str>,
}

impl OutputHandle {
    pub(crate) fn put(&self, key: String, value: OutputValue) -> Result<(), OutputError> {
        if self.tx.is_closed() {
            return Err(self.sealed(key));
        }
        let dropped_key = key.clone();
        self.tx
            .send(Command::Put { key, value })
            .map_err(|_| self.sealed(dropped_key))
    }

    fn sealed(&self, key: String) -> OutputError {
        OutputError::Sealed {
            event: self.event.to_string(),
            key,
        }
    }
}
