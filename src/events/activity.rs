//! # Activity records emitted by the dispatcher and its workers.
//!
//! The [`ActivityKind`] enum classifies what happened during a fire:
//! - **Fire events**: a fire call started or completed
//! - **Listener events**: one listener task starting, completing or failing
//! - **Rollback events**: the compensating action running or panicking
//! - **Sink events**: failures handed to the reporting sink, dropped or panicked
//! - **Subscriber events**: overflow and panics of activity subscribers
//!
//! The [`Activity`] struct carries the metadata (event name, listener name,
//! reason, criticality, counters).
//!
//! ## Ordering guarantees
//! Each activity has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when records are delivered out of order.
//!
//! ## Example
//! ```rust
//! use eventvisor::{Activity, ActivityKind};
//!
//! let a = Activity::new(ActivityKind::ListenerFailed)
//!     .with_event("signup")
//!     .with_listener("sendEmail")
//!     .with_reason("smtp down")
//!     .with_critical(false);
//!
//! assert_eq!(a.kind, ActivityKind::ListenerFailed);
//! assert_eq!(a.listener.as_deref(), Some("sendEmail"));
//! assert_eq!(a.critical, Some(false));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for activity ordering.
static ACTIVITY_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of dispatcher activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    // === Fire ===
    /// A fire call resolved its listeners and is about to spawn them.
    ///
    /// Sets:
    /// - `event`: event name
    /// - `count`: number of listeners
    FireStarted,

    /// A fire call returned.
    ///
    /// Sets:
    /// - `event`: event name
    /// - `success`: returned flag
    /// - `count`: number of captured exceptions
    FireCompleted,

    // === Listeners ===
    /// Listener task is starting.
    ///
    /// Sets:
    /// - `event`, `listener`
    ListenerStarting,

    /// Listener returned `Ok(())`.
    ///
    /// Sets:
    /// - `event`, `listener`
    ListenerCompleted,

    /// Listener returned an error or panicked.
    ///
    /// Sets:
    /// - `event`, `listener`
    /// - `reason`: fault message
    /// - `critical`: registered criticality
    ListenerFailed,

    // === Rollback ===
    /// Rollback is about to run.
    ///
    /// Sets:
    /// - `event`
    /// - `count`: number of critical exceptions handed over
    RollbackStarted,

    /// Rollback returned.
    ///
    /// Sets:
    /// - `event`
    RollbackCompleted,

    /// Rollback panicked; the panic was contained.
    ///
    /// Sets:
    /// - `event`
    /// - `reason`: panic message
    RollbackPanicked,

    // === Reporting sink ===
    /// Non-critical failures were queued for the reporting sink.
    ///
    /// Sets:
    /// - `event`
    /// - `count`: number of exceptions
    FailuresReported,

    /// Sink worker is gone (runtime shutting down); the report was dropped.
    ///
    /// Sets:
    /// - `event`
    /// - `reason`: "closed"
    ReportDropped,

    /// Sink panicked while handling a report.
    ///
    /// Sets:
    /// - `event`
    /// - `reason`: panic message
    ReportPanicked,

    // === Subscribers ===
    /// Subscriber dropped a record (queue full or worker closed).
    ///
    /// Sets:
    /// - `listener`: subscriber name
    /// - `reason`: reason string
    SubscriberOverflow,

    /// Subscriber panicked while processing a record.
    ///
    /// Sets:
    /// - `listener`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,
}

/// Dispatcher activity with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`ActivityKind`]
#[derive(Clone, Debug)]
pub struct Activity {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Activity classification.
    pub kind: ActivityKind,

    /// Name of the fired event, if applicable.
    pub event: Option<Arc<str>>,
    /// Name of the listener (or subscriber), if applicable.
    pub listener: Option<Arc<str>>,
    /// Human-readable reason (fault messages, drop reasons).
    pub reason: Option<Arc<str>>,
    /// Registered criticality of a failed listener.
    pub critical: Option<bool>,
    /// Listener or exception count.
    pub count: Option<u32>,
    /// Outcome of a completed fire.
    pub success: Option<bool>,
}

impl Activity {
    /// Creates a new record of the given kind with current timestamp and next sequence number.
    pub fn new(kind: ActivityKind) -> Self {
        Self {
            seq: ACTIVITY_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            event: None,
            listener: None,
            reason: None,
            critical: None,
            count: None,
            success: None,
        }
    }

    /// Attaches an event name.
    #[inline]
    pub fn with_event(mut self, event: impl Into<Arc<str>>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Attaches a listener (or subscriber) name.
    #[inline]
    pub fn with_listener(mut self, listener: impl Into<Arc<str>>) -> Self {
        self.listener = Some(listener.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the criticality of a failed listener.
    #[inline]
    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = Some(critical);
        self
    }

    /// Attaches a count, saturating at `u32::MAX`.
    #[inline]
    pub fn with_count(mut self, n: usize) -> Self {
        self.count = Some(u32::try_from(n).unwrap_or(u32::MAX));
        self
    }

    /// Attaches the outcome of a fire.
    #[inline]
    pub fn with_success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }

    /// Creates a subscriber overflow record.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Activity::new(ActivityKind::SubscriberOverflow)
            .with_listener(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic record.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Activity::new(ActivityKind::SubscriberPanicked)
            .with_listener(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, ActivityKind::SubscriberOverflow)
    }
}
