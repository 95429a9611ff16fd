//! # LogWriter: activity to `tracing`
//!
//! A minimal subscriber that turns every [`Activity`] into a `tracing` record.
//! Failures log at `warn`, panics at `error`, everything else at `debug`/`info`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO  fire started event="signup" listeners=4
//! WARN  listener failed event="signup" listener="sendEmail" critical=false reason="smtp down"
//! INFO  fire completed event="signup" success=true failures=1
//! ```

use async_trait::async_trait;

use crate::events::{Activity, ActivityKind};
use crate::subscribers::Subscribe;

/// Activity logging subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_activity(&self, a: &Activity) {
        let event = a.event.as_deref().unwrap_or("-");
        let listener = a.listener.as_deref().unwrap_or("-");
        let reason = a.reason.as_deref().unwrap_or("-");

        match a.kind {
            ActivityKind::FireStarted => {
                tracing::info!(seq = a.seq, event, listeners = a.count, "fire started");
            }
            ActivityKind::FireCompleted => {
                tracing::info!(seq = a.seq, event, success = a.success, failures = a.count, "fire completed");
            }
            ActivityKind::ListenerStarting => {
                tracing::debug!(seq = a.seq, event, listener, "listener starting");
            }
            ActivityKind::ListenerCompleted => {
                tracing::debug!(seq = a.seq, event, listener, "listener completed");
            }
            ActivityKind::ListenerFailed => {
                tracing::warn!(seq = a.seq, event, listener, critical = a.critical, reason, "listener failed");
            }
            ActivityKind::RollbackStarted => {
                tracing::info!(seq = a.seq, event, critical = a.count, "rollback started");
            }
            ActivityKind::RollbackCompleted => {
                tracing::info!(seq = a.seq, event, "rollback completed");
            }
            ActivityKind::RollbackPanicked => {
                tracing::error!(seq = a.seq, event, reason, "rollback panicked");
            }
            ActivityKind::FailuresReported => {
                tracing::debug!(seq = a.seq, event, sink = listener, failures = a.count, "failures reported");
            }
            ActivityKind::ReportDropped => {
                tracing::warn!(seq = a.seq, event, sink = listener, reason, "report dropped");
            }
            ActivityKind::ReportPanicked => {
                tracing::error!(seq = a.seq, event, sink = listener, reason, "report sink panicked");
            }
            ActivityKind::SubscriberOverflow => {
                tracing::warn!(seq = a.seq, subscriber = listener, reason, "subscriber overflow");
            }
            ActivityKind::SubscriberPanicked => {
                tracing::error!(seq = a.seq, subscriber = listener, reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
