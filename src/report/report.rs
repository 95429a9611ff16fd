//! # Reporting sink for non-critical failures.
//!
//! Provides [`Report`], the extension point receiving the failures of a fire
//! that had **no** critical failure. Fires with a critical failure go to the
//! event's rollback instead and are not reported here.
//!
//! ## Rules
//! - Delivery is fire-and-forget: the fire call never waits for the sink.
//! - Every report is delivered, one at a time, in submission order.
//! - A panicking sink is contained and reported as `ActivityKind::ReportPanicked`.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use eventvisor::{FailureReport, Report};
//!
//! struct Pager;
//!
//! #[async_trait]
//! impl Report for Pager {
//!     async fn report(&self, report: &FailureReport) {
//!         for ex in &report.failures {
//!             eprintln!("[{}] {} failed: {}", report.event, ex.routine, ex.message);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "pager" }
//! }
//! ```

use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;

use crate::error::RoutineException;

/// Non-critical failures of one fire.
#[derive(Clone, Debug)]
pub struct FailureReport {
    /// Event that was fired.
    pub event: Arc<str>,
    /// Every captured exception, in arrival order. None of them is critical.
    pub failures: Vec<RoutineException>,
    /// When the fire settled.
    pub at: SystemTime,
}

impl FailureReport {
    pub(crate) fn new(event: Arc<str>, failures: Vec<RoutineException>) -> Self {
        Self {
            event,
            failures,
            at: SystemTime::now(),
        }
    }
}

/// Shared handle to a reporting sink.
pub type ReportRef = Arc<dyn Report>;

/// External sink for non-critical failures.
#[async_trait]
pub trait Report: Send + Sync + 'static {
    /// Handles one report.
    async fn report(&self, report: &FailureReport);

    /// Returns the sink name used in logs and activity records.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Default sink: one `tracing` warning per failure.
#[derive(Debug, Default)]
pub struct TracingReport;

impl TracingReport {
    /// Construct a new [`TracingReport`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Report for TracingReport {
    async fn report(&self, report: &FailureReport) {
        for ex in &report.failures {
            tracing::warn!(
                event = %report.event,
                routine = %ex.routine,
                message = %ex.message,
                "non-critical listener failure"
            );
        }
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}

/// Sink that discards every report.
#[derive(Debug, Default)]
pub struct NoopReport;

#[async_trait]
impl Report for NoopReport {
    async fn report(&self, _report: &FailureReport) {}

    fn name(&self) -> &'static str {
        "noop"
    }
}
