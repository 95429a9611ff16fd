//! # Reporting sink for non-critical failures.
//!
//! - [`Report`] - trait implemented by the external sink
//! - [`FailureReport`] - what a sink receives
//! - [`TracingReport`] - default sink, logs through `tracing`
//! - [`NoopReport`] - discards everything
//!
//! The sink is injected with
//! [`DispatcherBuilder::with_reporter`](crate::DispatcherBuilder::with_reporter).

#[allow(clippy::module_inception)]
mod report;
mod sink;

pub use report::{FailureReport, NoopReport, Report, ReportRef, TracingReport};
pub(crate) use sink::ReportSink;
