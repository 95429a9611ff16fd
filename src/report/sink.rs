//! # Non-blocking delivery to the reporting sink.
//!
//! ```text
//! fire() ── submit(report) ──► [unbounded queue] ──► worker ──► Report::report()
//!              │ (send)                                 └──────► panic → ReportPanicked
//!              ├─ Ok     → FailuresReported
//!              └─ Closed → ReportDropped
//! ```
//!
//! A slow sink delays delivery but never loses a report: the queue grows
//! instead. The worker runs until the dispatcher (the only sender owner) is
//! dropped, and drains what was queued before that.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::core::panic_message;
use crate::events::{Activity, ActivityKind, Bus};
use crate::report::report::{FailureReport, ReportRef};

/// Queue and worker in front of one [`Report`](crate::Report).
pub(crate) struct ReportSink {
    name: &'static str,
    tx: mpsc::UnboundedSender<FailureReport>,
    bus: Bus,
}

impl ReportSink {
    /// Spawns the worker for `report`.
    pub(crate) fn new(report: ReportRef, bus: Bus) -> Self {
        let name = report.name();
        let (tx, mut rx) = mpsc::unbounded_channel::<FailureReport>();
        let worker_bus = bus.clone();

        tokio::spawn(async move {
            while let Some(item) = rx.recv().await {
                let fut = report.report(&item);
                if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
                    let info = panic_message(&*panic);
                    tracing::error!(sink = name, event = %item.event, panic = %info, "report sink panicked");
                    worker_bus.publish(
                        Activity::new(ActivityKind::ReportPanicked)
                            .with_event(Arc::clone(&item.event))
                            .with_listener(name)
                            .with_reason(info),
                    );
                }
            }
        });

        Self { name, tx, bus }
    }

    /// Queues `report` without waiting.
    pub(crate) fn submit(&self, report: FailureReport) {
        let event = Arc::clone(&report.event);
        let count = report.failures.len();

        match self.tx.send(report) {
            Ok(()) => self.bus.publish(
                Activity::new(ActivityKind::FailuresReported)
                    .with_event(event)
                    .with_listener(self.name)
                    .with_count(count),
            ),
            // only when the worker died with the runtime
            Err(_) => {
                tracing::warn!(sink = self.name, event = %event, "failure report dropped: sink worker gone");
                self.bus.publish(
                    Activity::new(ActivityKind::ReportDropped)
                        .with_event(event)
                        .with_listener(self.name)
                        .with_reason("closed"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoutineException;
    use crate::report::Report;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Channel(mpsc::UnboundedSender<FailureReport>);

    #[async_trait]
    impl Report for Channel {
        async fn report(&self, report: &FailureReport) {
            let _ = self.0.send(report.clone());
        }
    }

    struct Exploding;

    #[async_trait]
    impl Report for Exploding {
        async fn report(&self, _report: &FailureReport) {
            panic!("sink down");
        }

        fn name(&self) -> &'static str {
            "exploding"
        }
    }

    struct Slow(mpsc::UnboundedSender<FailureReport>);

    #[async_trait]
    impl Report for Slow {
        async fn report(&self, report: &FailureReport) {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let _ = self.0.send(report.clone());
        }
    }

    fn report_of(n: usize) -> FailureReport {
        let failures = (0..n)
            .map(|i| RoutineException::new("boom", format!("l{i}"), false))
            .collect();
        FailureReport::new(Arc::from("signup"), failures)
    }

    #[tokio::test]
    async fn test_delivers_report() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bus = Bus::new(16);
        let mut activity = bus.subscribe();
        let sink = ReportSink::new(Arc::new(Channel(tx)), bus);

        sink.submit(report_of(2));

        let got = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&*got.event, "signup");
        assert_eq!(got.failures.len(), 2);

        let a = activity.recv().await.unwrap();
        assert_eq!(a.kind, ActivityKind::FailuresReported);
        assert_eq!(a.count, Some(2));
    }

    #[tokio::test]
    async fn test_contains_sink_panic() {
        let bus = Bus::new(16);
        let mut activity = bus.subscribe();
        let sink = ReportSink::new(Arc::new(Exploding), bus);

        sink.submit(report_of(1));

        let mut kinds = Vec::new();
        while kinds.len() < 2 {
            let a = tokio::time::timeout(Duration::from_secs(1), activity.recv())
                .await
                .unwrap()
                .unwrap();
            kinds.push((a.kind, a.reason.as_deref().map(str::to_string)));
        }
        assert_eq!(kinds[0].0, ActivityKind::FailuresReported);
        assert_eq!(kinds[1], (ActivityKind::ReportPanicked, Some("sink down".to_string())));
    }

    #[tokio::test]
    async fn test_slow_sink_receives_every_report() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bus = Bus::new(64);
        let mut activity = bus.subscribe();
        let sink = ReportSink::new(Arc::new(Slow(tx)), bus);

        for n in 1..=5 {
            sink.submit(report_of(n));
        }

        for n in 1..=5 {
            let got = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(got.failures.len(), n);
        }
        while let Ok(a) = activity.try_recv() {
            assert_eq!(a.kind, ActivityKind::FailuresReported);
        }
    }
}
