use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{DispatcherConfig, dispatcher::Dispatcher},
    events::Bus,
    registry::EventMap,
    report::{ReportRef, ReportSink, TracingReport},
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Dispatcher`] with optional collaborators.
pub struct DispatcherBuilder<P> {
    registry: EventMap<P>,
    cfg: DispatcherConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    reporter: Option<ReportRef>,
}

impl<P> DispatcherBuilder<P> {
    /// Creates a new builder over `registry` with the default configuration.
    pub fn new(registry: EventMap<P>) -> Self {
        Self {
            registry,
            cfg: DispatcherConfig::default(),
            subscribers: Vec::new(),
            reporter: None,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: DispatcherConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets activity subscribers for observability.
    ///
    /// Subscribers receive activity records through dedicated workers with
    /// bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Injects the sink receiving non-critical failures.
    ///
    /// Defaults to [`TracingReport`].
    pub fn with_reporter(mut self, reporter: ReportRef) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Builds the dispatcher.
    ///
    /// Initializes the activity bus, the subscriber workers with their
    /// forwarder, and the reporting sink worker.
    ///
    /// # Panics
    /// Must be called from within a Tokio runtime (workers are spawned here).
    pub fn build(self) -> Dispatcher<P> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let token = CancellationToken::new();

        let subs = SubscriberSet::new(self.subscribers, bus.clone());
        if !subs.is_empty() {
            forward(&bus, subs, token.clone());
        }

        let reporter = self
            .reporter
            .unwrap_or_else(|| Arc::new(TracingReport::new()));
        let reports = ReportSink::new(reporter, bus.clone());

        Dispatcher::from_parts(self.cfg, self.registry, bus, reports, token.drop_guard())
    }
}

/// Subscribes to the bus and forwards records to the subscriber set until `token` fires,
/// then lets the subscriber workers drain their queues.
fn forward(bus: &Bus, set: SubscriberSet, token: CancellationToken) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                res = rx.recv() => match res {
                    Ok(activity) => set.emit(&activity),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "activity forwarder lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
        set.shutdown().await;
    });
}
