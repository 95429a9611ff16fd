//! # Dispatcher: fans an event out to its listeners and settles the outcome.
//!
//! The [`Dispatcher`] owns the registry, the activity bus and the reporting sink.
//! [`Dispatcher::fire`] is the single entry point.
//!
//! ## Fire path
//! ```text
//! fire(event, payload)
//!   ├─► registry.get(event)            (absent or empty → Fired::success(empty), no spawn)
//!   ├─► fresh state for this call:
//!   │     JoinSet (join barrier) · failure queue (mpsc, cap = #listeners) · OutputCollector
//!   ├─► spawn one task per listener:
//!   │     run_listener(spec, ctx, payload) ── catch_unwind ──► RoutineException? ──► failure queue
//!   ├─► await join barrier             (only suspension that waits on listeners)
//!   ├─► close + drain failure queue    (arrival order)
//!   ├─► seal output
//!   └─► settle:
//!         critical ≠ ∅ → rollback(payload, critical) inline → success = false
//!         all ≠ ∅      → ReportSink::submit(all)              → success = true
//!         otherwise                                           → success = true
//! ```
//!
//! ## Rules
//! - No listener fault escapes `fire`; `fire` itself never panics on listener input.
//! - Rollback runs at most once per call, strictly after every listener task finished.
//! - Each call allocates its own synchronization state; a dispatcher serves any
//!   number of sequential or concurrent calls.
//! - There is no timeout: a listener that never returns keeps `fire` waiting.
//! - Dropping the `fire` future detaches its listener tasks instead of aborting
//!   them. They run to completion; nothing settles their outcome.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::DropGuard;

use crate::core::builder::DispatcherBuilder;
use crate::core::config::DispatcherConfig;
use crate::core::context::FireContext;
use crate::core::output::{Output, OutputCollector};
use crate::core::recover::panic_message;
use crate::core::runner::run_listener;
use crate::error::RoutineException;
use crate::events::{Activity, ActivityKind, Bus};
use crate::listeners::Payload;
use crate::registry::{EventListener, EventMap, RollbackRef};
use crate::report::{FailureReport, ReportSink};

/// Join set of one fire. Dropped early, it detaches its tasks instead of
/// aborting them.
struct Detached(JoinSet<()>);

impl Drop for Detached {
    fn drop(&mut self) {
        if !self.0.is_empty() {
            tracing::debug!(tasks = self.0.len(), "fire abandoned; listeners detached");
        }
        self.0.detach_all();
    }
}

/// Outcome of one [`Dispatcher::fire`] call.
#[derive(Debug, Default)]
pub struct Fired {
    /// `false` iff at least one critical listener failed.
    pub success: bool,
    /// Output recorded by listeners (partial when `success` is `false`).
    pub output: Output,
    /// Every captured exception, in arrival order.
    pub failures: Vec<RoutineException>,
}

impl Fired {
    fn empty() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Returns the success flag.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Iterates over the critical exceptions.
    pub fn critical(&self) -> impl Iterator<Item = &RoutineException> {
        self.failures.iter().filter(|ex| ex.critical)
    }

    /// Splits into `(success, output)`.
    pub fn into_parts(self) -> (bool, Output) {
        (self.success, self.output)
    }
}

struct Inner<P> {
    cfg: DispatcherConfig,
    registry: EventMap<P>,
    bus: Bus,
    reports: ReportSink,
    // Stops the activity forwarder once the last handle is gone.
    _shutdown: DropGuard,
}

/// Concurrent event dispatcher.
///
/// Cheap to clone; clones share registry, bus and reporting sink.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use eventvisor::{Dispatcher, EventMap, FireContext, ListenerError, ListenerFn};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let registry = EventMap::<String>::builder()
///         .critical("signup", ListenerFn::arc("createAccount", |ctx: FireContext<String>, _email: Arc<String>| async move {
///             ctx.add_output("createAccount", 42_u64).ok();
///             Ok::<_, ListenerError>(())
///         }))
///         .build()
///         .unwrap();
///
///     let dispatcher = Dispatcher::builder(registry).build();
///     let fired = dispatcher.fire("signup", "ada@example.com".to_string()).await;
///
///     assert!(fired.success);
///     assert_eq!(fired.output.get::<u64>("createAccount"), Some(&42));
/// }
/// ```
pub struct Dispatcher<P> {
    inner: Arc<Inner<P>>,
}

impl<P> Clone for Dispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> Dispatcher<P> {
    /// Starts building a dispatcher over `registry`.
    pub fn builder(registry: EventMap<P>) -> DispatcherBuilder<P> {
        DispatcherBuilder::new(registry)
    }

    pub(crate) fn from_parts(
        cfg: DispatcherConfig,
        registry: EventMap<P>,
        bus: Bus,
        reports: ReportSink,
        shutdown: DropGuard,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                cfg,
                registry,
                bus,
                reports,
                _shutdown: shutdown,
            }),
        }
    }

    /// The registry this dispatcher fires against.
    pub fn registry(&self) -> &EventMap<P> {
        &self.inner.registry
    }

    /// The configuration this dispatcher was built with.
    pub fn config(&self) -> &DispatcherConfig {
        &self.inner.cfg
    }

    /// Creates a receiver observing activity published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Activity> {
        self.inner.bus.subscribe()
    }
}

impl<P: Payload> Dispatcher<P> {
    /// Runs every listener registered for `event` concurrently and settles the outcome.
    ///
    /// Accepts either an owned payload or an `Arc` of one (useful for nested fires
    /// that forward the payload they received).
    pub async fn fire(&self, event: &str, payload: impl Into<Arc<P>>) -> Fired {
        let Some(entry) = self.inner.registry.get(event).filter(|e| !e.is_empty()) else {
            return Fired::empty();
        };
        let payload: Arc<P> = payload.into();
        let event: Arc<str> = Arc::from(event);
        let bus = &self.inner.bus;

        bus.publish(
            Activity::new(ActivityKind::FireStarted)
                .with_event(Arc::clone(&event))
                .with_count(entry.len()),
        );

        let (fail_tx, mut fail_rx) = mpsc::channel::<RoutineException>(entry.len());
        let collector = OutputCollector::spawn(Arc::clone(&event));
        let mut tasks = Detached(JoinSet::new());
        self.spawn_listeners(&mut tasks.0, &event, entry, &payload, &collector, &fail_tx);
        drop(fail_tx);

        let lost = Self::join_all(&mut tasks.0, &event).await;

        fail_rx.close();
        let mut all = Vec::with_capacity(entry.len());
        while let Ok(exception) = fail_rx.try_recv() {
            all.push(exception);
        }
        all.extend(lost);

        let output = collector.seal().await;
        let critical: Vec<RoutineException> =
            all.iter().filter(|ex| ex.critical).cloned().collect();

        let success = if !critical.is_empty() {
            if let Some(rollback) = entry.rollback() {
                self.run_rollback(&event, rollback, payload, critical).await;
            }
            false
        } else {
            if !all.is_empty() {
                self.inner
                    .reports
                    .submit(FailureReport::new(Arc::clone(&event), all.clone()));
            }
            true
        };

        bus.publish(
            Activity::new(ActivityKind::FireCompleted)
                .with_event(event)
                .with_success(success)
                .with_count(all.len()),
        );

        Fired {
            success,
            output,
            failures: all,
        }
    }

    /// Spawns one task per listener into the fire's join set.
    fn spawn_listeners(
        &self,
        set: &mut JoinSet<()>,
        event: &Arc<str>,
        entry: &EventListener<P>,
        payload: &Arc<P>,
        collector: &OutputCollector,
        failures: &mpsc::Sender<RoutineException>,
    ) {
        for spec in entry.listeners() {
            let ctx = FireContext::new(
                self.clone(),
                Arc::clone(event),
                Arc::from(spec.name()),
                collector.handle(),
            );
            set.spawn(run_listener(
                spec.clone(),
                ctx,
                Arc::clone(payload),
                failures.clone(),
                self.inner.bus.clone(),
            ));
        }
    }

    /// Waits for every listener task.
    ///
    /// Listener faults are captured inside the task, so a join error means the
    /// task was torn down from outside (runtime shutdown). Such a task is
    /// reported as a critical exception: its outcome is unknown.
    async fn join_all(set: &mut JoinSet<()>, event: &Arc<str>) -> Vec<RoutineException> {
        let mut lost = Vec::new();
        while let Some(res) = set.join_next().await {
            if let Err(err) = res {
                tracing::error!(event = %event, error = %err, "listener task lost");
                lost.push(RoutineException::new(
                    format!("listener task lost: {err}"),
                    "unknown",
                    true,
                ));
            }
        }
        lost
    }

    /// Runs the event's rollback inline, containing a panic.
    async fn run_rollback(
        &self,
        event: &Arc<str>,
        rollback: &RollbackRef<P>,
        payload: Arc<P>,
        critical: Vec<RoutineException>,
    ) {
        let bus = &self.inner.bus;
        bus.publish(
            Activity::new(ActivityKind::RollbackStarted)
                .with_event(Arc::clone(event))
                .with_count(critical.len()),
        );

        match AssertUnwindSafe(rollback.rollback(payload, critical))
            .catch_unwind()
            .await
        {
            Ok(()) => {
                bus.publish(
                    Activity::new(ActivityKind::RollbackCompleted).with_event(Arc::clone(event)),
                );
            }
            Err(panic) => {
                let info = panic_message(&*panic);
                tracing::error!(event = %event, panic = %info, "rollback panicked");
                bus.publish(
                    Activity::new(ActivityKind::RollbackPanicked)
                        .with_event(Arc::clone(event))
                        .with_reason(info),
                );
            }
        }
    }
}
