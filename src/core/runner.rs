//! # Run one listener task of a fire.
//!
//! Executes one [`Listener`] inside a recovery wrapper and publishes lifecycle
//! activity to the [`Bus`].
//!
//! - **Construct** a fresh instance if the listener asks for it
//! - **Handle** the payload
//! - **Capture** a returned error or a panic as a [`RoutineException`]
//!
//! ## Activity flow
//!
//! ```text
//! Success:
//!   ListenerStarting → construct/handle → Ok(())  → ListenerCompleted
//!
//! Returned error:
//!   ListenerStarting → construct/handle → Err(e)  → ListenerFailed → failure queue
//!
//! Panic:
//!   ListenerStarting → construct/handle → panic   → ListenerFailed → failure queue
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal record: `ListenerCompleted` or `ListenerFailed`
//! - Submits **at most one** exception per task
//! - Nothing raised by the listener escapes this function

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::{
    core::{context::FireContext, recover::panic_message},
    error::{ListenerError, RoutineException},
    events::{Activity, ActivityKind, Bus},
    listeners::{ListenerSpec, Payload},
};

/// Runs `spec` once for the fire described by `ctx`.
///
/// ### Fault conversion
/// - `Err(ListenerError)` → message from [`ListenerError::as_message`]
/// - panic → message from the panic payload (see `recover::panic_message`)
///
/// Either way the exception carries the listener's registered criticality.
///
/// `failures` is sized so that every task of the fire can submit once without
/// waiting.
pub(crate) async fn run_listener<P: Payload>(
    spec: ListenerSpec<P>,
    ctx: FireContext<P>,
    payload: Arc<P>,
    failures: mpsc::Sender<RoutineException>,
    bus: Bus,
) {
    let event = ctx.event_arc();
    let name: Arc<str> = Arc::from(spec.name());
    bus.publish(
        Activity::new(ActivityKind::ListenerStarting)
            .with_event(Arc::clone(&event))
            .with_listener(Arc::clone(&name)),
    );

    let fault = match AssertUnwindSafe(invoke(&spec, &ctx, payload))
        .catch_unwind()
        .await
    {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(err.as_message()),
        Err(panic) => Some(panic_message(&*panic)),
    };
    drop(ctx);

    let Some(message) = fault else {
        bus.publish(
            Activity::new(ActivityKind::ListenerCompleted)
                .with_event(event)
                .with_listener(name),
        );
        return;
    };

    let exception = RoutineException::new(message, &*name, spec.is_critical());
    bus.publish(
        Activity::new(ActivityKind::ListenerFailed)
            .with_event(Arc::clone(&event))
            .with_listener(Arc::clone(&name))
            .with_reason(exception.message.as_str())
            .with_critical(exception.critical),
    );

    // closed only when the fire call was dropped before the join
    if let Err(err) = failures.try_send(exception) {
        tracing::warn!(event = %event, listener = %name, error = %err, "exception not settled: fire abandoned");
    }
}

/// Construct (optionally) and handle.
async fn invoke<P: Payload>(
    spec: &ListenerSpec<P>,
    ctx: &FireContext<P>,
    payload: Arc<P>,
) -> Result<(), ListenerError> {
    let registered = spec.listener();
    match registered.construct()? {
        Some(fresh) => fresh.handle(ctx, payload).await,
        None => registered.handle(ctx, payload).await,
    }
}
