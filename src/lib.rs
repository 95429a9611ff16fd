//! # eventvisor
//!
//! **Eventvisor** is a concurrent event dispatcher for async Rust.
//!
//! An event name maps to a set of listeners. Firing the event runs every
//! listener concurrently on the same payload, waits for all of them, and
//! settles the outcome: critical failures trigger the event's rollback,
//! non-critical failures go to a reporting sink, and the caller gets back a
//! success flag plus whatever output the listeners recorded.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//!     │ ListenerSpec  │   │ ListenerSpec  │   │   Rollback    │
//!     │  (critical)   │   │(non-critical) │   │  (optional)   │
//!     └──────┬────────┘   └──────┬────────┘   └──────┬────────┘
//!            └───────────────────┼───────────────────┘
//!                                ▼
//!                   EventMap (event name → EventListener)
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Dispatcher                                                       │
//! │  - EventMap (immutable registry)                                  │
//! │  - Bus (broadcast activity)                                       │
//! │  - ReportSink (queue + worker in front of the Report sink)        │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!   ┌──────────┐       ┌──────────┐       ┌──────────┐         │
//!   │ listener │       │ listener │       │ listener │         │
//!   │   task   │       │   task   │       │   task   │         │
//!   └┬─────────┘       └┬─────────┘       └┬─────────┘         │
//!    │ add_output ──────┴──► OutputCollector (message passing)  │
//!    │ fault ───────────────► failure queue (mpsc)              │
//!    ▼                                                          ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                   Bus (broadcast channel)                         │
//! │            (capacity: DispatcherConfig::bus_capacity)             │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!                  forwarder ──► SubscriberSet (per-sub queues)
//! ```
//!
//! ### Fire
//! ```text
//! fire(event, payload)
//!   ├─► spawn one task per listener (construct? → handle, panics recovered)
//!   ├─► join every task
//!   ├─► drain failures, seal output
//!   ├─ critical failures ─► rollback(payload, critical) ─► Fired { success: false, .. }
//!   ├─ other failures    ─► Report sink (non-blocking)  ─► Fired { success: true, .. }
//!   └─ no failures       ─────────────────────────────────► Fired { success: true, .. }
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------------|---------------------------------------------|
//! | **Dispatch**      | Fan an event out and settle rollback or reporting.              | [`Dispatcher`], [`Fired`]                   |
//! | **Listeners**     | Units of work, as trait impls, closures or per-fire factories.  | [`Listener`], [`ListenerFn`], [`ListenerFactory`] |
//! | **Registry**      | Validated event → listeners mapping with optional rollback.     | [`EventMap`], [`Rollback`], [`RollbackFn`]  |
//! | **Output**        | Concurrency-safe key/value output of a fire.                    | [`FireContext`], [`Output`]                 |
//! | **Reporting**     | Pluggable sink for non-critical failures.                       | [`Report`], [`TracingReport`]               |
//! | **Subscriber API**| Observe dispatcher activity (logging, metrics, audits).         | [`Subscribe`], [`Activity`]                 |
//! | **Errors**        | Typed errors for listeners, registry and output.                | [`ListenerError`], [`RoutineException`]     |
//! | **Configuration** | Centralize dispatcher settings.                                 | [`DispatcherConfig`]                        |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] subscriber that logs through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{
//!     Dispatcher, EventMap, FireContext, ListenerError, ListenerFn, RollbackFn, RoutineException,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = EventMap::<String>::builder()
//!         .critical("signup", ListenerFn::arc("createAccount", |ctx: FireContext<String>, _email: Arc<String>| async move {
//!             ctx.add_output("createAccount", 42_u64)?;
//!             Ok::<_, ListenerError>(())
//!         }))
//!         .non_critical("signup", ListenerFn::arc("sendEmail", |_ctx: FireContext<String>, _email: Arc<String>| async move {
//!             Err::<(), _>(ListenerError::fail("smtp down"))
//!         }))
//!         .rollback("signup", RollbackFn::arc(|_email: Arc<String>, _critical: Vec<RoutineException>| async move {
//!             // delete the account ...
//!         }))
//!         .build()?;
//!
//!     let dispatcher = Dispatcher::builder(registry).build();
//!     let fired = dispatcher.fire("signup", "ada@example.com".to_string()).await;
//!
//!     // the email failure is non-critical: reported, no rollback
//!     assert!(fired.success);
//!     assert_eq!(fired.output.get::<u64>("createAccount"), Some(&42));
//!     assert_eq!(fired.failures.len(), 1);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod listeners;
mod registry;
mod report;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{Dispatcher, DispatcherBuilder, DispatcherConfig, FireContext, Fired, Output, OutputValue};
pub use error::{ListenerError, OutputError, RegistryError, RoutineException};
pub use events::{Activity, ActivityKind, Bus};
pub use listeners::{Listener, ListenerFactory, ListenerFn, ListenerRef, ListenerSpec, Payload};
pub use registry::{EventListener, EventMap, EventMapBuilder, Rollback, RollbackFn, RollbackRef};
pub use report::{FailureReport, NoopReport, Report, ReportRef, TracingReport};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a built-in logging subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
