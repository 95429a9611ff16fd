//! # Listener abstraction.
//!
//! This module defines the [`Listener`] trait, the unit of work fanned out by
//! [`Dispatcher::fire`](crate::Dispatcher::fire). The common handle type is
//! [`ListenerRef`], an `Arc<dyn Listener<P>>` shared by the registry and every fire.
//!
//! A listener either handles on its registered instance (the default), or
//! builds a fresh instance per fire in [`Listener::construct`] and handles on
//! that one.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::FireContext;
use crate::error::ListenerError;

/// Bound shared by every payload type.
///
/// The payload is wrapped in an `Arc` and handed to listener tasks running on
/// other threads, so it must be `Send + Sync + 'static`.
pub trait Payload: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Payload for T {}

/// Shared handle to a listener.
pub type ListenerRef<P> = Arc<dyn Listener<P>>;

/// # Unit of work run for a fired event.
///
/// A `Listener` has a stable [`name`](Listener::name) (used as the routine name of
/// its exceptions) and an async [`handle`](Listener::handle) receiving the fire
/// context and the shared payload.
///
/// Failure is reported by returning `Err(ListenerError)` or by panicking; both end
/// up as a [`RoutineException`](crate::RoutineException) and never escape the task.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use eventvisor::{FireContext, Listener, ListenerError};
///
/// struct CreateAccount;
///
/// #[async_trait]
/// impl Listener<String> for CreateAccount {
///     fn name(&self) -> &str { "createAccount" }
///
///     async fn handle(&self, ctx: &FireContext<String>, email: Arc<String>) -> Result<(), ListenerError> {
///         if email.is_empty() {
///             return Err(ListenerError::fail("empty email"));
///         }
///         ctx.add_output("createAccount", 42_u64).ok();
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Listener<P>: Send + Sync + 'static {
    /// Returns a stable, human-readable listener name.
    fn name(&self) -> &str;

    /// Optional construction step, run once per fire before [`handle`](Listener::handle).
    ///
    /// Returns `Ok(None)` (the default) to handle on the registered instance, or
    /// `Ok(Some(fresh))` to handle on a freshly built, non-shared instance.
    /// An error is captured like a handling failure and `handle` is skipped.
    fn construct(&self) -> Result<Option<ListenerRef<P>>, ListenerError> {
        Ok(None)
    }

    /// Handles one fired event.
    async fn handle(&self, ctx: &FireContext<P>, payload: Arc<P>) -> Result<(), ListenerError>;
}
