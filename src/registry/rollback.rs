//! # Compensating action run after critical failures.
//!
//! A [`Rollback`] is registered per event. It runs at most once per fire, only when
//! at least one critical listener failed, and only after every listener task of
//! that fire has finished. It receives the original payload and the full list of
//! critical exceptions.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RoutineException;
use crate::listeners::Payload;

/// Shared handle to a rollback.
pub type RollbackRef<P> = Arc<dyn Rollback<P>>;

/// Compensating action for one event.
#[async_trait]
pub trait Rollback<P>: Send + Sync + 'static {
    /// Undoes the partial effects of a failed fire.
    async fn rollback(&self, payload: Arc<P>, critical: Vec<RoutineException>);
}

/// Closure-backed rollback.
///
/// ```rust
/// use std::sync::Arc;
/// use eventvisor::{RollbackFn, RollbackRef, RoutineException};
///
/// let undo: RollbackRef<String> = RollbackFn::arc(|email: Arc<String>, critical: Vec<RoutineException>| async move {
///     eprintln!("undo signup of {email}: {} critical failure(s)", critical.len());
/// });
/// ```
#[derive(Debug)]
pub struct RollbackFn<F> {
    f: F,
}

impl<F> RollbackFn<F> {
    /// Creates a new closure-backed rollback.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the rollback and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<P, F, Fut> Rollback<P> for RollbackFn<F>
where
    P: Payload,
    F: Fn(Arc<P>, Vec<RoutineException>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn rollback(&self, payload: Arc<P>, critical: Vec<RoutineException>) {
        (self.f)(payload, critical).await
    }
}
