//! # Function-backed listeners.
//!
//! - [`ListenerFn`] wraps a closure `F: Fn(FireContext<P>, Arc<P>) -> Fut`, producing a
//!   fresh future per fire. Handle-only shape.
//! - [`ListenerFactory`] wraps a constructor `F: Fn() -> L`; every fire builds a new `L`
//!   in [`Listener::construct`] and handles on it. Construct-then-handle shape.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{FireContext, Listener, ListenerError, ListenerFn, ListenerRef};
//!
//! let l: ListenerRef<String> = ListenerFn::arc("sendEmail", |_ctx: FireContext<String>, to: Arc<String>| async move {
//!     if to.is_empty() {
//!         return Err(ListenerError::fail("no recipient"));
//!     }
//!     Ok::<_, ListenerError>(())
//! });
//!
//! assert_eq!(l.name(), "sendEmail");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::FireContext;
use crate::error::ListenerError;
use crate::listeners::listener::{Listener, ListenerRef, Payload};

/// Closure-backed listener.
///
/// The closure receives an owned clone of the fire context so the returned
/// future can be `'static`.
#[derive(Debug)]
pub struct ListenerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ListenerFn<F> {
    /// Creates a new closure-backed listener.
    ///
    /// Prefer [`ListenerFn::arc`] when you immediately need a [`ListenerRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<P, F, Fut> Listener<P> for ListenerFn<F>
where
    P: Payload,
    F: Fn(FireContext<P>, Arc<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, ctx: &FireContext<P>, payload: Arc<P>) -> Result<(), ListenerError> {
        (self.f)(ctx.clone(), payload).await
    }
}

/// Listener that is rebuilt for every fire.
///
/// Use it when handling needs per-invocation state that must not be shared
/// between concurrent fires.
///
/// ```rust
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use eventvisor::{FireContext, Listener, ListenerError, ListenerFactory, ListenerRef};
///
/// #[derive(Default)]
/// struct Tally { seen: std::sync::atomic::AtomicUsize }
///
/// #[async_trait]
/// impl Listener<u32> for Tally {
///     fn name(&self) -> &str { "tally" }
///     async fn handle(&self, _ctx: &FireContext<u32>, _p: Arc<u32>) -> Result<(), ListenerError> {
///         self.seen.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
///         Ok(())
///     }
/// }
///
/// let l: ListenerRef<u32> = ListenerFactory::arc("tally", Tally::default);
/// assert!(l.construct().unwrap().is_some());
/// ```
#[derive(Debug)]
pub struct ListenerFactory<F> {
    name: Cow<'static, str>,
    make: F,
}

impl<F> ListenerFactory<F> {
    /// Creates a new factory-backed listener.
    pub fn new(name: impl Into<Cow<'static, str>>, make: F) -> Self {
        Self {
            name: name.into(),
            make,
        }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, make: F) -> Arc<Self> {
        Arc::new(Self::new(name, make))
    }
}

#[async_trait]
impl<P, F, L> Listener<P> for ListenerFactory<F>
where
    P: Payload,
    F: Fn() -> L + Send + Sync + 'static,
    L: Listener<P>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn construct(&self) -> Result<Option<ListenerRef<P>>, ListenerError> {
        Ok(Some(Arc::new((self.make)())))
    }

    // Only reached when called directly, bypassing construct.
    async fn handle(&self, ctx: &FireContext<P>, payload: Arc<P>) -> Result<(), ListenerError> {
        let fresh = (self.make)();
        fresh.handle(ctx, payload).await
    }
}
