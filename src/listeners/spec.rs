//! # Listener registration entry.
//!
//! Defines [`ListenerSpec`], a listener bundled with its criticality. The
//! criticality decides what a failure of this listener does to the whole fire:
//! - **critical**: fails the fire and triggers the event's rollback
//! - **non-critical**: fire still succeeds; the failure goes to the reporting sink
//!
//! A spec can be created:
//! - **Explicitly** with [`ListenerSpec::new`], [`ListenerSpec::critical`] or
//!   [`ListenerSpec::non_critical`]
//! - **From config** with [`ListenerSpec::with_defaults`]

use crate::core::DispatcherConfig;
use crate::listeners::listener::ListenerRef;

/// A listener plus the criticality it was registered with.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use eventvisor::{DispatcherConfig, FireContext, ListenerError, ListenerFn, ListenerRef, ListenerSpec};
///
/// let audit: ListenerRef<u32> = ListenerFn::arc("audit", |_ctx: FireContext<u32>, _p: Arc<u32>| async move {
///     Ok::<_, ListenerError>(())
/// });
///
/// let spec = ListenerSpec::non_critical(audit.clone());
/// assert!(!spec.is_critical());
///
/// let cfg = DispatcherConfig::default();
/// let spec2 = ListenerSpec::with_defaults(audit, &cfg);
/// assert!(spec2.is_critical());
/// ```
pub struct ListenerSpec<P> {
    listener: ListenerRef<P>,
    critical: bool,
}

impl<P> Clone for ListenerSpec<P> {
    fn clone(&self) -> Self {
        Self {
            listener: self.listener.clone(),
            critical: self.critical,
        }
    }
}

impl<P: 'static> ListenerSpec<P> {
    /// Creates a spec with explicit criticality.
    pub fn new(listener: ListenerRef<P>, critical: bool) -> Self {
        Self { listener, critical }
    }

    /// Creates a spec whose failures fail the fire and trigger rollback.
    pub fn critical(listener: ListenerRef<P>) -> Self {
        Self::new(listener, true)
    }

    /// Creates a spec whose failures are only reported.
    pub fn non_critical(listener: ListenerRef<P>) -> Self {
        Self::new(listener, false)
    }

    /// Creates a spec inheriting criticality from config.
    pub fn with_defaults(listener: ListenerRef<P>, cfg: &DispatcherConfig) -> Self {
        Self::new(listener, cfg.default_critical)
    }

    /// Returns reference to the listener.
    pub fn listener(&self) -> &ListenerRef<P> {
        &self.listener
    }

    /// Convenience: returns the listener name.
    pub fn name(&self) -> &str {
        self.listener.name()
    }

    /// Returns the registered criticality.
    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Returns a new spec with updated criticality.
    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }
}
