//! # Listener abstractions and registration entries.
//!
//! - [`Listener`] - trait for async units of work fanned out per event
//! - [`ListenerFn`] - closure-backed listener (handle-only)
//! - [`ListenerFactory`] - listener rebuilt for every fire (construct-then-handle)
//! - [`ListenerRef`] - shared reference to a listener (`Arc<dyn Listener<P>>`)
//! - [`ListenerSpec`] - listener bundled with its criticality

mod listener;
mod listener_fn;
mod spec;

pub use listener::{Listener, ListenerRef, Payload};
pub use listener_fn::{ListenerFactory, ListenerFn};
pub use spec::ListenerSpec;
