//! # Event registry: which listeners run for which event, and how to undo it.
//!
//! - [`EventMap`] / [`EventMapBuilder`] - immutable event name → entry mapping
//! - [`EventListener`] - ordered listener specs plus optional rollback
//! - [`Rollback`] / [`RollbackFn`] / [`RollbackRef`] - compensating action

mod event_map;
mod rollback;

pub use event_map::{EventListener, EventMap, EventMapBuilder};
pub use rollback::{Rollback, RollbackFn, RollbackRef};
