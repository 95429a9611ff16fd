//! Dispatcher core: fire orchestration and per-fire state.
//!
//! The public API from this module is [`Dispatcher`] (with its builder and
//! config), [`FireContext`] handed to listeners, and the [`Output`] of a fire.
//!
//! Internal modules:
//! - [`dispatcher`]: fans a fire out, joins it, settles rollback or reporting;
//! - [`runner`]: runs one listener with panic recovery and activity publishing;
//! - [`output`]: message-passing output aggregation, sealed at the join;
//! - [`recover`]: panic payload to message conversion.

mod builder;
mod config;
mod context;
mod dispatcher;
mod output;
mod recover;
mod runner;

pub use builder::DispatcherBuilder;
pub use config::DispatcherConfig;
pub use context::FireContext;
pub use dispatcher::{Dispatcher, Fired};
pub use output::{Output, OutputValue};
pub(crate) use recover::panic_message;
