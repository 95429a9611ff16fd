//! # Handle given to a listener for the duration of one fire.
//!
//! [`FireContext`] tells the listener which event and which registration it is
//! running for, lets it record output, and exposes the [`Dispatcher`] so a
//! listener can fire follow-up events.

use std::any::Any;
use std::sync::Arc;

use crate::core::dispatcher::Dispatcher;
use crate::core::output::OutputHandle;
use crate::error::OutputError;

/// Per-listener, per-fire context.
///
/// Cheap to clone. Output recorded through a clone that outlives the fire call
/// is rejected with [`OutputError::Sealed`].
pub struct FireContext<P> {
    dispatcher: Dispatcher<P>,
    event: Arc<str>,
    listener: Arc<str>,
    output: OutputHandle,
}

impl<P> Clone for FireContext<P> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            event: Arc::clone(&self.event),
            listener: Arc::clone(&self.listener),
            output: self.output.clone(),
        }
    }
}

impl<P> FireContext<P> {
    pub(crate) fn new(
        dispatcher: Dispatcher<P>,
        event: Arc<str>,
        listener: Arc<str>,
        output: OutputHandle,
    ) -> Self {
        Self {
            dispatcher,
            event,
            listener,
            output,
        }
    }

    /// Name of the fired event.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Registered name of the listener this context was created for.
    pub fn listener(&self) -> &str {
        &self.listener
    }

    /// The dispatcher running this fire.
    pub fn dispatcher(&self) -> &Dispatcher<P> {
        &self.dispatcher
    }

    /// Records a keyed result for the caller of `fire`.
    ///
    /// Safe to call from any number of listener tasks at once. Writing the same
    /// key twice keeps the last value.
    pub fn add_output<T>(&self, key: impl Into<String>, value: T) -> Result<(), OutputError>
    where
        T: Any + Send + Sync,
    {
        self.output.put(key.into(), Arc::new(value))
    }

    pub(crate) fn event_arc(&self) -> Arc<str> {
        Arc::clone(&self.event)
    }
}
