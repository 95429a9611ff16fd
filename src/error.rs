//! Error types used by the eventvisor dispatcher and its listeners.
//!
//! This module defines:
//!
//! - [`ListenerError`] - errors returned by listener executions.
//! - [`RoutineException`] - a captured listener fault, classified as critical or not.
//! - [`RegistryError`] - errors raised while building an [`EventMap`](crate::EventMap).
//! - [`OutputError`] - errors raised when recording listener output.
//!
//! The enums provide helper methods (`as_label`, `as_message`) for logs and activity records.

use thiserror::Error;

/// # Errors produced by listener execution.
///
/// A listener reports failure by returning one of these, or by panicking with
/// one as the panic payload (`std::panic::panic_any`). Either way the message
/// ends up in a [`RoutineException`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// Listener handling failed.
    #[error("listener failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The per-fire construction step failed; `handle` was never called.
    #[error("listener construction failed: {error}")]
    Construct {
        /// The underlying error message.
        error: String,
    },
}

impl ListenerError {
    /// Shorthand for [`ListenerError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        ListenerError::Fail {
            error: error.into(),
        }
    }

    /// Shorthand for [`ListenerError::Construct`].
    pub fn construct(error: impl Into<String>) -> Self {
        ListenerError::Construct {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventvisor::ListenerError;
    ///
    /// let err = ListenerError::fail("smtp down");
    /// assert_eq!(err.as_label(), "listener_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Fail { .. } => "listener_failed",
            ListenerError::Construct { .. } => "listener_construct_failed",
        }
    }

    /// Returns the message carried into a [`RoutineException`].
    ///
    /// # Example
    /// ```
    /// use eventvisor::ListenerError;
    ///
    /// assert_eq!(ListenerError::fail("smtp down").as_message(), "smtp down");
    /// assert_eq!(ListenerError::construct("no pool").as_message(), "construct: no pool");
    /// ```
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::Fail { error } => error.clone(),
            ListenerError::Construct { error } => format!("construct: {error}"),
        }
    }
}

impl From<OutputError> for ListenerError {
    fn from(err: OutputError) -> Self {
        ListenerError::fail(err.to_string())
    }
}

/// # A listener fault captured at its task boundary.
///
/// `critical` is the flag the listener was registered with; it is never
/// derived from the fault itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("routine `{routine}` failed (critical={critical}): {message}")]
pub struct RoutineException {
    /// Fault message.
    pub message: String,
    /// Name of the listener that failed.
    pub routine: String,
    /// Whether the failure fails the whole fire and triggers rollback.
    pub critical: bool,
}

impl RoutineException {
    pub(crate) fn new(message: impl Into<String>, routine: impl Into<String>, critical: bool) -> Self {
        Self {
            message: message.into(),
            routine: routine.into(),
            critical,
        }
    }
}

/// # Errors produced while building a registry.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An event was registered under an empty name.
    #[error("event name must not be empty")]
    EmptyEventName,

    /// Two listeners of the same event share a name; their outputs and
    /// exceptions would be indistinguishable.
    #[error("event `{event}` already has a listener named `{listener}`")]
    DuplicateListener {
        /// Event name.
        event: String,
        /// Conflicting listener name.
        listener: String,
    },

    /// A second rollback was registered for one event.
    #[error("event `{event}` already has a rollback")]
    DuplicateRollback {
        /// Event name.
        event: String,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventvisor::RegistryError;
    ///
    /// let err = RegistryError::DuplicateRollback { event: "signup".into() };
    /// assert_eq!(err.as_label(), "registry_duplicate_rollback");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::EmptyEventName => "registry_empty_event_name",
            RegistryError::DuplicateListener { .. } => "registry_duplicate_listener",
            RegistryError::DuplicateRollback { .. } => "registry_duplicate_rollback",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistryError::EmptyEventName => "empty event name".to_string(),
            RegistryError::DuplicateListener { event, listener } => {
                format!("duplicate listener: event={event} listener={listener}")
            }
            RegistryError::DuplicateRollback { event } => {
                format!("duplicate rollback: event={event}")
            }
        }
    }
}

/// # Errors produced when recording listener output.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputError {
    /// The fire call already collected its output; the value was dropped.
    #[error("output of `{event}` already sealed; dropped key `{key}`")]
    Sealed {
        /// Event the output belonged to.
        event: String,
        /// Key of the dropped value.
        key: String,
    },
}

impl OutputError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            OutputError::Sealed { .. } => "output_sealed",
        }
    }
}
