//! Panic payload to message conversion.
//!
//! Shared by listener tasks, the rollback call and the subscriber/sink workers.
//!
//! ## Rules
//! - `ListenerError` payload (raised with `std::panic::panic_any`) → its structured message
//! - `&'static str` / `String` payload (plain `panic!`) → the text itself
//! - anything else → `"unknown panic"`

use std::any::Any;

use crate::error::ListenerError;

/// Extracts a human-readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(err) = payload.downcast_ref::<ListenerError>() {
        err.as_message()
    } else if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
