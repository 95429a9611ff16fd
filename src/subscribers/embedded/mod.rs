//! # Built-in subscribers
//!
//! - [`LogWriter`]: logs every activity record through `tracing` (demo/debug).

mod log;

pub use log::LogWriter;
