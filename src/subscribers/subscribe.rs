//! # Activity subscriber trait
//!
//! `Subscribe` is the extension point for observing what the dispatcher does.
//! Each subscriber is driven by a dedicated worker loop fed by a bounded queue
//! owned by the [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching); they do **not** block a fire
//!   call nor other subscribers.
//! - Each subscriber **declares** its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. On overflow, records for that subscriber are
//!   **dropped** and `SubscriberOverflow` is published.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use eventvisor::{Activity, ActivityKind, Subscribe};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Subscribe for Audit {
//!     async fn on_activity(&self, a: &Activity) {
//!         if a.kind == ActivityKind::RollbackStarted {
//!             // write audit record...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//!     fn queue_capacity(&self) -> usize { 512 }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Activity;

/// Contract for activity subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single activity record.
    async fn on_activity(&self, activity: &Activity);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
