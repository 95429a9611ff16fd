//! # Dispatcher configuration.
//!
//! Provides [`DispatcherConfig`], centralized settings for a [`Dispatcher`](crate::Dispatcher).
//!
//! Config is used in two ways:
//! 1. **Dispatcher creation**: `Dispatcher::builder(registry).with_config(cfg)`
//! 2. **ListenerSpec defaults**: `ListenerSpec::with_defaults(listener, &cfg)`
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1

/// Configuration for the dispatcher.
///
/// ## Field semantics
/// - `bus_capacity`: Activity bus ring buffer size (min 1)
/// - `default_critical`: Criticality used by `ListenerSpec::with_defaults`
///
/// There is no listener timeout: a listener that never returns
/// keeps its fire call waiting.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Capacity of the activity bus broadcast channel.
    ///
    /// Receivers that lag behind more than `bus_capacity` records observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Criticality given to listeners registered through
    /// `ListenerSpec::with_defaults()`.
    pub default_critical: bool,
}

impl DispatcherConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for DispatcherConfig {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `default_critical = true` (an unclassified failure triggers rollback)
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            default_critical: true,
        }
    }
}
