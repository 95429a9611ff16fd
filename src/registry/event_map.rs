//! # Event registry.
//!
//! [`EventMap`] maps event names to their [`EventListener`] entry (ordered
//! listeners plus an optional rollback). It is built once through
//! [`EventMapBuilder`] and is read-only afterwards; clones share the same map.
//!
//! ## Rules
//! - An event name absent from the map behaves as an event with zero listeners.
//! - Listener names are unique within one event (they key exceptions and output).
//! - At most one rollback per event.
//! - Listener order is registration order; it does not imply execution order.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::RegistryError;
use crate::listeners::{ListenerRef, ListenerSpec};
use crate::registry::rollback::RollbackRef;

/// Listeners and rollback assigned to one event.
pub struct EventListener<P> {
    listeners: Vec<ListenerSpec<P>>,
    rollback: Option<RollbackRef<P>>,
}

impl<P> EventListener<P> {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
            rollback: None,
        }
    }

    /// Returns the registered listeners in registration order.
    pub fn listeners(&self) -> &[ListenerSpec<P>] {
        &self.listeners
    }

    /// Returns the rollback, if one is registered.
    pub fn rollback(&self) -> Option<&RollbackRef<P>> {
        self.rollback.as_ref()
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Immutable mapping from event name to its [`EventListener`].
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use eventvisor::{EventMap, FireContext, ListenerError, ListenerFn, RollbackFn, RoutineException};
///
/// let map = EventMap::<String>::builder()
///     .non_critical("signup", ListenerFn::arc("sendEmail", |_c: FireContext<String>, _p: Arc<String>| async move {
///         Ok::<_, ListenerError>(())
///     }))
///     .rollback("signup", RollbackFn::arc(|_p: Arc<String>, _c: Vec<RoutineException>| async move {}))
///     .build()
///     .unwrap();
///
/// assert_eq!(map.event_names(), vec!["signup"]);
/// assert_eq!(map.get("signup").map(|e| e.len()), Some(1));
/// assert!(map.get("missing").is_none());
/// ```
pub struct EventMap<P> {
    events: Arc<HashMap<String, EventListener<P>>>,
}

impl<P> Clone for EventMap<P> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<P> Default for EventMap<P> {
    fn default() -> Self {
        Self {
            events: Arc::new(HashMap::new()),
        }
    }
}

impl<P: 'static> EventMap<P> {
    /// Starts building a registry.
    pub fn builder() -> EventMapBuilder<P> {
        EventMapBuilder::new()
    }

    /// Returns the entry registered for `event`.
    pub fn get(&self, event: &str) -> Option<&EventListener<P>> {
        self.events.get(event)
    }

    /// Returns true if `event` has an entry.
    pub fn contains(&self, event: &str) -> bool {
        self.events.contains_key(event)
    }

    /// Number of registered events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no event is registered.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns sorted list of registered event names.
    pub fn event_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.events.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Builder for [`EventMap`].
///
/// Registration methods chain; the first problem found is returned by
/// [`build`](EventMapBuilder::build).
pub struct EventMapBuilder<P> {
    events: HashMap<String, EventListener<P>>,
    error: Option<RegistryError>,
}

impl<P: 'static> EventMapBuilder<P> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
            error: None,
        }
    }

    /// Registers a listener spec for `event`.
    pub fn listen(mut self, event: impl Into<String>, spec: ListenerSpec<P>) -> Self {
        if let Some(entry) = self.entry(event.into()) {
            entry.listeners.push(spec);
        }
        self
    }

    /// Registers a critical listener for `event`.
    pub fn critical(self, event: impl Into<String>, listener: ListenerRef<P>) -> Self {
        self.listen(event, ListenerSpec::critical(listener))
    }

    /// Registers a non-critical listener for `event`.
    pub fn non_critical(self, event: impl Into<String>, listener: ListenerRef<P>) -> Self {
        self.listen(event, ListenerSpec::non_critical(listener))
    }

    /// Registers the rollback of `event`.
    pub fn rollback(mut self, event: impl Into<String>, rollback: RollbackRef<P>) -> Self {
        let event = event.into();
        let duplicate = match self.entry(event.clone()) {
            Some(entry) if entry.rollback.is_some() => true,
            Some(entry) => {
                entry.rollback = Some(rollback);
                false
            }
            None => false,
        };
        if duplicate {
            self.fail(RegistryError::DuplicateRollback { event });
        }
        self
    }

    /// Validates and freezes the registry.
    pub fn build(self) -> Result<EventMap<P>, RegistryError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        for (event, entry) in &self.events {
            let mut seen = HashSet::with_capacity(entry.listeners.len());
            for spec in &entry.listeners {
                if !seen.insert(spec.name()) {
                    return Err(RegistryError::DuplicateListener {
                        event: event.clone(),
                        listener: spec.name().to_string(),
                    });
                }
            }
        }

        Ok(EventMap {
            events: Arc::new(self.events),
        })
    }

    fn entry(&mut self, event: String) -> Option<&mut EventListener<P>> {
        if event.is_empty() {
            self.fail(RegistryError::EmptyEventName);
            return None;
        }
        Some(match self.events.entry(event) {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(EventListener::new()),
        })
    }

    fn fail(&mut self, err: RegistryError) {
        self.error.get_or_insert(err);
    }
}

impl<P: 'static> Default for EventMapBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
