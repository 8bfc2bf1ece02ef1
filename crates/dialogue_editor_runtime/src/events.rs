// SPDX-License-Identifier: MIT OR Apache-2.0
//! Named callbacks fired by event nodes.

use dialogue_editor_graph::EventRef;
use std::collections::HashMap;
use uuid::Uuid;

/// Callback type for dialogue events
pub type EventHandler = Box<dyn FnMut(&EventRef)>;

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub Uuid);

impl HandlerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Handlers keyed by event name
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<String, Vec<(HandlerId, EventHandler)>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event
    pub fn subscribe(&mut self, event: &EventRef, handler: EventHandler) -> HandlerId {
        let id = HandlerId::new();
        self.handlers
            .entry(event.key().to_string())
            .or_default()
            .push((id, handler));
        id
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let mut removed = false;
        self.handlers.retain(|_, handlers| {
            let before = handlers.len();
            handlers.retain(|(handler_id, _)| *handler_id != id);
            removed |= handlers.len() != before;
            !handlers.is_empty()
        });
        removed
    }

    /// Invoke every handler for an event, returning how many ran
    pub fn emit(&mut self, event: &EventRef) -> usize {
        let Some(handlers) = self.handlers.get_mut(event.key()) else {
            tracing::debug!("No handlers for event '{event}'");
            return 0;
        };
        for (_, handler) in handlers.iter_mut() {
            handler(event);
        }
        tracing::debug!("Event '{event}' ran {} handlers", handlers.len());
        handlers.len()
    }

    /// Number of handlers registered for an event
    pub fn handler_count(&self, event: &EventRef) -> usize {
        self.handlers.get(event.key()).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
