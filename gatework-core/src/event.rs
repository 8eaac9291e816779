//! Canvas Change Events
//!
//! The circuit emits a typed event for every observable mutation:
//! component add/remove/move, connection add/remove, and value changes on
//! components and connections. Events are delivered synchronously, at the
//! point of mutation, to every registered listener.
//!
//! Subscribers may rely on causal order for a single entity (a component
//! is added before it moves, moves before it is removed) but must not
//! assume any delivery order across different entities.
//!
//! All payload types derive `serde`, so a view layer can forward events
//! over any JSON-speaking boundary unchanged.

use serde::{Deserialize, Serialize};

use crate::graph::{ComponentId, ComponentKind, ConnectionId, PinId, Position};

/// A change notification emitted by the circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// A component was placed on the canvas.
    ///
    /// Pin ids are listed in declaration order; `value` is the value the
    /// component settled to on insertion.
    ComponentAdded {
        id: ComponentId,
        kind: ComponentKind,
        position: Position,
        inputs: Vec<PinId>,
        outputs: Vec<PinId>,
        value: bool,
    },

    /// A component was removed from the canvas.
    ComponentRemoved { id: ComponentId },

    /// A component moved to a new position.
    ComponentMoved {
        id: ComponentId,
        position: Position,
    },

    /// A connection was created between two pins.
    ConnectionAdded {
        id: ConnectionId,
        source: PinId,
        target: PinId,
    },

    /// A connection was removed.
    ConnectionRemoved { id: ConnectionId },

    /// A component's value changed.
    ComponentValueChanged { id: ComponentId, value: bool },

    /// A connection's value changed.
    ConnectionValueChanged { id: ConnectionId, value: bool },
}

/// Listener callback invoked for every emitted event.
pub type EventListener = Box<dyn FnMut(&CanvasEvent)>;

/// Synchronous fan-out of canvas events to registered listeners.
///
/// Listeners are invoked in registration order. There is no
/// unsubscription; the bus lives as long as its circuit.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<EventListener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all future events.
    pub fn subscribe(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    /// Deliver an event to every listener, in registration order.
    pub fn emit(&mut self, event: &CanvasEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
