//! Connections
//!
//! A connection is a directed edge from one output pin (its source) to
//! one input pin (its target), carrying a boolean value that mirrors the
//! source. Connections are constructed only through the circuit's
//! validated connect path, which is what keeps the whole graph acyclic.

use super::id::{ConnectionId, PinId};

/// A directed edge between an output pin and an input pin.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    id: ConnectionId,
    source: PinId,
    target: PinId,
    value: bool,
}

impl Connection {
    pub(crate) fn new(id: ConnectionId, source: PinId, target: PinId) -> Self {
        Self {
            id,
            source,
            target,
            value: false,
        }
    }

    /// The connection's id.
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// The output pin this connection reads from.
    pub fn source(&self) -> &PinId {
        &self.source
    }

    /// The input pin this connection drives.
    pub fn target(&self) -> &PinId {
        &self.target
    }

    /// Current cached value (mirrors the source pin).
    pub fn value(&self) -> bool {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: bool) {
        self.value = value;
    }
}
