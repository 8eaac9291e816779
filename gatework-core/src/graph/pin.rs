//! Pins
//!
//! A pin is a typed terminal owned by exactly one component. Input pins
//! accept at most one connection (the single-writer rule); output pins
//! fan out to any number of connections, in attachment order.
//!
//! Pins cache their boolean value so that propagation can mirror values
//! through the graph without re-deriving them on every read:
//!
//! - an input pin's value is its connection's value, or `false` when
//!   unconnected;
//! - an output pin's value mirrors its parent component's value.

use smallvec::SmallVec;

use super::id::{ComponentId, ConnectionId, PinId};

/// Whether a pin receives or emits a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinKind {
    Input,
    Output,
}

/// The wiring slot of a pin, enforcing the single-writer rule by shape.
#[derive(Debug, Clone, PartialEq)]
enum PinLink {
    /// At most one incoming connection.
    Input(Option<ConnectionId>),
    /// Outgoing connections, in attachment order.
    Output(SmallVec<[ConnectionId; 2]>),
}

/// A typed terminal on a component.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    id: PinId,
    parent: ComponentId,
    index: usize,
    value: bool,
    link: PinLink,
}

impl Pin {
    pub(crate) fn input(id: PinId, parent: ComponentId, index: usize) -> Self {
        Self {
            id,
            parent,
            index,
            value: false,
            link: PinLink::Input(None),
        }
    }

    pub(crate) fn output(id: PinId, parent: ComponentId, index: usize) -> Self {
        Self {
            id,
            parent,
            index,
            value: false,
            link: PinLink::Output(SmallVec::new()),
        }
    }

    /// The pin's id.
    pub fn id(&self) -> &PinId {
        &self.id
    }

    /// Id of the component that owns this pin.
    pub fn parent(&self) -> &ComponentId {
        &self.parent
    }

    /// Position of this pin within its side of the component (0-based).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether this is an input or an output pin.
    pub fn kind(&self) -> PinKind {
        match self.link {
            PinLink::Input(_) => PinKind::Input,
            PinLink::Output(_) => PinKind::Output,
        }
    }

    /// `true` for output pins.
    pub fn is_output(&self) -> bool {
        self.kind() == PinKind::Output
    }

    /// Current cached value.
    pub fn value(&self) -> bool {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: bool) {
        self.value = value;
    }

    /// The incoming connection of an input pin, if any.
    ///
    /// Always `None` for output pins.
    pub fn connection(&self) -> Option<&ConnectionId> {
        match &self.link {
            PinLink::Input(slot) => slot.as_ref(),
            PinLink::Output(_) => None,
        }
    }

    /// Outgoing connections of an output pin, in attachment order.
    ///
    /// Empty for input pins.
    pub fn connections(&self) -> &[ConnectionId] {
        match &self.link {
            PinLink::Input(_) => &[],
            PinLink::Output(fanout) => fanout,
        }
    }

    /// Copy of this pin with its wiring and value stripped.
    ///
    /// Command snapshots capture pins unwired; connections are restored
    /// separately and re-attach themselves, and values are recomputed
    /// when the snapshot is re-inserted.
    pub(crate) fn unwired(&self) -> Pin {
        match self.link {
            PinLink::Input(_) => Pin::input(self.id.clone(), self.parent.clone(), self.index),
            PinLink::Output(_) => Pin::output(self.id.clone(), self.parent.clone(), self.index),
        }
    }

    /// Wire an input pin to a connection. The slot must be empty; the
    /// validity check rejects occupied targets before this is reached.
    pub(crate) fn attach_input(&mut self, connection: ConnectionId) {
        debug_assert!(self.connection().is_none(), "input pin already wired");
        if let PinLink::Input(slot) = &mut self.link {
            *slot = Some(connection);
        }
    }

    /// Clear an input pin's slot. The value collapses to `false`.
    pub(crate) fn detach_input(&mut self) {
        if let PinLink::Input(slot) = &mut self.link {
            *slot = None;
        }
        self.value = false;
    }

    /// Append a connection to an output pin's fan-out list.
    pub(crate) fn attach_output(&mut self, connection: ConnectionId) {
        if let PinLink::Output(fanout) = &mut self.link {
            debug_assert!(!fanout.contains(&connection), "duplicate fan-out entry");
            fanout.push(connection);
        }
    }

    /// Remove a connection from an output pin's fan-out list, preserving
    /// the attachment order of the rest.
    pub(crate) fn detach_output(&mut self, connection: &ConnectionId) {
        if let PinLink::Output(fanout) = &mut self.link {
            fanout.retain(|c| c != connection);
        }
    }
}
