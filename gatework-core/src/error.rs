//! Error types for circuit mutation and command construction.
//!
//! Two failure families exist and they are deliberately kept apart:
//!
//! - [`ConnectError`] — a proposed connection failed validation. This is
//!   an expected, recoverable outcome that the editor surfaces as a
//!   validity signal; nothing about the graph changes.
//! - [`CircuitError`] — a referential or arity failure: an unknown id, an
//!   unknown type name, or a pin index outside a component's declared
//!   arity. These indicate the caller has desynchronized from the
//!   canvas state and fail fast at command construction.
//!
//! Once a command has been constructed, its `execute`/`undo` cannot fail.

use thiserror::Error;

use crate::graph::{ComponentId, ConnectionId, PinId};

/// Reasons a proposed connection is rejected by the validity check.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    /// Both pins belong to the same component.
    #[error("a component may not connect to itself")]
    SelfConnection,

    /// Both pins are inputs, or both are outputs.
    #[error("connection requires one input pin and one output pin")]
    SameKind,

    /// The input pin already has a connection (single-writer rule).
    #[error("target input pin is already connected")]
    TargetOccupied,

    /// The edge would let the source component feed back into itself.
    #[error("connection would create a cycle")]
    WouldCycle,
}

/// Errors raised at command construction time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CircuitError {
    /// No component with this id exists in the circuit.
    #[error("unknown component id `{0}`")]
    UnknownComponent(ComponentId),

    /// No pin with this id exists in the circuit.
    #[error("unknown pin id `{0}`")]
    UnknownPin(PinId),

    /// No connection with this id exists in the circuit.
    #[error("unknown connection id `{0}`")]
    UnknownConnection(ConnectionId),

    /// The type registry has no entry under this name.
    #[error("unknown component type `{0}`")]
    UnknownType(String),

    /// Pin index outside the component's declared arity.
    #[error("pin index {index} out of range for component `{component}`")]
    PinIndexOutOfRange {
        component: ComponentId,
        index: usize,
    },

    /// Toggle was requested on a component that is not a switch.
    #[error("component `{0}` is not a switch")]
    NotASwitch(ComponentId),

    /// A proposed connection failed validation.
    #[error(transparent)]
    Rejected(#[from] ConnectError),
}
