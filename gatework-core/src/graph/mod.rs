//! Propagation Graph
//!
//! This module implements the circuit graph: components wired through
//! typed pins by directed connections, with synchronous boolean
//! propagation from sources (switches) to sinks (bulbs).
//!
//! # Overview
//!
//! The graph is a strict DAG where:
//!
//! - Components own a fixed-arity set of input and output pins.
//! - Connections run from exactly one output pin to exactly one input
//!   pin on a *different* component; an input pin accepts at most one
//!   connection, while output pins fan out freely.
//! - Signal changes propagate depth-first in attachment order, so the
//!   same wiring always produces the same visitation order.
//!
//! # Design Decisions
//!
//! 1. Ownership is arena-and-index: [`Circuit`] owns every entity in
//!    id-keyed `IndexMap`s and all cross-references are ids. A stale
//!    reference is a failed lookup, never a dangling pointer.
//!
//! 2. Acyclicity is enforced at the mutation boundary. Every proposed
//!    connection runs a reachability check before it is created, so the
//!    propagation walk never needs a cycle guard.
//!
//! 3. Mutations go through the command layer; the `pub(crate)` mutators
//!    here assume ids already validated at command construction.

mod circuit;
mod component;
mod connection;
mod id;
mod pin;

pub use circuit::Circuit;
pub use component::{Component, ComponentKind, Position};
pub use connection::Connection;
pub use id::{ComponentId, ConnectionId, IdGenerator, PinId};
pub use pin::{Pin, PinKind};
