//! Gatework Core
//!
//! This crate provides the simulation engine for the Gatework
//! logic-circuit editor. It implements:
//!
//! - The propagation graph: components, typed pins, and connections,
//!   with synchronous boolean signal propagation
//! - Connection validity checking, including cycle prevention
//! - Reversible mutation commands with a two-stack undo/redo manager
//! - The canvas-state container and its change-event stream
//!
//! Rendering, input handling, and widget layout live elsewhere; this
//! crate is the headless core they drive.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: the circuit DAG and the propagation engine
//! - `command`: reversible commands and the transaction log
//! - `editor`: the request surface tying circuit, registry, and
//!   commands together
//! - `event`: typed canvas change events and listener registration
//! - `registry`: the explicit type-name-to-kind table
//!
//! # Example
//!
//! ```rust
//! use gatework_core::{ConnectOutcome, Editor, Position};
//!
//! let mut editor = Editor::new();
//!
//! // Place a switch and a bulb, then wire them together.
//! let switch = editor.add_component("Switch", Position::new(0.0, 0.0))?;
//! let bulb = editor.add_component("Bulb", Position::new(120.0, 0.0))?;
//!
//! let source = editor.circuit().output_pin(&switch, 0)?.clone();
//! let target = editor.circuit().input_pin(&bulb, 0)?.clone();
//! let outcome = editor.create_connection(&source, &target)?;
//! assert!(matches!(outcome, ConnectOutcome::Created(_)));
//!
//! // Flip the switch; the bulb lights synchronously.
//! editor.toggle_component(&switch)?;
//! assert_eq!(editor.circuit().value(&bulb), Some(true));
//!
//! // Every mutation is a reversible transaction.
//! editor.undo();
//! assert_eq!(editor.circuit().value(&bulb), Some(false));
//! # Ok::<(), gatework_core::CircuitError>(())
//! ```

pub mod command;
pub mod editor;
pub mod error;
pub mod event;
pub mod graph;
pub mod registry;

pub use editor::{ConnectOutcome, Editor};
pub use error::{CircuitError, ConnectError};
pub use event::CanvasEvent;
pub use graph::{
    Circuit, Component, ComponentId, ComponentKind, Connection, ConnectionId, Pin, PinId, PinKind,
    Position,
};
pub use registry::ComponentRegistry;
