//! Reversible Graph Mutations
//!
//! Every edit to a circuit is a [`Command`]: a unit of mutation with an
//! `execute` and an exact-inverse `undo`, driven by the two-stack
//! [`CommandManager`].
//!
//! # Contract
//!
//! Commands are all-or-nothing at construction time. Constructors
//! validate ids, resolve type names, run the connection validity check,
//! and capture whatever snapshots the inverse needs (old positions,
//! removed entities, adjacent connections). A command that constructed
//! successfully can always execute and always undo; a command that
//! failed construction never reaches the stacks, so the transaction log
//! can never hold a half-applied edit.

mod commands;
mod manager;

pub use commands::{
    AddComponents, CreateConnection, MoveComponents, RemoveComponents, RemoveConnections,
    ToggleComponent,
};
pub use manager::{Command, CommandManager};
