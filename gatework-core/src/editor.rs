//! Circuit Editor
//!
//! `Editor` is the command request surface: it owns the circuit, the
//! type registry, and the command manager, and turns caller requests
//! into reversible transactions. Every mutation goes through a command
//! so the undo/redo stacks always agree with the live graph.
//!
//! Connection attempts deserve a note: an invalid connection is not an
//! error here. [`Editor::create_connection`] returns a
//! [`ConnectOutcome`] so the caller can show a validity signal, and a
//! rejected attempt is never pushed onto the executed stack — a no-op is
//! not a reversible transaction. Referential mistakes (unknown ids,
//! unknown type names) do fail, loudly, because they mean the caller has
//! desynchronized from the canvas state.

use tracing::debug;

use crate::command::{
    AddComponents, CommandManager, CreateConnection, MoveComponents, RemoveComponents,
    RemoveConnections, ToggleComponent,
};
use crate::error::{CircuitError, ConnectError};
use crate::event::EventListener;
use crate::graph::{Circuit, ComponentId, ConnectionId, PinId, Position};
use crate::registry::ComponentRegistry;

/// Result of a connection attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectOutcome {
    /// The connection was created and pushed as a transaction.
    Created(ConnectionId),
    /// Validation rejected the attempt; nothing changed.
    Rejected(ConnectError),
}

impl ConnectOutcome {
    /// The created connection id, if any.
    pub fn created(self) -> Option<ConnectionId> {
        match self {
            Self::Created(id) => Some(id),
            Self::Rejected(_) => None,
        }
    }
}

/// The editing session: circuit + registry + transaction log.
#[derive(Debug)]
pub struct Editor {
    circuit: Circuit,
    registry: ComponentRegistry,
    manager: CommandManager,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// An empty session with the built-in component catalogue.
    pub fn new() -> Self {
        Self::with_registry(ComponentRegistry::with_defaults())
    }

    /// An empty session with a caller-supplied registry.
    pub fn with_registry(registry: ComponentRegistry) -> Self {
        Self {
            circuit: Circuit::new(),
            registry,
            manager: CommandManager::new(),
        }
    }

    /// Read access to the live circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// The type registry in use.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Register a listener for canvas change events.
    pub fn subscribe(&mut self, listener: EventListener) {
        self.circuit.subscribe(listener);
    }

    /// Add a batch of components by type name. Returns the new ids in
    /// request order.
    pub fn add_components(
        &mut self,
        requests: &[(&str, Position)],
    ) -> Result<Vec<ComponentId>, CircuitError> {
        let command = AddComponents::new(&mut self.circuit, &self.registry, requests)?;
        let ids = command.component_ids();
        self.manager.run(&mut self.circuit, Box::new(command));
        Ok(ids)
    }

    /// Add a single component by type name.
    pub fn add_component(
        &mut self,
        type_name: &str,
        position: Position,
    ) -> Result<ComponentId, CircuitError> {
        let mut ids = self.add_components(&[(type_name, position)])?;
        Ok(ids.remove(0))
    }

    /// Move components to new positions.
    pub fn move_components(
        &mut self,
        requests: &[(ComponentId, Position)],
    ) -> Result<(), CircuitError> {
        let command = MoveComponents::new(&self.circuit, requests)?;
        self.manager.run(&mut self.circuit, Box::new(command));
        Ok(())
    }

    /// Remove components and every connection touching them.
    pub fn remove_components(&mut self, ids: &[ComponentId]) -> Result<(), CircuitError> {
        let command = RemoveComponents::new(&self.circuit, ids)?;
        self.manager.run(&mut self.circuit, Box::new(command));
        Ok(())
    }

    /// Attempt to connect two pins.
    ///
    /// Pin order does not matter; the validity check normalizes it.
    pub fn create_connection(
        &mut self,
        a: &PinId,
        b: &PinId,
    ) -> Result<ConnectOutcome, CircuitError> {
        match CreateConnection::new(&mut self.circuit, a, b) {
            Ok(command) => {
                let id = command.connection_id().clone();
                self.manager.run(&mut self.circuit, Box::new(command));
                Ok(ConnectOutcome::Created(id))
            }
            Err(CircuitError::Rejected(reason)) => {
                debug!(%reason, "connection rejected");
                Ok(ConnectOutcome::Rejected(reason))
            }
            Err(other) => Err(other),
        }
    }

    /// Remove connections by id.
    pub fn remove_connections(&mut self, ids: &[ConnectionId]) -> Result<(), CircuitError> {
        let command = RemoveConnections::new(&self.circuit, ids)?;
        self.manager.run(&mut self.circuit, Box::new(command));
        Ok(())
    }

    /// Toggle a switch.
    pub fn toggle_component(&mut self, id: &ComponentId) -> Result<(), CircuitError> {
        let command = ToggleComponent::new(&self.circuit, id)?;
        self.manager.run(&mut self.circuit, Box::new(command));
        Ok(())
    }

    /// Undo the most recent transaction. Returns `false` when the
    /// executed stack is empty.
    pub fn undo(&mut self) -> bool {
        self.manager.undo(&mut self.circuit)
    }

    /// Redo the most recently undone transaction. Returns `false` when
    /// the undone stack is empty.
    pub fn redo(&mut self) -> bool {
        self.manager.redo(&mut self.circuit)
    }

    /// Whether an undo is available.
    pub fn can_undo(&self) -> bool {
        self.manager.can_undo()
    }

    /// Whether a redo is available.
    pub fn can_redo(&self) -> bool {
        self.manager.can_redo()
    }
}
