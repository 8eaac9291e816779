//! Concrete Commands
//!
//! Each command captures everything it needs at construction time —
//! snapshots of the entities it will remove, old positions it will
//! restore — so that `execute` and `undo` are pure replays against the
//! circuit and can never fail.
//!
//! The delicate one is [`RemoveComponents`]: it also captures every
//! connection adjacent to a doomed component. `execute` removes those
//! connections *before* the components (no connection may ever point at
//! a missing pin), and `undo` restores the components *before* the
//! connections (a connection can only attach to live pins).

use indexmap::IndexMap;

use crate::error::CircuitError;
use crate::graph::{
    Circuit, Component, ComponentId, ComponentKind, Connection, ConnectionId, Pin, PinId, Position,
};
use crate::registry::ComponentRegistry;

use super::manager::Command;

/// Snapshot of a component together with its (unwired) pins.
type ComponentSnapshot = (Component, Vec<Pin>);

fn snapshot_component(
    circuit: &Circuit,
    id: &ComponentId,
) -> Result<ComponentSnapshot, CircuitError> {
    let component = circuit
        .component(id)
        .ok_or_else(|| CircuitError::UnknownComponent(id.clone()))?
        .clone();
    let pins = component
        .inputs()
        .iter()
        .chain(component.outputs())
        .map(|pin_id| {
            circuit
                .pin(pin_id)
                .expect("component pins live in the pin arena")
                .unwired()
        })
        .collect();
    Ok((component, pins))
}

/// Place one or more registry-constructed components on the canvas.
pub struct AddComponents {
    parts: Vec<ComponentSnapshot>,
}

impl AddComponents {
    /// Resolve every type name and allocate fresh components and pins.
    ///
    /// Unknown type names fail here; nothing is inserted until
    /// `execute`.
    pub fn new(
        circuit: &mut Circuit,
        registry: &ComponentRegistry,
        requests: &[(&str, Position)],
    ) -> Result<Self, CircuitError> {
        let mut parts = Vec::with_capacity(requests.len());
        for (name, position) in requests {
            let kind = registry.lookup(name)?;
            parts.push(circuit.build_component(kind, *position));
        }
        Ok(Self { parts })
    }

    /// Construct directly from kinds, bypassing name lookup.
    pub fn from_kinds(
        circuit: &mut Circuit,
        requests: &[(ComponentKind, Position)],
    ) -> Self {
        let parts = requests
            .iter()
            .map(|(kind, position)| circuit.build_component(*kind, *position))
            .collect();
        Self { parts }
    }

    /// Ids of the components this command creates.
    pub fn component_ids(&self) -> Vec<ComponentId> {
        self.parts
            .iter()
            .map(|(component, _)| component.id().clone())
            .collect()
    }
}

impl Command for AddComponents {
    fn label(&self) -> &'static str {
        "add-components"
    }

    fn execute(&mut self, circuit: &mut Circuit) {
        for (component, pins) in &self.parts {
            circuit.insert_component(component.clone(), pins.clone());
        }
    }

    fn undo(&mut self, circuit: &mut Circuit) {
        for (component, _) in self.parts.iter().rev() {
            circuit.remove_component(component.id());
        }
    }
}

/// Move components to new positions, remembering the old ones.
pub struct MoveComponents {
    // (id, old, new)
    moves: Vec<(ComponentId, Position, Position)>,
}

impl MoveComponents {
    pub fn new(
        circuit: &Circuit,
        requests: &[(ComponentId, Position)],
    ) -> Result<Self, CircuitError> {
        let mut moves = Vec::with_capacity(requests.len());
        for (id, new_position) in requests {
            let old_position = circuit
                .component(id)
                .ok_or_else(|| CircuitError::UnknownComponent(id.clone()))?
                .position();
            moves.push((id.clone(), old_position, *new_position));
        }
        Ok(Self { moves })
    }
}

impl Command for MoveComponents {
    fn label(&self) -> &'static str {
        "move-components"
    }

    fn execute(&mut self, circuit: &mut Circuit) {
        for (id, _, new_position) in &self.moves {
            circuit.set_position(id, *new_position);
        }
    }

    fn undo(&mut self, circuit: &mut Circuit) {
        for (id, old_position, _) in self.moves.iter().rev() {
            circuit.set_position(id, *old_position);
        }
    }
}

/// Remove components along with every connection touching them.
pub struct RemoveComponents {
    parts: Vec<ComponentSnapshot>,
    /// Adjacent connections, captured once each even when both endpoints
    /// are being removed.
    adjacent: Vec<Connection>,
}

impl RemoveComponents {
    pub fn new(circuit: &Circuit, ids: &[ComponentId]) -> Result<Self, CircuitError> {
        // Keyed by id so a repeated request collapses to one removal.
        let mut parts: IndexMap<ComponentId, ComponentSnapshot> = IndexMap::new();
        let mut adjacent: IndexMap<ConnectionId, Connection> = IndexMap::new();
        for id in ids {
            if parts.contains_key(id) {
                continue;
            }
            parts.insert(id.clone(), snapshot_component(circuit, id)?);
            for conn_id in circuit.connections_touching(id) {
                let connection = circuit
                    .connection(&conn_id)
                    .expect("touching connections are live")
                    .clone();
                adjacent.entry(conn_id).or_insert(connection);
            }
        }
        Ok(Self {
            parts: parts.into_values().collect(),
            adjacent: adjacent.into_values().collect(),
        })
    }
}

impl Command for RemoveComponents {
    fn label(&self) -> &'static str {
        "remove-components"
    }

    fn execute(&mut self, circuit: &mut Circuit) {
        // Connections first: no connection may outlive an endpoint.
        for connection in &self.adjacent {
            circuit.remove_connection(connection.id());
        }
        for (component, _) in &self.parts {
            circuit.remove_component(component.id());
        }
    }

    fn undo(&mut self, circuit: &mut Circuit) {
        // Components first: connections need live pins to attach to.
        for (component, pins) in &self.parts {
            circuit.insert_component(component.clone(), pins.clone());
        }
        for connection in &self.adjacent {
            circuit.insert_connection(connection.clone());
        }
    }
}

/// Create a validated connection between two pins.
pub struct CreateConnection {
    connection: Connection,
}

impl CreateConnection {
    /// Run the full validity check and allocate the connection.
    ///
    /// Validation rejections surface as [`CircuitError::Rejected`]; the
    /// editor turns those into a non-exceptional outcome and never
    /// pushes the command.
    pub fn new(circuit: &mut Circuit, a: &PinId, b: &PinId) -> Result<Self, CircuitError> {
        let (source, target) = circuit.validate_connection(a, b)?;
        let connection = circuit.allocate_connection(source, target);
        Ok(Self { connection })
    }

    /// Id of the connection this command creates.
    pub fn connection_id(&self) -> &ConnectionId {
        self.connection.id()
    }
}

impl Command for CreateConnection {
    fn label(&self) -> &'static str {
        "create-connection"
    }

    fn execute(&mut self, circuit: &mut Circuit) {
        circuit.insert_connection(self.connection.clone());
    }

    fn undo(&mut self, circuit: &mut Circuit) {
        circuit.remove_connection(self.connection.id());
    }
}

/// Remove connections by id.
pub struct RemoveConnections {
    connections: Vec<Connection>,
}

impl RemoveConnections {
    pub fn new(circuit: &Circuit, ids: &[ConnectionId]) -> Result<Self, CircuitError> {
        // Keyed by id so a repeated request collapses to one removal.
        let mut connections: IndexMap<ConnectionId, Connection> = IndexMap::new();
        for id in ids {
            let connection = circuit
                .connection(id)
                .cloned()
                .ok_or_else(|| CircuitError::UnknownConnection(id.clone()))?;
            connections.entry(id.clone()).or_insert(connection);
        }
        Ok(Self {
            connections: connections.into_values().collect(),
        })
    }
}

impl Command for RemoveConnections {
    fn label(&self) -> &'static str {
        "remove-connections"
    }

    fn execute(&mut self, circuit: &mut Circuit) {
        for connection in &self.connections {
            circuit.remove_connection(connection.id());
        }
    }

    fn undo(&mut self, circuit: &mut Circuit) {
        for connection in &self.connections {
            circuit.insert_connection(connection.clone());
        }
    }
}

/// Toggle a switch. Toggling is self-inverse, so undo toggles again.
pub struct ToggleComponent {
    id: ComponentId,
}

impl ToggleComponent {
    pub fn new(circuit: &Circuit, id: &ComponentId) -> Result<Self, CircuitError> {
        let component = circuit
            .component(id)
            .ok_or_else(|| CircuitError::UnknownComponent(id.clone()))?;
        if component.kind() != ComponentKind::Switch {
            return Err(CircuitError::NotASwitch(id.clone()));
        }
        Ok(Self { id: id.clone() })
    }
}

impl Command for ToggleComponent {
    fn label(&self) -> &'static str {
        "toggle-component"
    }

    fn execute(&mut self, circuit: &mut Circuit) {
        circuit.toggle(&self.id);
    }

    fn undo(&mut self, circuit: &mut Circuit) {
        circuit.toggle(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandManager;

    fn add_one(circuit: &mut Circuit, manager: &mut CommandManager, kind: ComponentKind) -> ComponentId {
        let command = AddComponents::from_kinds(circuit, &[(kind, Position::default())]);
        let id = command.component_ids().remove(0);
        manager.run(circuit, Box::new(command));
        id
    }

    /// Wire `from`'s output 0 to `to`'s input `index` through a command.
    fn wire(
        circuit: &mut Circuit,
        manager: &mut CommandManager,
        from: &ComponentId,
        to: &ComponentId,
        index: usize,
    ) -> ConnectionId {
        let a = circuit.output_pin(from, 0).unwrap().clone();
        let b = circuit.input_pin(to, index).unwrap().clone();
        let command = CreateConnection::new(circuit, &a, &b).unwrap();
        let id = command.connection_id().clone();
        manager.run(circuit, Box::new(command));
        id
    }

    #[test]
    fn add_components_round_trips() {
        let mut circuit = Circuit::new();
        let mut manager = CommandManager::new();

        let id = add_one(&mut circuit, &mut manager, ComponentKind::And);
        assert_eq!(circuit.component_count(), 1);

        manager.undo(&mut circuit);
        assert_eq!(circuit.component_count(), 0);
        assert!(circuit.component(&id).is_none());

        manager.redo(&mut circuit);
        // Same id comes back.
        assert!(circuit.component(&id).is_some());
    }

    #[test]
    fn move_components_restores_old_positions() {
        let mut circuit = Circuit::new();
        let mut manager = CommandManager::new();
        let id = add_one(&mut circuit, &mut manager, ComponentKind::Or);

        let command =
            MoveComponents::new(&circuit, &[(id.clone(), Position::new(40.0, 8.0))]).unwrap();
        manager.run(&mut circuit, Box::new(command));
        assert_eq!(
            circuit.component(&id).unwrap().position(),
            Position::new(40.0, 8.0)
        );

        manager.undo(&mut circuit);
        assert_eq!(circuit.component(&id).unwrap().position(), Position::default());
    }

    #[test]
    fn unknown_ids_fail_at_construction() {
        let circuit = Circuit::new();
        let ghost = ComponentId::new("Switch-9".into());

        assert!(matches!(
            MoveComponents::new(&circuit, &[(ghost.clone(), Position::default())]),
            Err(CircuitError::UnknownComponent(_))
        ));
        assert!(matches!(
            RemoveComponents::new(&circuit, &[ghost.clone()]),
            Err(CircuitError::UnknownComponent(_))
        ));
        assert!(matches!(
            ToggleComponent::new(&circuit, &ghost),
            Err(CircuitError::UnknownComponent(_))
        ));
    }

    #[test]
    fn toggle_rejects_non_switches() {
        let mut circuit = Circuit::new();
        let mut manager = CommandManager::new();
        let gate = add_one(&mut circuit, &mut manager, ComponentKind::And);

        assert_eq!(
            ToggleComponent::new(&circuit, &gate).err(),
            Some(CircuitError::NotASwitch(gate))
        );
    }

    #[test]
    fn remove_components_restores_adjacency() {
        let mut circuit = Circuit::new();
        let mut manager = CommandManager::new();

        let switch = add_one(&mut circuit, &mut manager, ComponentKind::Switch);
        let not = add_one(&mut circuit, &mut manager, ComponentKind::Not);
        let bulb = add_one(&mut circuit, &mut manager, ComponentKind::Bulb);

        let first = wire(&mut circuit, &mut manager, &switch, &not, 0);
        let second = wire(&mut circuit, &mut manager, &not, &bulb, 0);

        let command = RemoveComponents::new(&circuit, &[not.clone()]).unwrap();
        manager.run(&mut circuit, Box::new(command));
        assert!(circuit.component(&not).is_none());
        assert_eq!(circuit.connection_count(), 0);

        manager.undo(&mut circuit);
        assert!(circuit.component(&not).is_some());
        assert_eq!(circuit.connection_count(), 2);

        // Identical endpoints after restoration.
        let restored = circuit.connection(&first).unwrap();
        assert_eq!(restored.source(), circuit.output_pin(&switch, 0).unwrap());
        assert_eq!(restored.target(), circuit.input_pin(&not, 0).unwrap());
        let restored = circuit.connection(&second).unwrap();
        assert_eq!(restored.source(), circuit.output_pin(&not, 0).unwrap());
        assert_eq!(restored.target(), circuit.input_pin(&bulb, 0).unwrap());
    }

    #[test]
    fn removing_both_endpoints_captures_the_shared_connection_once() {
        let mut circuit = Circuit::new();
        let mut manager = CommandManager::new();

        let switch = add_one(&mut circuit, &mut manager, ComponentKind::Switch);
        let bulb = add_one(&mut circuit, &mut manager, ComponentKind::Bulb);
        wire(&mut circuit, &mut manager, &switch, &bulb, 0);

        let command = RemoveComponents::new(&circuit, &[switch.clone(), bulb.clone()]).unwrap();
        manager.run(&mut circuit, Box::new(command));
        assert_eq!(circuit.component_count(), 0);
        assert_eq!(circuit.connection_count(), 0);

        manager.undo(&mut circuit);
        assert_eq!(circuit.component_count(), 2);
        assert_eq!(circuit.connection_count(), 1);
    }

    #[test]
    fn undo_restores_downstream_signal_from_a_removed_switch() {
        let mut circuit = Circuit::new();
        let mut manager = CommandManager::new();

        let switch = add_one(&mut circuit, &mut manager, ComponentKind::Switch);
        let bulb = add_one(&mut circuit, &mut manager, ComponentKind::Bulb);
        wire(&mut circuit, &mut manager, &switch, &bulb, 0);

        let command = ToggleComponent::new(&circuit, &switch).unwrap();
        manager.run(&mut circuit, Box::new(command));
        assert_eq!(circuit.value(&bulb), Some(true));

        // Remove the live switch and bring it back: the restored wire
        // must carry the restored signal, not a stale false.
        let command = RemoveComponents::new(&circuit, &[switch.clone()]).unwrap();
        manager.run(&mut circuit, Box::new(command));
        assert_eq!(circuit.value(&bulb), Some(false));

        manager.undo(&mut circuit);
        assert_eq!(circuit.value(&switch), Some(true));
        assert_eq!(circuit.value(&bulb), Some(true));
    }

    #[test]
    fn duplicate_component_ids_collapse_to_one_removal() {
        let mut circuit = Circuit::new();
        let mut manager = CommandManager::new();
        let switch = add_one(&mut circuit, &mut manager, ComponentKind::Switch);

        let command =
            RemoveComponents::new(&circuit, &[switch.clone(), switch.clone()]).unwrap();
        manager.run(&mut circuit, Box::new(command));
        assert_eq!(circuit.component_count(), 0);

        manager.undo(&mut circuit);
        assert_eq!(circuit.component_count(), 1);
        assert!(circuit.component(&switch).is_some());
    }

    #[test]
    fn duplicate_connection_ids_collapse_to_one_removal() {
        let mut circuit = Circuit::new();
        let mut manager = CommandManager::new();
        let switch = add_one(&mut circuit, &mut manager, ComponentKind::Switch);
        let bulb = add_one(&mut circuit, &mut manager, ComponentKind::Bulb);
        let wire_id = wire(&mut circuit, &mut manager, &switch, &bulb, 0);

        let command =
            RemoveConnections::new(&circuit, &[wire_id.clone(), wire_id.clone()]).unwrap();
        manager.run(&mut circuit, Box::new(command));
        assert_eq!(circuit.connection_count(), 0);

        manager.undo(&mut circuit);
        assert_eq!(circuit.connection_count(), 1);
    }

    #[test]
    fn toggle_round_trips_switch_state_through_remove_undo() {
        let mut circuit = Circuit::new();
        let mut manager = CommandManager::new();

        let switch = add_one(&mut circuit, &mut manager, ComponentKind::Switch);
        let command = ToggleComponent::new(&circuit, &switch).unwrap();
        manager.run(&mut circuit, Box::new(command));
        assert_eq!(circuit.value(&switch), Some(true));

        // Remove and restore the toggled switch; its state survives.
        let command = RemoveComponents::new(&circuit, &[switch.clone()]).unwrap();
        manager.run(&mut circuit, Box::new(command));
        manager.undo(&mut circuit);
        assert_eq!(circuit.value(&switch), Some(true));
    }
}
