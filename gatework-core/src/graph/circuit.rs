//! The Circuit
//!
//! `Circuit` is the canvas-state container: the single owner of every
//! live component, pin, and connection, stored in id-indexed arenas. It
//! is also the propagation engine that pushes boolean changes from
//! sources to sinks.
//!
//! # Propagation
//!
//! Propagation is single-threaded, synchronous, and depth-first. When a
//! component's value changes, the circuit mirrors it onto the
//! component's output pins, then onto each attached connection in
//! attachment order, then onto each connection's target input pin, and
//! finally recomputes each downstream component, continuing depth-first
//! until the graph settles. The walk is unconditional (matching the
//! observer semantics of a toggle that nets to a no-op), but change
//! events are only emitted when a stored value actually flips.
//!
//! There is no cycle guard here. Acyclicity is guaranteed before any
//! wiring reaches the propagation layer: every proposed connection runs
//! through [`Circuit::validate_connection`], whose reachability check
//! rejects any edge that would close a cycle. By induction the graph
//! stays a DAG and every propagation walk terminates.
//!
//! # Mutation discipline
//!
//! All `pub(crate)` mutators assume their referents exist; the command
//! layer validates ids at construction time and `expect`s here document
//! that invariant. External callers mutate only through commands.

use std::collections::HashSet;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{CircuitError, ConnectError};
use crate::event::{CanvasEvent, EventBus, EventListener};

use super::component::{Component, ComponentKind, Position};
use super::connection::Connection;
use super::id::{ComponentId, ConnectionId, IdGenerator, PinId};
use super::pin::Pin;

/// The authoritative store of live circuit state.
#[derive(Debug, Default)]
pub struct Circuit {
    components: IndexMap<ComponentId, Component>,
    pins: IndexMap<PinId, Pin>,
    connections: IndexMap<ConnectionId, Connection>,
    ids: IdGenerator,
    events: EventBus,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for canvas change events.
    pub fn subscribe(&mut self, listener: EventListener) {
        self.events.subscribe(listener);
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// Look up a component by id.
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    /// Look up a pin by id.
    pub fn pin(&self, id: &PinId) -> Option<&Pin> {
        self.pins.get(id)
    }

    /// Look up a connection by id.
    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    /// Iterate over all components, in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Iterate over all connections, in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Number of live components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// A component's current value, if it exists.
    pub fn value(&self, id: &ComponentId) -> Option<bool> {
        self.components.get(id).map(Component::value)
    }

    /// Id of a component's `index`-th input pin.
    pub fn input_pin(&self, component: &ComponentId, index: usize) -> Result<&PinId, CircuitError> {
        let found = self
            .components
            .get(component)
            .ok_or_else(|| CircuitError::UnknownComponent(component.clone()))?;
        found
            .inputs()
            .get(index)
            .ok_or_else(|| CircuitError::PinIndexOutOfRange {
                component: component.clone(),
                index,
            })
    }

    /// Id of a component's `index`-th output pin.
    pub fn output_pin(
        &self,
        component: &ComponentId,
        index: usize,
    ) -> Result<&PinId, CircuitError> {
        let found = self
            .components
            .get(component)
            .ok_or_else(|| CircuitError::UnknownComponent(component.clone()))?;
        found
            .outputs()
            .get(index)
            .ok_or_else(|| CircuitError::PinIndexOutOfRange {
                component: component.clone(),
                index,
            })
    }

    /// Ids of every connection with an endpoint on the given component.
    pub fn connections_touching(&self, id: &ComponentId) -> Vec<ConnectionId> {
        self.connections
            .values()
            .filter(|connection| {
                let source_parent = self.pins.get(connection.source()).map(Pin::parent);
                let target_parent = self.pins.get(connection.target()).map(Pin::parent);
                source_parent == Some(id) || target_parent == Some(id)
            })
            .map(|connection| connection.id().clone())
            .collect()
    }

    // ------------------------------------------------------------------
    // Connection validity
    // ------------------------------------------------------------------

    /// Check whether a connection between two pins would be valid.
    ///
    /// On success returns the normalized `(source, target)` pin pair:
    /// source is the output pin, target the input pin, regardless of
    /// argument order. Validation rejections come back as
    /// [`CircuitError::Rejected`]; unknown pin ids fail as
    /// [`CircuitError::UnknownPin`].
    pub fn validate_connection(
        &self,
        a: &PinId,
        b: &PinId,
    ) -> Result<(PinId, PinId), CircuitError> {
        let pin_a = self
            .pins
            .get(a)
            .ok_or_else(|| CircuitError::UnknownPin(a.clone()))?;
        let pin_b = self
            .pins
            .get(b)
            .ok_or_else(|| CircuitError::UnknownPin(b.clone()))?;

        if pin_a.parent() == pin_b.parent() {
            return Err(ConnectError::SelfConnection.into());
        }

        let (source, target) = match (pin_a.is_output(), pin_b.is_output()) {
            (true, false) => (pin_a, pin_b),
            (false, true) => (pin_b, pin_a),
            _ => return Err(ConnectError::SameKind.into()),
        };

        if target.connection().is_some() {
            return Err(ConnectError::TargetOccupied.into());
        }

        // Would the target component eventually feed the source component?
        // If so, this edge would make the source an input to itself.
        if self.reaches(target.parent(), source.parent()) {
            return Err(ConnectError::WouldCycle.into());
        }

        Ok((source.id().clone(), target.id().clone()))
    }

    /// Iterative depth-first reachability over the downstream graph.
    fn reaches(&self, from: &ComponentId, to: &ComponentId) -> bool {
        let mut visited: HashSet<ComponentId> = HashSet::new();
        let mut stack = vec![from.clone()];

        while let Some(current) = stack.pop() {
            if &current == to {
                return true;
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            let Some(component) = self.components.get(&current) else {
                continue;
            };
            for pin_id in component.outputs() {
                let Some(pin) = self.pins.get(pin_id) else {
                    continue;
                };
                for conn_id in pin.connections() {
                    let Some(connection) = self.connections.get(conn_id) else {
                        continue;
                    };
                    if let Some(target_pin) = self.pins.get(connection.target()) {
                        stack.push(target_pin.parent().clone());
                    }
                }
            }
        }

        false
    }

    // ------------------------------------------------------------------
    // Mutation (command layer only)
    // ------------------------------------------------------------------

    /// Construct a component of the given kind with fresh ids, without
    /// inserting it. The command layer stores the result as a snapshot
    /// and inserts it on `execute`.
    pub(crate) fn build_component(
        &mut self,
        kind: ComponentKind,
        position: Position,
    ) -> (Component, Vec<Pin>) {
        let id = ComponentId::new(self.ids.next(kind.type_name()));
        let mut pins = Vec::with_capacity(kind.num_inputs() + kind.num_outputs());

        let mut inputs = SmallVec::new();
        for index in 0..kind.num_inputs() {
            let pin_id = PinId::new(self.ids.next("InputPin"));
            inputs.push(pin_id.clone());
            pins.push(Pin::input(pin_id, id.clone(), index));
        }

        let mut outputs = SmallVec::new();
        for index in 0..kind.num_outputs() {
            let pin_id = PinId::new(self.ids.next("OutputPin"));
            outputs.push(pin_id.clone());
            pins.push(Pin::output(pin_id, id.clone(), index));
        }

        (Component::new(id, kind, position, inputs, outputs), pins)
    }

    /// Construct a connection with a fresh id between a validated
    /// `(source, target)` pin pair, without inserting it.
    pub(crate) fn allocate_connection(&mut self, source: PinId, target: PinId) -> Connection {
        Connection::new(ConnectionId::new(self.ids.next("Connection")), source, target)
    }

    /// Insert a component and its pins, settle its value, and emit
    /// `ComponentAdded`.
    pub(crate) fn insert_component(&mut self, component: Component, pins: Vec<Pin>) {
        let id = component.id().clone();
        for pin in pins {
            self.pins.insert(pin.id().clone(), pin);
        }
        self.components.insert(id.clone(), component);

        // Settle silently; the settled value rides along in the event.
        let value = self.recompute(&id);

        // Mirror onto the output pins, so a connection attached later
        // reads the live value rather than a stale cache.
        let outputs: SmallVec<[PinId; 1]> =
            self.components[&id].outputs().iter().cloned().collect();
        for pin_id in &outputs {
            self.pins
                .get_mut(pin_id)
                .expect("component pins live in the pin arena")
                .set_value(value);
        }

        let component = &self.components[&id];
        let event = CanvasEvent::ComponentAdded {
            id: id.clone(),
            kind: component.kind(),
            position: component.position(),
            inputs: component.inputs().to_vec(),
            outputs: component.outputs().to_vec(),
            value,
        };
        debug!(component = id.as_str(), value, "component added");
        self.events.emit(&event);
    }

    /// Remove a component and its pins and emit `ComponentRemoved`.
    ///
    /// All adjacent connections must already be gone; `RemoveComponents`
    /// orders its work to guarantee that.
    pub(crate) fn remove_component(&mut self, id: &ComponentId) {
        debug_assert!(
            self.connections_touching(id).is_empty(),
            "adjacent connections must be removed before their component"
        );
        let component = self
            .components
            .shift_remove(id)
            .expect("remove targets a live component");
        for pin_id in component.inputs().iter().chain(component.outputs()) {
            self.pins.shift_remove(pin_id);
        }
        debug!(component = id.as_str(), "component removed");
        self.events.emit(&CanvasEvent::ComponentRemoved { id: id.clone() });
    }

    /// Move a component and emit `ComponentMoved`.
    pub(crate) fn set_position(&mut self, id: &ComponentId, position: Position) {
        {
            let component = self
                .components
                .get_mut(id)
                .expect("move targets a live component");
            component.set_position(position);
        }
        self.events.emit(&CanvasEvent::ComponentMoved {
            id: id.clone(),
            position,
        });
    }

    /// Flip a switch and push the change downstream.
    ///
    /// Toggling always propagates, even when a double toggle nets out to
    /// the original value.
    pub(crate) fn toggle(&mut self, id: &ComponentId) {
        let value = {
            let component = self
                .components
                .get_mut(id)
                .expect("toggle targets a live switch");
            let value = !component.value();
            component.set_value(value);
            value
        };
        debug!(component = id.as_str(), value, "switch toggled");
        self.events.emit(&CanvasEvent::ComponentValueChanged {
            id: id.clone(),
            value,
        });
        self.notify_downstream(id);
    }

    /// Wire a connection into the graph, emit `ConnectionAdded`, and pull
    /// the source value through to the target component and onward.
    pub(crate) fn insert_connection(&mut self, mut connection: Connection) {
        let id = connection.id().clone();
        let source = connection.source().clone();
        let target = connection.target().clone();

        let value = {
            let pin = self
                .pins
                .get_mut(&source)
                .expect("connection source pin is live");
            pin.attach_output(id.clone());
            pin.value()
        };
        connection.set_value(value);

        let target_parent = {
            let pin = self
                .pins
                .get_mut(&target)
                .expect("connection target pin is live");
            pin.attach_input(id.clone());
            pin.set_value(value);
            pin.parent().clone()
        };

        self.connections.insert(id.clone(), connection);
        debug!(
            connection = id.as_str(),
            source = source.as_str(),
            target = target.as_str(),
            "connection added"
        );
        self.events.emit(&CanvasEvent::ConnectionAdded { id, source, target });

        self.settle(&target_parent);
        self.notify_downstream(&target_parent);
    }

    /// Unwire a connection, emit `ConnectionRemoved`, and let the target
    /// input collapse to `false`, propagating the collapse downstream.
    pub(crate) fn remove_connection(&mut self, id: &ConnectionId) {
        let connection = self
            .connections
            .shift_remove(id)
            .expect("remove targets a live connection");

        if let Some(pin) = self.pins.get_mut(connection.source()) {
            pin.detach_output(id);
        }
        let target_parent = {
            let pin = self
                .pins
                .get_mut(connection.target())
                .expect("connection target pin is live");
            pin.detach_input();
            pin.parent().clone()
        };

        debug!(connection = id.as_str(), "connection removed");
        self.events.emit(&CanvasEvent::ConnectionRemoved { id: id.clone() });

        self.settle(&target_parent);
        self.notify_downstream(&target_parent);
    }

    // ------------------------------------------------------------------
    // Propagation
    // ------------------------------------------------------------------

    /// Recompute a component's value from its input pins. No event.
    fn recompute(&mut self, id: &ComponentId) -> bool {
        let inputs = self.input_values(id);
        let component = self
            .components
            .get_mut(id)
            .expect("recompute targets a live component");
        let value = component.kind().eval(&inputs, component.value());
        component.set_value(value);
        value
    }

    /// Current values of a component's input pins, in declaration order.
    fn input_values(&self, id: &ComponentId) -> SmallVec<[bool; 2]> {
        let component = self
            .components
            .get(id)
            .expect("input_values targets a live component");
        component
            .inputs()
            .iter()
            .map(|pin_id| {
                self.pins
                    .get(pin_id)
                    .expect("component pins live in the pin arena")
                    .value()
            })
            .collect()
    }

    /// The stale-to-settled transition: recompute and emit a value-change
    /// event if the stored value flipped.
    fn settle(&mut self, id: &ComponentId) {
        let Some(before) = self.components.get(id).map(Component::value) else {
            return;
        };
        let after = self.recompute(id);
        if after != before {
            trace!(component = id.as_str(), value = after, "component settled");
            self.events.emit(&CanvasEvent::ComponentValueChanged {
                id: id.clone(),
                value: after,
            });
        }
    }

    /// Depth-first propagation from an already-settled component.
    ///
    /// Implemented with an explicit stack; dependents are pushed in
    /// reverse attachment order so they pop in attachment order.
    fn notify_downstream(&mut self, id: &ComponentId) {
        let mut stack: Vec<ComponentId> = Vec::new();
        self.mirror_outputs(id, &mut stack);
        while let Some(next) = stack.pop() {
            self.settle(&next);
            self.mirror_outputs(&next, &mut stack);
        }
    }

    /// Mirror a component's value onto its output pins, their
    /// connections, and the connections' target input pins; collect the
    /// downstream components onto the stack.
    fn mirror_outputs(&mut self, id: &ComponentId, stack: &mut Vec<ComponentId>) {
        let Some(component) = self.components.get(id) else {
            return;
        };
        let value = component.value();
        let outputs: SmallVec<[PinId; 1]> = component.outputs().iter().cloned().collect();

        let mut targets: Vec<ComponentId> = Vec::new();
        for pin_id in outputs {
            let fanout: SmallVec<[ConnectionId; 2]> = {
                let pin = self
                    .pins
                    .get_mut(&pin_id)
                    .expect("output pin lives in the pin arena");
                pin.set_value(value);
                pin.connections().iter().cloned().collect()
            };
            for conn_id in fanout {
                let (changed, target_pin) = {
                    let connection = self
                        .connections
                        .get_mut(&conn_id)
                        .expect("fan-out entries are live connections");
                    let changed = connection.value() != value;
                    connection.set_value(value);
                    (changed, connection.target().clone())
                };
                if changed {
                    self.events.emit(&CanvasEvent::ConnectionValueChanged {
                        id: conn_id.clone(),
                        value,
                    });
                }
                let parent = {
                    let pin = self
                        .pins
                        .get_mut(&target_pin)
                        .expect("connection targets a live input pin");
                    pin.set_value(value);
                    pin.parent().clone()
                };
                targets.push(parent);
            }
        }

        for target in targets.into_iter().rev() {
            stack.push(target);
        }
    }
}
