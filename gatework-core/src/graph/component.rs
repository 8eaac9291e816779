//! Components
//!
//! A component owns a fixed-arity set of input and output pins and an
//! evaluation rule over its input values. The catalogue covers the basic
//! two-input gates, the inverter, and the two terminal kinds: switches
//! (pure sources, set only by toggling) and bulbs (pure sinks).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::id::{ComponentId, PinId};

/// A position on the editor canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The kind of a circuit component, fixing its arity and evaluation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    #[serde(rename = "AndGate")]
    And,
    #[serde(rename = "OrGate")]
    Or,
    #[serde(rename = "XorGate")]
    Xor,
    #[serde(rename = "NandGate")]
    Nand,
    #[serde(rename = "NotGate")]
    Not,
    Switch,
    Bulb,
}

impl ComponentKind {
    /// The registry name of this kind, also used as the id prefix.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::And => "AndGate",
            Self::Or => "OrGate",
            Self::Xor => "XorGate",
            Self::Nand => "NandGate",
            Self::Not => "NotGate",
            Self::Switch => "Switch",
            Self::Bulb => "Bulb",
        }
    }

    /// Declared number of input pins.
    pub fn num_inputs(&self) -> usize {
        match self {
            Self::And | Self::Or | Self::Xor | Self::Nand => 2,
            Self::Not | Self::Bulb => 1,
            Self::Switch => 0,
        }
    }

    /// Declared number of output pins.
    pub fn num_outputs(&self) -> usize {
        match self {
            Self::Bulb => 0,
            _ => 1,
        }
    }

    /// Evaluate the component's boolean rule.
    ///
    /// `inputs` holds the current input pin values, one per declared
    /// input. `current` is the component's present value; only switches
    /// use it, since their value is set by toggling rather than computed.
    pub fn eval(&self, inputs: &[bool], current: bool) -> bool {
        match self {
            Self::And => inputs[0] && inputs[1],
            Self::Or => inputs[0] || inputs[1],
            Self::Xor => inputs[0] ^ inputs[1],
            Self::Nand => !(inputs[0] && inputs[1]),
            Self::Not => !inputs[0],
            Self::Bulb => inputs[0],
            Self::Switch => current,
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A circuit component: a gate, switch, or bulb placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    id: ComponentId,
    kind: ComponentKind,
    position: Position,
    value: bool,
    inputs: SmallVec<[PinId; 2]>,
    outputs: SmallVec<[PinId; 1]>,
}

impl Component {
    pub(crate) fn new(
        id: ComponentId,
        kind: ComponentKind,
        position: Position,
        inputs: SmallVec<[PinId; 2]>,
        outputs: SmallVec<[PinId; 1]>,
    ) -> Self {
        debug_assert_eq!(inputs.len(), kind.num_inputs());
        debug_assert_eq!(outputs.len(), kind.num_outputs());
        Self {
            id,
            kind,
            position,
            value: false,
            inputs,
            outputs,
        }
    }

    /// The component's id.
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    /// The component's kind.
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Current canvas position.
    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Current evaluated (or, for switches, toggled) value.
    pub fn value(&self) -> bool {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: bool) {
        self.value = value;
    }

    /// Input pin ids, in declaration order.
    pub fn inputs(&self) -> &[PinId] {
        &self.inputs
    }

    /// Output pin ids, in declaration order.
    pub fn outputs(&self) -> &[PinId] {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_truth_tables() {
        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            let inputs = [a, b];
            assert_eq!(ComponentKind::And.eval(&inputs, false), a && b);
            assert_eq!(ComponentKind::Or.eval(&inputs, false), a || b);
            assert_eq!(ComponentKind::Xor.eval(&inputs, false), a ^ b);
            assert_eq!(ComponentKind::Nand.eval(&inputs, false), !(a && b));
        }
        assert!(ComponentKind::Not.eval(&[false], false));
        assert!(!ComponentKind::Not.eval(&[true], false));
        assert!(ComponentKind::Bulb.eval(&[true], false));
        assert!(!ComponentKind::Bulb.eval(&[false], true));
    }

    #[test]
    fn switch_keeps_its_current_value() {
        // Switches are never recomputed from inputs.
        assert!(ComponentKind::Switch.eval(&[], true));
        assert!(!ComponentKind::Switch.eval(&[], false));
    }

    #[test]
    fn declared_arity() {
        assert_eq!(ComponentKind::And.num_inputs(), 2);
        assert_eq!(ComponentKind::And.num_outputs(), 1);
        assert_eq!(ComponentKind::Not.num_inputs(), 1);
        assert_eq!(ComponentKind::Switch.num_inputs(), 0);
        assert_eq!(ComponentKind::Switch.num_outputs(), 1);
        assert_eq!(ComponentKind::Bulb.num_inputs(), 1);
        assert_eq!(ComponentKind::Bulb.num_outputs(), 0);
    }

    #[test]
    fn kind_serializes_to_registry_name() {
        let json = serde_json::to_string(&ComponentKind::And).unwrap();
        assert_eq!(json, "\"AndGate\"");
        let kind: ComponentKind = serde_json::from_str("\"Switch\"").unwrap();
        assert_eq!(kind, ComponentKind::Switch);
    }
}
