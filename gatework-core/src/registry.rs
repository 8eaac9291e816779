//! Component Type Registry
//!
//! Maps type names (the strings a palette or saved document speaks, e.g.
//! `"AndGate"`) to component kinds. The table is built explicitly at
//! startup; there is no reflection or scanning. Unknown names are a
//! construction-time error.

use indexmap::IndexMap;

use crate::error::CircuitError;
use crate::graph::ComponentKind;

/// Explicit name-to-kind registration table.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    entries: IndexMap<String, ComponentKind>,
}

impl ComponentRegistry {
    /// An empty registry. Most callers want [`with_defaults`].
    ///
    /// [`with_defaults`]: ComponentRegistry::with_defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the full built-in catalogue under
    /// each kind's canonical name.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in [
            ComponentKind::And,
            ComponentKind::Or,
            ComponentKind::Xor,
            ComponentKind::Nand,
            ComponentKind::Not,
            ComponentKind::Switch,
            ComponentKind::Bulb,
        ] {
            registry.register(kind.type_name(), kind);
        }
        registry
    }

    /// Register a kind under a name, replacing any existing entry.
    pub fn register(&mut self, name: impl Into<String>, kind: ComponentKind) {
        self.entries.insert(name.into(), kind);
    }

    /// Resolve a type name to its kind.
    pub fn lookup(&self, name: &str) -> Result<ComponentKind, CircuitError> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| CircuitError::UnknownType(name.to_owned()))
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
