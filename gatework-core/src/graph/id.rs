//! Entity Identifiers
//!
//! Every component, pin, and connection in a circuit is addressed by a
//! stable string id. Ids are produced by a prefix-keyed generator so that
//! they stay readable in logs and event payloads ("AndGate-0",
//! "InputPin-3", "Connection-1").
//!
//! Cross-references between entities are always ids into the owning
//! arenas, never pointers. That keeps the graph free of ownership cycles
//! and makes dangling references impossible by construction: a stale id
//! simply fails its arena lookup.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub(crate) fn new(raw: String) -> Self {
                Self(raw)
            }

            /// Get the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_type! {
    /// Unique identifier for a component.
    ComponentId
}

id_type! {
    /// Unique identifier for a pin.
    PinId
}

id_type! {
    /// Unique identifier for a connection.
    ConnectionId
}

/// Generates process-unique string ids keyed by a prefix.
///
/// Each prefix carries its own counter, so ids read as
/// `"{prefix}-{n}"` with `n` counting up from zero per prefix.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counters: HashMap<String, u64>,
}

impl IdGenerator {
    /// Create a generator with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next id for the given prefix.
    pub fn next(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_owned()).or_insert(0);
        let id = format!("{prefix}-{counter}");
        *counter += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_count_up_per_prefix() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next("AndGate"), "AndGate-0");
        assert_eq!(ids.next("AndGate"), "AndGate-1");
        assert_eq!(ids.next("Switch"), "Switch-0");
        assert_eq!(ids.next("AndGate"), "AndGate-2");
    }

    #[test]
    fn id_newtypes_compare_by_value() {
        let a = ComponentId::new("AndGate-0".into());
        let b = ComponentId::new("AndGate-0".into());
        let c = ComponentId::new("AndGate-1".into());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str(), "AndGate-0");
    }
}
