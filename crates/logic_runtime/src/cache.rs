// Value Cache - Per-tick storage of node outputs
//
// One cache is shared by every actor; keys are actor-qualified. Entries live
// until the host calls `clear`, which it must do once per tick before any
// event dispatch.

use std::collections::HashMap;

use logic_types::Value;

/// Composite key: actor id + node id + output port id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub actor_id: String,
    pub node_id: String,
    pub port_id: String,
}

impl CacheKey {
    pub fn new(actor_id: &str, node_id: &str, port_id: &str) -> Self {
        Self {
            actor_id: actor_id.to_string(),
            node_id: node_id.to_string(),
            port_id: port_id.to_string(),
        }
    }
}

/// Last-written output values for the current tick
#[derive(Debug, Default)]
pub struct ValueCache {
    values: HashMap<CacheKey, Value>,
}

impl ValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an output value, overwriting any previous write
    pub fn set_output(&mut self, actor_id: &str, node_id: &str, port_id: &str, value: Value) {
        self.values
            .insert(CacheKey::new(actor_id, node_id, port_id), value);
    }

    /// Get an output value, or `None` if nothing wrote it this tick
    pub fn get_output(&self, actor_id: &str, node_id: &str, port_id: &str) -> Option<&Value> {
        self.values.get(&CacheKey::new(actor_id, node_id, port_id))
    }

    /// Drop every entry for every actor
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
