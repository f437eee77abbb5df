//! Variable reads. Always live from the actor, never cached.

use logic_types::Value;

use crate::context::ActorContext;
use crate::index::IndexedNode;

/// Read the variable a Get node names, falling back to its declared
/// `default` and then to 0
pub fn read(node: &IndexedNode, actor: &ActorContext) -> Value {
    let name = node.property_str("name").unwrap_or_default();
    actor
        .variable(name)
        .cloned()
        .or_else(|| node.property("default").map(Value::from))
        .unwrap_or(Value::Number(0.0))
}
