// Graph Index - Per-actor lookup tables built once when a sheet is loaded
//
// The walker follows `outgoing` (source port -> destinations, in document
// order); the resolver follows `incoming` (input port -> its one producer).

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use logic_types::{LogicSheet, NodeKind, PortRef};

use crate::catalog::NodeCatalog;
use crate::nodes::Behavior;

/// A node with its behavior parsed and properties merged over catalog defaults
#[derive(Debug, Clone)]
pub struct IndexedNode {
    pub id: String,
    pub kind: NodeKind,
    pub subtype: String,
    pub behavior: Behavior,
    pub properties: serde_json::Map<String, JsonValue>,
    /// Data inputs gathered before the node runs, in catalog order
    pub data_inputs: Vec<String>,
}

impl IndexedNode {
    /// Get a property, treating explicit nulls as absent
    pub fn property(&self, key: &str) -> Option<&JsonValue> {
        self.properties.get(key).filter(|v| !v.is_null())
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(JsonValue::as_str)
    }
}

/// Read-only view of one actor's loaded sheet
#[derive(Debug, Default)]
pub struct GraphIndex {
    nodes: Vec<IndexedNode>,
    by_id: HashMap<String, usize>,
    outgoing: HashMap<PortRef, Vec<PortRef>>,
    incoming: HashMap<PortRef, PortRef>,
    connection_count: usize,
}

impl GraphIndex {
    /// Index a sheet. When several wires feed one input, the first in
    /// document order is the producer. Connections naming unknown nodes are
    /// kept; lookups through them come back empty.
    pub fn build(sheet: &LogicSheet, catalog: &NodeCatalog) -> Self {
        let mut index = Self::default();

        for node in &sheet.nodes {
            let def = catalog.get(node.kind, &node.subtype);

            let mut properties = def.map(|d| d.defaults.clone()).unwrap_or_default();
            for (key, value) in &node.properties {
                properties.insert(key.clone(), value.clone());
            }

            let data_inputs = def
                .map(|d| d.data_inputs().map(|p| p.name.clone()).collect())
                .unwrap_or_default();

            index.by_id.insert(node.id.clone(), index.nodes.len());
            index.nodes.push(IndexedNode {
                id: node.id.clone(),
                kind: node.kind,
                subtype: node.subtype.clone(),
                behavior: Behavior::parse(node.kind, &node.subtype),
                properties,
                data_inputs,
            });
        }

        for conn in &sheet.connections {
            let from = conn.source();
            let to = conn.destination();
            index.incoming.entry(to.clone()).or_insert_with(|| from.clone());
            index.outgoing.entry(from).or_default().push(to);
            index.connection_count += 1;
        }

        index
    }

    /// Get a node by id
    pub fn node(&self, id: &str) -> Option<&IndexedNode> {
        self.by_id.get(id).map(|&i| &self.nodes[i])
    }

    /// All nodes in document order
    pub fn nodes(&self) -> &[IndexedNode] {
        &self.nodes
    }

    /// Event nodes in document order
    pub fn events(&self) -> impl Iterator<Item = &IndexedNode> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.behavior, Behavior::Event(_)))
    }

    /// Input ports wired to the given output, in document order
    pub fn destinations(&self, node_id: &str, port_id: &str) -> &[PortRef] {
        self.outgoing
            .get(&PortRef::new(node_id, port_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The output feeding the given input, if wired
    pub fn source_of(&self, node_id: &str, input_id: &str) -> Option<&PortRef> {
        self.incoming.get(&PortRef::new(node_id, input_id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of indexed connections
    pub fn connection_count(&self) -> usize {
        self.connection_count
    }
}

#[cfg(test)]
mod tests {
    use logic_types::LogicNode;

    use super::*;
    use crate::nodes::{ActionOp, LogicOp};

    fn sheet() -> LogicSheet {
        LogicSheet::new()
            .with_node(LogicNode::new("tick", NodeKind::Event, "Update"))
            .with_node(LogicNode::new("one", NodeKind::Logic, "Add").with_property("a", 1))
            .with_node(LogicNode::new("two", NodeKind::Logic, "Add").with_property("a", 2))
            .with_node(
                LogicNode::new("score", NodeKind::Action, "AddScore").with_property("key", "left"),
            )
            .with_node(LogicNode::new("odd", NodeKind::Action, "Teleport"))
            .connect("tick", "exec", "score", "exec")
            .connect("tick", "exec", "odd", "exec")
            .connect("one", "result", "score", "amount")
            .connect("two", "result", "score", "amount")
            .connect("tick", "exec", "missing", "exec")
    }

    #[test]
    fn test_nodes_and_behaviors() {
        let index = GraphIndex::build(&sheet(), &NodeCatalog::builtin());

        assert_eq!(index.len(), 5);
        assert_eq!(index.node("one").unwrap().behavior, Behavior::Logic(Some(LogicOp::Add)));
        assert_eq!(index.node("odd").unwrap().behavior, Behavior::Action(None));
        assert!(index.node("missing").is_none());
        assert_eq!(index.events().count(), 1);
    }

    #[test]
    fn test_properties_merge_over_defaults() {
        let index = GraphIndex::build(&sheet(), &NodeCatalog::builtin());
        let score = index.node("score").unwrap();

        assert_eq!(score.behavior, Behavior::Action(Some(ActionOp::AddScore)));
        assert_eq!(score.property_str("key"), Some("left"));
        assert_eq!(score.property("amount"), Some(&JsonValue::from(1)));
        assert_eq!(score.data_inputs, vec!["amount".to_string()]);

        // Unknown subtypes get no defaults and no inputs
        let odd = index.node("odd").unwrap();
        assert!(odd.properties.is_empty());
        assert!(odd.data_inputs.is_empty());
    }

    #[test]
    fn test_edges() {
        let index = GraphIndex::build(&sheet(), &NodeCatalog::builtin());

        assert_eq!(
            index.destinations("tick", "exec")[..2],
            [PortRef::new("score", "exec"), PortRef::new("odd", "exec")]
        );
        assert!(index.destinations("score", "exec").is_empty());

        // First producer wins
        assert_eq!(index.source_of("score", "amount"), Some(&PortRef::new("one", "result")));
        assert_eq!(index.source_of("score", "exec"), Some(&PortRef::new("tick", "exec")));

        // Dangling wire is indexed but names no node
        assert_eq!(index.connection_count(), 5);
        assert_eq!(index.destinations("tick", "exec").len(), 3);
    }
}
