// Sheet Validation - Structural checks run when a sheet is loaded
//
// Only duplicate node ids are fatal. Everything else is reported so the host
// can surface it, while the interpreter skips the offending parts at runtime.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use super::types::{LogicNode, LogicSheet, NodeDef, NodeKind, PortRef};

/// Source of node definitions used to check subtypes and port types
pub trait NodeDefLookup {
    fn node_def(&self, kind: NodeKind, subtype: &str) -> Option<&NodeDef>;
}

/// A problem found in a sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetIssue {
    /// Two nodes share an id; the later one would shadow the earlier
    DuplicateNodeId { node_id: String },
    /// A connection names a node that does not exist
    DanglingConnection { from: PortRef, to: PortRef },
    /// More than one wire feeds the same input; the first one wins
    MultipleProducers { input: PortRef, producers: Vec<PortRef> },
    /// The wire joins ports of incompatible types
    PortTypeMismatch { from: PortRef, to: PortRef },
    /// No catalog entry for the node's (kind, subtype)
    UnknownSubtype { node_id: String, kind: NodeKind, subtype: String },
}

impl SheetIssue {
    /// Errors reject the sheet; everything else is a warning
    pub fn is_error(&self) -> bool {
        matches!(self, SheetIssue::DuplicateNodeId { .. })
    }
}

impl fmt::Display for SheetIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetIssue::DuplicateNodeId { node_id } => write!(f, "duplicate node id '{}'", node_id),
            SheetIssue::DanglingConnection { from, to } => {
                write!(f, "connection {} -> {} references an unknown node", from, to)
            }
            SheetIssue::MultipleProducers { input, producers } => write!(
                f,
                "input {} has {} producers, {} wins",
                input,
                producers.len(),
                producers[0]
            ),
            SheetIssue::PortTypeMismatch { from, to } => {
                write!(f, "connection {} -> {} joins incompatible ports", from, to)
            }
            SheetIssue::UnknownSubtype {
                node_id,
                kind,
                subtype,
            } => write!(f, "node '{}' has unknown {} subtype '{}'", node_id, kind, subtype),
        }
    }
}

impl LogicSheet {
    /// Check the sheet against a node catalog
    pub fn validate(&self, catalog: &impl NodeDefLookup) -> Vec<SheetIssue> {
        let mut issues = Vec::new();

        // First node wins for a repeated id, as at load
        let mut by_id: HashMap<&str, &LogicNode> = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            match by_id.entry(node.id.as_str()) {
                Entry::Occupied(_) => issues.push(SheetIssue::DuplicateNodeId {
                    node_id: node.id.clone(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(node);
                }
            }
            if catalog.node_def(node.kind, &node.subtype).is_none() {
                issues.push(SheetIssue::UnknownSubtype {
                    node_id: node.id.clone(),
                    kind: node.kind,
                    subtype: node.subtype.clone(),
                });
            }
        }

        // Producers per data input, in document order
        let mut producers: HashMap<PortRef, Vec<PortRef>> = HashMap::new();
        let mut input_order = Vec::new();

        for conn in &self.connections {
            let from = conn.source();
            let to = conn.destination();

            let (Some(src), Some(dst)) = (
                by_id.get(from.node_id.as_str()),
                by_id.get(to.node_id.as_str()),
            ) else {
                issues.push(SheetIssue::DanglingConnection { from, to });
                continue;
            };

            let src_pin = catalog
                .node_def(src.kind, &src.subtype)
                .and_then(|def| def.output(&from.port_id));
            let dst_pin = catalog
                .node_def(dst.kind, &dst.subtype)
                .and_then(|def| def.input(&to.port_id));

            if let (Some(src_pin), Some(dst_pin)) = (src_pin, dst_pin) {
                if !src_pin.pin_type.is_compatible_with(&dst_pin.pin_type) {
                    issues.push(SheetIssue::PortTypeMismatch {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
            }

            // Exec inputs fan in freely
            if dst_pin.is_some_and(|pin| pin.pin_type.is_exec()) {
                continue;
            }

            let entry = producers.entry(to.clone()).or_default();
            if entry.is_empty() {
                input_order.push(to);
            }
            entry.push(from);
        }

        for input in input_order {
            if let Some(list) = producers.remove(&input) {
                if list.len() > 1 {
                    issues.push(SheetIssue::MultipleProducers {
                        input,
                        producers: list,
                    });
                }
            }
        }

        issues
    }
}
