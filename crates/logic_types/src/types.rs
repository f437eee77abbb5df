// Logic Types - Core data structures for logic sheets
//
// These types define the structure of logic sheets, nodes, ports, and connections.
// Sheets are authored by the editor as JSON and loaded per actor at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Node Kinds
// ─────────────────────────────────────────────────────────────────────────────

/// The closed set of node kinds. Each kind has its own evaluation contract:
/// events are entry points, logic and variable nodes are pulled, flow and
/// action nodes are walked, cast nodes are both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[serde(alias = "Event")]
    Event,
    #[serde(alias = "Variable")]
    Variable,
    #[serde(alias = "Logic")]
    Logic,
    #[serde(alias = "Flow")]
    Flow,
    #[serde(alias = "Action")]
    Action,
    #[serde(alias = "Cast")]
    Cast,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Event => "event",
            NodeKind::Variable => "variable",
            NodeKind::Logic => "logic",
            NodeKind::Flow => "flow",
            NodeKind::Action => "action",
            NodeKind::Cast => "cast",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pin Types
// ─────────────────────────────────────────────────────────────────────────────

/// Direction of a pin on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    Input,
    Output,
}

/// Types that can flow through pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PinType {
    /// Execution flow (no data, just control flow)
    Exec,
    Number,
    Boolean,
    String,
    /// Reference to another actor
    Actor,
    /// Accepts any data value
    Any,
}

impl PinType {
    /// Check if a wire from `self` into `other` is well-typed.
    ///
    /// Numbers and booleans coerce into each other; strings and actors need
    /// an explicit cast node.
    pub fn is_compatible_with(&self, other: &PinType) -> bool {
        match (self, other) {
            (a, b) if a == b => true,
            (PinType::Exec, _) | (_, PinType::Exec) => false,
            (PinType::Any, _) | (_, PinType::Any) => true,
            (PinType::Number, PinType::Boolean) | (PinType::Boolean, PinType::Number) => true,
            _ => false,
        }
    }

    /// Check if this is an execution pin type
    pub fn is_exec(&self) -> bool {
        matches!(self, PinType::Exec)
    }

    /// Check if this is a data pin type
    pub fn is_data(&self) -> bool {
        !self.is_exec()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pin Definitions
// ─────────────────────────────────────────────────────────────────────────────

/// Definition of a pin on a node type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinDef {
    /// Port id (used in connections)
    pub name: String,
    pub direction: PinDirection,
    #[serde(rename = "type")]
    pub pin_type: PinType,
}

impl PinDef {
    /// Create the execution input pin
    pub fn exec_in() -> Self {
        Self {
            name: "exec".to_string(),
            direction: PinDirection::Input,
            pin_type: PinType::Exec,
        }
    }

    /// Create an execution output pin with a custom name
    pub fn exec_out(name: &str) -> Self {
        Self {
            name: name.to_string(),
            direction: PinDirection::Output,
            pin_type: PinType::Exec,
        }
    }

    /// Create a data input pin
    pub fn data_in(name: &str, pin_type: PinType) -> Self {
        Self {
            name: name.to_string(),
            direction: PinDirection::Input,
            pin_type,
        }
    }

    /// Create a data output pin
    pub fn data_out(name: &str, pin_type: PinType) -> Self {
        Self {
            name: name.to_string(),
            direction: PinDirection::Output,
            pin_type,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node Definitions
// ─────────────────────────────────────────────────────────────────────────────

/// Catalog entry describing one (kind, subtype) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    pub kind: NodeKind,
    /// Concrete behavior selector (e.g. "Branch", "SetVariable")
    pub subtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub pins: Vec<PinDef>,
    /// Property defaults merged under each node's own properties
    #[serde(default)]
    pub defaults: serde_json::Map<String, serde_json::Value>,
}

impl NodeDef {
    /// Get all input pins
    pub fn input_pins(&self) -> impl Iterator<Item = &PinDef> {
        self.pins
            .iter()
            .filter(|p| p.direction == PinDirection::Input)
    }

    /// Get all output pins
    pub fn output_pins(&self) -> impl Iterator<Item = &PinDef> {
        self.pins
            .iter()
            .filter(|p| p.direction == PinDirection::Output)
    }

    /// Get all data input pins
    pub fn data_inputs(&self) -> impl Iterator<Item = &PinDef> {
        self.input_pins().filter(|p| p.pin_type.is_data())
    }

    /// Get all execution output pins
    pub fn exec_outputs(&self) -> impl Iterator<Item = &PinDef> {
        self.output_pins().filter(|p| p.pin_type.is_exec())
    }

    /// Get an input pin by name
    pub fn input(&self, name: &str) -> Option<&PinDef> {
        self.input_pins().find(|p| p.name == name)
    }

    /// Get an output pin by name
    pub fn output(&self, name: &str) -> Option<&PinDef> {
        self.output_pins().find(|p| p.name == name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sheet Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Position in the visual editor (for UI purposes)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// A node instance within a logic sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicNode {
    /// Unique instance id within this sheet
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub subtype: String,
    /// Node configuration, merged over the catalog defaults when indexed
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub position: Position,
}

impl LogicNode {
    pub fn new(id: impl Into<String>, kind: NodeKind, subtype: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            subtype: subtype.into(),
            properties: serde_json::Map::new(),
            position: Position::default(),
        }
    }

    /// Builder-style property setter
    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}

/// A `(node, port)` pair. Ports are structural, not stored entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortRef {
    pub node_id: String,
    pub port_id: String,
}

impl PortRef {
    pub fn new(node_id: impl Into<String>, port_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            port_id: port_id.into(),
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node_id, self.port_id)
    }
}

/// Source end of a connection, as written by the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputEnd {
    pub node_id: String,
    pub output_id: String,
}

/// Destination end of a connection, as written by the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputEnd {
    pub node_id: String,
    pub input_id: String,
}

/// A wire between an output port and an input port.
///
/// Whether it carries control or data is decided by the ports, not the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: OutputEnd,
    pub to: InputEnd,
}

impl Connection {
    /// Create a new connection
    pub fn new(from_node: &str, from_port: &str, to_node: &str, to_port: &str) -> Self {
        Self {
            from: OutputEnd {
                node_id: from_node.to_string(),
                output_id: from_port.to_string(),
            },
            to: InputEnd {
                node_id: to_node.to_string(),
                input_id: to_port.to_string(),
            },
        }
    }

    /// The `(node, output)` this connection leaves from
    pub fn source(&self) -> PortRef {
        PortRef::new(&self.from.node_id, &self.from.output_id)
    }

    /// The `(node, input)` this connection arrives at
    pub fn destination(&self) -> PortRef {
        PortRef::new(&self.to.node_id, &self.to.input_id)
    }
}

/// Error raised when a sheet document cannot be parsed
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Failed to parse logic sheet: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A complete logic sheet for one actor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogicSheet {
    #[serde(default)]
    pub nodes: Vec<LogicNode>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl LogicSheet {
    /// Create a new empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a sheet from its JSON document
    pub fn from_json(json: &str) -> Result<Self, SheetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style node append
    pub fn with_node(mut self, node: LogicNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Builder-style connection append
    pub fn connect(mut self, from_node: &str, from_port: &str, to_node: &str, to_port: &str) -> Self {
        self.connections
            .push(Connection::new(from_node, from_port, to_node, to_port));
        self
    }

    /// Get the first node with the given id
    pub fn get_node(&self, id: &str) -> Option<&LogicNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_type_compatibility() {
        assert!(PinType::Number.is_compatible_with(&PinType::Number));
        assert!(PinType::Number.is_compatible_with(&PinType::Boolean));
        assert!(PinType::Any.is_compatible_with(&PinType::Actor));
        assert!(!PinType::Exec.is_compatible_with(&PinType::Any));
        assert!(!PinType::String.is_compatible_with(&PinType::Number));
    }

    #[test]
    fn test_sheet_json_parsing() {
        let json = r#"{
            "nodes": [
                {"id": "e1", "type": "event", "subtype": "Update"},
                {"id": "a1", "type": "Action", "subtype": "Move", "properties": {"velocityX": 5}}
            ],
            "connections": [
                {"from": {"nodeId": "e1", "outputId": "exec"}, "to": {"nodeId": "a1", "inputId": "exec"}}
            ],
            "editorMeta": {"zoom": 1.5}
        }"#;

        let sheet = LogicSheet::from_json(json).unwrap();
        assert_eq!(sheet.nodes.len(), 2);
        assert_eq!(sheet.nodes[1].kind, NodeKind::Action);
        assert_eq!(sheet.connections[0].source(), PortRef::new("e1", "exec"));
        assert_eq!(sheet.connections[0].destination(), PortRef::new("a1", "exec"));
        assert_eq!(sheet.get_node("a1").unwrap().properties["velocityX"], 5);
    }

    #[test]
    fn test_sheet_parse_error() {
        assert!(LogicSheet::from_json("{\"nodes\": 3}").is_err());
    }

    #[test]
    fn test_connection_serializes_editor_shape() {
        let conn = Connection::new("n1", "result", "n2", "a");
        let json = serde_json::to_value(&conn).unwrap();
        assert_eq!(json["from"]["outputId"], "result");
        assert_eq!(json["to"]["inputId"], "a");
    }
}
