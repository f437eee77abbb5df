// Node Catalog - Port layouts and property defaults for every node subtype
//
// The catalog is descriptive only. Behavior lives in `nodes`; the catalog
// tells the index which data inputs to gather, which property defaults to
// merge, and tells validation which wires are well-typed.

use std::collections::HashMap;

use serde_json::json;

use logic_types::{NodeDef, NodeDefLookup, NodeKind, PinDef, PinType};

use crate::nodes::{ActionOp, CastOp, EventOp, FlowOp, LogicOp, VariableOp};

/// Registry of node definitions, keyed by kind then subtype
#[derive(Debug, Default)]
pub struct NodeCatalog {
    nodes: HashMap<NodeKind, HashMap<String, NodeDef>>,
}

impl NodeCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every builtin subtype registered
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        register_event_nodes(&mut catalog);
        register_variable_nodes(&mut catalog);
        register_logic_nodes(&mut catalog);
        register_flow_nodes(&mut catalog);
        register_action_nodes(&mut catalog);
        register_cast_nodes(&mut catalog);
        tracing::debug!("Registered {} builtin node types", catalog.len());
        catalog
    }

    /// Register a node definition, replacing any previous one
    pub fn register(&mut self, definition: NodeDef) {
        self.nodes
            .entry(definition.kind)
            .or_default()
            .insert(definition.subtype.clone(), definition);
    }

    /// Get a node definition
    pub fn get(&self, kind: NodeKind, subtype: &str) -> Option<&NodeDef> {
        self.nodes.get(&kind).and_then(|by_subtype| by_subtype.get(subtype))
    }

    /// Get all definitions of one kind
    pub fn definitions_of(&self, kind: NodeKind) -> impl Iterator<Item = &NodeDef> {
        self.nodes.get(&kind).into_iter().flat_map(|m| m.values())
    }

    pub fn len(&self) -> usize {
        self.nodes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NodeDefLookup for NodeCatalog {
    fn node_def(&self, kind: NodeKind, subtype: &str) -> Option<&NodeDef> {
        self.get(kind, subtype)
    }
}

fn def(
    kind: NodeKind,
    subtype: &str,
    description: &str,
    pins: Vec<PinDef>,
    defaults: serde_json::Value,
) -> NodeDef {
    NodeDef {
        kind,
        subtype: subtype.to_string(),
        description: Some(description.to_string()),
        pins,
        defaults: defaults.as_object().cloned().unwrap_or_default(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

fn register_event_nodes(catalog: &mut NodeCatalog) {
    catalog.register(def(
        NodeKind::Event,
        EventOp::Update.name(),
        "Fires once per tick",
        vec![
            PinDef::exec_out("exec"),
            PinDef::data_out("deltaTime", PinType::Number),
        ],
        json!({}),
    ));

    catalog.register(def(
        NodeKind::Event,
        EventOp::Collision.name(),
        "Fires when the actor overlaps another actor whose tag matches `tag`",
        vec![
            PinDef::exec_out("exec"),
            PinDef::data_out("other", PinType::Actor),
            PinDef::data_out("otherTag", PinType::String),
        ],
        json!({ "tag": "" }),
    ));

    catalog.register(def(
        NodeKind::Event,
        EventOp::OutOfBounds.name(),
        "Fires when the actor leaves the playfield through `edge`",
        vec![
            PinDef::exec_out("exec"),
            PinDef::data_out("edge", PinType::String),
        ],
        json!({ "edge": "any" }),
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Variables
// ─────────────────────────────────────────────────────────────────────────────

fn register_variable_nodes(catalog: &mut NodeCatalog) {
    catalog.register(def(
        NodeKind::Variable,
        VariableOp::Get.name(),
        "Read an actor variable, falling back to `default`",
        vec![PinDef::data_out("value", PinType::Any)],
        json!({ "name": "" }),
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Logic
// ─────────────────────────────────────────────────────────────────────────────

fn register_logic_nodes(catalog: &mut NodeCatalog) {
    for op in LogicOp::ALL {
        let (description, pins) = match op {
            LogicOp::Add => ("a + b", binary(PinType::Number, PinType::Number)),
            LogicOp::Subtract => ("a - b", binary(PinType::Number, PinType::Number)),
            LogicOp::Multiply => ("a * b", binary(PinType::Number, PinType::Number)),
            LogicOp::Divide => ("a / b, or 0 when b is 0", binary(PinType::Number, PinType::Number)),
            LogicOp::Compare => ("a equals b", binary(PinType::Any, PinType::Boolean)),
            LogicOp::GreaterThan => ("a > b", binary(PinType::Number, PinType::Boolean)),
            LogicOp::LessThan => ("a < b", binary(PinType::Number, PinType::Boolean)),
            LogicOp::And => ("a and b", binary(PinType::Boolean, PinType::Boolean)),
            LogicOp::Or => ("a or b", binary(PinType::Boolean, PinType::Boolean)),
            LogicOp::Clamp => (
                "Clamp value into [min, max]",
                vec![
                    PinDef::data_in("value", PinType::Number),
                    PinDef::data_in("min", PinType::Number),
                    PinDef::data_in("max", PinType::Number),
                    PinDef::data_out("result", PinType::Number),
                ],
            ),
            LogicOp::Not => (
                "Logical NOT",
                vec![
                    PinDef::data_in("value", PinType::Boolean),
                    PinDef::data_out("result", PinType::Boolean),
                ],
            ),
        };
        catalog.register(def(NodeKind::Logic, op.name(), description, pins, json!({})));
    }
}

fn binary(input: PinType, output: PinType) -> Vec<PinDef> {
    vec![
        PinDef::data_in("a", input),
        PinDef::data_in("b", input),
        PinDef::data_out("result", output),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Flow Control
// ─────────────────────────────────────────────────────────────────────────────

fn register_flow_nodes(catalog: &mut NodeCatalog) {
    catalog.register(def(
        NodeKind::Flow,
        FlowOp::Branch.name(),
        "Walk `true` or `false` depending on the condition",
        vec![
            PinDef::exec_in(),
            PinDef::data_in("condition", PinType::Boolean),
            PinDef::exec_out("true"),
            PinDef::exec_out("false"),
        ],
        json!({}),
    ));

    catalog.register(def(
        NodeKind::Flow,
        FlowOp::Sequence.name(),
        "Walk out1, out2, ... each to completion, in order",
        vec![
            PinDef::exec_in(),
            PinDef::exec_out("out1"),
            PinDef::exec_out("out2"),
        ],
        json!({ "outputs": 2 }),
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────────────────────────────────────

fn register_action_nodes(catalog: &mut NodeCatalog) {
    for op in ActionOp::ALL {
        let (description, inputs, defaults) = match op {
            ActionOp::Move => (
                "position += velocity * deltaTime",
                vec![
                    PinDef::data_in("velocityX", PinType::Number),
                    PinDef::data_in("velocityY", PinType::Number),
                    PinDef::data_in("deltaTime", PinType::Number),
                ],
                json!({}),
            ),
            ActionOp::SetPosition => (
                "Override position; unset axes keep their value",
                vec![
                    PinDef::data_in("x", PinType::Number),
                    PinDef::data_in("y", PinType::Number),
                ],
                json!({}),
            ),
            ActionOp::SetVariable => (
                "set/add/multiply a variable, then clamp to min/max",
                vec![
                    PinDef::data_in("value", PinType::Any),
                    PinDef::data_in("min", PinType::Number),
                    PinDef::data_in("max", PinType::Number),
                ],
                json!({ "name": "", "operation": "set" }),
            ),
            ActionOp::PlaySound => (
                "Play a sound effect",
                vec![PinDef::data_in("volume", PinType::Number)],
                json!({ "sound": "", "volume": 1 }),
            ),
            ActionOp::AddScore => (
                "Add to a game-state entry",
                vec![PinDef::data_in("amount", PinType::Number)],
                json!({ "key": "score", "amount": 1 }),
            ),
            ActionOp::ResetPosition => ("Return to the spawn position", vec![], json!({})),
            ActionOp::Bounce => (
                "Negate direction variables on the given axis",
                vec![],
                json!({ "axis": "x", "xVariable": "velocityX", "yVariable": "velocityY" }),
            ),
        };

        let mut pins = vec![PinDef::exec_in()];
        pins.extend(inputs);
        pins.push(PinDef::exec_out("exec"));
        if *op == ActionOp::SetVariable {
            pins.push(PinDef::data_out("value", PinType::Any));
        }

        catalog.register(def(NodeKind::Action, op.name(), description, pins, defaults));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Casts
// ─────────────────────────────────────────────────────────────────────────────

fn register_cast_nodes(catalog: &mut NodeCatalog) {
    for op in CastOp::ALL {
        let (description, pins) = match op {
            CastOp::IsPlayer | CastOp::IsBall | CastOp::IsEnemy => (
                "Check an actor's tag and pass it through on success",
                vec![
                    PinDef::exec_in(),
                    PinDef::data_in("actor", PinType::Actor),
                    PinDef::exec_out("exec"),
                    PinDef::data_out("result", PinType::Boolean),
                    PinDef::data_out("actor", PinType::Actor),
                ],
            ),
            CastOp::ToString => (
                "Convert any value to text",
                vec![
                    PinDef::exec_in(),
                    PinDef::data_in("value", PinType::Any),
                    PinDef::exec_out("exec"),
                    PinDef::data_out("result", PinType::String),
                ],
            ),
            CastOp::ToNumber => (
                "Convert any value to a number, 0 if unparseable",
                vec![
                    PinDef::exec_in(),
                    PinDef::data_in("value", PinType::Any),
                    PinDef::exec_out("exec"),
                    PinDef::data_out("result", PinType::Number),
                ],
            ),
        };
        catalog.register(def(NodeKind::Cast, op.name(), description, pins, json!({})));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog() {
        let catalog = NodeCatalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.get(NodeKind::Logic, "Add").is_none());
    }

    #[test]
    fn test_builtin_covers_every_subtype() {
        let catalog = NodeCatalog::builtin();

        for op in EventOp::ALL {
            assert!(catalog.get(NodeKind::Event, op.name()).is_some());
        }
        for op in LogicOp::ALL {
            assert!(catalog.get(NodeKind::Logic, op.name()).is_some());
        }
        for op in FlowOp::ALL {
            assert!(catalog.get(NodeKind::Flow, op.name()).is_some());
        }
        for op in ActionOp::ALL {
            assert!(catalog.get(NodeKind::Action, op.name()).is_some());
        }
        for op in CastOp::ALL {
            assert!(catalog.get(NodeKind::Cast, op.name()).is_some());
        }
        assert!(catalog.get(NodeKind::Variable, "Get").is_some());

        let total = EventOp::ALL.len()
            + VariableOp::ALL.len()
            + LogicOp::ALL.len()
            + FlowOp::ALL.len()
            + ActionOp::ALL.len()
            + CastOp::ALL.len();
        assert_eq!(catalog.len(), total);
    }

    #[test]
    fn test_pins_and_defaults() {
        let catalog = NodeCatalog::builtin();

        let clamp = catalog.get(NodeKind::Logic, "Clamp").unwrap();
        let inputs: Vec<_> = clamp.data_inputs().map(|p| p.name.as_str()).collect();
        assert_eq!(inputs, vec!["value", "min", "max"]);

        let score = catalog.get(NodeKind::Action, "AddScore").unwrap();
        assert_eq!(score.defaults["amount"], 1);
        assert_eq!(score.exec_outputs().count(), 1);

        let branch = catalog.get(NodeKind::Flow, "Branch").unwrap();
        let outs: Vec<_> = branch.exec_outputs().map(|p| p.name.as_str()).collect();
        assert_eq!(outs, vec!["true", "false"]);
    }
}
