//! Node behaviors
//!
//! Per-subtype semantics shared by the walker (push) and the resolver (pull).
//! Dispatch is a closed match over [`Behavior`]; there is no plugin
//! mechanism because pull/push contracts differ per kind.

pub mod action;
pub mod cast;
pub mod event;
pub mod flow;
pub mod logic;
pub mod variable;

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use logic_types::{NodeKind, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Subtype Enums
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! subtypes {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Subtype string as written in sheets
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            pub fn parse(subtype: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|op| op.name() == subtype)
            }
        }
    };
}

subtypes!(
    /// Entry-point triggers
    EventOp { Update, Collision, OutOfBounds }
);

subtypes!(
    /// Live variable reads
    VariableOp { Get }
);

subtypes!(
    /// Pure operators, evaluated when pulled
    LogicOp { Add, Subtract, Multiply, Divide, Compare, GreaterThan, LessThan, Clamp, And, Or, Not }
);

subtypes!(
    /// Exec routing
    FlowOp { Branch, Sequence }
);

subtypes!(
    /// Side effects on the actor or engine
    ActionOp { Move, SetPosition, SetVariable, PlaySound, AddScore, ResetPosition, Bounce }
);

subtypes!(
    /// Type checks and conversions
    CastOp { IsPlayer, IsBall, IsEnemy, ToString, ToNumber }
);

// ─────────────────────────────────────────────────────────────────────────────
// Behavior
// ─────────────────────────────────────────────────────────────────────────────

/// Resolved behavior of a node. `None` means the kind is known but the
/// subtype is not; each kind handles that fail-soft in its own way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Event(Option<EventOp>),
    Variable(Option<VariableOp>),
    Logic(Option<LogicOp>),
    Flow(Option<FlowOp>),
    Action(Option<ActionOp>),
    Cast(Option<CastOp>),
}

impl Behavior {
    pub fn parse(kind: NodeKind, subtype: &str) -> Self {
        match kind {
            NodeKind::Event => Behavior::Event(EventOp::parse(subtype)),
            NodeKind::Variable => Behavior::Variable(VariableOp::parse(subtype)),
            NodeKind::Logic => Behavior::Logic(LogicOp::parse(subtype)),
            NodeKind::Flow => Behavior::Flow(FlowOp::parse(subtype)),
            NodeKind::Action => Behavior::Action(ActionOp::parse(subtype)),
            NodeKind::Cast => Behavior::Cast(CastOp::parse(subtype)),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Behavior::Event(_) => NodeKind::Event,
            Behavior::Variable(_) => NodeKind::Variable,
            Behavior::Logic(_) => NodeKind::Logic,
            Behavior::Flow(_) => NodeKind::Flow,
            Behavior::Action(_) => NodeKind::Action,
            Behavior::Cast(_) => NodeKind::Cast,
        }
    }

    /// Whether the subtype was recognized
    pub fn is_known(&self) -> bool {
        match self {
            Behavior::Event(op) => op.is_some(),
            Behavior::Variable(op) => op.is_some(),
            Behavior::Logic(op) => op.is_some(),
            Behavior::Flow(op) => op.is_some(),
            Behavior::Action(op) => op.is_some(),
            Behavior::Cast(op) => op.is_some(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node Context
// ─────────────────────────────────────────────────────────────────────────────

/// Inputs and configuration handed to a behavior function.
///
/// `inputs` only holds ports that resolved (from a wire or a property
/// literal); behaviors apply their own default for anything missing.
pub struct NodeContext<'n> {
    pub node_id: &'n str,
    /// Node properties, already merged over catalog defaults
    pub properties: &'n serde_json::Map<String, JsonValue>,
    /// Input values (port id -> value)
    pub inputs: HashMap<String, Value>,
}

impl<'n> NodeContext<'n> {
    pub fn new(
        node_id: &'n str,
        properties: &'n serde_json::Map<String, JsonValue>,
        inputs: HashMap<String, Value>,
    ) -> Self {
        Self {
            node_id,
            properties,
            inputs,
        }
    }

    /// Get an input value by port id
    pub fn get_input(&self, name: &str) -> Option<&Value> {
        self.inputs.get(name)
    }

    /// Get input coerced to a number
    pub fn get_input_number(&self, name: &str) -> Option<f64> {
        self.inputs.get(name).map(Value::to_number)
    }

    /// Get input coerced to a bool
    pub fn get_input_bool(&self, name: &str) -> Option<bool> {
        self.inputs.get(name).map(Value::is_truthy)
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&JsonValue> {
        self.properties.get(key).filter(|v| !v.is_null())
    }

    /// Get property as string
    pub fn get_property_str(&self, key: &str) -> Option<&str> {
        self.get_property(key).and_then(|v| v.as_str())
    }

    /// Get property as f64
    pub fn get_property_number(&self, key: &str) -> Option<f64> {
        self.get_property(key).map(|v| Value::from(v).to_number())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node Output
// ─────────────────────────────────────────────────────────────────────────────

/// Where exec flow goes after a node ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecRoute {
    /// Walk one exec output
    Continue(String),
    /// Walk each exec output to completion, in order
    Sequence(Vec<String>),
    /// Stop this branch
    End,
}

/// Output from a node execution
#[derive(Debug)]
pub struct NodeOutput {
    /// Output values written to the cache (port id -> value)
    pub values: HashMap<String, Value>,
    pub route: ExecRoute,
}

impl NodeOutput {
    /// Create output that continues to the default "exec" port
    pub fn continue_default(values: HashMap<String, Value>) -> Self {
        Self {
            values,
            route: ExecRoute::Continue("exec".to_string()),
        }
    }

    /// Create output that continues to a specific exec port
    pub fn continue_to(exec_port: &str, values: HashMap<String, Value>) -> Self {
        Self {
            values,
            route: ExecRoute::Continue(exec_port.to_string()),
        }
    }

    /// Create output that walks several exec ports one after another
    pub fn sequence(exec_ports: Vec<String>) -> Self {
        Self {
            values: HashMap::new(),
            route: ExecRoute::Sequence(exec_ports),
        }
    }

    /// Create output that ends this branch
    pub fn end() -> Self {
        Self {
            values: HashMap::new(),
            route: ExecRoute::End,
        }
    }

    /// Get the next exec port if continuing
    pub fn next_exec_port(&self) -> Option<&str> {
        match &self.route {
            ExecRoute::Continue(port) => Some(port),
            _ => None,
        }
    }
}
