//! Runtime value type flowing through data ports
//!
//! Values are deliberately loose: every operator coerces its inputs to the
//! type it needs instead of rejecting mismatches. "Absent" is modelled as
//! `Option::None` by callers and is distinct from `Value::Null`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Actor References
// ─────────────────────────────────────────────────────────────────────────────

/// Reference to another actor, as delivered by collision events
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorRef {
    /// Actor id (the key its logic sheet is loaded under)
    pub id: String,
    /// Actor type tag (e.g. "Player", "Ball", "Enemy")
    pub tag: String,
}

impl ActorRef {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Value
// ─────────────────────────────────────────────────────────────────────────────

/// A value stored in the cache, an actor variable, or passed between nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null (e.g. a failed type check pass-through)
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Actor(ActorRef),
}

impl Value {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool without coercion
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as f64 without coercion
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string reference without coercion
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as actor reference
    pub fn as_actor(&self) -> Option<&ActorRef> {
        match self {
            Value::Actor(actor) => Some(actor),
            _ => None,
        }
    }

    /// Numeric coercion. Unparseable strings and actors become 0, and so do
    /// strings naming a non-finite number ("nan", "inf").
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null | Value::Actor(_) => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
        }
    }

    /// Boolean coercion
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Actor(_) => true,
        }
    }

    /// Loose equality used by the Compare operator.
    ///
    /// When either side is a number both sides are compared numerically,
    /// otherwise the values must match structurally (actors by id).
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(_), _) | (_, Value::Number(_)) => self.to_number() == other.to_number(),
            (Value::Actor(a), Value::Actor(b)) => a.id == b.id,
            (a, b) => a == b,
        }
    }

    /// Name of the variant, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Actor(_) => "actor",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Actor(actor) => f.write_str(&actor.id),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<ActorRef> for Value {
    fn from(v: ActorRef) -> Self {
        Value::Actor(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Property values come from sheet JSON. Arrays and objects carry no meaning
/// for the interpreter and read as null, except `{id, tag}` actor literals.
impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Object(_) => {
                serde_json::from_value::<ActorRef>(v.clone()).map(Value::Actor).unwrap_or(Value::Null)
            }
            serde_json::Value::Array(_) => Value::Null,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::from(&v)
    }
}
