//! Entry-point triggers: which event nodes a host call fires, and what data
//! each seeds into the cache.

use wildmatch::WildMatch;

use logic_types::{ActorRef, Value};

use super::{EventOp, NodeContext};
use crate::context::Edge;

/// Data supplied by the host with one entry-point call
#[derive(Debug, Clone, Copy)]
pub enum Trigger<'t> {
    Update { delta_time: f64 },
    Collision { other: &'t ActorRef },
    OutOfBounds { edge: Edge },
}

impl Trigger<'_> {
    /// Event subtype this trigger fires
    pub fn op(&self) -> EventOp {
        match self {
            Trigger::Update { .. } => EventOp::Update,
            Trigger::Collision { .. } => EventOp::Collision,
            Trigger::OutOfBounds { .. } => EventOp::OutOfBounds,
        }
    }

    /// Apply the event node's declared filter. Mismatches are skipped, not errors.
    pub fn accepts(&self, ctx: &NodeContext) -> bool {
        match self {
            Trigger::Update { .. } => true,
            Trigger::Collision { other } => {
                // Non-string tags filter by their text form
                let pattern = ctx.get_property("tag").map(|v| Value::from(v).to_string());
                match pattern.as_deref() {
                    None | Some("") => true,
                    Some(pattern) => WildMatch::new(pattern).matches(&other.tag),
                }
            }
            Trigger::OutOfBounds { edge } => match ctx.get_property_str("edge") {
                None | Some("") | Some("any") => true,
                Some(wanted) => wanted.eq_ignore_ascii_case(edge.as_str()),
            },
        }
    }

    /// Output values seeded under the event node before walking
    pub fn outputs(&self) -> Vec<(&'static str, Value)> {
        match self {
            Trigger::Update { delta_time } => vec![("deltaTime", Value::Number(*delta_time))],
            Trigger::Collision { other } => vec![
                ("other", Value::Actor((*other).clone())),
                ("otherTag", Value::String(other.tag.clone())),
            ],
            Trigger::OutOfBounds { edge } => vec![("edge", Value::from(edge.as_str()))],
        }
    }
}
