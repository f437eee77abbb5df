//! Type checks and conversions. Casts may sit inline in an exec chain, so
//! they always continue along "exec" after writing their outputs.

use std::collections::HashMap;

use logic_types::Value;

use super::{CastOp, NodeContext, NodeOutput};

/// Compute a cast node's outputs
pub fn execute(op: CastOp, ctx: &NodeContext) -> NodeOutput {
    let mut values = HashMap::new();

    match op {
        CastOp::IsPlayer | CastOp::IsBall | CastOp::IsEnemy => {
            let matched = ctx
                .get_input("actor")
                .and_then(Value::as_actor)
                .filter(|actor| actor.tag == expected_tag(op));
            values.insert("result".to_string(), Value::Bool(matched.is_some()));
            values.insert("actor".to_string(), Value::from(matched.cloned()));
        }
        CastOp::ToString => {
            let text = ctx.get_input("value").map(Value::to_string).unwrap_or_default();
            values.insert("result".to_string(), Value::String(text));
        }
        CastOp::ToNumber => {
            let number = ctx.get_input_number("value").unwrap_or(0.0);
            values.insert("result".to_string(), Value::Number(number));
        }
    }

    NodeOutput::continue_default(values)
}

fn expected_tag(op: CastOp) -> &'static str {
    match op {
        CastOp::IsPlayer => "Player",
        CastOp::IsBall => "Ball",
        CastOp::IsEnemy => "Enemy",
        CastOp::ToString | CastOp::ToNumber => "",
    }
}
