//! Pure operators. Unresolved inputs count as 0 (or false) before the
//! operator applies.

use logic_types::Value;

use super::{LogicOp, NodeContext};

/// Evaluate a logic node from its gathered inputs
pub fn evaluate(op: LogicOp, ctx: &NodeContext) -> Value {
    let num = |name: &str| ctx.get_input_number(name).unwrap_or(0.0);
    let flag = |name: &str| ctx.get_input_bool(name).unwrap_or(false);

    match op {
        LogicOp::Add => Value::Number(num("a") + num("b")),
        LogicOp::Subtract => Value::Number(num("a") - num("b")),
        LogicOp::Multiply => Value::Number(num("a") * num("b")),
        LogicOp::Divide => {
            let b = num("b");
            Value::Number(if b == 0.0 { 0.0 } else { num("a") / b })
        }
        LogicOp::Compare => {
            let zero = Value::Number(0.0);
            let a = ctx.get_input("a").unwrap_or(&zero);
            let b = ctx.get_input("b").unwrap_or(&zero);
            Value::Bool(a.loose_eq(b))
        }
        LogicOp::GreaterThan => Value::Bool(num("a") > num("b")),
        LogicOp::LessThan => Value::Bool(num("a") < num("b")),
        LogicOp::Clamp => {
            // max(min, min(max, value)): a reversed range yields `min`
            let value = num("value");
            let lo = num("min");
            let hi = num("max");
            Value::Number(lo.max(hi.min(value)))
        }
        LogicOp::And => Value::Bool(flag("a") && flag("b")),
        LogicOp::Or => Value::Bool(flag("a") || flag("b")),
        LogicOp::Not => Value::Bool(!flag("value")),
    }
}
