//! Side-effecting nodes. Every action continues along its own "exec" output
//! after the effect, whatever the effect did.

use std::collections::HashMap;

use tracing::debug;

use logic_types::Value;

use super::{ActionOp, NodeContext, NodeOutput};
use crate::config::InterpreterConfig;
use crate::context::{ActorContext, EngineContext};

/// Perform an action's effect on the actor or engine
pub fn execute(
    op: ActionOp,
    ctx: &NodeContext,
    actor: &mut ActorContext,
    engine: &mut dyn EngineContext,
    config: &InterpreterConfig,
) -> NodeOutput {
    let mut values = HashMap::new();

    match op {
        ActionOp::Move => {
            let velocity = |axis: &str, actor: &ActorContext| {
                ctx.get_input_number(axis)
                    .or_else(|| actor.variable(axis).map(Value::to_number))
                    .unwrap_or(0.0)
            };
            let vx = velocity("velocityX", actor);
            let vy = velocity("velocityY", actor);
            let dt = ctx
                .get_input_number("deltaTime")
                .or_else(|| engine.delta_time())
                .unwrap_or(config.default_delta_time);
            actor.x += vx * dt;
            actor.y += vy * dt;
        }
        ActionOp::SetPosition => {
            if let Some(x) = ctx.get_input_number("x") {
                actor.x = x;
            }
            if let Some(y) = ctx.get_input_number("y") {
                actor.y = y;
            }
        }
        ActionOp::SetVariable => {
            if let Some(result) = set_variable(ctx, actor) {
                values.insert("value".to_string(), result);
            }
        }
        ActionOp::PlaySound => {
            let sound = ctx.get_property_str("sound").unwrap_or_default();
            if sound.is_empty() {
                debug!(node_id = %ctx.node_id, "PlaySound without a sound id");
            } else {
                let volume = ctx.get_input_number("volume").unwrap_or(1.0);
                engine.play_effect(sound, volume);
            }
        }
        ActionOp::AddScore => {
            let key = ctx.get_property_str("key").unwrap_or("score");
            let amount = ctx.get_input_number("amount").unwrap_or(1.0);
            engine.add_game_state(key, amount);
        }
        ActionOp::ResetPosition => actor.reset_position(),
        ActionOp::Bounce => {
            let axis = ctx.get_property_str("axis").unwrap_or("x");
            let x_var = ctx.get_property_str("xVariable").unwrap_or("velocityX");
            let y_var = ctx.get_property_str("yVariable").unwrap_or("velocityY");
            match axis {
                "x" => flip(actor, x_var),
                "y" => flip(actor, y_var),
                "both" | "xy" => {
                    flip(actor, x_var);
                    flip(actor, y_var);
                }
                other => debug!(node_id = %ctx.node_id, axis = other, "Unknown bounce axis"),
            }
        }
    }

    NodeOutput::continue_default(values)
}

/// Apply set/add/multiply to the named variable, then clamp to min/max.
/// Returns the written value.
fn set_variable(ctx: &NodeContext, actor: &mut ActorContext) -> Option<Value> {
    let name = ctx.get_property_str("name").unwrap_or_default();
    if name.is_empty() {
        debug!(node_id = %ctx.node_id, "SetVariable without a variable name");
        return None;
    }

    let operand = ctx.get_input("value").cloned().unwrap_or(Value::Number(0.0));
    let current = actor.variable(name).map(Value::to_number).unwrap_or(0.0);

    let mut result = match ctx.get_property_str("operation").unwrap_or("set") {
        "add" => Value::Number(current + operand.to_number()),
        "multiply" => Value::Number(current * operand.to_number()),
        "set" => operand,
        other => {
            debug!(node_id = %ctx.node_id, operation = other, "Unknown SetVariable operation, using set");
            operand
        }
    };

    let min = ctx.get_input_number("min");
    let max = ctx.get_input_number("max");
    if min.is_some() || max.is_some() {
        let mut n = result.to_number();
        if let Some(min) = min {
            n = n.max(min);
        }
        if let Some(max) = max {
            n = n.min(max);
        }
        result = Value::Number(n);
    }

    actor.set_variable(name, result.clone());
    Some(result)
}

/// Negate a numeric direction variable; absent variables stay absent
fn flip(actor: &mut ActorContext, name: &str) {
    if let Some(current) = actor.variable(name).map(Value::to_number) {
        actor.set_variable(name, Value::Number(-current));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::context::EngineState;

    fn run(
        op: ActionOp,
        properties: serde_json::Value,
        inputs: &[(&str, Value)],
        actor: &mut ActorContext,
        engine: &mut EngineState,
    ) -> NodeOutput {
        let inputs = inputs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let properties = properties.as_object().cloned().unwrap_or_default();
        let ctx = NodeContext::new("act", &properties, inputs);
        execute(op, &ctx, actor, engine, &InterpreterConfig::default())
    }

    #[test]
    fn test_move_uses_engine_delta() {
        let mut actor = ActorContext::new("Ball", 0.0, 0.0);
        let mut engine = EngineState::new().with_delta_time(0.5);
        let output = run(
            ActionOp::Move,
            json!({}),
            &[("velocityX", Value::Number(10.0)), ("velocityY", Value::Number(-4.0))],
            &mut actor,
            &mut engine,
        );

        assert_eq!((actor.x, actor.y), (5.0, -2.0));
        assert_eq!(output.next_exec_port(), Some("exec"));
    }

    #[test]
    fn test_move_defaults() {
        let mut actor = ActorContext::new("Ball", 0.0, 0.0).with_variable("velocityX", 100.0);
        let mut engine = EngineState::new();
        run(ActionOp::Move, json!({}), &[], &mut actor, &mut engine);

        assert!((actor.x - 1.6).abs() < 1e-9);
        assert_eq!(actor.y, 0.0);
    }

    #[test]
    fn test_set_position_keeps_unset_axis() {
        let mut actor = ActorContext::new("Player", 3.0, 4.0);
        let mut engine = EngineState::new();
        run(
            ActionOp::SetPosition,
            json!({}),
            &[("y", Value::Number(40.0))],
            &mut actor,
            &mut engine,
        );

        assert_eq!((actor.x, actor.y), (3.0, 40.0));
    }

    #[test]
    fn test_set_variable_clamps_after_operation() {
        let mut actor = ActorContext::new("Player", 0.0, 0.0).with_variable("hp", 3.0);
        let mut engine = EngineState::new();
        let output = run(
            ActionOp::SetVariable,
            json!({"name": "hp", "operation": "add"}),
            &[("value", Value::Number(2.0)), ("max", Value::Number(4.0))],
            &mut actor,
            &mut engine,
        );

        assert_eq!(actor.variable("hp"), Some(&Value::Number(4.0)));
        assert_eq!(output.values.get("value"), Some(&Value::Number(4.0)));
    }

    #[test]
    fn test_set_variable_operations() {
        let mut actor = ActorContext::new("Player", 0.0, 0.0).with_variable("speed", 3.0);
        let mut engine = EngineState::new();

        run(
            ActionOp::SetVariable,
            json!({"name": "speed", "operation": "multiply"}),
            &[("value", Value::Number(-2.0)), ("min", Value::Number(-5.0))],
            &mut actor,
            &mut engine,
        );
        assert_eq!(actor.variable("speed"), Some(&Value::Number(-5.0)));

        run(
            ActionOp::SetVariable,
            json!({"name": "label", "operation": "set"}),
            &[("value", Value::from("fast"))],
            &mut actor,
            &mut engine,
        );
        assert_eq!(actor.variable("label"), Some(&Value::from("fast")));
    }

    #[test]
    fn test_sound_and_score_delegate_to_engine() {
        let mut actor = ActorContext::new("Ball", 0.0, 0.0);
        let mut engine = EngineState::new();

        run(
            ActionOp::PlaySound,
            json!({"sound": "bounce"}),
            &[("volume", Value::Number(0.3))],
            &mut actor,
            &mut engine,
        );
        run(ActionOp::AddScore, json!({"key": "left"}), &[], &mut actor, &mut engine);
        run(
            ActionOp::AddScore,
            json!({"key": "left"}),
            &[("amount", Value::Number(4.0))],
            &mut actor,
            &mut engine,
        );

        assert_eq!(engine.sounds.len(), 1);
        assert_eq!(engine.sounds[0].id, "bounce");
        assert_eq!(engine.sounds[0].volume, 0.3);
        assert_eq!(engine.get("left"), 5.0);
    }

    #[test]
    fn test_bounce_and_reset() {
        let mut actor = ActorContext::new("Ball", 1.0, 2.0)
            .with_variable("velocityX", 3.0)
            .with_variable("velocityY", -1.0);
        let mut engine = EngineState::new();

        run(ActionOp::Bounce, json!({"axis": "both"}), &[], &mut actor, &mut engine);
        assert_eq!(actor.variable("velocityX"), Some(&Value::Number(-3.0)));
        assert_eq!(actor.variable("velocityY"), Some(&Value::Number(1.0)));

        run(ActionOp::Bounce, json!({"axis": "y"}), &[], &mut actor, &mut engine);
        assert_eq!(actor.variable("velocityY"), Some(&Value::Number(-1.0)));

        actor.x = 50.0;
        run(ActionOp::ResetPosition, json!({}), &[], &mut actor, &mut engine);
        assert_eq!((actor.x, actor.y), (1.0, 2.0));
    }
}
