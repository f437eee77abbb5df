//! Exec routing for Branch and Sequence

use std::collections::HashMap;

use super::{FlowOp, NodeContext, NodeOutput};

/// Widest Sequence a sheet can declare; larger `outputs` values are clamped
pub const MAX_SEQUENCE_OUTPUTS: usize = 64;

/// Decide which exec outputs a flow node walks
pub fn execute(op: FlowOp, ctx: &NodeContext) -> NodeOutput {
    match op {
        FlowOp::Branch => {
            let condition = ctx.get_input_bool("condition").unwrap_or(false);
            if condition {
                NodeOutput::continue_to("true", HashMap::new())
            } else {
                NodeOutput::continue_to("false", HashMap::new())
            }
        }
        FlowOp::Sequence => {
            let count = ctx
                .get_property_number("outputs")
                .filter(|n| n.is_finite())
                .map(|n| n.clamp(2.0, MAX_SEQUENCE_OUTPUTS as f64) as usize)
                .unwrap_or(2);
            NodeOutput::sequence((1..=count).map(|i| format!("out{}", i)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use logic_types::Value;

    use super::*;
    use crate::nodes::ExecRoute;

    fn branch(condition: Option<Value>) -> Option<String> {
        let properties = serde_json::Map::new();
        let mut inputs = HashMap::new();
        if let Some(value) = condition {
            inputs.insert("condition".to_string(), value);
        }
        execute(FlowOp::Branch, &NodeContext::new("b", &properties, inputs))
            .next_exec_port()
            .map(str::to_string)
    }

    #[test]
    fn test_branch_takes_exactly_one_side() {
        assert_eq!(branch(Some(Value::Bool(true))).as_deref(), Some("true"));
        assert_eq!(branch(Some(Value::Bool(false))).as_deref(), Some("false"));
        assert_eq!(branch(Some(Value::Number(0.0))).as_deref(), Some("false"));
        assert_eq!(branch(Some(Value::from(""))).as_deref(), Some("false"));
        assert_eq!(branch(Some(Value::Null)).as_deref(), Some("false"));
        assert_eq!(branch(Some(Value::Number(2.0))).as_deref(), Some("true"));
        assert_eq!(branch(None).as_deref(), Some("false"));
    }

    #[test]
    fn test_sequence_outputs() {
        let properties = serde_json::Map::new();
        let output = execute(FlowOp::Sequence, &NodeContext::new("s", &properties, HashMap::new()));
        assert_eq!(
            output.route,
            ExecRoute::Sequence(vec!["out1".to_string(), "out2".to_string()])
        );

        let properties = serde_json::json!({"outputs": 3});
        let output = execute(
            FlowOp::Sequence,
            &NodeContext::new("s", properties.as_object().unwrap(), HashMap::new()),
        );
        assert_eq!(
            output.route,
            ExecRoute::Sequence(vec!["out1".to_string(), "out2".to_string(), "out3".to_string()])
        );
    }

    fn sequence_width(outputs: serde_json::Value) -> usize {
        let properties = serde_json::json!({ "outputs": outputs });
        let output = execute(
            FlowOp::Sequence,
            &NodeContext::new("s", properties.as_object().unwrap(), HashMap::new()),
        );
        match output.route {
            ExecRoute::Sequence(ports) => ports.len(),
            other => panic!("expected a sequence route, got {:?}", other),
        }
    }

    #[test]
    fn test_sequence_width_is_bounded() {
        assert_eq!(sequence_width(serde_json::json!(1e15)), MAX_SEQUENCE_OUTPUTS);
        assert_eq!(sequence_width(serde_json::json!(u64::MAX)), MAX_SEQUENCE_OUTPUTS);
        assert_eq!(sequence_width(serde_json::json!(-5)), 2);
        assert_eq!(sequence_width(serde_json::json!("inf")), 2);
        assert_eq!(sequence_width(serde_json::json!("12")), 12);
    }
}
