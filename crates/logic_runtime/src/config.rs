// Interpreter configuration
use serde::{Deserialize, Serialize};

/// Limits and defaults for the interpreter.
///
/// Every field has a default so a partial `[interpreter]` table is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Maximum number of nested exec hops before a traversal is aborted
    pub max_exec_depth: usize,
    /// Maximum nesting of pulled logic nodes before a pull resolves to absent
    pub max_pull_depth: usize,
    /// Seconds used by Move when neither a wire nor the engine supplies a delta
    pub default_delta_time: f64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_exec_depth: 256,
            max_pull_depth: 64,
            default_delta_time: 0.016,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: InterpreterConfig = serde_json::from_str(r#"{"max_exec_depth": 8}"#).unwrap();
        assert_eq!(config.max_exec_depth, 8);
        assert_eq!(config.max_pull_depth, 64);
        assert_eq!(config.default_delta_time, 0.016);
    }
}
