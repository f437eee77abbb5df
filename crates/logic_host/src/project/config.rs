//! Project Configuration Types
//!
//! Defines the structure of project files on disk.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use logic_runtime::InterpreterConfig;
use logic_types::Value;

/// Project manifest (project.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub project: ProjectInfo,
    #[serde(default)]
    pub interpreter: InterpreterConfig,
    #[serde(default)]
    pub playfield: PlayfieldConfig,
    #[serde(default)]
    pub actors: Vec<ActorConfig>,
}

/// Project information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: String,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub description: Option<String>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Playfield bounds. Actors leaving them trigger OutOfBounds events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayfieldConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

/// Actor configuration ([[actors]])
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    pub id: String,
    pub tag: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_size")]
    pub width: f64,
    #[serde(default = "default_size")]
    pub height: f64,
    /// Logic sheet path, relative to the project directory
    pub sheet: Option<String>,
    /// Initial actor variables
    #[serde(default)]
    pub variables: HashMap<String, serde_json::Value>,
}

fn default_size() -> f64 {
    16.0
}

impl ActorConfig {
    /// Initial variables converted to runtime values
    pub fn initial_variables(&self) -> impl Iterator<Item = (&str, Value)> {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), Value::from(value)))
    }
}
