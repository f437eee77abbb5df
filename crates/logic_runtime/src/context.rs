// Actor and engine contexts
//
// The interpreter never owns game state. Hosts hand in the actor being
// updated and an engine context for side effects; only Action nodes mutate
// either of them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use logic_types::{ActorRef, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Actor Context
// ─────────────────────────────────────────────────────────────────────────────

/// Mutable state of the actor a graph runs for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorContext {
    /// Actor type tag (e.g. "Player", "Ball")
    pub tag: String,
    pub x: f64,
    pub y: f64,
    /// Position restored by ResetPosition
    pub spawn_x: f64,
    pub spawn_y: f64,
    /// Per-actor named variables
    pub variables: HashMap<String, Value>,
}

impl ActorContext {
    /// Create an actor at its spawn position
    pub fn new(tag: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            tag: tag.into(),
            x,
            y,
            spawn_x: x,
            spawn_y: y,
            variables: HashMap::new(),
        }
    }

    /// Builder-style variable setter
    pub fn with_variable(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(name.to_string(), value.into());
        self
    }

    /// Get a variable value
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Set a variable value
    pub fn set_variable(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    /// Move back to the spawn position
    pub fn reset_position(&mut self) {
        self.x = self.spawn_x;
        self.y = self.spawn_y;
    }

    /// Reference to this actor as seen by other actors' graphs
    pub fn actor_ref(&self, id: &str) -> ActorRef {
        ActorRef::new(id, &self.tag)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Playfield Edges
// ─────────────────────────────────────────────────────────────────────────────

/// Playfield edge an actor left through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Context
// ─────────────────────────────────────────────────────────────────────────────

/// Side-effect sinks and per-tick data supplied by the host engine
pub trait EngineContext {
    /// Seconds elapsed this tick, if the engine tracks it
    fn delta_time(&self) -> Option<f64> {
        None
    }

    /// Trigger a sound effect
    fn play_effect(&mut self, sound_id: &str, volume: f64);

    /// `game_state[key] += amount`
    fn add_game_state(&mut self, key: &str, amount: f64);
}

/// A sound effect requested by a PlaySound node
#[derive(Debug, Clone, PartialEq)]
pub struct SoundEffect {
    pub id: String,
    pub volume: f64,
}

/// Engine context that records effects in memory
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub delta_time: Option<f64>,
    pub game_state: HashMap<String, f64>,
    /// Sounds requested since the last drain
    pub sounds: Vec<SoundEffect>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delta_time(mut self, delta_time: f64) -> Self {
        self.delta_time = Some(delta_time);
        self
    }

    /// Current value of a game-state entry (0 if never written)
    pub fn get(&self, key: &str) -> f64 {
        self.game_state.get(key).copied().unwrap_or(0.0)
    }

    /// Take all recorded sounds
    pub fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.sounds)
    }
}

impl EngineContext for EngineState {
    fn delta_time(&self) -> Option<f64> {
        self.delta_time
    }

    fn play_effect(&mut self, sound_id: &str, volume: f64) {
        self.sounds.push(SoundEffect {
            id: sound_id.to_string(),
            volume,
        });
    }

    fn add_game_state(&mut self, key: &str, amount: f64) {
        *self.game_state.entry(key.to_string()).or_insert(0.0) += amount;
    }
}
