//! Logic Host - Headless runner for logic-sheet projects
//!
//! This crate provides:
//! - Project loading (`project.toml` plus one logic sheet per actor)
//! - A minimal playfield simulation that drives the interpreter entry points
//!   once per tick

// Re-export core crates
pub use logic_runtime;

// Project management
pub mod project;

// Playfield simulation
pub mod simulation;
