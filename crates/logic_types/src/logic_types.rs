//! Logic Types - Core data definitions for per-actor logic sheets
//!
//! This crate contains the pure data structures shared by the logic editor and
//! the interpreter: values, sheets, nodes, connections and port definitions.
//! It holds no execution logic.

mod types;
mod validate;
mod value;

pub use types::*;
pub use validate::*;
pub use value::*;
