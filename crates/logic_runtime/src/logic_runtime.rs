//! Logic Runtime - Interpreter for per-actor logic sheets
//!
//! This crate contains the node catalog and the execution engine. Control flow
//! is pushed along exec wires by the [`GraphWalker`]; values are pulled back
//! along data wires by the [`PortResolver`]. Both share the per-node behavior
//! functions in [`nodes`] and the per-tick [`ValueCache`].
//!
//! Execution is single-threaded and synchronous: an entry point on
//! [`LogicInterpreter`] runs every nested pull and walk to completion before
//! returning.

pub use logic_types;

mod cache;
mod catalog;
mod config;
mod context;
mod error;
mod index;
mod interpreter;
pub mod nodes;
mod resolver;
mod walker;

pub use cache::*;
pub use catalog::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use index::*;
pub use interpreter::*;
pub use resolver::*;
pub use walker::*;
