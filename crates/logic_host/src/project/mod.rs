//! Project Management
//!
//! Handles loading project manifests and actor logic sheets from disk.

mod config;
mod loader;

pub use config::*;
pub use loader::*;
