//! Error types for loading and traversing graphs.
//!
//! Missing data is never an error here; absent values fall back at each call
//! site. These cover only sheet rejection and traversal aborts.

use logic_types::SheetError;

/// Errors that can occur when loading a sheet for an actor
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Duplicate node id '{node_id}' in sheet for actor '{actor_id}'")]
    DuplicateNodeId { actor_id: String, node_id: String },

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

/// Errors that abort an exec traversal
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalkError {
    #[error("Exec depth limit {limit} exceeded at node '{node_id}' (actor '{actor_id}')")]
    DepthExceeded {
        actor_id: String,
        node_id: String,
        limit: usize,
    },
}
