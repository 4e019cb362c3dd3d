//! Map/pathfinding error type.

use thiserror::Error;

use agv_core::NodeId;

/// Errors produced by `agv-map`.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),
}

pub type MapResult<T> = Result<T, MapError>;
