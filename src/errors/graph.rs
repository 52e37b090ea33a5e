// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::config::summarize;
use crate::errors::ValidationError;
use crate::model::{EdgeId, NodeId, NodeKind};

/// Errors returned by [`GraphStore`](crate::graph::GraphStore) mutations.
///
/// Every failing operation leaves the graph exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node '{0}' already exists")]
    DuplicateNodeId(NodeId),

    #[error("Edge '{0}' already exists")]
    DuplicateEdgeId(EdgeId),

    #[error("Node '{0}' not found")]
    NodeNotFound(NodeId),

    #[error("Edge '{0}' not found")]
    EdgeNotFound(EdgeId),

    #[error("Edge '{source_id}' -> '{target_id}' would create a cycle: {}", .cycle.join(" -> "))]
    CycleRejected {
        source_id: NodeId,
        target_id: NodeId,
        cycle: Vec<String>,
    },

    #[error("Node '{node_id}' is a {} node, expected {}", .actual.as_str(), .expected.as_str())]
    WrongNodeKind {
        node_id: NodeId,
        expected: NodeKind,
        actual: NodeKind,
    },

    #[error("Invalid graph snapshot:\n{}", summarize(.0))]
    InvalidSnapshot(Vec<ValidationError>),
}
