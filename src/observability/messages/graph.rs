// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph mutations.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A node was added to the graph.
///
/// # Log Level
/// `info!` - Important operational event
pub struct NodeAdded<'a> {
    pub node_id: &'a str,
    pub kind: &'a str,
}

impl Display for NodeAdded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Added {} node '{}'", self.kind, self.node_id)
    }
}

impl StructuredLog for NodeAdded<'_> {
    fn log(&self) {
        tracing::info!(node_id = self.node_id, kind = self.kind, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "node_added",
            span_name = name,
            node_id = self.node_id,
            kind = self.kind
        )
    }
}

/// A node create collided with an existing id and was ignored.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
///
/// # Example
/// ```
/// use dagboard::observability::messages::graph::DuplicateNodeRejected;
///
/// let msg = DuplicateNodeRejected { node_id: "orders" };
/// assert_eq!(msg.to_string(), "Node 'orders' already exists, create ignored");
/// ```
pub struct DuplicateNodeRejected<'a> {
    pub node_id: &'a str,
}

impl Display for DuplicateNodeRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Node '{}' already exists, create ignored", self.node_id)
    }
}

impl StructuredLog for DuplicateNodeRejected<'_> {
    fn log(&self) {
        tracing::warn!(node_id = self.node_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("duplicate_node", span_name = name, node_id = self.node_id)
    }
}

/// An edge was added.
///
/// # Log Level
/// `debug!` - Routine graph edit
pub struct EdgeAdded<'a> {
    pub edge_id: &'a str,
    pub source: &'a str,
    pub target: &'a str,
}

impl Display for EdgeAdded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Added edge '{}': {} -> {}", self.edge_id, self.source, self.target)
    }
}

impl StructuredLog for EdgeAdded<'_> {
    fn log(&self) {
        tracing::debug!(
            edge_id = self.edge_id,
            source_id = self.source,
            target_id = self.target,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "edge_added",
            span_name = name,
            edge_id = self.edge_id,
            source_id = self.source,
            target_id = self.target,
        )
    }
}

/// An edge create was refused.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct EdgeRejected<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub reason: &'a dyn std::error::Error,
}

impl Display for EdgeRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rejected edge {} -> {}: {}",
            self.source, self.target, self.reason
        )
    }
}

impl StructuredLog for EdgeRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            source_id = self.source,
            target_id = self.target,
            reason = %self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "edge_rejected",
            span_name = name,
            source_id = self.source,
            target_id = self.target,
            reason = %self.reason,
        )
    }
}

/// A node was deleted and its neighbours rewired.
///
/// # Log Level
/// `info!` - Important operational event
pub struct NodeDeleted<'a> {
    pub node_id: &'a str,
    pub removed_edges: usize,
    pub bypass_edges: usize,
}

impl Display for NodeDeleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Deleted node '{}': removed {} edges, synthesized {} bypass edges",
            self.node_id, self.removed_edges, self.bypass_edges
        )
    }
}

impl StructuredLog for NodeDeleted<'_> {
    fn log(&self) {
        tracing::info!(
            node_id = self.node_id,
            removed_edges = self.removed_edges,
            bypass_edges = self.bypass_edges,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "node_deleted",
            span_name = name,
            node_id = self.node_id,
            removed_edges = self.removed_edges,
            bypass_edges = self.bypass_edges,
        )
    }
}

/// A transform config was committed to its node.
///
/// # Log Level
/// `info!` - Important operational event
pub struct TransformApplied<'a> {
    pub node_id: &'a str,
    pub input_rows: usize,
    pub output_rows: usize,
    pub stage_count: usize,
}

impl Display for TransformApplied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Applied transform '{}': {} stages, {} rows in, {} rows out",
            self.node_id, self.stage_count, self.input_rows, self.output_rows
        )
    }
}

impl StructuredLog for TransformApplied<'_> {
    fn log(&self) {
        tracing::info!(
            node_id = self.node_id,
            input_rows = self.input_rows,
            output_rows = self.output_rows,
            stage_count = self.stage_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "transform_applied",
            span_name = name,
            node_id = self.node_id,
            input_rows = self.input_rows,
            output_rows = self.output_rows,
            stage_count = self.stage_count,
        )
    }
}

pub struct SnapshotRestored {
    pub node_count: usize,
    pub edge_count: usize,
}

impl Display for SnapshotRestored {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Restored graph snapshot with {} nodes and {} edges",
            self.node_count, self.edge_count
        )
    }
}

impl StructuredLog for SnapshotRestored {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            edge_count = self.edge_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "snapshot_restored",
            span_name = name,
            node_count = self.node_count,
            edge_count = self.edge_count,
        )
    }
}
