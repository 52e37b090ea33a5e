// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::model::{ConnectionState, EdgeId, NodeId};

/// Change notifications published by [`GraphStore`](super::GraphStore).
///
/// Events are dispatched after the mutation that caused them has finished,
/// so listeners always read a consistent graph. Serialized with an `event`
/// tag so listeners can forward them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GraphEvent {
    NodeAdded {
        node_id: NodeId,
    },
    NodeRemoved {
        node_id: NodeId,
    },
    NodeUpdated {
        node_id: NodeId,
    },
    EdgeAdded {
        edge_id: EdgeId,
        source: NodeId,
        target: NodeId,
    },
    EdgeRemoved {
        edge_id: EdgeId,
        source: NodeId,
        target: NodeId,
    },
    TableRecomputed {
        node_id: NodeId,
        row_count: usize,
        replaced: bool,
        added_columns: Vec<String>,
    },
    ConnectionChanged {
        node_id: NodeId,
        state: ConnectionState,
    },
    DeliveryRejected {
        node_id: NodeId,
        sequence: u64,
        accepted: u64,
    },
}

impl GraphEvent {
    /// The node an event is about; edge events report their target.
    pub fn node_id(&self) -> &str {
        match self {
            GraphEvent::NodeAdded { node_id }
            | GraphEvent::NodeRemoved { node_id }
            | GraphEvent::NodeUpdated { node_id }
            | GraphEvent::TableRecomputed { node_id, .. }
            | GraphEvent::ConnectionChanged { node_id, .. }
            | GraphEvent::DeliveryRejected { node_id, .. } => node_id,
            GraphEvent::EdgeAdded { target, .. } | GraphEvent::EdgeRemoved { target, .. } => target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_tag() {
        let event = GraphEvent::ConnectionChanged {
            node_id: "orders".into(),
            state: ConnectionState::Connected,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({
                "event": "connection_changed",
                "node_id": "orders",
                "state": "connected",
            })
        );
    }

    #[test]
    fn test_edge_events_report_target() {
        let event = GraphEvent::EdgeAdded {
            edge_id: "e".into(),
            source: "a".into(),
            target: "b".into(),
        };
        assert_eq!(event.node_id(), "b");
    }
}
