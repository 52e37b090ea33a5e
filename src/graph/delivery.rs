// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::model::{Dataset, NodeId, Schema};

/// Handed out by `connect_data_source`/`resync_data_source`. The connector
/// answering the request stamps its delivery with this sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryTicket {
    pub node_id: NodeId,
    pub sequence: u64,
}

impl DeliveryTicket {
    pub fn deliver(&self, rows: Dataset) -> Delivery {
        Delivery::rows(self.node_id.clone(), rows).with_sequence(self.sequence)
    }

    pub fn fail(&self, error: impl Into<String>) -> Delivery {
        Delivery::failure(self.node_id.clone(), error).with_sequence(self.sequence)
    }
}

/// A dataset (or failure) pushed into the store from outside.
///
/// A delivery without a sequence number is an unsolicited push: it is
/// stamped with the next sequence on arrival and never runs the node's query.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub node_id: NodeId,
    pub sequence: Option<u64>,
    pub rows: Dataset,
    pub schema: Option<Schema>,
    pub error: Option<String>,
}

impl Delivery {
    pub fn rows(node_id: impl Into<NodeId>, rows: Dataset) -> Self {
        Self {
            node_id: node_id.into(),
            sequence: None,
            rows,
            schema: None,
            error: None,
        }
    }

    pub fn failure(node_id: impl Into<NodeId>, error: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            sequence: None,
            rows: Vec::new(),
            schema: None,
            error: Some(error.into()),
        }
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = Some(sequence);
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// What `deliver_dataset` did with a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Accepted { row_count: usize, query_applied: bool },
    /// The delivery carried an error; the node is now `Failed`.
    Failed,
    /// Sequence at or below the last accepted one.
    Stale { accepted: u64 },
}
