// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph vertices and edges.
//!
//! A [`Node`] carries the state every kind shares (label, raw and overridden
//! datasets, a monotonic data version, delivery bookkeeping) plus a
//! kind-specific [`NodePayload`].

use serde::{Deserialize, Serialize};

use crate::model::{Dataset, Row, Schema};
use crate::pipeline::TransformConfig;
use crate::query::QuerySpec;

pub type NodeId = String;
pub type EdgeId = String;

/// The three vertex kinds of a dashboard dataflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    DataSource,
    Table,
    Transform,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::DataSource => "data_source",
            NodeKind::Table => "table",
            NodeKind::Transform => "transform",
        }
    }
}

/// Connection lifecycle of a data source.
///
/// `Disconnected -> Connecting -> {Connected, Failed}`; `Connected` and
/// `Failed` re-enter `Connecting` on resync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceNode {
    pub source_type: String,
    pub state: ConnectionState,
    pub query: QuerySpec,
    pub schema: Schema,
    /// Last connector error, verbatim.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNode {
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformNode {
    pub config: TransformConfig,
    pub output_row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodePayload {
    DataSource(DataSourceNode),
    Table(TableNode),
    Transform(TransformNode),
}

impl NodePayload {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::DataSource(_) => NodeKind::DataSource,
            NodePayload::Table(_) => NodeKind::Table,
            NodePayload::Transform(_) => NodeKind::Transform,
        }
    }

    /// Empty payload for a kind.
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::DataSource => NodePayload::DataSource(DataSourceNode::default()),
            NodeKind::Table => NodePayload::Table(TableNode::default()),
            NodeKind::Transform => NodePayload::Transform(TransformNode::default()),
        }
    }
}

/// Per-node delivery sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryCursor {
    /// Highest sequence number handed out.
    pub issued: u64,
    /// Highest sequence number applied to the node.
    pub accepted: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    pub payload: NodePayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Dataset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_data: Option<Dataset>,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub delivery: DeliveryCursor,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.payload.kind()
    }

    /// Filtered/overridden rows when present, else raw rows, else nothing.
    pub fn effective_data(&self) -> &[Row] {
        self.filtered_data
            .as_deref()
            .or(self.data.as_deref())
            .unwrap_or(&[])
    }

    /// Bump the data version after any change to `data` or `filtered_data`.
    pub fn touch(&mut self) {
        self.version += 1;
    }

    /// Schema carried by the node, if its kind has one.
    pub fn schema(&self) -> Option<&Schema> {
        match &self.payload {
            NodePayload::DataSource(source) => Some(&source.schema),
            NodePayload::Table(table) => Some(&table.schema),
            NodePayload::Transform(_) => None,
        }
    }

    pub fn as_data_source(&self) -> Option<&DataSourceNode> {
        match &self.payload {
            NodePayload::DataSource(source) => Some(source),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableNode> {
        match &self.payload {
            NodePayload::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_transform(&self) -> Option<&TransformNode> {
        match &self.payload {
            NodePayload::Transform(transform) => Some(transform),
            _ => None,
        }
    }
}

/// Directed data flow from `source` into `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

/// Everything needed to create a node.
///
/// ```
/// use dagboard::model::{NodeKind, NodeSpec};
///
/// let spec = NodeSpec::new(NodeKind::Table).with_id("sales_table").with_label("Sales");
/// assert_eq!(spec.id.as_deref(), Some("sales_table"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    /// Explicit id; a fresh one is generated when absent.
    pub id: Option<NodeId>,
    pub label: String,
    pub payload: NodePayload,
    pub data: Option<Dataset>,
}

impl NodeSpec {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: None,
            label: String::new(),
            payload: NodePayload::empty(kind),
            data: None,
        }
    }

    pub fn with_payload(payload: NodePayload) -> Self {
        Self {
            id: None,
            label: String::new(),
            payload,
            data: None,
        }
    }

    pub fn data_source(source_type: impl Into<String>) -> Self {
        Self::with_payload(NodePayload::DataSource(DataSourceNode {
            source_type: source_type.into(),
            ..Default::default()
        }))
    }

    pub fn transform(config: TransformConfig) -> Self {
        Self::with_payload(NodePayload::Transform(TransformNode {
            config,
            output_row_count: 0,
        }))
    }

    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_data(mut self, rows: Dataset) -> Self {
        self.data = Some(rows);
        self
    }
}

/// Shallow partial update for [`GraphStore::update_node_data`](crate::graph::GraphStore::update_node_data).
///
/// Only fields that are `Some` are written. Kind-specific fields are ignored
/// for nodes of other kinds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeUpdate {
    pub label: Option<String>,
    pub data: Option<Dataset>,
    /// `Some(None)` clears the override.
    pub filtered_data: Option<Option<Dataset>>,
    pub schema: Option<Schema>,
    pub transform_config: Option<TransformConfig>,
    pub query: Option<QuerySpec>,
    pub source_type: Option<String>,
}

impl NodeUpdate {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn data(mut self, rows: Dataset) -> Self {
        self.data = Some(rows);
        self
    }

    pub fn filtered_data(mut self, rows: Option<Dataset>) -> Self {
        self.filtered_data = Some(rows);
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn transform_config(mut self, config: TransformConfig) -> Self {
        self.transform_config = Some(config);
        self
    }

    pub fn query(mut self, query: QuerySpec) -> Self {
        self.query = Some(query);
        self
    }

    pub fn source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self
    }

    pub fn touches_data(&self) -> bool {
        self.data.is_some() || self.filtered_data.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{row, Scalar};

    fn node_with(data: Option<Dataset>, filtered: Option<Dataset>) -> Node {
        Node {
            id: "n".to_string(),
            label: String::new(),
            payload: NodePayload::empty(NodeKind::Table),
            data,
            filtered_data: filtered,
            version: 0,
            delivery: DeliveryCursor::default(),
        }
    }

    #[test]
    fn test_effective_data_prefers_filtered() {
        let raw = vec![row([("a", Scalar::from(1))]), row([("a", Scalar::from(2))])];
        let filtered = vec![row([("a", Scalar::from(2))])];
        assert_eq!(node_with(Some(raw.clone()), Some(filtered)).effective_data().len(), 1);
        assert_eq!(node_with(Some(raw), None).effective_data().len(), 2);
        assert!(node_with(None, None).effective_data().is_empty());
    }

    #[test]
    fn test_payload_tagged_by_kind() {
        let json = serde_json::to_value(NodePayload::empty(NodeKind::Transform)).unwrap();
        assert_eq!(json["kind"], "transform");
        let back: NodePayload = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), NodeKind::Transform);
    }
}
