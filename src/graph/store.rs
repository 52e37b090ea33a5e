// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use uuid::Uuid;

use crate::config::consts::IMPORT_SOURCE_TYPE;
use crate::config::{CyclePolicy, EngineOptions};
use crate::engine::{merge_incomers, RecomputeEngine, RecomputeReport, TableOutcome};
use crate::errors::GraphError;
use crate::graph::{Delivery, DeliveryOutcome, DeliveryTicket, Graph, GraphEvent, GraphSnapshot};
use crate::model::{
    ConnectionState, Dataset, Edge, EdgeId, Node, NodeId, NodeKind, NodePayload, NodeSpec,
    NodeUpdate, Row, Schema,
};
use crate::observability::messages::connector::{
    ConnectorFailed, DataSourceConnecting, DeliveryAccepted, DeliveryDropped,
    StaleDeliveryRejected,
};
use crate::observability::messages::graph::{
    DuplicateNodeRejected, EdgeAdded, EdgeRejected, NodeAdded, NodeDeleted, SnapshotRestored,
    TransformApplied,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::{TransformConfig, TransformPipeline};
use crate::query::{QueryApplier, QuerySpec};
use crate::schema::SchemaInferencer;
use crate::traits::ChangeListener;

/// Edges touched by [`GraphStore::delete_node`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteReport {
    pub removed_edges: Vec<Edge>,
    /// Direct incomer to outgoer edges created to bridge the gap.
    pub bypass_edges: Vec<Edge>,
}

/// Owner of a dashboard graph.
///
/// Every mutation is synchronous. Mutations that can change a table's inputs
/// finish by running the recompute engine, then publish the events they
/// produced to subscribed listeners. Failed mutations leave the graph
/// untouched.
pub struct GraphStore {
    graph: Graph,
    engine: RecomputeEngine,
    inferencer: SchemaInferencer,
    options: EngineOptions,
    listeners: Vec<Box<dyn ChangeListener>>,
    pending: Vec<GraphEvent>,
}

impl GraphStore {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            graph: Graph::new(),
            engine: RecomputeEngine::new(&options),
            inferencer: SchemaInferencer::new(options.schema_sample_limit),
            options,
            listeners: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.graph.node(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    pub fn engine(&self) -> &RecomputeEngine {
        &self.engine
    }

    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Create a node. A spec without an id gets a fresh one; a spec whose id
    /// is taken is refused and the graph is left as it was.
    pub fn add_node(&mut self, spec: NodeSpec) -> Result<NodeId, GraphError> {
        let NodeSpec {
            id,
            label,
            payload,
            data,
        } = spec;
        let kind = payload.kind();
        let id = id.unwrap_or_else(|| generate_node_id(kind));

        if self.graph.contains_node(&id) {
            DuplicateNodeRejected { node_id: &id }.log();
            return Err(GraphError::DuplicateNodeId(id));
        }

        let version = u64::from(data.is_some());
        self.graph.insert_node(Node {
            id: id.clone(),
            label,
            payload,
            data,
            filtered_data: None,
            version,
            delivery: Default::default(),
        });

        NodeAdded {
            node_id: &id,
            kind: kind.as_str(),
        }
        .log();
        self.pending.push(GraphEvent::NodeAdded {
            node_id: id.clone(),
        });
        self.commit();
        Ok(id)
    }

    /// Connect `source` to `target`. Adding a pair that is already connected
    /// returns the existing edge id.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<EdgeId, GraphError> {
        if let Some(existing) = self.graph.find_edge(source, target) {
            return Ok(existing.id.clone());
        }
        self.connect(generate_edge_id(), source, target)
    }

    /// Like [`add_edge`](Self::add_edge) with a caller-chosen edge id.
    pub fn add_edge_with_id(
        &mut self,
        id: impl Into<EdgeId>,
        source: &str,
        target: &str,
    ) -> Result<EdgeId, GraphError> {
        let id = id.into();
        if self.graph.contains_edge_id(&id) {
            return Err(GraphError::DuplicateEdgeId(id));
        }
        if let Some(existing) = self.graph.find_edge(source, target) {
            return Ok(existing.id.clone());
        }
        self.connect(id, source, target)
    }

    fn connect(&mut self, id: EdgeId, source: &str, target: &str) -> Result<EdgeId, GraphError> {
        if let Err(err) = self.check_edge(source, target) {
            EdgeRejected {
                source,
                target,
                reason: &err,
            }
            .log();
            return Err(err);
        }

        self.graph.insert_edge(Edge {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
        });
        EdgeAdded {
            edge_id: &id,
            source,
            target,
        }
        .log();
        self.pending.push(GraphEvent::EdgeAdded {
            edge_id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
        });
        self.commit();
        Ok(id)
    }

    fn check_edge(&self, source: &str, target: &str) -> Result<(), GraphError> {
        for endpoint in [source, target] {
            if !self.graph.contains_node(endpoint) {
                return Err(GraphError::NodeNotFound(endpoint.to_string()));
            }
        }
        if self.options.cycle_policy == CyclePolicy::Reject {
            if let Some(path) = self.graph.path(target, source) {
                let mut cycle = vec![source.to_string()];
                cycle.extend(path);
                return Err(GraphError::CycleRejected {
                    source_id: source.to_string(),
                    target_id: target.to_string(),
                    cycle,
                });
            }
        }
        Ok(())
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<Edge, GraphError> {
        let edge = self
            .graph
            .remove_edge(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.to_string()))?;
        self.pending.push(GraphEvent::EdgeRemoved {
            edge_id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
        });
        self.commit();
        Ok(edge)
    }

    /// Remove a node and its edges, then bridge every (incomer, outgoer)
    /// pair with a direct edge so data keeps flowing past the gap.
    pub fn delete_node(&mut self, id: &str) -> Result<DeleteReport, GraphError> {
        if !self.graph.contains_node(id) {
            return Err(GraphError::NodeNotFound(id.to_string()));
        }

        let incomers: Vec<NodeId> = self
            .graph
            .incomers(id)
            .into_iter()
            .filter(|n| n != id)
            .collect();
        let outgoers: Vec<NodeId> = self
            .graph
            .outgoers(id)
            .into_iter()
            .filter(|n| n != id)
            .collect();

        let removed_edges = self.graph.remove_edges_touching(id);
        self.graph.remove_node(id);
        self.engine.forget(id);

        let mut bypass_edges = Vec::new();
        for incomer in &incomers {
            for outgoer in &outgoers {
                if incomer == outgoer || self.graph.find_edge(incomer, outgoer).is_some() {
                    continue;
                }
                let edge = Edge {
                    id: generate_edge_id(),
                    source: incomer.clone(),
                    target: outgoer.clone(),
                };
                self.graph.insert_edge(edge.clone());
                bypass_edges.push(edge);
            }
        }

        NodeDeleted {
            node_id: id,
            removed_edges: removed_edges.len(),
            bypass_edges: bypass_edges.len(),
        }
        .log();

        for edge in &removed_edges {
            self.pending.push(GraphEvent::EdgeRemoved {
                edge_id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
            });
        }
        self.pending.push(GraphEvent::NodeRemoved {
            node_id: id.to_string(),
        });
        for edge in &bypass_edges {
            self.pending.push(GraphEvent::EdgeAdded {
                edge_id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
            });
        }
        self.commit();

        Ok(DeleteReport {
            removed_edges,
            bypass_edges,
        })
    }

    /// Shallow merge of the fields set in `update`. Fields that don't apply
    /// to the node's kind are ignored.
    pub fn update_node_data(&mut self, id: &str, update: NodeUpdate) -> Result<(), GraphError> {
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        let touches_data = update.touches_data();

        if let Some(label) = update.label {
            node.label = label;
        }
        if let Some(rows) = update.data {
            node.data = Some(rows);
        }
        if let Some(filtered) = update.filtered_data {
            node.filtered_data = filtered;
        }
        match &mut node.payload {
            NodePayload::DataSource(source) => {
                if let Some(query) = update.query {
                    source.query = query;
                }
                if let Some(source_type) = update.source_type {
                    source.source_type = source_type;
                }
                if let Some(schema) = update.schema {
                    source.schema = schema;
                }
            }
            NodePayload::Table(table) => {
                if let Some(schema) = update.schema {
                    table.schema = schema;
                }
            }
            NodePayload::Transform(transform) => {
                if let Some(config) = update.transform_config {
                    transform.config = config;
                }
            }
        }
        if touches_data {
            node.touch();
        }

        self.pending.push(GraphEvent::NodeUpdated {
            node_id: id.to_string(),
        });
        self.commit();
        Ok(())
    }

    /// Create a connected data source holding `rows`.
    pub fn import_dataset(
        &mut self,
        label: impl Into<String>,
        rows: Dataset,
        schema: Option<Schema>,
    ) -> Result<NodeId, GraphError> {
        let id = self.add_node(NodeSpec::data_source(IMPORT_SOURCE_TYPE).with_label(label))?;
        let mut delivery = Delivery::rows(id.clone(), rows);
        delivery.schema = schema;
        self.deliver_dataset(delivery)?;
        Ok(id)
    }

    /// Effective rows of a node; empty for unknown nodes.
    pub fn get_effective_data(&self, id: &str) -> &[Row] {
        self.graph.node(id).map(Node::effective_data).unwrap_or(&[])
    }

    /// Store `query` and start a connection. The returned ticket's sequence
    /// identifies the delivery that completes it.
    pub fn connect_data_source(
        &mut self,
        id: &str,
        query: QuerySpec,
    ) -> Result<DeliveryTicket, GraphError> {
        self.begin_connection(id, Some(query))
    }

    /// Start a new connection with the stored query.
    pub fn resync_data_source(&mut self, id: &str) -> Result<DeliveryTicket, GraphError> {
        self.begin_connection(id, None)
    }

    fn begin_connection(
        &mut self,
        id: &str,
        query: Option<QuerySpec>,
    ) -> Result<DeliveryTicket, GraphError> {
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        let actual = node.kind();
        let NodePayload::DataSource(source) = &mut node.payload else {
            return Err(GraphError::WrongNodeKind {
                node_id: id.to_string(),
                expected: NodeKind::DataSource,
                actual,
            });
        };

        if let Some(query) = query {
            source.query = query;
        }
        source.state = ConnectionState::Connecting;
        source.error = None;
        node.delivery.issued += 1;
        let sequence = node.delivery.issued;

        DataSourceConnecting {
            node_id: id,
            sequence,
        }
        .log();
        self.pending.push(GraphEvent::ConnectionChanged {
            node_id: id.to_string(),
            state: ConnectionState::Connecting,
        });
        self.flush();

        Ok(DeliveryTicket {
            node_id: id.to_string(),
            sequence,
        })
    }

    /// Accept rows (or a failure) pushed from outside.
    ///
    /// Deliveries whose sequence is not newer than the last accepted one are
    /// rejected as stale. A failure flips a data source to `Failed` and keeps
    /// its data. Rows answering a ticket run the data source's query first.
    pub fn deliver_dataset(&mut self, delivery: Delivery) -> Result<DeliveryOutcome, GraphError> {
        let Delivery {
            node_id,
            sequence,
            rows,
            schema,
            error,
        } = delivery;

        let Some(node) = self.graph.node_mut(&node_id) else {
            DeliveryDropped { node_id: &node_id }.log();
            return Err(GraphError::NodeNotFound(node_id));
        };

        let ticketed = sequence.is_some();
        let cursor = &mut node.delivery;
        let sequence = sequence.unwrap_or(cursor.issued.max(cursor.accepted) + 1);
        if sequence <= cursor.accepted {
            let accepted = cursor.accepted;
            StaleDeliveryRejected {
                node_id: &node_id,
                sequence,
                accepted,
            }
            .log();
            self.pending.push(GraphEvent::DeliveryRejected {
                node_id,
                sequence,
                accepted,
            });
            self.flush();
            return Ok(DeliveryOutcome::Stale { accepted });
        }
        cursor.accepted = sequence;
        cursor.issued = cursor.issued.max(sequence);

        if let Some(error) = error {
            ConnectorFailed {
                node_id: &node_id,
                error: &error,
            }
            .log();
            if let NodePayload::DataSource(source) = &mut node.payload {
                source.state = ConnectionState::Failed;
                source.error = Some(error);
                self.pending.push(GraphEvent::ConnectionChanged {
                    node_id,
                    state: ConnectionState::Failed,
                });
            }
            self.flush();
            return Ok(DeliveryOutcome::Failed);
        }

        let mut rows = rows;
        let mut query_applied = false;
        let mut connected = false;
        match &mut node.payload {
            NodePayload::DataSource(source) => {
                if ticketed && !source.query.is_empty() {
                    rows = QueryApplier::new(&source.query).apply(rows);
                    query_applied = true;
                }
                let mut reported = schema.unwrap_or_else(|| self.inferencer.infer(&rows));
                if query_applied && !source.query.select_columns.is_empty() {
                    reported
                        .0
                        .retain(|c| source.query.select_columns.contains(&c.name));
                }
                source.schema = reported;
                source.state = ConnectionState::Connected;
                source.error = None;
                connected = true;
            }
            NodePayload::Table(table) => match schema {
                Some(reported) => {
                    for column in reported.0 {
                        table.schema.push_if_absent(column);
                    }
                }
                None => {
                    self.inferencer.extend(&mut table.schema, &rows);
                }
            },
            NodePayload::Transform(_) => {}
        }

        let row_count = rows.len();
        node.data = Some(rows);
        node.touch();

        DeliveryAccepted {
            node_id: &node_id,
            sequence,
            row_count,
            query_applied,
        }
        .log();
        self.pending.push(GraphEvent::NodeUpdated {
            node_id: node_id.clone(),
        });
        if connected {
            self.pending.push(GraphEvent::ConnectionChanged {
                node_id,
                state: ConnectionState::Connected,
            });
        }
        self.commit();

        Ok(DeliveryOutcome::Accepted {
            row_count,
            query_applied,
        })
    }

    /// Merged incomer data feeding a transform node.
    pub fn transform_input(&self, id: &str) -> Result<Dataset, GraphError> {
        self.expect_kind(id, NodeKind::Transform)?;
        Ok(merge_incomers(&self.graph, id))
    }

    /// Run `config` over the transform's input without changing anything.
    pub fn preview_transform(
        &self,
        id: &str,
        config: &TransformConfig,
    ) -> Result<Dataset, GraphError> {
        let input = self.transform_input(id)?;
        Ok(TransformPipeline::from_config(config).run(&input))
    }

    /// Run `config` over the transform's input and commit the result as the
    /// node's filtered data. Returns the output row count.
    pub fn apply_transform(
        &mut self,
        id: &str,
        config: TransformConfig,
    ) -> Result<usize, GraphError> {
        let input = self.transform_input(id)?;
        let pipeline = TransformPipeline::from_config(&config);
        let output = pipeline.run(&input);
        let output_rows = output.len();

        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        if let NodePayload::Transform(transform) = &mut node.payload {
            transform.config = config;
            transform.output_row_count = output_rows;
        }
        node.filtered_data = Some(output);
        node.touch();

        TransformApplied {
            node_id: id,
            input_rows: input.len(),
            output_rows,
            stage_count: pipeline.stage_names().len(),
        }
        .log();
        self.pending.push(GraphEvent::NodeUpdated {
            node_id: id.to_string(),
        });
        self.commit();
        Ok(output_rows)
    }

    /// Re-run a transform with the config it already stores.
    pub fn refresh_transform(&mut self, id: &str) -> Result<usize, GraphError> {
        let config = self
            .graph
            .node(id)
            .and_then(Node::as_transform)
            .map(|t| t.config.clone());
        match config {
            Some(config) => self.apply_transform(id, config),
            None => {
                self.expect_kind(id, NodeKind::Transform)?;
                Ok(0)
            }
        }
    }

    fn expect_kind(&self, id: &str, expected: NodeKind) -> Result<&Node, GraphError> {
        let node = self
            .graph
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        if node.kind() != expected {
            return Err(GraphError::WrongNodeKind {
                node_id: id.to_string(),
                expected,
                actual: node.kind(),
            });
        }
        Ok(node)
    }

    /// Run the recompute engine and publish what changed.
    pub fn recompute(&mut self) -> RecomputeReport {
        let report = self.engine.recompute(&mut self.graph);
        for (node_id, outcome) in &report.outcomes {
            if let TableOutcome::Recomputed {
                replaced,
                row_count,
                added_columns,
            } = outcome
            {
                self.pending.push(GraphEvent::TableRecomputed {
                    node_id: node_id.clone(),
                    row_count: *row_count,
                    replaced: *replaced,
                    added_columns: added_columns.clone(),
                });
            }
        }
        self.flush();
        report
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.graph.nodes().cloned().collect(),
            edges: self.graph.edges().to_vec(),
        }
    }

    /// Rebuild a store from a snapshot after validating its structure.
    pub fn from_snapshot(
        snapshot: GraphSnapshot,
        options: EngineOptions,
    ) -> Result<Self, GraphError> {
        snapshot
            .validate(options.allows_cycles())
            .map_err(GraphError::InvalidSnapshot)?;

        let mut store = Self::new(options);
        SnapshotRestored {
            node_count: snapshot.nodes.len(),
            edge_count: snapshot.edges.len(),
        }
        .log();
        for node in snapshot.nodes {
            store.graph.insert_node(node);
        }
        for edge in snapshot.edges {
            store.graph.insert_edge(edge);
        }
        store.recompute();
        Ok(store)
    }

    fn commit(&mut self) {
        self.recompute();
    }

    fn flush(&mut self) {
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            for listener in &self.listeners {
                listener.on_change(event, &self.graph);
            }
        }
    }
}

fn generate_node_id(kind: NodeKind) -> NodeId {
    format!("{}-{}", kind.as_str(), Uuid::new_v4())
}

fn generate_edge_id() -> EdgeId {
    format!("edge-{}", Uuid::new_v4())
}
