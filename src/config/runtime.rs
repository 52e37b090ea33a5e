// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::ConnectorFactory;
use crate::config::{validate_config, Config};
use crate::errors::ConfigError;
use crate::graph::GraphStore;
use crate::model::{NodeId, NodeKind, NodePayload, NodeSpec};
use crate::pipeline::TransformConfig;
use crate::query::QuerySpec;
use crate::traits::Connector;

/// A data source waiting to be connected once the runtime is up.
pub struct PendingConnection {
    pub node_id: NodeId,
    pub query: QuerySpec,
    pub connector: Arc<dyn Connector>,
}

/// Graph builder - turns a validated configuration into a populated
/// [`GraphStore`] plus the connectors its data sources need.
///
/// # Examples
///
/// ```
/// use dagboard::config::{Config, GraphBuilder};
///
/// let config: Config = serde_yaml::from_str(r#"
/// nodes:
///   - id: orders
///     kind: data_source
///     rows:
///       - { region: E, sales: 10 }
///   - id: orders_table
///     kind: table
///     depends_on: [orders]
/// "#).unwrap();
///
/// let (store, connections) = GraphBuilder::from_config(&config).unwrap();
/// assert_eq!(store.graph().node_count(), 2);
/// assert_eq!(connections.len(), 1);
/// ```
pub struct GraphBuilder;

impl GraphBuilder {
    /// Build the graph a config describes.
    ///
    /// Nodes are created in config order, then each `depends_on` entry becomes
    /// an edge. Data sources with a configured backend are returned as
    /// [`PendingConnection`]s; nothing is fetched here.
    pub fn from_config(cfg: &Config) -> Result<(GraphStore, Vec<PendingConnection>), ConfigError> {
        validate_config(cfg).map_err(ConfigError::Validation)?;

        let mut store = GraphStore::new(cfg.engine);
        let mut connections = Vec::new();

        for node in &cfg.nodes {
            let mut payload = NodePayload::empty(node.kind);
            match &mut payload {
                NodePayload::DataSource(source) => {
                    source.query = node.query.clone();
                    if let Some(schema) = &node.schema {
                        source.schema = schema.clone();
                    }
                    if let Some(source_type) = &node.source_type {
                        source.source_type = source_type.clone();
                    }
                    if let Some(connector) = ConnectorFactory::create_connector(node)? {
                        source.source_type = connector.source_type().to_string();
                        connections.push(PendingConnection {
                            node_id: node.id.clone(),
                            query: node.query.clone(),
                            connector,
                        });
                    }
                }
                NodePayload::Table(table) => {
                    if let Some(schema) = &node.schema {
                        table.schema = schema.clone();
                    }
                }
                NodePayload::Transform(transform) => {
                    transform.config = node.transform.clone().unwrap_or_default();
                }
            }

            store.add_node(
                NodeSpec::with_payload(payload)
                    .with_id(node.id.clone())
                    .with_label(node.label()),
            )?;
        }

        for node in &cfg.nodes {
            for dependency in &node.depends_on {
                store.add_edge(dependency, &node.id)?;
            }
        }

        Ok((store, connections))
    }

    /// Transform nodes with a configured pipeline, in config order.
    pub fn configured_transforms(cfg: &Config) -> Vec<(NodeId, TransformConfig)> {
        cfg.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Transform)
            .filter_map(|n| n.transform.clone().map(|t| (n.id.clone(), t)))
            .collect()
    }
}
