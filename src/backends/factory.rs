// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Duration;

use crate::backends::{InMemoryConnector, JsonFileConnector};
use crate::config::consts::{JSON_FILE_SOURCE_TYPE, MEMORY_SOURCE_TYPE};
use crate::config::NodeConfig;
use crate::errors::ConnectorError;
use crate::traits::Connector;

/// Builds connectors for data source nodes from configuration.
pub struct ConnectorFactory;

impl ConnectorFactory {
    /// Create the connector a data source node asks for.
    ///
    /// The `source_type` field selects the backend:
    /// - `memory` (the default when inline `rows` are given) -> [`InMemoryConnector`]
    /// - `json_file` -> [`JsonFileConnector`], requires `path`
    ///
    /// A node with neither a source type nor rows has nothing to connect to
    /// and yields `None`.
    pub fn create_connector(
        config: &NodeConfig,
    ) -> Result<Option<Arc<dyn Connector>>, ConnectorError> {
        let source_type = match config.source_type.as_deref() {
            Some(source_type) => source_type,
            None if !config.rows.is_empty() => MEMORY_SOURCE_TYPE,
            None => return Ok(None),
        };

        match source_type {
            MEMORY_SOURCE_TYPE => {
                let mut connector = InMemoryConnector::new(config.rows.clone());
                if let Some(ms) = config.latency_ms {
                    connector = connector.with_latency(Duration::from_millis(ms));
                }
                Ok(Some(Arc::new(connector)))
            }
            JSON_FILE_SOURCE_TYPE => {
                let path = config.path.as_ref().ok_or_else(|| {
                    ConnectorError::Failed(format!(
                        "Data source '{}' missing 'path' field",
                        config.id
                    ))
                })?;
                Ok(Some(Arc::new(JsonFileConnector::new(path))))
            }
            other => Err(ConnectorError::UnsupportedSource(other.to_string())),
        }
    }

    /// List all available source types
    pub fn list_available_source_types() -> Vec<&'static str> {
        vec![MEMORY_SOURCE_TYPE, JSON_FILE_SOURCE_TYPE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{row, NodeKind, Scalar};

    fn source_config(yaml: &str) -> NodeConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_inline_rows_default_to_memory() {
        let config = NodeConfig {
            rows: vec![row([("a", Scalar::from(1))])],
            ..source_config("{ id: s, kind: data_source }")
        };
        assert_eq!(config.kind, NodeKind::DataSource);
        let connector = ConnectorFactory::create_connector(&config).unwrap().unwrap();
        assert_eq!(connector.source_type(), "memory");
    }

    #[test]
    fn test_no_source_yields_none() {
        let config = source_config("{ id: s, kind: data_source }");
        assert!(ConnectorFactory::create_connector(&config).unwrap().is_none());
    }

    #[test]
    fn test_json_file_requires_path() {
        let config = source_config("{ id: s, kind: data_source, source_type: json_file }");
        let err = ConnectorFactory::create_connector(&config).err().unwrap();
        assert!(err.to_string().contains("missing 'path'"));

        let config =
            source_config("{ id: s, kind: data_source, source_type: json_file, path: data.json }");
        let connector = ConnectorFactory::create_connector(&config).unwrap().unwrap();
        assert_eq!(connector.source_type(), "json_file");
    }

    #[test]
    fn test_unknown_source_type() {
        let config = source_config("{ id: s, kind: data_source, source_type: postgres }");
        assert!(matches!(
            ConnectorFactory::create_connector(&config),
            Err(ConnectorError::UnsupportedSource(name)) if name == "postgres"
        ));
    }
}
