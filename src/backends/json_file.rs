// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use async_trait::async_trait;

use crate::config::consts::{DEFAULT_SCHEMA_SAMPLE_LIMIT, JSON_FILE_SOURCE_TYPE};
use crate::errors::ConnectorError;
use crate::model::Dataset;
use crate::schema::detect_schema;
use crate::traits::{Connector, FetchedDataset};

/// Reads a JSON array of row objects from disk on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileConnector {
    path: PathBuf,
}

impl JsonFileConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl Connector for JsonFileConnector {
    async fn fetch(&self) -> Result<FetchedDataset, ConnectorError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let rows: Dataset = serde_json::from_str(&content)?;
        Ok(FetchedDataset {
            schema: Some(detect_schema(&rows, DEFAULT_SCHEMA_SAMPLE_LIMIT)),
            rows,
        })
    }

    fn source_type(&self) -> &'static str {
        JSON_FILE_SOURCE_TYPE
    }
}
