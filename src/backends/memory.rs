// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use async_trait::async_trait;

use crate::config::consts::{DEFAULT_SCHEMA_SAMPLE_LIMIT, MEMORY_SOURCE_TYPE};
use crate::errors::ConnectorError;
use crate::model::Dataset;
use crate::schema::detect_schema;
use crate::traits::{Connector, FetchedDataset};

/// Serves a fixed set of rows, optionally after a delay.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnector {
    rows: Dataset,
    latency: Option<Duration>,
}

impl InMemoryConnector {
    pub fn new(rows: Dataset) -> Self {
        Self { rows, latency: None }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl Connector for InMemoryConnector {
    async fn fetch(&self) -> Result<FetchedDataset, ConnectorError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(FetchedDataset {
            schema: Some(detect_schema(&self.rows, DEFAULT_SCHEMA_SAMPLE_LIMIT)),
            rows: self.rows.clone(),
        })
    }

    fn source_type(&self) -> &'static str {
        MEMORY_SOURCE_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{row, ColumnType, Scalar};

    #[tokio::test]
    async fn test_fetch_detects_column_types() {
        let connector = InMemoryConnector::new(vec![
            row([("amount", Scalar::from(10)), ("day", Scalar::from("2024-01-01"))]),
            row([("amount", Scalar::from("12.5")), ("day", Scalar::from("2024-01-02"))]),
        ])
        .with_latency(Duration::from_millis(1));

        let fetched = connector.fetch().await.unwrap();
        let schema = fetched.schema.unwrap();
        assert_eq!(fetched.rows.len(), 2);
        assert_eq!(schema.get("amount").unwrap().column_type, ColumnType::Number);
        assert_eq!(schema.get("day").unwrap().column_type, ColumnType::Date);
    }
}
