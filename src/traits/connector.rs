// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::ConnectorError;
use crate::model::{Dataset, Schema};

/// Rows fetched by a connector, with the schema it detected (if any).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchedDataset {
    pub rows: Dataset,
    pub schema: Option<Schema>,
}

/// An external data provider feeding a data source node.
///
/// Connectors run outside the graph store, typically as tokio tasks. They
/// fetch the full dataset; the node's query is applied by the store when the
/// delivery lands.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn fetch(&self) -> Result<FetchedDataset, ConnectorError>;

    /// Source type recorded on the node, e.g. `memory` or `json_file`.
    fn source_type(&self) -> &'static str;
}
