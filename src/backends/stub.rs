// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::ConnectorError;
use crate::traits::{Connector, FetchedDataset};

/// A connector that always fails, for testing failure handling
pub struct FailingConnector {
    pub message: String,
}

impl FailingConnector {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Connector for FailingConnector {
    async fn fetch(&self) -> Result<FetchedDataset, ConnectorError> {
        Err(ConnectorError::Failed(self.message.clone()))
    }

    fn source_type(&self) -> &'static str {
        "failing"
    }
}
