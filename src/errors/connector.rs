// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failures reported by connectors. The message is surfaced verbatim on the
/// data source node.
#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("{0}")]
    Failed(String),

    #[error("Unsupported source type '{0}'")]
    UnsupportedSource(String),

    #[error("Failed to read source: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse source rows: {0}")]
    Parse(#[from] serde_json::Error),
}
