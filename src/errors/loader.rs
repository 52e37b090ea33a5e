// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::config::summarize;
use crate::errors::{ConnectorError, GraphError, ValidationError};

/// Errors surfaced while loading configuration files or snapshots.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format '{0}'")]
    UnsupportedFormat(String),

    #[error("Configuration validation failed:\n{}", summarize(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}
