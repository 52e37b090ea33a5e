// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_MAX_FIXED_POINT_PASSES, DEFAULT_SCHEMA_SAMPLE_LIMIT};
use crate::config::validate_config;
use crate::errors::ConfigError;
use crate::model::{Dataset, NodeKind, Schema};
use crate::pipeline::TransformConfig;
use crate::query::QuerySpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level definition of a dashboard graph.
///
/// Edges are not listed separately: a node's `depends_on` entries each become
/// an edge from the dependency into the node.
///
/// # Example
/// ```yaml
/// engine:
///   cycle_policy: reject
///   change_detection: row_count
/// nodes:
///   - id: orders
///     kind: data_source
///     source_type: memory
///     rows:
///       - { region: E, sales: 10 }
///   - id: orders_table
///     kind: table
///     depends_on: [orders]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineOptions,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// Knobs for the recompute engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Rows scanned per table merge when unioning field names.
    pub schema_sample_limit: usize,
    pub cycle_policy: CyclePolicy,
    /// Only consulted under [`CyclePolicy::FixedPoint`].
    pub max_fixed_point_passes: usize,
    pub change_detection: ChangeDetection,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            schema_sample_limit: DEFAULT_SCHEMA_SAMPLE_LIMIT,
            cycle_policy: CyclePolicy::default(),
            max_fixed_point_passes: DEFAULT_MAX_FIXED_POINT_PASSES,
            change_detection: ChangeDetection::default(),
        }
    }
}

impl EngineOptions {
    pub fn allows_cycles(&self) -> bool {
        self.cycle_policy == CyclePolicy::FixedPoint
    }
}

/// What happens when an edge would close a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Refuse the edge.
    #[default]
    Reject,
    /// Accept it and repeat recompute passes until nothing changes or the
    /// pass cap is hit.
    FixedPoint,
}

/// How a table decides whether a fresh merge replaces its stored rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDetection {
    /// Replace only when the merged row count differs. Same-length edits go
    /// unnoticed.
    #[default]
    RowCount,
    /// Replace whenever the merged rows differ.
    Content,
}

/// One node of the graph.
///
/// `source_type`, `rows`, `path`, `latency_ms` and `query` only apply to
/// data sources; `transform` only to transforms; `schema` to data sources and
/// tables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeConfig {
    pub id: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub rows: Dataset,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub latency_ms: Option<u64>,
    #[serde(default)]
    pub query: QuerySpec,
    #[serde(default)]
    pub transform: Option<TransformConfig>,
    #[serde(default)]
    pub schema: Option<Schema>,
}

impl NodeConfig {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Load a config from a YAML (`.yaml`/`.yml`) or TOML (`.toml`) file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let cfg = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };
    Ok(cfg)
}

/// Load a config and validate its graph: unique ids, resolvable
/// dependencies, and no cycles unless the cycle policy allows them.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    validate_config(&cfg).map_err(ConfigError::Validation)?;
    Ok(cfg)
}
