// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::graph::validate_structure;
use crate::model::{Edge, Node};

/// Serializable copy of every node and edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Check ids and edge endpoints, and reject cycles unless `allow_cycles`.
    pub fn validate(&self, allow_cycles: bool) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut edge_ids = HashSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(edge.id.as_str()) {
                errors.push(ValidationError::DuplicateEdgeId {
                    edge_id: edge.id.clone(),
                });
            }
        }

        let structural = validate_structure(
            self.nodes.iter().map(|n| n.id.as_str()),
            self.edges.iter().map(|e| (e.source.as_str(), e.target.as_str())),
            !allow_cycles,
        );
        if let Err(mut found) = structural {
            errors.append(&mut found);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
