// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Structural problems found while validating a graph definition or snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Following edges from a node leads back to it
    CyclicDependency {
        /// The cycle path, first node repeated at the end
        cycle: Vec<String>,
    },
    /// An edge or `depends_on` entry names a node that doesn't exist
    UnresolvedNode {
        /// The node (or edge) holding the reference
        node_id: String,
        /// The id that couldn't be resolved
        missing_dependency: String,
    },
    /// Two nodes share an id
    DuplicateNodeId {
        node_id: String,
    },
    /// Two edges share an id
    DuplicateEdgeId {
        edge_id: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CyclicDependency { cycle } => {
                write!(f, "Cyclic dependency detected: {}", cycle.join(" -> "))
            }
            ValidationError::UnresolvedNode {
                node_id,
                missing_dependency,
            } => {
                write!(
                    f,
                    "'{}' depends on '{}' which does not exist",
                    node_id, missing_dependency
                )
            }
            ValidationError::DuplicateNodeId { node_id } => {
                write!(f, "Duplicate node ID: '{}'", node_id)
            }
            ValidationError::DuplicateEdgeId { edge_id } => {
                write!(f, "Duplicate edge ID: '{}'", edge_id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Join a list of validation errors into one line per error.
pub fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
