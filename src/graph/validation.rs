// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural validation for graph definitions and snapshots.
//!
//! The checks run in a fixed order because cycle detection needs a graph
//! whose references resolve:
//!
//! 1. **Uniqueness**: every node id appears once
//! 2. **References**: every link endpoint names an existing node
//! 3. **Acyclicity** (optional): DFS with a recursion stack, reporting the
//!    actual cycle path
//!
//! Errors from the first two stages are accumulated so callers see every
//! problem at once; cycle detection is skipped when any of them fail.

use std::collections::{BTreeMap, HashSet};

use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    CyclicDependencyDetected, ValidationCompleted, ValidationFailed, ValidationStarted,
};
use crate::observability::messages::StructuredLog;

/// Validate node ids and `(source, target)` links.
///
/// # Example
/// ```
/// use dagboard::graph::validate_structure;
/// use dagboard::errors::ValidationError;
///
/// let errors = validate_structure(["a", "b"], [("a", "b"), ("b", "a")], true).unwrap_err();
/// assert!(matches!(errors[0], ValidationError::CyclicDependency { .. }));
///
/// assert!(validate_structure(["a", "b"], [("a", "b"), ("b", "a")], false).is_ok());
/// ```
pub fn validate_structure<'a>(
    node_ids: impl IntoIterator<Item = &'a str>,
    links: impl IntoIterator<Item = (&'a str, &'a str)>,
    check_cycles: bool,
) -> Result<(), Vec<ValidationError>> {
    let node_ids: Vec<&str> = node_ids.into_iter().collect();
    let links: Vec<(&str, &str)> = links.into_iter().collect();
    ValidationStarted {
        node_count: node_ids.len(),
        edge_count: links.len(),
    }
    .log();

    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for id in &node_ids {
        if !seen.insert(*id) {
            errors.push(ValidationError::DuplicateNodeId {
                node_id: id.to_string(),
            });
        }
    }

    for (source, target) in &links {
        for (holder, endpoint) in [(*target, *source), (*source, *target)] {
            if !seen.contains(endpoint) {
                errors.push(ValidationError::UnresolvedNode {
                    node_id: holder.to_string(),
                    missing_dependency: endpoint.to_string(),
                });
            }
        }
    }

    if errors.is_empty() && check_cycles {
        if let Some(cycle) = find_cycle(&node_ids, &links) {
            let names: Vec<&str> = cycle.iter().map(String::as_str).collect();
            CyclicDependencyDetected { cycle: &names }.log();
            errors.push(ValidationError::CyclicDependency { cycle });
        }
    }

    if errors.is_empty() {
        ValidationCompleted {
            node_count: node_ids.len(),
        }
        .log();
        Ok(())
    } else {
        ValidationFailed {
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}

/// Find one cycle, if any, using the three-colour DFS.
///
/// Nodes are visited in sorted order so the reported cycle is deterministic.
/// The returned path repeats its first node at the end.
pub fn find_cycle(node_ids: &[&str], links: &[(&str, &str)]) -> Option<Vec<String>> {
    let mut graph: BTreeMap<&str, Vec<&str>> =
        node_ids.iter().map(|id| (*id, Vec::new())).collect();
    for &(source, target) in links {
        graph.entry(source).or_default().push(target);
    }
    for neighbours in graph.values_mut() {
        neighbours.sort_unstable();
    }

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for &node in graph.keys() {
        if !visited.contains(node) {
            if let Some(cycle) =
                dfs_cycle_detection(node, &graph, &mut visited, &mut rec_stack, &mut path)
            {
                return Some(cycle);
            }
        }
    }
    None
}

fn dfs_cycle_detection<'a>(
    node: &'a str,
    graph: &BTreeMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(neighbours) = graph.get(node) {
        for &neighbour in neighbours {
            if !visited.contains(neighbour) {
                if let Some(cycle) =
                    dfs_cycle_detection(neighbour, graph, visited, rec_stack, path)
                {
                    return Some(cycle);
                }
            } else if rec_stack.contains(neighbour) {
                let start = path.iter().position(|x| *x == neighbour).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
                cycle.push(neighbour.to_string());
                return Some(cycle);
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    None
}
