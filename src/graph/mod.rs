// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph state and the store that orchestrates it.
//!
//! [`Graph`] is the plain container of nodes and edges. [`GraphStore`] owns a
//! graph, runs the recompute engine after every mutation and notifies
//! listeners.

mod delivery;
mod events;
mod snapshot;
mod store;
mod validation;

pub use delivery::{Delivery, DeliveryOutcome, DeliveryTicket};
pub use events::GraphEvent;
pub use snapshot::GraphSnapshot;
pub use store::{DeleteReport, GraphStore};
pub use validation::{find_cycle, validate_structure};

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use crate::model::{Edge, EdgeId, Node, NodeId};

/// Nodes keyed by id plus edges in creation order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn find_edge(&self, source: &str, target: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }

    /// Distinct nodes with an edge into `id`, sorted by id.
    pub fn incomers(&self, id: &str) -> Vec<NodeId> {
        let set: BTreeSet<&NodeId> = self
            .edges
            .iter()
            .filter(|e| e.target == id)
            .map(|e| &e.source)
            .collect();
        set.into_iter().cloned().collect()
    }

    /// Distinct nodes with an edge out of `id`, sorted by id.
    pub fn outgoers(&self, id: &str) -> Vec<NodeId> {
        let set: BTreeSet<&NodeId> = self
            .edges
            .iter()
            .filter(|e| e.source == id)
            .map(|e| &e.target)
            .collect();
        set.into_iter().cloned().collect()
    }

    /// Shortest path of node ids from `from` to `to` following edge direction.
    pub fn path(&self, from: &str, to: &str) -> Option<Vec<NodeId>> {
        let mut previous: BTreeMap<&str, &str> = BTreeMap::new();
        let mut visited: HashSet<&str> = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![current.to_string()];
                let mut cursor = current;
                while let Some(&prev) = previous.get(cursor) {
                    path.push(prev.to_string());
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }
            for edge in self.edges.iter().filter(|e| e.source == current) {
                if visited.insert(edge.target.as_str()) {
                    previous.insert(edge.target.as_str(), current);
                    queue.push_back(edge.target.as_str());
                }
            }
        }
        None
    }

    pub(crate) fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub(crate) fn remove_node(&mut self, id: &str) -> Option<Node> {
        self.nodes.remove(id)
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub(crate) fn remove_edge(&mut self, id: &str) -> Option<Edge> {
        let position = self.edges.iter().position(|e| e.id == id)?;
        Some(self.edges.remove(position))
    }

    /// Remove every edge into or out of `id`.
    pub(crate) fn remove_edges_touching(&mut self, id: &str) -> Vec<Edge> {
        let (removed, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|e| e.source == id || e.target == id);
        self.edges = kept;
        removed
    }

    pub(crate) fn contains_edge_id(&self, id: &EdgeId) -> bool {
        self.edges.iter().any(|e| &e.id == id)
    }
}
