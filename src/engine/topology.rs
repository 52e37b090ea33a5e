// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, VecDeque};

use crate::graph::Graph;
use crate::model::{NodeId, NodeKind};

/// Visiting order for table recompute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableOrder {
    /// Tables reachable by Kahn's algorithm, upstream first.
    pub ordered: Vec<NodeId>,
    /// Tables stuck on a cycle, in id order.
    pub cyclic: Vec<NodeId>,
}

impl TableOrder {
    pub fn has_cycle(&self) -> bool {
        !self.cyclic.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.ordered.iter().chain(self.cyclic.iter())
    }

    pub fn len(&self) -> usize {
        self.ordered.len() + self.cyclic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Topologically sort the table subgraph with Kahn's algorithm.
///
/// Only table-to-table edges count: data sources and transforms never
/// recompute on their own, so they impose no ordering. Ties are broken by id
/// so the order is stable between runs.
pub fn table_order(graph: &Graph) -> TableOrder {
    let mut in_degree: BTreeMap<&str, usize> = graph
        .nodes()
        .filter(|n| n.kind() == NodeKind::Table)
        .map(|n| (n.id.as_str(), 0))
        .collect();
    let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for edge in graph.edges() {
        let (from, to) = (edge.source.as_str(), edge.target.as_str());
        if !in_degree.contains_key(from) || !in_degree.contains_key(to) {
            continue;
        }
        *in_degree.entry(to).or_insert(0) += 1;
        adjacency.entry(from).or_default().push(to);
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();
    let mut ordered = Vec::with_capacity(in_degree.len());

    while let Some(node) = queue.pop_front() {
        ordered.push(node.to_string());
        let mut neighbours = adjacency.get(node).cloned().unwrap_or_default();
        neighbours.sort_unstable();
        for neighbour in neighbours {
            if let Some(degree) = in_degree.get_mut(neighbour) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(neighbour);
                }
            }
        }
    }

    let cyclic = in_degree
        .into_iter()
        .filter(|(_, degree)| *degree > 0)
        .map(|(id, _)| id.to_string())
        .collect();

    TableOrder { ordered, cyclic }
}
