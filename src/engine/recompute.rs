// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Incremental merge of incomer data into table nodes.
//!
//! Every table with at least one incoming edge holds the concatenation of its
//! incomers' effective data. A table is only rebuilt when its *signature*
//! (the sorted incomer ids paired with each incomer's data version) differs
//! from the one recorded at its last rebuild; that comparison is the only
//! thing that stops recompute from looping.
//!
//! Tables are visited in topological order so a chain settles in one pass.
//! Cycles only exist under [`CyclePolicy::FixedPoint`]; there passes repeat
//! until one changes nothing or the configured cap is reached.

use std::collections::HashMap;

use crate::config::{ChangeDetection, CyclePolicy, EngineOptions};
use crate::engine::topology::table_order;
use crate::graph::Graph;
use crate::model::{Dataset, NodeId, NodePayload};
use crate::observability::messages::recompute::{
    FixedPointCapReached, RecomputeCompleted, TableRecomputed,
};
use crate::observability::messages::StructuredLog;
use crate::schema::SchemaInferencer;

/// Version vector over a table's incomers, sorted by incomer id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature(pub Vec<(NodeId, u64)>);

impl Signature {
    pub fn of(graph: &Graph, incomers: &[NodeId]) -> Self {
        Signature(
            incomers
                .iter()
                .map(|id| (id.clone(), graph.node(id).map_or(0, |n| n.version)))
                .collect(),
        )
    }

    /// Whether both signatures cover the same incomer ids, ignoring versions.
    pub fn same_incomers(&self, other: &Signature) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().zip(&other.0).all(|((a, _), (b, _))| a == b)
    }
}

/// Result of visiting one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    /// Signature matched; nothing was touched.
    Unchanged,
    Recomputed {
        /// Whether the stored rows were replaced (and the version bumped).
        replaced: bool,
        row_count: usize,
        added_columns: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecomputeReport {
    /// Final outcome per visited table, in visiting order.
    pub outcomes: Vec<(NodeId, TableOutcome)>,
    pub passes: usize,
    /// False only when the fixed-point cap stopped a cyclic graph.
    pub settled: bool,
}

impl RecomputeReport {
    pub fn outcome(&self, id: &str) -> Option<&TableOutcome> {
        self.outcomes.iter().find(|(n, _)| n == id).map(|(_, o)| o)
    }

    /// Tables that were rebuilt at least once during the run.
    pub fn recomputed(&self) -> impl Iterator<Item = (&NodeId, &TableOutcome)> {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, TableOutcome::Recomputed { .. }))
            .map(|(id, o)| (id, o))
    }

    pub fn is_noop(&self) -> bool {
        self.recomputed().next().is_none()
    }
}

/// Concatenate the effective data of `id`'s incomers in incomer id order.
///
/// Missing incomers contribute nothing.
pub fn merge_incomers(graph: &Graph, id: &str) -> Dataset {
    graph
        .incomers(id)
        .iter()
        .filter_map(|incomer| graph.node(incomer))
        .flat_map(|node| node.effective_data().iter().cloned())
        .collect()
}

pub struct RecomputeEngine {
    signatures: HashMap<NodeId, Signature>,
    inferencer: SchemaInferencer,
    change_detection: ChangeDetection,
    cycle_policy: CyclePolicy,
    max_passes: usize,
}

impl RecomputeEngine {
    pub fn new(options: &EngineOptions) -> Self {
        Self {
            signatures: HashMap::new(),
            inferencer: SchemaInferencer::new(options.schema_sample_limit),
            change_detection: options.change_detection,
            cycle_policy: options.cycle_policy,
            max_passes: options.max_fixed_point_passes.max(1),
        }
    }

    pub fn signature(&self, id: &str) -> Option<&Signature> {
        self.signatures.get(id)
    }

    pub fn forget(&mut self, id: &str) {
        self.signatures.remove(id);
    }

    /// Bring every table up to date with its incomers.
    pub fn recompute(&mut self, graph: &mut Graph) -> RecomputeReport {
        self.signatures.retain(|id, _| {
            graph
                .node(id)
                .is_some_and(|n| matches!(n.payload, NodePayload::Table(_)))
        });

        let order = table_order(graph);
        let repeat = order.has_cycle() && self.cycle_policy == CyclePolicy::FixedPoint;
        let pass_limit = if repeat { self.max_passes } else { 1 };

        let mut outcomes: Vec<(NodeId, TableOutcome)> = Vec::new();
        let mut passes = 0;
        let mut settled = true;

        loop {
            passes += 1;
            let mut changed = 0;
            for id in order.iter() {
                let Some(outcome) = self.recompute_table(graph, id) else {
                    continue;
                };
                if matches!(outcome, TableOutcome::Recomputed { .. }) {
                    changed += 1;
                }
                record(&mut outcomes, id, outcome);
            }

            if changed == 0 || !repeat {
                break;
            }
            if passes >= pass_limit {
                settled = false;
                FixedPointCapReached {
                    passes,
                    unsettled_tables: changed,
                }
                .log();
                break;
            }
        }

        let report = RecomputeReport {
            outcomes,
            passes,
            settled,
        };
        RecomputeCompleted {
            tables_visited: report.outcomes.len(),
            tables_changed: report.recomputed().count(),
            passes,
        }
        .log();
        report
    }

    /// Visit one table. `None` when it has no incomers or is not a table.
    fn recompute_table(&mut self, graph: &mut Graph, id: &str) -> Option<TableOutcome> {
        let incomers = graph.incomers(id);
        if incomers.is_empty() {
            return None;
        }

        let signature = Signature::of(graph, &incomers);
        let previous = self.signatures.get(id);
        if previous == Some(&signature) {
            return Some(TableOutcome::Unchanged);
        }
        let same_incomers = previous.is_some_and(|p| p.same_incomers(&signature));

        let merged = merge_incomers(graph, id);
        let node = graph.node_mut(id)?;
        // Row counts only stand in for content while the incomer set is fixed.
        let replace = match self.change_detection {
            ChangeDetection::RowCount if same_incomers => {
                merged.len() != node.data.as_ref().map_or(0, Vec::len)
            }
            _ => node.data.as_deref().unwrap_or(&[]) != merged.as_slice(),
        };

        let NodePayload::Table(table) = &mut node.payload else {
            return None;
        };
        let added_columns = self.inferencer.extend(&mut table.schema, &merged);

        let row_count = merged.len();
        if replace {
            node.data = Some(merged);
            node.touch();
        }
        // The signature is taken before the table's own version bumps, so a
        // self loop under fixed_point still changes on the next pass.
        self.signatures.insert(id.to_string(), signature);

        TableRecomputed {
            node_id: id,
            incomer_count: incomers.len(),
            row_count,
            replaced: replace,
            added_columns: added_columns.len(),
        }
        .log();

        Some(TableOutcome::Recomputed {
            replaced: replace,
            row_count,
            added_columns,
        })
    }
}

/// Keep one outcome per table, folding repeated passes together.
fn record(outcomes: &mut Vec<(NodeId, TableOutcome)>, id: &str, outcome: TableOutcome) {
    let Some(index) = outcomes.iter().position(|(n, _)| n == id) else {
        outcomes.push((id.to_string(), outcome));
        return;
    };
    let existing = &mut outcomes[index].1;
    match existing {
        TableOutcome::Unchanged => *existing = outcome,
        TableOutcome::Recomputed {
            replaced,
            row_count,
            added_columns,
        } => {
            if let TableOutcome::Recomputed {
                replaced: now_replaced,
                row_count: now_rows,
                added_columns: mut now_added,
            } = outcome
            {
                *replaced |= now_replaced;
                *row_count = now_rows;
                added_columns.append(&mut now_added);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{row, DeliveryCursor, Edge, Node, NodeKind, Scalar};

    fn node(id: &str, kind: NodeKind, data: Option<Dataset>) -> Node {
        Node {
            id: id.to_string(),
            label: String::new(),
            payload: NodePayload::empty(kind),
            data,
            filtered_data: None,
            version: 1,
            delivery: DeliveryCursor::default(),
        }
    }

    fn rows(values: &[i64]) -> Dataset {
        values.iter().map(|v| row([("v", Scalar::from(*v))])).collect()
    }

    fn connect(graph: &mut Graph, source: &str, target: &str) {
        graph.insert_edge(Edge {
            id: format!("{}->{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    fn values(graph: &Graph, id: &str) -> Vec<f64> {
        graph
            .node(id)
            .unwrap()
            .effective_data()
            .iter()
            .map(|r| r["v"].to_number_or_zero())
            .collect()
    }

    #[test]
    fn test_merges_in_incomer_id_order() {
        let mut graph = Graph::new();
        graph.insert_node(node("b_src", NodeKind::DataSource, Some(rows(&[2]))));
        graph.insert_node(node("a_src", NodeKind::DataSource, Some(rows(&[1]))));
        graph.insert_node(node("t", NodeKind::Table, None));
        connect(&mut graph, "b_src", "t");
        connect(&mut graph, "a_src", "t");

        let mut engine = RecomputeEngine::new(&EngineOptions::default());
        engine.recompute(&mut graph);
        assert_eq!(values(&graph, "t"), vec![1.0, 2.0]);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut graph = Graph::new();
        graph.insert_node(node("a", NodeKind::DataSource, Some(rows(&[1, 2]))));
        graph.insert_node(node("t", NodeKind::Table, None));
        connect(&mut graph, "a", "t");

        let mut engine = RecomputeEngine::new(&EngineOptions::default());
        let first = engine.recompute(&mut graph);
        let version = graph.node("t").unwrap().version;
        assert!(!first.is_noop());

        let second = engine.recompute(&mut graph);
        assert!(second.is_noop());
        assert_eq!(second.outcome("t"), Some(&TableOutcome::Unchanged));
        assert_eq!(graph.node("t").unwrap().version, version);
    }

    #[test]
    fn test_row_count_detection_misses_same_length_edit() {
        let mut graph = Graph::new();
        graph.insert_node(node("a", NodeKind::DataSource, Some(rows(&[1]))));
        graph.insert_node(node("t", NodeKind::Table, None));
        connect(&mut graph, "a", "t");

        let mut engine = RecomputeEngine::new(&EngineOptions::default());
        engine.recompute(&mut graph);

        let source = graph.node_mut("a").unwrap();
        source.data = Some(rows(&[9]));
        source.touch();
        let report = engine.recompute(&mut graph);

        assert!(matches!(
            report.outcome("t"),
            Some(TableOutcome::Recomputed { replaced: false, .. })
        ));
        assert_eq!(values(&graph, "t"), vec![1.0]);
    }

    #[test]
    fn test_changed_incomer_set_replaces_same_length_rows() {
        let mut graph = Graph::new();
        graph.insert_node(node("a", NodeKind::DataSource, Some(rows(&[1, 2]))));
        graph.insert_node(node("b", NodeKind::DataSource, Some(rows(&[7, 8]))));
        graph.insert_node(node("t", NodeKind::Table, None));
        connect(&mut graph, "a", "t");

        let mut engine = RecomputeEngine::new(&EngineOptions::default());
        engine.recompute(&mut graph);
        assert_eq!(values(&graph, "t"), vec![1.0, 2.0]);

        graph.remove_edge("a->t");
        connect(&mut graph, "b", "t");
        let report = engine.recompute(&mut graph);

        assert!(matches!(
            report.outcome("t"),
            Some(TableOutcome::Recomputed { replaced: true, .. })
        ));
        assert_eq!(values(&graph, "t"), vec![7.0, 8.0]);
    }

    #[test]
    fn test_first_visit_keeps_matching_rows_untouched() {
        let mut graph = Graph::new();
        graph.insert_node(node("a", NodeKind::DataSource, Some(rows(&[1]))));
        graph.insert_node(node("t", NodeKind::Table, Some(rows(&[1]))));
        connect(&mut graph, "a", "t");

        let mut engine = RecomputeEngine::new(&EngineOptions::default());
        let report = engine.recompute(&mut graph);
        assert!(matches!(
            report.outcome("t"),
            Some(TableOutcome::Recomputed { replaced: false, .. })
        ));
        assert_eq!(graph.node("t").unwrap().version, 1);
    }

    #[test]
    fn test_content_detection_catches_same_length_edit() {
        let mut graph = Graph::new();
        graph.insert_node(node("a", NodeKind::DataSource, Some(rows(&[1]))));
        graph.insert_node(node("t", NodeKind::Table, None));
        connect(&mut graph, "a", "t");

        let options = EngineOptions {
            change_detection: ChangeDetection::Content,
            ..EngineOptions::default()
        };
        let mut engine = RecomputeEngine::new(&options);
        engine.recompute(&mut graph);

        let source = graph.node_mut("a").unwrap();
        source.data = Some(rows(&[9]));
        source.touch();
        engine.recompute(&mut graph);
        assert_eq!(values(&graph, "t"), vec![9.0]);
    }

    #[test]
    fn test_chain_settles_in_one_pass() {
        let mut graph = Graph::new();
        graph.insert_node(node("a", NodeKind::DataSource, Some(rows(&[1, 2, 3]))));
        graph.insert_node(node("t2", NodeKind::Table, None));
        graph.insert_node(node("t1", NodeKind::Table, None));
        connect(&mut graph, "t1", "t2");
        connect(&mut graph, "a", "t1");

        let mut engine = RecomputeEngine::new(&EngineOptions::default());
        let report = engine.recompute(&mut graph);
        assert_eq!(report.passes, 1);
        assert_eq!(values(&graph, "t2"), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_schema_only_grows() {
        let mut graph = Graph::new();
        let first = vec![row([("x", Scalar::from(1))])];
        graph.insert_node(node("a", NodeKind::DataSource, Some(first)));
        graph.insert_node(node("t", NodeKind::Table, None));
        connect(&mut graph, "a", "t");

        let mut engine = RecomputeEngine::new(&EngineOptions::default());
        engine.recompute(&mut graph);

        let source = graph.node_mut("a").unwrap();
        source.data = Some(vec![row([("y", Scalar::from(2))]), row([("y", Scalar::from(3))])]);
        source.touch();
        engine.recompute(&mut graph);

        let schema = graph.node("t").unwrap().schema().unwrap();
        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_fixed_point_cycle_hits_cap() {
        let mut graph = Graph::new();
        graph.insert_node(node("a", NodeKind::DataSource, Some(rows(&[1]))));
        graph.insert_node(node("t1", NodeKind::Table, None));
        graph.insert_node(node("t2", NodeKind::Table, None));
        connect(&mut graph, "a", "t1");
        connect(&mut graph, "t1", "t2");
        connect(&mut graph, "t2", "t1");

        let options = EngineOptions {
            cycle_policy: CyclePolicy::FixedPoint,
            max_fixed_point_passes: 5,
            ..EngineOptions::default()
        };
        let mut engine = RecomputeEngine::new(&options);
        let report = engine.recompute(&mut graph);
        assert_eq!(report.passes, 5);
        assert!(!report.settled);
    }

    #[test]
    fn test_fixed_point_cycle_settles_with_content_detection() {
        let mut graph = Graph::new();
        graph.insert_node(node("t1", NodeKind::Table, Some(rows(&[1]))));
        graph.insert_node(node("t2", NodeKind::Table, None));
        connect(&mut graph, "t1", "t2");
        connect(&mut graph, "t2", "t1");

        let options = EngineOptions {
            cycle_policy: CyclePolicy::FixedPoint,
            change_detection: ChangeDetection::Content,
            ..EngineOptions::default()
        };
        let mut engine = RecomputeEngine::new(&options);
        let report = engine.recompute(&mut graph);
        assert!(report.settled);
        assert!(report.passes < 16);
    }

    #[test]
    fn test_deleted_table_signature_dropped() {
        let mut graph = Graph::new();
        graph.insert_node(node("a", NodeKind::DataSource, Some(rows(&[1]))));
        graph.insert_node(node("t", NodeKind::Table, None));
        connect(&mut graph, "a", "t");

        let mut engine = RecomputeEngine::new(&EngineOptions::default());
        engine.recompute(&mut graph);
        assert!(engine.signature("t").is_some());

        graph.remove_edges_touching("t");
        graph.remove_node("t");
        engine.recompute(&mut graph);
        assert!(engine.signature("t").is_none());
    }
}
