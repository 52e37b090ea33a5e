use std::sync::{Arc, Mutex};

use crate::backends::stub::FailingConnector;
use crate::backends::{spawn_connection, DeliveryInbox, InMemoryConnector};
use crate::config::{ChangeDetection, CyclePolicy, EngineOptions};
use crate::errors::GraphError;
use crate::graph::{Delivery, DeliveryOutcome, Graph, GraphEvent, GraphSnapshot, GraphStore};
use crate::model::{row, ConnectionState, Dataset, NodeKind, NodeSpec, NodeUpdate, Row, Scalar};
use crate::pipeline::TransformConfig;
use crate::query::QuerySpec;

/// End-to-end tests driving the graph store, recompute engine and connectors together
#[cfg(test)]
mod tests {
    use super::*;

    fn sale(region: &str, sales: i64, status: &str) -> Row {
        row([
            ("region", Scalar::from(region)),
            ("sales", Scalar::from(sales)),
            ("status", Scalar::from(status)),
        ])
    }

    fn sales() -> Dataset {
        vec![
            sale("E", 10, "active"),
            sale("W", 7, "inactive"),
            sale("E", 5, "Active"),
        ]
    }

    fn column_names(store: &GraphStore, id: &str) -> Vec<String> {
        store
            .node(id)
            .unwrap()
            .schema()
            .unwrap()
            .names()
            .map(String::from)
            .collect()
    }

    fn tagged(tag: &str, count: usize) -> Dataset {
        (0..count)
            .map(|i| row([("tag", Scalar::from(tag)), ("i", Scalar::from(i as i64))]))
            .collect()
    }

    fn tags(store: &GraphStore, id: &str) -> Vec<String> {
        store
            .get_effective_data(id)
            .iter()
            .map(|r| r["tag"].to_string())
            .collect()
    }

    fn source(store: &mut GraphStore, id: &str, rows: Dataset) {
        store
            .add_node(NodeSpec::data_source("memory").with_id(id).with_data(rows))
            .unwrap();
    }

    fn table(store: &mut GraphStore, id: &str) {
        store.add_node(NodeSpec::new(NodeKind::Table).with_id(id)).unwrap();
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut store = GraphStore::new(EngineOptions::default());
        source(&mut store, "a", tagged("a", 3));
        table(&mut store, "t");
        store.add_edge("a", "t").unwrap();

        let version = store.node("t").unwrap().version;
        let report = store.recompute();
        assert!(report.is_noop());
        assert_eq!(store.node("t").unwrap().version, version);
    }

    #[test]
    fn test_merge_order_independent_of_edge_creation_order() {
        let build = |edges: &[(&str, &str)]| {
            let mut store = GraphStore::new(EngineOptions::default());
            source(&mut store, "b", tagged("b", 1));
            source(&mut store, "a", tagged("a", 2));
            source(&mut store, "c", tagged("c", 1));
            table(&mut store, "t");
            for (s, t) in edges {
                store.add_edge(s, t).unwrap();
            }
            tags(&store, "t")
        };

        let forward = build(&[("a", "t"), ("b", "t"), ("c", "t")]);
        let backward = build(&[("c", "t"), ("b", "t"), ("a", "t")]);
        assert_eq!(forward, vec!["a", "a", "b", "c"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_schema_is_monotonic() {
        let mut store = GraphStore::new(EngineOptions::default());
        source(&mut store, "a", vec![row([("x", Scalar::from(1))])]);
        table(&mut store, "t");
        store.add_edge("a", "t").unwrap();

        let before = column_names(&store, "t");
        let grown = vec![row([("y", Scalar::from(1))]), row([("y", Scalar::from(2))])];
        store
            .update_node_data("a", NodeUpdate::default().data(grown))
            .unwrap();
        let after = column_names(&store, "t");

        assert_eq!(before, vec!["x"]);
        assert_eq!(after, vec!["x", "y"]);
    }

    #[test]
    fn test_delete_rewires_incomers_to_outgoers() {
        let mut store = GraphStore::new(EngineOptions::default());
        source(&mut store, "a", tagged("a", 2));
        table(&mut store, "t");
        table(&mut store, "b");
        store.add_edge("a", "t").unwrap();
        store.add_edge("t", "b").unwrap();
        assert_eq!(store.get_effective_data("b").len(), 2);

        store
            .update_node_data("t", NodeUpdate::default().filtered_data(Some(tagged("t", 1))))
            .unwrap();
        assert_eq!(tags(&store, "b"), vec!["t"]);

        let report = store.delete_node("t").unwrap();

        assert_eq!(report.removed_edges.len(), 2);
        assert_eq!(report.bypass_edges.len(), 1);
        assert!(store.graph().find_edge("a", "b").is_some());
        assert!(store.node("t").is_none());
        assert_eq!(tags(&store, "b"), vec!["a", "a"]);
        assert!(store.engine().signature("t").is_none());
    }

    #[test]
    fn test_delete_transform_restores_upstream_rows() {
        let mut store = GraphStore::new(EngineOptions::default());
        let upstream = vec![row([("v", Scalar::from(1))]), row([("v", Scalar::from(2))])];
        source(&mut store, "a", upstream.clone());
        store
            .add_node(NodeSpec::transform(TransformConfig::default()).with_id("x"))
            .unwrap();
        table(&mut store, "b");
        store.add_edge("a", "x").unwrap();
        store.add_edge("x", "b").unwrap();

        let config: TransformConfig =
            serde_yaml::from_str("calculations:\n  - { name: dbl, type: sum, fields: [v, v] }\n")
                .unwrap();
        store.apply_transform("x", config).unwrap();
        assert_eq!(store.get_effective_data("b")[1]["dbl"], Scalar::from(4));

        store.delete_node("x").unwrap();

        // Same row count as the transform output, but the incomer set changed.
        assert_eq!(store.get_effective_data("b"), upstream.as_slice());
    }

    #[test]
    fn test_delete_skips_existing_bypass() {
        let mut store = GraphStore::new(EngineOptions::default());
        source(&mut store, "a", tagged("a", 1));
        table(&mut store, "t");
        table(&mut store, "b");
        store.add_edge("a", "t").unwrap();
        store.add_edge("t", "b").unwrap();
        store.add_edge("a", "b").unwrap();

        let report = store.delete_node("t").unwrap();
        assert!(report.bypass_edges.is_empty());
        assert_eq!(store.edges().len(), 1);
    }

    #[test]
    fn test_colliding_id_is_a_no_op() {
        let mut store = GraphStore::new(EngineOptions::default());
        source(&mut store, "a", tagged("a", 1));
        let before = store.snapshot();

        let result = store.add_node(NodeSpec::new(NodeKind::Table).with_id("a"));
        assert_eq!(result, Err(GraphError::DuplicateNodeId("a".to_string())));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_stale_delivery_rejected() {
        let mut store = GraphStore::new(EngineOptions::default());
        store.add_node(NodeSpec::data_source("memory").with_id("a")).unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        store.subscribe(move |event: &GraphEvent, _: &Graph| {
            sink.lock().unwrap().push(event.clone())
        });

        let first = store.connect_data_source("a", QuerySpec::default()).unwrap();
        let second = store.resync_data_source("a").unwrap();

        let newer = store.deliver_dataset(second.deliver(tagged("new", 2))).unwrap();
        let older = store.deliver_dataset(first.deliver(tagged("old", 5))).unwrap();

        assert!(matches!(newer, DeliveryOutcome::Accepted { row_count: 2, .. }));
        assert_eq!(older, DeliveryOutcome::Stale { accepted: 2 });
        assert_eq!(tags(&store, "a"), vec!["new", "new"]);
        assert!(events.lock().unwrap().contains(&GraphEvent::DeliveryRejected {
            node_id: "a".to_string(),
            sequence: 1,
            accepted: 2,
        }));
    }

    #[test]
    fn test_query_applied_on_connect() {
        let mut store = GraphStore::new(EngineOptions::default());
        store.add_node(NodeSpec::data_source("memory").with_id("a")).unwrap();
        table(&mut store, "t");
        store.add_edge("a", "t").unwrap();

        let query: QuerySpec = serde_json::from_str(
            r#"{
                "selectColumns": ["region", "sales"],
                "filters": [{"column": "sales", "operator": ">", "value": "6"}],
                "sort": {"field": "sales", "direction": "desc"},
                "limit": 5
            }"#,
        )
        .unwrap();
        let ticket = store.connect_data_source("a", query).unwrap();
        store.deliver_dataset(ticket.deliver(sales())).unwrap();

        let rows = store.get_effective_data("t");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["sales"], Scalar::from(10));
        assert!(!rows[0].contains_key("status"));

        let source = store.node("a").unwrap().as_data_source().unwrap();
        assert_eq!(source.state, ConnectionState::Connected);
        assert_eq!(source.schema.names().collect::<Vec<_>>(), vec!["region", "sales"]);
    }

    #[test]
    fn test_cycle_rejected_under_default_policy() {
        let mut store = GraphStore::new(EngineOptions::default());
        table(&mut store, "t1");
        table(&mut store, "t2");
        table(&mut store, "t3");
        store.add_edge("t1", "t2").unwrap();
        store.add_edge("t2", "t3").unwrap();

        let before = store.snapshot();
        assert!(matches!(
            store.add_edge("t3", "t1"),
            Err(GraphError::CycleRejected { .. })
        ));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_fixed_point_policy_terminates() {
        let options = EngineOptions {
            cycle_policy: CyclePolicy::FixedPoint,
            max_fixed_point_passes: 8,
            ..EngineOptions::default()
        };
        let mut store = GraphStore::new(options);
        source(&mut store, "a", tagged("a", 1));
        table(&mut store, "t1");
        table(&mut store, "t2");
        store.add_edge("a", "t1").unwrap();
        store.add_edge("t1", "t2").unwrap();
        store.add_edge("t2", "t1").unwrap();

        let report = store.recompute();
        assert!(report.passes <= 8);
        // Both tables stay readable after the cap.
        assert!(!store.get_effective_data("t1").is_empty());
        assert!(!store.get_effective_data("t2").is_empty());
    }

    #[test]
    fn test_transform_between_source_and_table() {
        let mut store = GraphStore::new(EngineOptions::default());
        source(&mut store, "orders", sales());
        store
            .add_node(NodeSpec::transform(TransformConfig::default()).with_id("by_region"))
            .unwrap();
        table(&mut store, "summary");
        store.add_edge("orders", "by_region").unwrap();
        store.add_edge("by_region", "summary").unwrap();

        // Before apply the transform passes nothing through.
        assert!(store.get_effective_data("summary").is_empty());

        let config: TransformConfig = serde_yaml::from_str(
            r#"
aggregation:
  groupBy: region
  calculations:
    - { field: sales, operation: sum, alias: total }
"#,
        )
        .unwrap();
        assert_eq!(store.apply_transform("by_region", config).unwrap(), 2);

        let summary = store.get_effective_data("summary");
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0]["region"], Scalar::from("E"));
        assert_eq!(summary[0]["total"], Scalar::from(15));
        assert_eq!(summary[1]["total"], Scalar::from(7));
    }

    #[test]
    fn test_content_detection_propagates_same_length_edits() {
        let options = EngineOptions {
            change_detection: ChangeDetection::Content,
            ..EngineOptions::default()
        };
        let mut store = GraphStore::new(options);
        source(&mut store, "a", tagged("old", 2));
        table(&mut store, "t1");
        table(&mut store, "t2");
        store.add_edge("a", "t1").unwrap();
        store.add_edge("t1", "t2").unwrap();

        store
            .update_node_data("a", NodeUpdate::default().data(tagged("new", 2)))
            .unwrap();
        assert_eq!(tags(&store, "t2"), vec!["new", "new"]);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut store = GraphStore::new(EngineOptions::default());
        source(&mut store, "a", sales());
        table(&mut store, "t");
        store.add_edge("a", "t").unwrap();

        let snapshot = store.snapshot();
        let json = snapshot.to_json().unwrap();
        let parsed = GraphSnapshot::from_json(&json).unwrap();
        let restored = GraphStore::from_snapshot(parsed, EngineOptions::default()).unwrap();

        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.get_effective_data("t").len(), 3);
    }

    #[test]
    fn test_invalid_snapshot_rejected() {
        let mut store = GraphStore::new(EngineOptions::default());
        table(&mut store, "t");
        let mut snapshot = store.snapshot();
        snapshot.nodes.push(snapshot.nodes[0].clone());

        assert!(matches!(
            GraphStore::from_snapshot(snapshot, EngineOptions::default()),
            Err(GraphError::InvalidSnapshot(_))
        ));
    }

    #[tokio::test]
    async fn test_connectors_feed_store_through_inbox() {
        let mut store = GraphStore::new(EngineOptions::default());
        store.add_node(NodeSpec::data_source("memory").with_id("good")).unwrap();
        store.add_node(NodeSpec::data_source("memory").with_id("bad")).unwrap();
        table(&mut store, "t");
        store.add_edge("good", "t").unwrap();
        store.add_edge("bad", "t").unwrap();

        let mut inbox = DeliveryInbox::new();
        let good = store.connect_data_source("good", QuerySpec::default()).unwrap();
        let bad = store.connect_data_source("bad", QuerySpec::default()).unwrap();
        spawn_connection(Arc::new(InMemoryConnector::new(sales())), good, inbox.sender());
        spawn_connection(Arc::new(FailingConnector::new("refused")), bad, inbox.sender());

        for _ in 0..2 {
            inbox.recv_into(&mut store).await;
        }

        assert_eq!(store.get_effective_data("t").len(), 3);
        let bad = store.node("bad").unwrap().as_data_source().unwrap();
        assert_eq!(bad.state, ConnectionState::Failed);
        assert_eq!(bad.error.as_deref(), Some("refused"));
    }

    #[test]
    fn test_unticketed_push_to_table() {
        let mut store = GraphStore::new(EngineOptions::default());
        table(&mut store, "t");
        let outcome = store.deliver_dataset(Delivery::rows("t", tagged("x", 2))).unwrap();
        assert!(matches!(outcome, DeliveryOutcome::Accepted { row_count: 2, .. }));
        assert!(store.node("t").unwrap().schema().unwrap().contains("tag"));
    }
}
