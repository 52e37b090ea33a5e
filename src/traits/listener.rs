// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::graph::{Graph, GraphEvent};

/// Receives [`GraphEvent`]s from a [`GraphStore`](crate::graph::GraphStore).
///
/// Listeners get read access to the graph as it stands after the mutation
/// that produced the event. Any `Fn(&GraphEvent, &Graph)` closure is a
/// listener.
///
/// ```
/// use dagboard::config::EngineOptions;
/// use dagboard::graph::{GraphEvent, GraphStore};
/// use dagboard::model::{NodeKind, NodeSpec};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
///
/// let mut store = GraphStore::new(EngineOptions::default());
/// store.subscribe(move |event: &GraphEvent, _: &dagboard::graph::Graph| {
///     sink.lock().unwrap().push(event.clone());
/// });
/// store.add_node(NodeSpec::new(NodeKind::Table).with_id("t")).unwrap();
///
/// assert_eq!(seen.lock().unwrap()[0], GraphEvent::NodeAdded { node_id: "t".into() });
/// ```
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, event: &GraphEvent, graph: &Graph);
}

impl<F> ChangeListener for F
where
    F: Fn(&GraphEvent, &Graph) + Send + Sync,
{
    fn on_change(&self, event: &GraphEvent, graph: &Graph) {
        self(event, graph)
    }
}
