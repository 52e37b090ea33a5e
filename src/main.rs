// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use dagboard::backends::{spawn_connection, DeliveryInbox};
use dagboard::config::{load_and_validate_config, GraphBuilder};
use dagboard::graph::GraphStore;
use dagboard::model::{ConnectionState, Node, NodePayload};
use tracing_subscriber::EnvFilter;

/// How long to wait for every connector to answer
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// Rows printed per node
const PREVIEW_ROWS: usize = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <config.yaml|config.toml> [--snapshot <out.json>]", args[0]);
        eprintln!("Example: {} configs/sales-dashboard.yaml", args[0]);
        std::process::exit(1);
    }

    let config_file = &args[1];
    let snapshot_path = match args.get(2).map(String::as_str) {
        Some("--snapshot") => match args.get(3) {
            Some(path) => Some(path.clone()),
            None => bail!("--snapshot needs an output path"),
        },
        Some(other) => bail!("Unknown argument '{}'", other),
        None => None,
    };

    println!("📊 Dagboard");
    println!("═══════════════════════════════════");
    println!("Config: {}", config_file);
    println!();

    let start = Instant::now();
    let config = load_and_validate_config(config_file)
        .with_context(|| format!("Failed to load {}", config_file))?;
    let (mut store, connections) = GraphBuilder::from_config(&config)?;

    let mut inbox = DeliveryInbox::new();
    let pending = connections.len();
    for connection in connections {
        let ticket = store.connect_data_source(&connection.node_id, connection.query)?;
        spawn_connection(connection.connector, ticket, inbox.sender());
    }

    let received = inbox.recv_within(&mut store, pending, CONNECT_TIMEOUT).await;
    if received < pending {
        eprintln!("⚠️  Timed out waiting for data sources");
    }

    for (node_id, transform) in GraphBuilder::configured_transforms(&config) {
        store.apply_transform(&node_id, transform)?;
    }

    println!("Connected {} of {} data sources in {:?}", received, pending, start.elapsed());
    println!();
    print_graph(&store);

    if let Some(path) = snapshot_path {
        let json = store.snapshot().to_json()?;
        std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path))?;
        println!("\n💾 Snapshot written to {}", path);
    }

    Ok(())
}

fn print_graph(store: &GraphStore) {
    for node in store.nodes() {
        print_node(store, node);
        println!();
    }
    println!("Edges:");
    for edge in store.edges() {
        println!("  {} → {}", edge.source, edge.target);
    }
}

fn print_node(store: &GraphStore, node: &Node) {
    let status = match &node.payload {
        NodePayload::DataSource(source) => match source.state {
            ConnectionState::Connected => "🟢 connected".to_string(),
            ConnectionState::Failed => format!(
                "🔴 failed: {}",
                source.error.as_deref().unwrap_or("unknown error")
            ),
            ConnectionState::Connecting => "🟡 connecting".to_string(),
            ConnectionState::Disconnected => "⚪ disconnected".to_string(),
        },
        NodePayload::Table(_) => String::new(),
        NodePayload::Transform(transform) => format!("{} rows out", transform.output_row_count),
    };

    let rows = store.get_effective_data(&node.id);
    println!(
        "▶ {} [{}] '{}' {} ({} rows, v{})",
        node.id,
        node.kind().as_str(),
        node.label,
        status,
        rows.len(),
        node.version
    );

    if let Some(schema) = node.schema() {
        if !schema.is_empty() {
            let columns: Vec<&str> = schema.names().collect();
            println!("  columns: {}", columns.join(", "));
        }
    }
    for row in rows.iter().take(PREVIEW_ROWS) {
        let cells: Vec<String> = row.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        println!("  {}", cells.join("  "));
    }
    if rows.len() > PREVIEW_ROWS {
        println!("  … {} more", rows.len() - PREVIEW_ROWS);
    }
}
