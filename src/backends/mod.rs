// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Connector backends that feed data source nodes.
//!
//! Connectors implement the [`Connector`](crate::traits::Connector) trait and
//! run as tokio tasks outside the graph store. Their results travel back
//! through a [`DeliveryInbox`] which the owner of the store drains.
//!
//! # Available Backends
//!
//! - **memory**: rows listed inline in the config, with optional simulated
//!   latency
//! - **json_file**: a JSON array of row objects read from disk
//!
//! # Architecture
//!
//! ```text
//! NodeConfig → ConnectorFactory → Connector → spawn_connection → DeliveryInbox → GraphStore
//! ```
//!
//! # Example
//!
//! ```rust
//! use dagboard::backends::{spawn_connection, DeliveryInbox, InMemoryConnector};
//! use dagboard::config::EngineOptions;
//! use dagboard::graph::GraphStore;
//! use dagboard::model::{row, NodeSpec, Scalar};
//! use dagboard::query::QuerySpec;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut store = GraphStore::new(EngineOptions::default());
//! store.add_node(NodeSpec::data_source("memory").with_id("orders")).unwrap();
//!
//! let mut inbox = DeliveryInbox::new();
//! let connector = Arc::new(InMemoryConnector::new(vec![row([("id", Scalar::from(1))])]));
//! let ticket = store.connect_data_source("orders", QuerySpec::default()).unwrap();
//! spawn_connection(connector, ticket, inbox.sender()).await.unwrap();
//!
//! assert_eq!(inbox.drain_into(&mut store), 1);
//! assert_eq!(store.get_effective_data("orders").len(), 1);
//! # }
//! ```

mod factory;
mod inbox;
mod json_file;
mod memory;
#[cfg(test)]
pub mod stub;

pub use factory::ConnectorFactory;
pub use inbox::{spawn_connection, DeliveryInbox, DeliverySender};
pub use json_file::JsonFileConnector;
pub use memory::InMemoryConnector;
