// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // connectors feeding data sources
pub mod config;     // config loading + graph builder
pub mod engine;     // table recompute
pub mod errors;     // error handling
pub mod graph;      // graph state, store, snapshots
pub mod model;      // nodes, edges, rows
pub mod observability;
pub mod pipeline;   // transform stages
pub mod query;      // one-shot data source queries
pub mod schema;     // column inference
pub mod traits;     // unified abstractions
pub mod utils;
