// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Diagnostic output from the engine goes through message structs that
//! implement `Display` and [`messages::StructuredLog`], so log text lives in
//! one place and every event carries structured fields.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::graph` - node/edge lifecycle and transform commits
//! * `messages::recompute` - table recompute passes
//! * `messages::pipeline` - transform operator diagnostics
//! * `messages::connector` - connection state and dataset deliveries
//! * `messages::validation` - graph definition and snapshot validation
//!
//! # Usage
//!
//! ```rust
//! use dagboard::observability::messages::StructuredLog;
//! use dagboard::observability::messages::graph::DuplicateNodeRejected;
//!
//! DuplicateNodeRejected { node_id: "orders" }.log();
//! ```

pub mod messages;
