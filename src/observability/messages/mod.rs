// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it at its level with structured fields.
//!
//! # Usage Pattern
//!
//! ```rust
//! use dagboard::observability::messages::StructuredLog;
//! use dagboard::observability::messages::recompute::TableRecomputed;
//!
//! let msg = TableRecomputed {
//!     node_id: "sales_table",
//!     incomer_count: 2,
//!     row_count: 120,
//!     replaced: true,
//!     added_columns: 3,
//! };
//!
//! msg.log();
//! ```

use std::fmt::Display;
use tracing::Span;

pub mod connector;
pub mod graph;
pub mod pipeline;
pub mod recompute;
pub mod validation;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog: Display {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Build a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
