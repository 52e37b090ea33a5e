// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for table recompute passes.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A table's inputs changed and it was merged again.
///
/// # Log Level
/// `info!` - Important operational event
pub struct TableRecomputed<'a> {
    pub node_id: &'a str,
    pub incomer_count: usize,
    pub row_count: usize,
    pub replaced: bool,
    pub added_columns: usize,
}

impl Display for TableRecomputed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let action = if self.replaced { "replaced" } else { "kept" };
        write!(
            f,
            "Recomputed table '{}' from {} incomers: {} rows ({}), {} new columns",
            self.node_id, self.incomer_count, self.row_count, action, self.added_columns
        )
    }
}

impl StructuredLog for TableRecomputed<'_> {
    fn log(&self) {
        tracing::info!(
            node_id = self.node_id,
            incomer_count = self.incomer_count,
            row_count = self.row_count,
            replaced = self.replaced,
            added_columns = self.added_columns,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "table_recomputed",
            span_name = name,
            node_id = self.node_id,
            incomer_count = self.incomer_count,
            row_count = self.row_count,
        )
    }
}

/// A recompute pass finished.
///
/// # Log Level
/// `debug!` - Runs after every graph mutation
pub struct RecomputeCompleted {
    pub tables_visited: usize,
    pub tables_changed: usize,
    pub passes: usize,
}

impl Display for RecomputeCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Recompute finished after {} passes: {} of {} tables changed",
            self.passes, self.tables_changed, self.tables_visited
        )
    }
}

impl StructuredLog for RecomputeCompleted {
    fn log(&self) {
        tracing::debug!(
            tables_visited = self.tables_visited,
            tables_changed = self.tables_changed,
            passes = self.passes,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "recompute",
            span_name = name,
            tables_visited = self.tables_visited,
            passes = self.passes,
        )
    }
}

/// Fixed-point iteration over a cyclic graph stopped at its pass cap.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct FixedPointCapReached {
    pub passes: usize,
    pub unsettled_tables: usize,
}

impl Display for FixedPointCapReached {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Recompute stopped at the {}-pass cap with {} tables still changing",
            self.passes, self.unsettled_tables
        )
    }
}

impl StructuredLog for FixedPointCapReached {
    fn log(&self) {
        tracing::warn!(
            passes = self.passes,
            unsettled_tables = self.unsettled_tables,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "fixed_point_cap",
            span_name = name,
            passes = self.passes,
            unsettled_tables = self.unsettled_tables,
        )
    }
}
