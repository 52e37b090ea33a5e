// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Column descriptor inference.
//!
//! Two paths exist:
//!
//! * **Merge path** ([`SchemaInferencer::extend`]): used when a table node
//!   recomputes. Field names are unioned over a bounded sample and every new
//!   field is typed [`ColumnType::Text`](crate::model::ColumnType::Text).
//! * **Connector path** ([`detect_schema`]): per-column type detection with
//!   boolean > date > number > text priority. Connectors call this before
//!   delivering; the core only consumes the schema they report.

mod detect;

pub use detect::{detect_column_type, detect_schema};

use std::collections::HashSet;

use crate::config::consts::DEFAULT_SCHEMA_SAMPLE_LIMIT;
use crate::model::{Column, Row, Schema};

#[derive(Debug, Clone, Copy)]
pub struct SchemaInferencer {
    sample_limit: usize,
}

impl Default for SchemaInferencer {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_SAMPLE_LIMIT)
    }
}

impl SchemaInferencer {
    pub fn new(sample_limit: usize) -> Self {
        Self { sample_limit }
    }

    pub fn sample_limit(&self) -> usize {
        self.sample_limit
    }

    /// Field names seen in the first `sample_limit` rows, first-seen order.
    pub fn union_field_names(&self, rows: &[Row]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for row in rows.iter().take(self.sample_limit) {
            for key in row.keys() {
                if seen.insert(key.as_str()) {
                    names.push(key.clone());
                }
            }
        }
        names
    }

    /// Append unseen fields to `schema` as text columns. Existing columns are
    /// never removed or retyped. Returns the names that were added.
    pub fn extend(&self, schema: &mut Schema, rows: &[Row]) -> Vec<String> {
        self.union_field_names(rows)
            .into_iter()
            .filter(|name| schema.push_if_absent(Column::text(name.clone())))
            .collect()
    }

    /// A text-only schema for rows that arrived without one.
    pub fn infer(&self, rows: &[Row]) -> Schema {
        let mut schema = Schema::new();
        self.extend(&mut schema, rows);
        schema
    }
}
