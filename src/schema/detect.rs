// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::model::{Column, ColumnType, Row, Scalar, Schema};
use crate::schema::SchemaInferencer;
use crate::utils::dates::parse_date_text;

fn is_boolean(value: &Scalar) -> bool {
    match value {
        Scalar::Bool(_) => true,
        Scalar::Text(text) => matches!(text.trim().to_lowercase().as_str(), "true" | "false"),
        _ => false,
    }
}

fn is_date(value: &Scalar) -> bool {
    match value {
        // bare numbers are numbers, not timestamps
        Scalar::Text(text) => {
            text.trim().parse::<f64>().is_err() && parse_date_text(text).is_some()
        }
        _ => false,
    }
}

/// Detect a column type from its values. Blank values are ignored; a column
/// with no non-blank values is text.
pub fn detect_column_type<'a>(values: impl IntoIterator<Item = &'a Scalar>) -> ColumnType {
    let present: Vec<&Scalar> = values.into_iter().filter(|v| !v.is_blank()).collect();
    if present.is_empty() {
        return ColumnType::Text;
    }
    if present.iter().all(|v| is_boolean(v)) {
        ColumnType::Boolean
    } else if present.iter().all(|v| is_date(v)) {
        ColumnType::Date
    } else if present.iter().all(|v| v.as_number().is_some()) {
        ColumnType::Number
    } else {
        ColumnType::Text
    }
}

/// Typed schema over the first `sample_limit` rows.
pub fn detect_schema(rows: &[Row], sample_limit: usize) -> Schema {
    let sample = &rows[..rows.len().min(sample_limit)];
    SchemaInferencer::new(sample_limit)
        .union_field_names(sample)
        .into_iter()
        .map(|name| {
            let column_type = detect_column_type(sample.iter().filter_map(|r| r.get(&name)));
            Column::new(name, column_type)
        })
        .collect::<Vec<_>>()
        .into()
}
