// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::model::{field, Dataset, Row, Scalar};
use crate::pipeline::{AggregateCalculation, AggregateOp, Aggregation};
use crate::traits::RowOperator;

fn compute(operation: AggregateOp, rows: &[&Row], target: &str) -> f64 {
    let values = rows.iter().map(|row| field(row, target).to_number_or_zero());
    match operation {
        AggregateOp::Count => rows.len() as f64,
        AggregateOp::Sum => values.sum(),
        AggregateOp::Avg => {
            if rows.is_empty() {
                0.0
            } else {
                values.sum::<f64>() / rows.len() as f64
            }
        }
        AggregateOp::Min => values.reduce(f64::min).unwrap_or(0.0),
        AggregateOp::Max => values.reduce(f64::max).unwrap_or(0.0),
    }
}

fn summarize(rows: &[&Row], calculations: &[AggregateCalculation], into: &mut Row) {
    for calculation in calculations {
        let value = compute(calculation.operation, rows, &calculation.field);
        into.insert(calculation.alias.clone(), Scalar::Number(value));
    }
}

/// Collapse rows into one row, or one row per group.
///
/// Groups are keyed by the stringified group value and emitted in first-seen
/// order; the emitted group value is the first row's original cell.
pub fn aggregate(rows: &[Row], aggregation: &Aggregation) -> Dataset {
    let group_by = aggregation
        .group_by
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty());

    let Some(group_by) = group_by else {
        if aggregation.calculations.is_empty() {
            return Vec::new();
        }
        let all: Vec<&Row> = rows.iter().collect();
        let mut out = Row::new();
        summarize(&all, &aggregation.calculations, &mut out);
        return vec![out];
    };

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Scalar, Vec<&Row>)> = Vec::new();
    for row in rows {
        let value = field(row, group_by);
        let key = value.to_string();
        match index.get(&key) {
            Some(&position) => groups[position].1.push(row),
            None => {
                index.insert(key, groups.len());
                groups.push((value.clone(), vec![row]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(value, members)| {
            let mut out = Row::new();
            out.insert(group_by.to_string(), value);
            summarize(&members, &aggregation.calculations, &mut out);
            out
        })
        .collect()
}

pub struct AggregateStage {
    aggregation: Aggregation,
}

impl AggregateStage {
    pub fn new(aggregation: Aggregation) -> Self {
        Self { aggregation }
    }
}

impl RowOperator for AggregateStage {
    fn apply(&self, rows: Dataset) -> Dataset {
        aggregate(&rows, &self.aggregation)
    }

    fn name(&self) -> &'static str {
        "aggregate"
    }
}
