// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::model::{field, Dataset, Row, Scalar};
use crate::observability::messages::pipeline::UnknownOperatorIgnored;
use crate::observability::messages::StructuredLog;
use crate::pipeline::{FilterCondition, FilterOperator};
use crate::traits::RowOperator;

/// Evaluate a single condition against a row.
///
/// Text operators compare case-insensitively against the cell's display
/// form. Numeric operators fail when either side is not a number. Unknown
/// operators pass.
pub fn condition_matches(row: &Row, condition: &FilterCondition) -> bool {
    let value = field(row, &condition.field);
    let text = || value.to_string().to_lowercase();
    let needle = condition.value.to_lowercase();

    match &condition.operator {
        FilterOperator::Equals => text() == needle,
        FilterOperator::NotEquals => text() != needle,
        FilterOperator::Contains => text().contains(&needle),
        FilterOperator::NotContains => !text().contains(&needle),
        FilterOperator::StartsWith => text().starts_with(&needle),
        FilterOperator::EndsWith => text().ends_with(&needle),
        FilterOperator::GreaterThan => compare_numbers(value, &condition.value, |a, b| a > b),
        FilterOperator::LessThan => compare_numbers(value, &condition.value, |a, b| a < b),
        FilterOperator::IsEmpty => value.is_blank(),
        FilterOperator::IsNotEmpty => !value.is_blank(),
        FilterOperator::Unknown(_) => true,
    }
}

fn compare_numbers(value: &Scalar, operand: &str, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (value.as_number(), Scalar::from(operand).as_number()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// AND of all conditions.
pub struct FilterStage {
    conditions: Vec<FilterCondition>,
}

impl FilterStage {
    pub fn new(conditions: Vec<FilterCondition>) -> Self {
        Self { conditions }
    }
}

impl RowOperator for FilterStage {
    fn apply(&self, rows: Dataset) -> Dataset {
        for condition in &self.conditions {
            if let FilterOperator::Unknown(operator) = &condition.operator {
                UnknownOperatorIgnored {
                    field: &condition.field,
                    operator,
                }
                .log();
            }
        }
        rows.into_iter()
            .filter(|row| self.conditions.iter().all(|c| condition_matches(row, c)))
            .collect()
    }

    fn name(&self) -> &'static str {
        "filter"
    }
}
