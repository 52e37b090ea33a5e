// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration types for transform nodes.
//!
//! These mirror what the dashboard editor stores on a transform node and are
//! serialized in camelCase so saved graphs load unchanged:
//!
//! ```yaml
//! dateRange:
//!   enabled: true
//!   dateColumn: created_at
//!   start: "2024-01-01"
//!   end: "2024-01-31"
//! filters:
//!   - { field: status, operator: equals, value: active }
//! calculations:
//!   - { name: total, type: sum, fields: [q1, q2] }
//! aggregation:
//!   groupBy: region
//!   calculations:
//!     - { field: total, operation: sum, alias: region_total }
//! sort: { field: region_total, direction: desc }
//! ```

use serde::{Deserialize, Serialize};

/// Full operator configuration for a transform node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformConfig {
    pub date_range: Option<DateRangeFilter>,
    pub filters: Vec<FilterCondition>,
    pub calculations: Vec<Calculation>,
    pub aggregation: Option<Aggregation>,
    pub sort: Option<SortSpec>,
}

/// Calendar-day bounded filter on a single date column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateRangeFilter {
    pub enabled: bool,
    pub date_column: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// One AND-ed row condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub operator: FilterOperator,
    #[serde(default, deserialize_with = "crate::model::scalar_text")]
    pub value: String,
}

impl FilterCondition {
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Row filter operators.
///
/// Anything the editor sends that is not listed here is kept verbatim in
/// [`FilterOperator::Unknown`] and treated as a passing condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
    Unknown(String),
}

impl FilterOperator {
    pub fn as_str(&self) -> &str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "not_equals",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not_contains",
            FilterOperator::StartsWith => "starts_with",
            FilterOperator::EndsWith => "ends_with",
            FilterOperator::GreaterThan => "greater_than",
            FilterOperator::LessThan => "less_than",
            FilterOperator::IsEmpty => "is_empty",
            FilterOperator::IsNotEmpty => "is_not_empty",
            FilterOperator::Unknown(raw) => raw,
        }
    }
}

impl From<String> for FilterOperator {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "equals" => FilterOperator::Equals,
            "not_equals" => FilterOperator::NotEquals,
            "contains" => FilterOperator::Contains,
            "not_contains" => FilterOperator::NotContains,
            "starts_with" => FilterOperator::StartsWith,
            "ends_with" => FilterOperator::EndsWith,
            "greater_than" => FilterOperator::GreaterThan,
            "less_than" => FilterOperator::LessThan,
            "is_empty" => FilterOperator::IsEmpty,
            "is_not_empty" => FilterOperator::IsNotEmpty,
            _ => FilterOperator::Unknown(raw),
        }
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.as_str().to_string()
    }
}

/// A per-row computed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CalculationKind,
    #[serde(default)]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationKind {
    Sum,
    /// Sum divided by the number of configured fields, not by the number of
    /// non-null values.
    Average,
    Count,
}

/// Collapse rows, optionally per group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Aggregation {
    pub group_by: Option<String>,
    pub calculations: Vec<AggregateCalculation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateCalculation {
    pub field: String,
    pub operation: AggregateOp,
    pub alias: String,
}

impl AggregateCalculation {
    pub fn new(field: impl Into<String>, operation: AggregateOp, alias: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operation,
            alias: alias.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateOp {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

/// Single-key sort, shared by transform nodes and data source queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}
