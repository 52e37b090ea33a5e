// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::pipeline::SortSpec;

/// Query bound to a data source at connect time.
///
/// # Example
/// ```yaml
/// selectColumns: [region, sales]
/// filters:
///   - { column: sales, operator: ">=", value: "10" }
/// sort: { field: sales, direction: desc }
/// limit: 100
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuerySpec {
    pub select_columns: Vec<String>,
    pub filters: Vec<QueryFilter>,
    pub sort: Option<SortSpec>,
    pub limit: Option<usize>,
}

impl QuerySpec {
    pub fn is_empty(&self) -> bool {
        self.select_columns.is_empty()
            && self.filters.is_empty()
            && self.sort.is_none()
            && self.limit.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub column: String,
    pub operator: QueryOperator,
    #[serde(default, deserialize_with = "crate::model::scalar_text")]
    pub value: String,
}

impl QueryFilter {
    pub fn new(
        column: impl Into<String>,
        operator: QueryOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Query operators, written as raw symbols in saved configs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QueryOperator {
    Equals,
    Contains,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    NotEquals,
    Unknown(String),
}

impl QueryOperator {
    pub fn as_str(&self) -> &str {
        match self {
            QueryOperator::Equals => "equals",
            QueryOperator::Contains => "contains",
            QueryOperator::GreaterThan => ">",
            QueryOperator::LessThan => "<",
            QueryOperator::GreaterOrEqual => ">=",
            QueryOperator::LessOrEqual => "<=",
            QueryOperator::NotEquals => "!=",
            QueryOperator::Unknown(raw) => raw,
        }
    }
}

impl From<String> for QueryOperator {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "equals" | "=" | "==" => QueryOperator::Equals,
            "contains" => QueryOperator::Contains,
            ">" => QueryOperator::GreaterThan,
            "<" => QueryOperator::LessThan,
            ">=" => QueryOperator::GreaterOrEqual,
            "<=" => QueryOperator::LessOrEqual,
            "!=" => QueryOperator::NotEquals,
            _ => QueryOperator::Unknown(raw),
        }
    }
}

impl From<QueryOperator> for String {
    fn from(op: QueryOperator) -> Self {
        op.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_query_with_numeric_values() {
        let json = r#"{
            "selectColumns": ["region", "sales"],
            "filters": [
                { "column": "sales", "operator": ">=", "value": 10 },
                { "column": "active", "operator": "equals", "value": true }
            ],
            "limit": 5
        }"#;
        let query: QuerySpec = serde_json::from_str(json).unwrap();
        assert_eq!(query.filters[0].value, "10");
        assert_eq!(query.filters[0].operator, QueryOperator::GreaterOrEqual);
        assert_eq!(query.filters[1].value, "true");
        assert_eq!(query.limit, Some(5));
    }
}
