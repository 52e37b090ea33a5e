// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::model::{field, Dataset, Row, Scalar};
use crate::pipeline::sort_rows;
use crate::query::{QueryFilter, QueryOperator, QuerySpec};

/// Runs a data source's [`QuerySpec`] over a freshly delivered dataset.
///
/// Steps run in a fixed order: projection, filter, sort, limit. Because
/// projection comes first, filters and sort only see selected columns.
///
/// # Example
/// ```
/// use dagboard::model::{row, Scalar};
/// use dagboard::query::{QueryApplier, QueryFilter, QueryOperator, QuerySpec};
///
/// let rows = vec![
///     row([("name", Scalar::from("a")), ("sales", Scalar::from(5)), ("secret", Scalar::from("x"))]),
///     row([("name", Scalar::from("b")), ("sales", Scalar::from(50)), ("secret", Scalar::from("y"))]),
/// ];
/// let query = QuerySpec {
///     select_columns: vec!["name".into(), "sales".into()],
///     filters: vec![QueryFilter::new("sales", QueryOperator::GreaterThan, "10")],
///     ..Default::default()
/// };
///
/// let out = QueryApplier::new(&query).apply(rows);
/// assert_eq!(out.len(), 1);
/// assert!(!out[0].contains_key("secret"));
/// ```
pub struct QueryApplier<'a> {
    query: &'a QuerySpec,
}

impl<'a> QueryApplier<'a> {
    pub fn new(query: &'a QuerySpec) -> Self {
        Self { query }
    }

    pub fn apply(&self, rows: Dataset) -> Dataset {
        let mut rows = self.project(rows);
        rows.retain(|row| self.query.filters.iter().all(|f| filter_matches(row, f)));
        if let Some(sort) = &self.query.sort {
            sort_rows(&mut rows, sort);
        }
        if let Some(limit) = self.query.limit {
            rows.truncate(limit);
        }
        rows
    }

    fn project(&self, rows: Dataset) -> Dataset {
        let columns = &self.query.select_columns;
        if columns.is_empty() {
            return rows;
        }
        rows.into_iter()
            .map(|mut row| {
                row.retain(|key, _| columns.iter().any(|c| c == key));
                row
            })
            .collect()
    }
}

/// Evaluate one query filter. Unknown operators pass.
pub fn filter_matches(row: &Row, filter: &QueryFilter) -> bool {
    let value = field(row, &filter.column);
    let operand = Scalar::from(filter.value.as_str());
    let numbers = value.as_number().zip(operand.as_number());

    match &filter.operator {
        QueryOperator::Equals => match numbers {
            Some((a, b)) => a == b,
            None => value.to_string() == filter.value,
        },
        QueryOperator::NotEquals => match numbers {
            Some((a, b)) => a != b,
            None => value.to_string() != filter.value,
        },
        QueryOperator::Contains => value
            .to_string()
            .to_lowercase()
            .contains(&filter.value.to_lowercase()),
        QueryOperator::GreaterThan => numbers.map_or(false, |(a, b)| a > b),
        QueryOperator::LessThan => numbers.map_or(false, |(a, b)| a < b),
        QueryOperator::GreaterOrEqual => numbers.map_or(false, |(a, b)| a >= b),
        QueryOperator::LessOrEqual => numbers.map_or(false, |(a, b)| a <= b),
        QueryOperator::Unknown(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::row;
    use crate::pipeline::SortSpec;

    fn person(name: &str, age: Scalar, city: &str) -> Row {
        row([
            ("name", Scalar::from(name)),
            ("age", age),
            ("city", Scalar::from(city)),
        ])
    }

    fn people() -> Dataset {
        vec![
            person("Ann", Scalar::from(31), "Oslo"),
            person("Bob", Scalar::from(25), "Rome"),
            person("Cid", Scalar::from("40"), "Oslo"),
            person("Dee", Scalar::from(19), "Lima"),
        ]
    }

    #[test]
    fn test_empty_query_is_identity() {
        assert_eq!(QueryApplier::new(&QuerySpec::default()).apply(people()), people());
    }

    #[test]
    fn test_steps_run_in_order() {
        let query = QuerySpec {
            select_columns: vec!["name".to_string(), "age".to_string()],
            filters: vec![QueryFilter::new("age", QueryOperator::GreaterOrEqual, "25")],
            sort: Some(SortSpec::desc("age")),
            limit: Some(2),
        };
        let out = QueryApplier::new(&query).apply(people());
        let names: Vec<String> = out.iter().map(|r| r["name"].to_string()).collect();
        // "40" is text, so it sorts by text against the numbers and still lands first
        assert_eq!(names, vec!["Cid", "Ann"]);
        assert!(out.iter().all(|r| r.len() == 2));
    }

    #[test]
    fn test_filters_see_projected_rows_only() {
        let query = QuerySpec {
            select_columns: vec!["name".to_string()],
            filters: vec![QueryFilter::new("city", QueryOperator::Equals, "Oslo")],
            ..Default::default()
        };
        assert!(QueryApplier::new(&query).apply(people()).is_empty());
    }

    #[test]
    fn test_symbol_operators() {
        let r = row([("age", Scalar::from(30)), ("city", Scalar::from("Oslo"))]);
        let check = |column: &str, op: &str, value: &str| {
            let operator = QueryOperator::from(op.to_string());
            filter_matches(&r, &QueryFilter::new(column, operator, value))
        };
        assert!(check("age", "equals", "30.0"));
        assert!(check("age", "!=", "31"));
        assert!(check("age", ">", "29"));
        assert!(check("age", "<=", "30"));
        assert!(!check("age", "<", "30"));
        assert!(check("city", "contains", "sl"));
        assert!(!check("city", "equals", "oslo"));
        assert!(!check("city", ">", "1"));
        assert!(check("city", "like", "whatever"));
    }

    #[test]
    fn test_limit_applies_last() {
        let query = QuerySpec {
            sort: Some(SortSpec::asc("age")),
            limit: Some(1),
            ..Default::default()
        };
        let out = QueryApplier::new(&query).apply(people());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["name"], Scalar::from("Dee"));
    }
}
