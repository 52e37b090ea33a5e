// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The transform node operator chain.
//!
//! Stages always run in the same order:
//!
//! 1. **date range**: bound the row set by calendar day first
//! 2. **filter**: AND-ed row conditions
//! 3. **calculate**: per-row computed columns, so aggregation can use them
//! 4. **aggregate**: collapse rows, optionally per group
//! 5. **sort**: order whatever remains
//!
//! Unconfigured stages are left out. The pipeline is pure: the same rows and
//! config always produce the same output, which makes it safe to re-run on
//! every editor keystroke for previews.
//!
//! # Example
//! ```
//! use dagboard::model::{row, Scalar};
//! use dagboard::pipeline::{
//!     AggregateCalculation, AggregateOp, Aggregation, TransformConfig, TransformPipeline,
//! };
//!
//! let rows = vec![
//!     row([("region", Scalar::from("E")), ("sales", Scalar::from(10))]),
//!     row([("region", Scalar::from("E")), ("sales", Scalar::from(5))]),
//!     row([("region", Scalar::from("W")), ("sales", Scalar::from(7))]),
//! ];
//! let config = TransformConfig {
//!     aggregation: Some(Aggregation {
//!         group_by: Some("region".to_string()),
//!         calculations: vec![AggregateCalculation::new("sales", AggregateOp::Sum, "total")],
//!     }),
//!     ..Default::default()
//! };
//!
//! let out = TransformPipeline::from_config(&config).run(&rows);
//! assert_eq!(out.len(), 2);
//! assert_eq!(out[0]["total"], Scalar::Number(15.0));
//! ```

mod aggregate;
mod calculate;
mod config;
mod date_range;
mod filter;
mod sort;

pub use aggregate::{aggregate, AggregateStage};
pub use calculate::{calculate, CalculateStage};
pub use config::{
    AggregateCalculation, AggregateOp, Aggregation, Calculation, CalculationKind,
    DateRangeFilter, FilterCondition, FilterOperator, SortDirection, SortSpec, TransformConfig,
};
pub use date_range::DateRangeStage;
pub use filter::{condition_matches, FilterStage};
pub use sort::{sort_rows, SortStage};

use crate::model::{Dataset, Row};
use crate::traits::RowOperator;

pub struct TransformPipeline {
    stages: Vec<Box<dyn RowOperator>>,
}

impl TransformPipeline {
    pub fn from_config(config: &TransformConfig) -> Self {
        let mut stages: Vec<Box<dyn RowOperator>> = Vec::new();
        if let Some(stage) = config.date_range.as_ref().and_then(DateRangeStage::new) {
            stages.push(Box::new(stage));
        }
        if !config.filters.is_empty() {
            stages.push(Box::new(FilterStage::new(config.filters.clone())));
        }
        if !config.calculations.is_empty() {
            stages.push(Box::new(CalculateStage::new(config.calculations.clone())));
        }
        if let Some(aggregation) = &config.aggregation {
            stages.push(Box::new(AggregateStage::new(aggregation.clone())));
        }
        if let Some(sort) = &config.sort {
            stages.push(Box::new(SortStage::new(sort.clone())));
        }
        Self { stages }
    }

    pub fn run(&self, rows: &[Row]) -> Dataset {
        self.stages
            .iter()
            .fold(rows.to_vec(), |current, stage| stage.apply(current))
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl std::fmt::Debug for TransformPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformPipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Shorthand for `TransformPipeline::from_config(config).run(rows)`.
pub fn run_pipeline(rows: &[Row], config: &TransformConfig) -> Dataset {
    TransformPipeline::from_config(config).run(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{row, Scalar};

    fn orders() -> Dataset {
        vec![
            row([
                ("region", Scalar::from("E")),
                ("status", Scalar::from("active")),
                ("q1", Scalar::from(4)),
                ("q2", Scalar::from(6)),
                ("created_at", Scalar::from("2024-01-05")),
            ]),
            row([
                ("region", Scalar::from("W")),
                ("status", Scalar::from("active")),
                ("q1", Scalar::from(1)),
                ("q2", Scalar::from(1)),
                ("created_at", Scalar::from("2024-01-20")),
            ]),
            row([
                ("region", Scalar::from("E")),
                ("status", Scalar::from("closed")),
                ("q1", Scalar::from(100)),
                ("q2", Scalar::from(100)),
                ("created_at", Scalar::from("2024-01-06")),
            ]),
            row([
                ("region", Scalar::from("E")),
                ("status", Scalar::from("active")),
                ("q1", Scalar::from(3)),
                ("q2", Scalar::from(2)),
                ("created_at", Scalar::from("2024-03-01")),
            ]),
        ]
    }

    fn full_config() -> TransformConfig {
        TransformConfig {
            date_range: Some(DateRangeFilter {
                enabled: true,
                date_column: "created_at".to_string(),
                start: Some("2024-01-01".to_string()),
                end: Some("2024-01-31".to_string()),
            }),
            filters: vec![FilterCondition::new("status", FilterOperator::Equals, "ACTIVE")],
            calculations: vec![Calculation {
                name: "total".to_string(),
                kind: CalculationKind::Sum,
                fields: vec!["q1".to_string(), "q2".to_string()],
            }],
            aggregation: Some(Aggregation {
                group_by: Some("region".to_string()),
                calculations: vec![AggregateCalculation::new(
                    "total",
                    AggregateOp::Sum,
                    "region_total",
                )],
            }),
            sort: Some(SortSpec::asc("region_total")),
        }
    }

    #[test]
    fn test_stage_order() {
        let pipeline = TransformPipeline::from_config(&full_config());
        assert_eq!(
            pipeline.stage_names(),
            vec!["date_range", "filter", "calculate", "aggregate", "sort"]
        );
        assert!(TransformPipeline::from_config(&TransformConfig::default()).is_empty());
    }

    #[test]
    fn test_full_pipeline() {
        let out = run_pipeline(&orders(), &full_config());
        assert_eq!(
            out,
            vec![
                row([("region", Scalar::from("W")), ("region_total", Scalar::Number(2.0))]),
                row([("region", Scalar::from("E")), ("region_total", Scalar::Number(10.0))]),
            ]
        );
    }

    #[test]
    fn test_pipeline_is_pure() {
        let rows = orders();
        let config = full_config();
        let first = run_pipeline(&rows, &config);
        let second = run_pipeline(&rows, &config);
        assert_eq!(first, second);
        assert_eq!(rows, orders());
    }

    #[test]
    fn test_empty_config_passes_rows_through() {
        assert_eq!(run_pipeline(&orders(), &TransformConfig::default()), orders());
    }
}
