// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::model::{field, Dataset, Row, Scalar};
use crate::pipeline::{Calculation, CalculationKind};
use crate::traits::RowOperator;

/// Value of one calculation for one row.
pub fn calculate(row: &Row, calculation: &Calculation) -> f64 {
    let values = calculation.fields.iter().map(|name| field(row, name));
    match calculation.kind {
        CalculationKind::Sum => values.map(Scalar::to_number_or_zero).sum(),
        CalculationKind::Average => {
            if calculation.fields.is_empty() {
                return 0.0;
            }
            let sum: f64 = values.map(Scalar::to_number_or_zero).sum();
            sum / calculation.fields.len() as f64
        }
        CalculationKind::Count => values.filter(|v| !v.is_null()).count() as f64,
    }
}

/// Adds one field per calculation to every row. Calculations with a blank
/// name are skipped.
pub struct CalculateStage {
    calculations: Vec<Calculation>,
}

impl CalculateStage {
    pub fn new(calculations: Vec<Calculation>) -> Self {
        Self { calculations }
    }
}

impl RowOperator for CalculateStage {
    fn apply(&self, mut rows: Dataset) -> Dataset {
        for row in rows.iter_mut() {
            for calculation in &self.calculations {
                if calculation.name.trim().is_empty() {
                    continue;
                }
                let value = calculate(row, calculation);
                row.insert(calculation.name.clone(), Scalar::Number(value));
            }
        }
        rows
    }

    fn name(&self) -> &'static str {
        "calculate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::row;

    fn calc(kind: CalculationKind, fields: &[&str]) -> Calculation {
        Calculation {
            name: "out".to_string(),
            kind,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_sum_treats_non_numeric_as_zero() {
        let r = row([("a", Scalar::from(2)), ("b", Scalar::from("3")), ("c", Scalar::from("x"))]);
        assert_eq!(calculate(&r, &calc(CalculationKind::Sum, &["a", "b", "c"])), 5.0);
    }

    #[test]
    fn test_average_divides_by_configured_field_count() {
        // "b" is missing but still counts towards the divisor
        let r = row([("a", Scalar::from(9))]);
        assert_eq!(calculate(&r, &calc(CalculationKind::Average, &["a", "b", "c"])), 3.0);
        assert_eq!(calculate(&r, &calc(CalculationKind::Average, &[])), 0.0);
    }

    #[test]
    fn test_count_skips_null_and_missing() {
        let r = row([("a", Scalar::from(0)), ("b", Scalar::Null), ("c", Scalar::from(""))]);
        assert_eq!(calculate(&r, &calc(CalculationKind::Count, &["a", "b", "c", "d"])), 2.0);
    }

    #[test]
    fn test_stage_adds_fields() {
        let rows = vec![row([("q1", Scalar::from(1)), ("q2", Scalar::from(2))])];
        let stage = CalculateStage::new(vec![Calculation {
            name: "total".to_string(),
            kind: CalculationKind::Sum,
            fields: vec!["q1".to_string(), "q2".to_string()],
        }]);
        let out = stage.apply(rows);
        assert_eq!(out[0]["total"], Scalar::Number(3.0));
        assert_eq!(out[0].len(), 3);
    }
}
