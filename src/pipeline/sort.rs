// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::model::{field, Dataset};
use crate::pipeline::{SortDirection, SortSpec};
use crate::traits::RowOperator;

/// Stable single-key sort. A blank field leaves the order untouched.
pub fn sort_rows(rows: &mut Dataset, spec: &SortSpec) {
    if spec.field.trim().is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        let ordering = field(a, &spec.field).compare(field(b, &spec.field));
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

pub struct SortStage {
    spec: SortSpec,
}

impl SortStage {
    pub fn new(spec: SortSpec) -> Self {
        Self { spec }
    }
}

impl RowOperator for SortStage {
    fn apply(&self, mut rows: Dataset) -> Dataset {
        sort_rows(&mut rows, &self.spec);
        rows
    }

    fn name(&self) -> &'static str {
        "sort"
    }
}
