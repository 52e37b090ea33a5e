// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::model::Dataset;

/// One stage of a transform pipeline.
///
/// Implementations are total: they never fail, they only narrow, extend or
/// reorder rows according to their configuration.
pub trait RowOperator: Send + Sync {
    fn apply(&self, rows: Dataset) -> Dataset;

    fn name(&self) -> &'static str;
}
