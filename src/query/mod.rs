// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! One-shot query applied when a data source connection completes.

mod applier;
mod spec;

pub use applier::{filter_matches, QueryApplier};
pub use spec::{QueryFilter, QueryOperator, QuerySpec};
