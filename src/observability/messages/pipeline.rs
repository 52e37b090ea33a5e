// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A filter condition used an operator the engine doesn't know; it passes.
///
/// # Log Level
/// `debug!` - Expected while a user is still typing a condition
pub struct UnknownOperatorIgnored<'a> {
    pub field: &'a str,
    pub operator: &'a str,
}

impl Display for UnknownOperatorIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Unknown filter operator '{}' on field '{}', condition passes",
            self.operator, self.field
        )
    }
}

impl StructuredLog for UnknownOperatorIgnored<'_> {
    fn log(&self) {
        tracing::debug!(field = self.field, operator = self.operator, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "unknown_operator",
            span_name = name,
            field = self.field,
            operator = self.operator,
        )
    }
}
