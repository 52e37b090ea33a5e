// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for data source connections and dataset deliveries.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A data source entered the connecting state.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DataSourceConnecting<'a> {
    pub node_id: &'a str,
    pub sequence: u64,
}

impl Display for DataSourceConnecting<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Data source '{}' connecting (delivery #{})",
            self.node_id, self.sequence
        )
    }
}

impl StructuredLog for DataSourceConnecting<'_> {
    fn log(&self) {
        tracing::info!(node_id = self.node_id, sequence = self.sequence, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "data_source_connecting",
            span_name = name,
            node_id = self.node_id,
            sequence = self.sequence,
        )
    }
}

/// A delivery was applied to its node.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DeliveryAccepted<'a> {
    pub node_id: &'a str,
    pub sequence: u64,
    pub row_count: usize,
    pub query_applied: bool,
}

impl Display for DeliveryAccepted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Accepted delivery #{} for '{}': {} rows{}",
            self.sequence,
            self.node_id,
            self.row_count,
            if self.query_applied { " after query" } else { "" }
        )
    }
}

impl StructuredLog for DeliveryAccepted<'_> {
    fn log(&self) {
        tracing::info!(
            node_id = self.node_id,
            sequence = self.sequence,
            row_count = self.row_count,
            query_applied = self.query_applied,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "delivery_accepted",
            span_name = name,
            node_id = self.node_id,
            sequence = self.sequence,
        )
    }
}

/// A delivery arrived after a newer one was already applied.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
///
/// # Example
/// ```
/// use dagboard::observability::messages::connector::StaleDeliveryRejected;
///
/// let msg = StaleDeliveryRejected { node_id: "orders", sequence: 3, accepted: 4 };
/// assert!(msg.to_string().contains("#3"));
/// ```
pub struct StaleDeliveryRejected<'a> {
    pub node_id: &'a str,
    pub sequence: u64,
    pub accepted: u64,
}

impl Display for StaleDeliveryRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rejected stale delivery #{} for '{}' (already applied #{})",
            self.sequence, self.node_id, self.accepted
        )
    }
}

impl StructuredLog for StaleDeliveryRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            node_id = self.node_id,
            sequence = self.sequence,
            accepted = self.accepted,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "stale_delivery",
            span_name = name,
            node_id = self.node_id,
            sequence = self.sequence,
            accepted = self.accepted,
        )
    }
}

/// A connector reported an error for a data source.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ConnectorFailed<'a> {
    pub node_id: &'a str,
    pub error: &'a str,
}

impl Display for ConnectorFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Data source '{}' failed: {}", self.node_id, self.error)
    }
}

impl StructuredLog for ConnectorFailed<'_> {
    fn log(&self) {
        tracing::error!(node_id = self.node_id, error = self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "connector_failed",
            span_name = name,
            node_id = self.node_id,
            error = self.error,
        )
    }
}

/// A delivery was addressed to a node that no longer exists.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct DeliveryDropped<'a> {
    pub node_id: &'a str,
}

impl Display for DeliveryDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Dropped delivery for unknown node '{}'", self.node_id)
    }
}

impl StructuredLog for DeliveryDropped<'_> {
    fn log(&self) {
        tracing::warn!(node_id = self.node_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("delivery_dropped", span_name = name, node_id = self.node_id)
    }
}

/// Stopped waiting for connector deliveries before all of them arrived.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct DeliveryWaitTimedOut {
    pub received: usize,
    pub expected: usize,
}

impl Display for DeliveryWaitTimedOut {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Timed out waiting for deliveries: {} of {} arrived",
            self.received, self.expected
        )
    }
}

impl StructuredLog for DeliveryWaitTimedOut {
    fn log(&self) {
        tracing::warn!(received = self.received, expected = self.expected, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "delivery_wait_timed_out",
            span_name = name,
            received = self.received,
            expected = self.expected,
        )
    }
}
