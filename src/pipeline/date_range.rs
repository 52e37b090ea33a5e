// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::model::{field, Dataset, Row};
use crate::pipeline::DateRangeFilter;
use crate::traits::RowOperator;
use crate::utils::dates::{parse_date, parse_date_text};

/// Keeps rows whose date column falls in `[start, end + 1 day)`.
pub struct DateRangeStage {
    date_column: String,
    start: Option<DateTime<Utc>>,
    end_exclusive: Option<DateTime<Utc>>,
}

fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(instant)
}

impl DateRangeStage {
    /// Returns `None` when the filter is disabled or has no column, in which
    /// case the stage is skipped entirely. Unparsable bounds are ignored.
    pub fn new(filter: &DateRangeFilter) -> Option<Self> {
        let date_column = filter.date_column.trim();
        if !filter.enabled || date_column.is_empty() {
            return None;
        }
        let start = filter.start.as_deref().and_then(parse_date_text);
        let end_exclusive = filter
            .end
            .as_deref()
            .and_then(parse_date_text)
            .map(|end| start_of_day(end) + Duration::days(1));
        Some(Self {
            date_column: date_column.to_string(),
            start,
            end_exclusive,
        })
    }

    fn keeps(&self, row: &Row) -> bool {
        let Some(date) = parse_date(field(row, &self.date_column)) else {
            return false;
        };
        self.start.map_or(true, |start| date >= start)
            && self.end_exclusive.map_or(true, |end| date < end)
    }
}

impl RowOperator for DateRangeStage {
    fn apply(&self, rows: Dataset) -> Dataset {
        rows.into_iter().filter(|row| self.keeps(row)).collect()
    }

    fn name(&self) -> &'static str {
        "date_range"
    }
}
