// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Scalar cell values and the row/dataset shapes built from them.

use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A single cell value.
///
/// Serialized untagged so plain JSON rows (`{"region": "E", "sales": 10}`)
/// load without any wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

/// One record: column name to value. Keys iterate in sorted order.
pub type Row = BTreeMap<String, Scalar>;

/// An ordered sequence of rows.
pub type Dataset = Vec<Row>;

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Numeric coercion. Text is parsed after trimming; booleans and blanks
    /// are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) if n.is_finite() => Some(*n),
            Scalar::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }

    /// Numeric coercion with `0` for anything non-numeric.
    pub fn to_number_or_zero(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    /// Missing-style emptiness: null or blank text.
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Locale-style comparison used for sorting mixed values: numbers compare
    /// numerically, everything else compares case-folded text with an exact
    /// tiebreak.
    pub fn compare(&self, other: &Scalar) -> Ordering {
        if let (Scalar::Number(a), Scalar::Number(b)) = (self, other) {
            return a.partial_cmp(b).unwrap_or(Ordering::Equal);
        }
        let left = self.to_string();
        let right = other.to_string();
        left.to_lowercase()
            .cmp(&right.to_lowercase())
            .then_with(|| left.cmp(&right))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Deserialize any scalar into its display text, so `10`, `"10"` and `true`
/// are all accepted where a comparison value is stored as a string.
pub fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(|value| value.to_string())
}

/// Look up a field, treating a missing key as [`Scalar::Null`].
pub fn field<'a>(row: &'a Row, name: &str) -> &'a Scalar {
    const NULL: &Scalar = &Scalar::Null;
    row.get(name).unwrap_or(NULL)
}

/// Build a [`Row`] from `(name, value)` pairs.
///
/// ```
/// use dagboard::model::{row, Scalar};
///
/// let r = row([("region", Scalar::from("E")), ("sales", Scalar::from(10))]);
/// assert_eq!(r.len(), 2);
/// ```
pub fn row<K, I>(pairs: I) -> Row
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Scalar)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
