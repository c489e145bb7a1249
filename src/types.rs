//! Core data model types.
//!
//! Loaded files become an in-memory [`DataSet`]: an ordered header, row-major [`Value`]s and the
//! derived [`DataSetStats`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell in a [`DataSet`].
///
/// Parsed cells are always [`Value::Text`]; the empty string is the missing sentinel.
/// [`Value::Number`] is only produced by imputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Raw text as parsed from the input (possibly empty = missing).
    Text(String),
    /// A filled numeric value.
    Number(f64),
}

impl Value {
    /// The missing-value sentinel (empty text).
    pub fn missing() -> Self {
        Value::Text(String::new())
    }

    /// Returns `true` for the empty-text sentinel.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }

    /// Text form of the value, as it would be written to CSV.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            Value::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    /// Numeric interpretation of the value, if it has one.
    ///
    /// Text must parse as a finite `f64` (surrounding whitespace ignored).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// Statistics derived from the rows of a [`DataSet`].
///
/// Always recomputed from scratch when rows change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataSetStats {
    /// Number of data rows (header excluded).
    pub total_rows: usize,
    /// Header name -> number of empty fields at that header's position.
    ///
    /// Duplicate header names share one entry.
    pub missing_values: BTreeMap<String, usize>,
}

impl DataSetStats {
    /// Compute stats for `rows` against `headers`.
    ///
    /// Rows are indexed positionally: fields beyond the header are ignored and absent fields are
    /// not counted.
    pub fn compute(headers: &[String], rows: &[Vec<Value>]) -> Self {
        let mut missing_values: BTreeMap<String, usize> =
            headers.iter().map(|h| (h.clone(), 0)).collect();

        for row in rows {
            for (header, value) in headers.iter().zip(row.iter()) {
                if value.is_missing() {
                    *missing_values.entry(header.clone()).or_insert(0) += 1;
                }
            }
        }

        Self {
            total_rows: rows.len(),
            missing_values,
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` aligned by position with `headers`. Rows whose length
/// differs from the header are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    /// Ordered column names (not necessarily unique).
    pub headers: Vec<String>,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
    /// Derived row count and missing-value counts.
    pub stats: DataSetStats,
}

impl DataSet {
    /// Create a dataset from headers and rows, computing its stats.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let stats = DataSetStats::compute(&headers, &rows);
        Self {
            headers,
            rows,
            stats,
        }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of header columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Index of the first column named `name`, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Missing count recorded for `name` (0 if unknown).
    pub fn missing_count(&self, name: &str) -> usize {
        self.stats.missing_values.get(name).copied().unwrap_or(0)
    }

    /// Total number of missing fields across all header columns.
    pub fn total_missing(&self) -> usize {
        self.stats.missing_values.values().sum()
    }

    /// The first `n` rows (or fewer).
    pub fn head(&self, n: usize) -> &[Vec<Value>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Values at column `idx`, skipping rows too short to have one.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Recompute [`DataSetStats`] from the current rows.
    pub fn recompute_stats(&mut self) {
        self.stats = DataSetStats::compute(&self.headers, &self.rows);
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset keeps the headers; its stats are recomputed.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self::new(self.headers.clone(), rows)
    }
}

#[cfg(test)]
mod tests {
    use super::{DataSet, Value};

    fn text_rows(rows: &[&[&str]]) -> Vec<Vec<Value>> {
        rows.iter()
            .map(|r| r.iter().map(|s| Value::from(*s)).collect())
            .collect()
    }

    #[test]
    fn stats_count_empty_fields_per_header() {
        let ds = DataSet::new(
            vec!["name".to_string(), "age".to_string()],
            text_rows(&[&["Ann", "30"], &["Bob", ""], &["", "25"]]),
        );
        assert_eq!(ds.stats.total_rows, 3);
        assert_eq!(ds.missing_count("name"), 1);
        assert_eq!(ds.missing_count("age"), 1);
        assert_eq!(ds.total_missing(), 2);
    }

    #[test]
    fn stats_tolerate_ragged_rows() {
        let ds = DataSet::new(
            vec!["a".to_string(), "b".to_string()],
            text_rows(&[&["", "", ""], &[""], &[]]),
        );
        assert_eq!(ds.missing_count("a"), 2);
        assert_eq!(ds.missing_count("b"), 1);
        assert_eq!(ds.stats.total_rows, 3);
    }

    #[test]
    fn duplicate_headers_share_a_count() {
        let ds = DataSet::new(
            vec!["x".to_string(), "x".to_string()],
            text_rows(&[&["", ""], &["1", ""]]),
        );
        assert_eq!(ds.missing_count("x"), 3);
        assert_eq!(ds.stats.missing_values.len(), 1);
    }

    #[test]
    fn filter_rows_recomputes_stats() {
        let ds = DataSet::new(
            vec!["a".to_string()],
            text_rows(&[&["1"], &[""], &["3"]]),
        );
        let out = ds.filter_rows(|row| !row.iter().any(Value::is_missing));
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.missing_count("a"), 0);
        // Original unchanged
        assert_eq!(ds.missing_count("a"), 1);
    }

    #[test]
    fn number_values_format_naturally() {
        assert_eq!(Value::Number(27.5).as_text(), "27.5");
        assert_eq!(Value::Number(2.0).as_text(), "2");
        assert_eq!(Value::from(" 4.5 ").as_number(), Some(4.5));
        assert_eq!(Value::from("inf").as_number(), None);
        assert_eq!(Value::from("abc").as_number(), None);
        assert!(Value::missing().is_missing());
        assert!(!Value::from(" ").is_missing());
    }

    #[test]
    fn head_caps_at_row_count() {
        let ds = DataSet::new(vec!["a".to_string()], text_rows(&[&["1"], &["2"]]));
        assert_eq!(ds.head(5).len(), 2);
        assert_eq!(ds.head(1).len(), 1);
    }
}
