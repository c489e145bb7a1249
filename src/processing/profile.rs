//! Per-column profiling and KNN parameter recommendation.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{DataSet, Value};

use super::reduce::{column_mode, mean, median, numeric_values, std_dev};

/// Inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Every non-empty value parses as a finite number.
    Numeric,
    /// At least one non-empty value is not numeric.
    Text,
    /// No non-empty values at all.
    Empty,
}

/// Summary statistics for a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std_dev: Option<f64>,
}

/// Profile of one header column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    /// Distinct non-empty values (by text).
    pub unique: usize,
    /// Present for numeric columns.
    pub numeric: Option<NumericSummary>,
    /// Most frequent value, present for text columns.
    pub mode: Option<String>,
}

/// Profile every header column, in header order.
///
/// `missing` is counted by position, so duplicate header names each get their own count here.
pub fn profile(dataset: &DataSet) -> Vec<ColumnProfile> {
    dataset
        .headers
        .iter()
        .enumerate()
        .map(|(idx, name)| profile_column(dataset, idx, name))
        .collect()
}

fn profile_column(dataset: &DataSet, idx: usize, name: &str) -> ColumnProfile {
    let (present, missing): (Vec<&Value>, Vec<&Value>) =
        dataset.column_values(idx).partition(|v| !v.is_missing());
    let unique = present
        .iter()
        .map(|v| v.as_text())
        .collect::<HashSet<_>>()
        .len();

    let (kind, numeric, mode) = if present.is_empty() {
        (ColumnKind::Empty, None, None)
    } else if let Some(xs) = numeric_values(&present) {
        let summary = NumericSummary {
            mean: mean(&xs).unwrap_or(f64::NAN),
            median: median(&xs).unwrap_or(f64::NAN),
            min: xs.iter().copied().fold(f64::INFINITY, f64::min),
            max: xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std_dev: std_dev(&xs),
        };
        (ColumnKind::Numeric, Some(summary), None)
    } else {
        let mode = column_mode(&present).map(|v| v.as_text().into_owned());
        (ColumnKind::Text, None, mode)
    };

    ColumnProfile {
        name: name.to_owned(),
        kind,
        missing: missing.len(),
        unique,
        numeric,
        mode,
    }
}

/// Whether KNN imputation is worth offering for a dataset, and with which neighbor count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnnRecommendation {
    pub recommended: bool,
    /// Why KNN is not recommended (set only when `recommended` is false).
    pub reason: Option<String>,
    /// Suggested neighbor count: `floor(sqrt(rows))` clamped to `3..=10`.
    pub n_neighbors: Option<usize>,
    /// Missing counts of the numeric columns.
    pub missing_stats: BTreeMap<String, usize>,
    pub numeric_columns: Vec<String>,
}

/// Recommend KNN parameters from the numeric columns of `dataset`.
pub fn recommend_knn(dataset: &DataSet) -> KnnRecommendation {
    let profiles = profile(dataset);
    let numeric: Vec<&ColumnProfile> = profiles
        .iter()
        .filter(|p| p.kind == ColumnKind::Numeric)
        .collect();

    let not_recommended = |reason: &str| KnnRecommendation {
        recommended: false,
        reason: Some(reason.to_string()),
        n_neighbors: None,
        missing_stats: BTreeMap::new(),
        numeric_columns: Vec::new(),
    };

    if numeric.is_empty() {
        return not_recommended("No numeric columns found");
    }

    let mut missing_stats = BTreeMap::new();
    for p in &numeric {
        *missing_stats.entry(p.name.clone()).or_insert(0) += p.missing;
    }
    if missing_stats.values().sum::<usize>() == 0 {
        return not_recommended("No missing values in numeric columns");
    }

    let n_neighbors = ((dataset.row_count() as f64).sqrt() as usize).clamp(3, 10);

    KnnRecommendation {
        recommended: true,
        reason: None,
        n_neighbors: Some(n_neighbors),
        missing_stats,
        numeric_columns: numeric.iter().map(|p| p.name.clone()).collect(),
    }
}
