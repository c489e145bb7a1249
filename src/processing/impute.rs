//! Missing-value imputation.
//!
//! [`clean`] is a pure function of a [`DataSet`] and [`CleaningOptions`]: it never mutates its
//! input and never fails. Columns are processed independently.
//!
//! ## Strategies
//!
//! - [`Strategy::Drop`]: keep only rows without empty fields.
//! - [`Strategy::Mean`] / [`Strategy::Median`]: fill numeric columns; text columns stay unfilled.
//! - [`Strategy::Mode`]: fill with the most frequent value (numeric or text).
//! - [`Strategy::Knn`]: same algorithm as `Mode`; the neighbor count is accepted but unused.
//! - [`Strategy::ForwardFill`] / [`Strategy::BackwardFill`]: carry the nearest non-empty value
//!   down/up the column.
//!
//! A column counts as numeric only if every non-empty value parses as a finite number. Numeric
//! fill values are rounded to four decimals and stored as [`Value::Number`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CleanerError;
use crate::types::{DataSet, Value};

use super::reduce::{column_mode, mean, median, numeric_values, round_to};

/// Neighbor count used when none (or an invalid one) is supplied.
pub const DEFAULT_KNN_NEIGHBORS: usize = 5;

/// Decimal places kept for numeric fill values.
const FILL_DECIMALS: i32 = 4;

/// Imputation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Drop rows containing any empty field.
    Drop,
    /// Column mean (numeric columns only).
    #[default]
    Mean,
    /// Column median (numeric columns only).
    Median,
    /// Most frequent value.
    Mode,
    /// Alias of [`Strategy::Mode`].
    Knn,
    /// Previous non-empty value in the column.
    #[serde(rename = "ffill")]
    ForwardFill,
    /// Next non-empty value in the column.
    #[serde(rename = "bfill")]
    BackwardFill,
}

impl Strategy {
    /// All strategies, in presentation order.
    pub const ALL: [Strategy; 7] = [
        Strategy::Drop,
        Strategy::Mean,
        Strategy::Median,
        Strategy::Mode,
        Strategy::Knn,
        Strategy::ForwardFill,
        Strategy::BackwardFill,
    ];

    /// Name used in option strings and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Drop => "drop",
            Strategy::Mean => "mean",
            Strategy::Median => "median",
            Strategy::Mode => "mode",
            Strategy::Knn => "knn",
            Strategy::ForwardFill => "ffill",
            Strategy::BackwardFill => "bfill",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Strategy::ALL
            .into_iter()
            .find(|st| st.as_str() == wanted)
            .ok_or_else(|| CleanerError::user_input(format!("unknown cleaning strategy '{s}'")))
    }
}

/// Options controlling [`clean`].
///
/// Use [`Default`] for common cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    /// Imputation strategy.
    pub strategy: Strategy,
    /// Neighbor count for [`Strategy::Knn`]. Zero is treated as [`DEFAULT_KNN_NEIGHBORS`].
    pub knn_neighbors: usize,
    /// Restrict cleaning to these columns (by name). `None` or an empty list means all columns.
    pub columns: Option<Vec<String>>,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            knn_neighbors: DEFAULT_KNN_NEIGHBORS,
            columns: None,
        }
    }
}

impl CleaningOptions {
    /// Options for `strategy` with everything else defaulted.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Neighbor count after normalization (never zero).
    pub fn effective_knn_neighbors(&self) -> usize {
        if self.knn_neighbors == 0 {
            DEFAULT_KNN_NEIGHBORS
        } else {
            self.knn_neighbors
        }
    }
}

/// Parse a user-supplied neighbor count, falling back to [`DEFAULT_KNN_NEIGHBORS`] when it is
/// absent or not a positive integer.
pub fn parse_knn_neighbors(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_KNN_NEIGHBORS)
}

/// Produce a cleaned copy of `dataset`.
///
/// The returned dataset's stats are recomputed from its rows, so columns that could not be filled
/// still report their remaining missing values.
pub fn clean(dataset: &DataSet, options: &CleaningOptions) -> DataSet {
    let targets = target_columns(dataset, options.columns.as_deref());
    if options.strategy == Strategy::Knn {
        debug!(
            n_neighbors = options.effective_knn_neighbors(),
            "knn uses mode imputation"
        );
    }

    let mut out = match options.strategy {
        Strategy::Drop => {
            if options.columns.as_ref().is_some_and(|c| !c.is_empty()) {
                dataset.filter_rows(|row| {
                    !targets
                        .iter()
                        .any(|&idx| row.get(idx).is_some_and(Value::is_missing))
                })
            } else {
                dataset.filter_rows(|row| !row.iter().any(Value::is_missing))
            }
        }
        Strategy::ForwardFill | Strategy::BackwardFill => {
            let mut out = dataset.clone();
            for &idx in &targets {
                carry_fill(&mut out.rows, idx, options.strategy == Strategy::BackwardFill);
            }
            out
        }
        Strategy::Mean | Strategy::Median | Strategy::Mode | Strategy::Knn => {
            let mut out = dataset.clone();
            for &idx in &targets {
                match fill_value(dataset, idx, options.strategy) {
                    Some(fill) => {
                        debug!(column = %dataset.headers[idx], %fill, "filling column");
                        apply_fill(&mut out.rows, idx, &fill);
                    }
                    None => debug!(column = %dataset.headers[idx], "no fill value"),
                }
            }
            out
        }
    };

    out.recompute_stats();
    debug!(
        strategy = %options.strategy,
        rows_before = dataset.row_count(),
        rows_after = out.row_count(),
        missing_after = out.total_missing(),
        "clean finished"
    );
    out
}

/// Fill value for column `idx` under a statistic-based strategy.
///
/// `None` when the column has no non-empty values, or when `Mean`/`Median` meet a text column.
pub fn fill_value(dataset: &DataSet, idx: usize, strategy: Strategy) -> Option<Value> {
    let present: Vec<&Value> = dataset
        .column_values(idx)
        .filter(|v| !v.is_missing())
        .collect();
    if present.is_empty() {
        return None;
    }

    let fill = match strategy {
        Strategy::Mean => numeric_values(&present)
            .and_then(|xs| mean(&xs))
            .map(Value::Number),
        Strategy::Median => numeric_values(&present)
            .and_then(|xs| median(&xs))
            .map(Value::Number),
        Strategy::Mode | Strategy::Knn => column_mode(&present),
        Strategy::Drop | Strategy::ForwardFill | Strategy::BackwardFill => None,
    };

    fill.map(|v| match v {
        Value::Number(n) => Value::Number(round_to(n, FILL_DECIMALS)),
        text => text,
    })
}

/// Header indexes selected by `columns` (all headers when `None` or empty).
fn target_columns(dataset: &DataSet, columns: Option<&[String]>) -> Vec<usize> {
    match columns {
        None | Some([]) => (0..dataset.column_count()).collect(),
        Some(wanted) => {
            for name in wanted {
                if dataset.column_index(name).is_none() {
                    debug!(column = %name, "requested column not in dataset, skipped");
                }
            }
            dataset
                .headers
                .iter()
                .enumerate()
                .filter(|(_, h)| wanted.contains(*h))
                .map(|(idx, _)| idx)
                .collect()
        }
    }
}

fn apply_fill(rows: &mut [Vec<Value>], idx: usize, fill: &Value) {
    for row in rows {
        if let Some(v) = row.get_mut(idx) {
            if v.is_missing() {
                *v = fill.clone();
            }
        }
    }
}

fn carry_fill(rows: &mut [Vec<Value>], idx: usize, backward: bool) {
    let mut last: Option<Value> = None;
    let mut visit = |row: &mut Vec<Value>| match row.get_mut(idx) {
        Some(v) if v.is_missing() => {
            if let Some(prev) = &last {
                *v = prev.clone();
            }
        }
        Some(v) => last = Some(v.clone()),
        None => {}
    };

    if backward {
        rows.iter_mut().rev().for_each(&mut visit);
    } else {
        rows.iter_mut().for_each(&mut visit);
    }
}
