//! Missing-value analysis.

use serde::{Deserialize, Serialize};

use crate::types::DataSet;

use super::reduce::round_to;

/// Missing-value figures for one header column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub name: String,
    pub missing_count: usize,
    /// `missing_count / total_rows * 100`, rounded to one decimal. NaN when there are no rows.
    pub missing_percentage: f64,
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingSummary {
    pub total_rows: usize,
    pub total_columns: usize,
    /// Missing fields across the dataset, each counted once even when header names repeat.
    pub total_missing: usize,
    /// One entry per header column, in header order.
    pub per_column: Vec<ColumnMissing>,
}

impl MissingSummary {
    /// Missing fields across the dataset.
    ///
    /// Not the sum of `per_column`: duplicate header names each report the shared count.
    pub fn total_missing(&self) -> usize {
        self.total_missing
    }

    /// Columns that have at least one missing value.
    pub fn columns_with_missing(&self) -> impl Iterator<Item = &ColumnMissing> {
        self.per_column.iter().filter(|c| c.missing_count > 0)
    }
}

/// Summarize missing values per column from the dataset's stats.
///
/// With zero rows every percentage is NaN (0 / 0); callers rendering it should expect that.
pub fn analyze(dataset: &DataSet) -> MissingSummary {
    let total_rows = dataset.stats.total_rows;
    let per_column = dataset
        .headers
        .iter()
        .map(|name| {
            let missing_count = dataset.missing_count(name);
            ColumnMissing {
                name: name.clone(),
                missing_count,
                missing_percentage: round_to(missing_count as f64 / total_rows as f64 * 100.0, 1),
            }
        })
        .collect();

    MissingSummary {
        total_rows,
        total_columns: dataset.column_count(),
        total_missing: dataset.total_missing(),
        per_column,
    }
}
