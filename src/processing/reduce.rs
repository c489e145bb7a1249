//! Column reductions for [`crate::types::DataSet`].
//!
//! These are the building blocks of both the imputation engine (mean/median/mode fill values)
//! and the column profiler.

use std::collections::HashMap;
use std::hash::Hash;

use statrs::statistics::Statistics;

use crate::types::{DataSet, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count non-missing values.
    Count,
    /// Sum of a numeric column.
    Sum,
    /// Minimum of a numeric column.
    Min,
    /// Maximum of a numeric column.
    Max,
    /// Arithmetic mean of a numeric column.
    Mean,
    /// Median of a numeric column.
    Median,
    /// Most frequent value (numeric or text).
    Mode,
    /// Sample standard deviation of a numeric column.
    StdDev,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist.
/// - Missing values are ignored.
/// - Numeric ops return the missing sentinel when the column has no values or any non-numeric
///   value.
/// - For `Count`, always returns `Some(Value::Number(non_missing_count))`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.column_index(column)?;
    let present: Vec<&Value> = dataset
        .column_values(idx)
        .filter(|v| !v.is_missing())
        .collect();

    if op == ReduceOp::Count {
        return Some(Value::Number(present.len() as f64));
    }
    if op == ReduceOp::Mode {
        return Some(column_mode(&present).unwrap_or_else(Value::missing));
    }

    let result = numeric_values(&present).and_then(|xs| match op {
        ReduceOp::Sum => (!xs.is_empty()).then(|| xs.iter().sum::<f64>()),
        ReduceOp::Min => xs.iter().copied().reduce(f64::min),
        ReduceOp::Max => xs.iter().copied().reduce(f64::max),
        ReduceOp::Mean => mean(&xs),
        ReduceOp::Median => median(&xs),
        ReduceOp::StdDev => std_dev(&xs),
        ReduceOp::Count | ReduceOp::Mode => None,
    });

    Some(result.map(Value::Number).unwrap_or_else(Value::missing))
}

/// Parse every value as a finite number; `None` if any one fails.
pub fn numeric_values(values: &[&Value]) -> Option<Vec<f64>> {
    values.iter().map(|v| v.as_number()).collect()
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().mean())
}

/// Median: middle element (odd count) or mean of the two middle elements (even count).
pub fn median(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation, `None` for fewer than two values.
pub fn std_dev(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    Some(xs.iter().std_dev())
}

/// Most frequent item by `key`.
///
/// Ties go to the item whose key appeared first in `items`.
pub fn mode_by<T, K, F>(items: &[T], key: F) -> Option<&T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut counts: HashMap<K, usize> = HashMap::new();
    let mut order: Vec<usize> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let count = counts.entry(key(item)).or_insert(0);
        if *count == 0 {
            order.push(i);
        }
        *count += 1;
    }

    let mut best: Option<(usize, usize)> = None;
    for i in order {
        let count = counts.get(&key(&items[i])).copied().unwrap_or(0);
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((i, count));
        }
    }
    best.map(|(i, _)| &items[i])
}

/// Most frequent value of a column's non-missing values.
///
/// A fully numeric column is compared by numeric value (`1` and `1.0` are equal); otherwise by
/// text.
pub(crate) fn column_mode(present: &[&Value]) -> Option<Value> {
    match numeric_values(present) {
        Some(xs) => mode_by(&xs, |x| x.to_bits()).map(|x| Value::Number(*x)),
        None => {
            let texts: Vec<String> = present.iter().map(|v| v.as_text().into_owned()).collect();
            mode_by(&texts, |s| s.clone()).map(|s| Value::Text(s.clone()))
        }
    }
}

/// Round `v` to `decimals` places.
pub fn round_to(v: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = v * factor;
    if !scaled.is_finite() {
        return v;
    }
    scaled.round() / factor
}
