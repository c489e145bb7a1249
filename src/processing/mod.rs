//! In-memory analysis and cleaning.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion. Every
//! function here is pure: it reads a dataset and returns new values.
//!
//! - [`analyze()`]: per-column missing counts and percentages
//! - [`clean()`]: imputation (drop/mean/median/mode/knn/ffill/bfill)
//! - [`profile()`] / [`recommend_knn()`]: column statistics
//! - [`reduce()`]: single-column reductions
//!
//! ## Example: analyze → clean
//!
//! ```rust
//! use missing_data_cleaner::ingestion::parse_table;
//! use missing_data_cleaner::processing::{analyze, clean, CleaningOptions, Strategy};
//! use missing_data_cleaner::types::Value;
//!
//! let ds = parse_table("name,age\nAnn,30\nBob,\n,25\n").unwrap();
//!
//! let summary = analyze(&ds);
//! assert_eq!(summary.total_rows, 3);
//! assert_eq!(summary.per_column[1].missing_count, 1);
//!
//! let cleaned = clean(&ds, &CleaningOptions::new(Strategy::Mean));
//! assert_eq!(cleaned.rows[1][1], Value::Number(27.5));
//! // `name` is not numeric, so `mean` leaves it empty.
//! assert!(cleaned.rows[2][0].is_missing());
//! ```

pub mod analyze;
pub mod impute;
pub mod profile;
pub mod reduce;

pub use analyze::{analyze, ColumnMissing, MissingSummary};
pub use impute::{
    clean, fill_value, parse_knn_neighbors, CleaningOptions, Strategy, DEFAULT_KNN_NEIGHBORS,
};
pub use profile::{
    profile, recommend_knn, ColumnKind, ColumnProfile, KnnRecommendation, NumericSummary,
};
pub use reduce::{reduce, ReduceOp};
