//! `missing-data-cleaner` loads small comma-delimited tables, reports where values are missing,
//! fills or drops them with a chosen strategy and exports the result as CSV.
//!
//! The library is UI-agnostic: a presentation layer (web page, desktop app, the bundled CLI) owns a
//! [`session::Session`] and calls into it on user actions.
//!
//! ## What you can load
//!
//! - `.csv` and `.txt` files (case-insensitive extension), read as UTF-8 text
//! - the first non-blank line is the header; every later non-blank line is a row
//! - cells are text or numbers; an empty cell is a missing value
//!
//! ## Quick example: analyze and clean
//!
//! ```rust
//! use missing_data_cleaner::ingestion::parse_table;
//! use missing_data_cleaner::processing::{analyze, clean, CleaningOptions, Strategy};
//! use missing_data_cleaner::types::Value;
//!
//! # fn main() -> Result<(), missing_data_cleaner::CleanerError> {
//! let ds = parse_table("name,age,city\nAnn,30,\nBob,,Rome\n,25,Oslo\n")?;
//!
//! let summary = analyze(&ds);
//! assert_eq!(summary.total_missing(), 3);
//! assert_eq!(summary.per_column[1].missing_percentage, 33.3);
//!
//! let cleaned = clean(&ds, &CleaningOptions::new(Strategy::Mode));
//! assert_eq!(cleaned.rows[1][1], Value::Number(30.0));
//! assert_eq!(cleaned.rows[0][2], Value::Text("Rome".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: load a file and export
//!
//! ```no_run
//! use missing_data_cleaner::processing::{CleaningOptions, Strategy};
//! use missing_data_cleaner::session::{Session, SessionOptions};
//!
//! # fn main() -> Result<(), missing_data_cleaner::CleanerError> {
//! let mut session = Session::new(SessionOptions::default());
//! session.load_path("survey.csv")?;
//! session.clean(&CleaningOptions::new(Strategy::Median))?;
//!
//! let download = session.download()?;
//! std::fs::write(&download.file_name, &download.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: file selection, loading and the CSV tokenizer
//! - [`types`]: cell values and the in-memory dataset
//! - [`processing`]: missing-value analysis, imputation, profiling and reductions
//! - [`export`]: CSV serialization and download naming
//! - [`session`]: state holder for a presentation layer
//! - [`observability`]: observer hooks for session events
//! - [`error`]: error types shared by all of the above

pub mod error;
pub mod export;
pub mod ingestion;
pub mod observability;
pub mod processing;
pub mod session;
pub mod types;

pub use error::{CleanerError, CleanerResult};
