//! Loading entrypoints and the CSV tokenizer.
//!
//! Most callers should use [`load_from_path`] (from [`unified`]) which:
//!
//! - rejects selections that are not exactly one `.csv`/`.txt` file
//! - reads the file as UTF-8 text
//! - parses it into an in-memory [`crate::types::DataSet`]
//!
//! The line tokenizer and table parser live in [`csv`].

pub mod csv;
pub mod unified;

pub use csv::{parse_line, parse_table};
pub use unified::{display_name, load_from_path, load_from_reader, validate_selection, FileKind};
