//! Path-based loading.
//!
//! Most callers should use [`load_from_path`], which validates the file extension, reads the file
//! as UTF-8 text and parses it into a [`crate::types::DataSet`].
//!
//! - Only `.csv` and `.txt` files (case-insensitive) are accepted.
//! - Selections are validated with [`validate_selection`] before any parsing happens.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{CleanerError, CleanerResult};
use crate::types::DataSet;

use super::csv::parse_table;

/// Accepted input file kinds. Both are parsed as comma-delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Comma-separated values.
    Csv,
    /// Plain text holding comma-separated values.
    Txt,
}

impl FileKind {
    /// Parse a file kind from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    /// Infer the file kind from a path, rejecting unsupported extensions.
    pub fn from_path(path: &Path) -> CleanerResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                CleanerError::user_input(format!(
                    "please select a .csv or .txt file (no extension: {})",
                    path.display()
                ))
            })?;

        Self::from_extension(ext).ok_or_else(|| {
            CleanerError::user_input(format!(
                "please select a .csv or .txt file (got '.{ext}': {})",
                path.display()
            ))
        })
    }
}

/// Check that exactly one file was selected and that it has a supported extension.
///
/// Returns the single selected path.
pub fn validate_selection<P: AsRef<Path>>(paths: &[P]) -> CleanerResult<&Path> {
    match paths {
        [single] => {
            let path = single.as_ref();
            FileKind::from_path(path)?;
            Ok(path)
        }
        [] => Err(CleanerError::user_input("no file selected")),
        many => Err(CleanerError::user_input(format!(
            "please select a single file ({} selected)",
            many.len()
        ))),
    }
}

/// Load a `.csv`/`.txt` file into a [`DataSet`].
///
/// # Examples
///
/// ```no_run
/// use missing_data_cleaner::ingestion::load_from_path;
///
/// # fn main() -> Result<(), missing_data_cleaner::CleanerError> {
/// let ds = load_from_path("people.csv")?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load_from_path(path: impl AsRef<Path>) -> CleanerResult<DataSet> {
    let path = path.as_ref();
    let kind = FileKind::from_path(path)?;
    debug!(path = %path.display(), ?kind, "reading file");

    let content = std::fs::read_to_string(path)?;
    parse_table(&content)
}

/// Read all of `reader` as UTF-8 text and parse it into a [`DataSet`].
pub fn load_from_reader<R: Read>(mut reader: R) -> CleanerResult<DataSet> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_table(&content)
}

/// Final path component as a display name (falls back to the full path).
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
