//! CSV serialization and download packaging.
//!
//! Serialization goes through the `csv` writer with [`csv::QuoteStyle::Necessary`]: a field is
//! quoted only when it contains a comma, a line break or a double quote (internal quotes are
//! doubled). Numbers use their natural decimal form (`27.5`, `2`).

use std::io;
use std::path::Path;

use tracing::info;

use crate::error::{CleanerError, CleanerResult};
use crate::types::DataSet;

/// MIME type of exported files.
pub const CSV_MIME_TYPE: &str = "text/csv; charset=utf-8";

/// Suffix appended to the original file stem by default.
pub const DEFAULT_SUFFIX: &str = "_cleaned";

/// An exported dataset ready to be handed to a download surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Serialize `dataset` and derive the file name from `original_name` + `suffix`.
    pub fn new(dataset: &DataSet, original_name: &str, suffix: &str) -> CleanerResult<Self> {
        Ok(Self {
            file_name: to_download_name(original_name, suffix),
            mime_type: CSV_MIME_TYPE,
            bytes: to_bytes(dataset)?,
        })
    }
}

/// Serialize a dataset to CSV text: header line, one line per row, trailing line break.
///
/// Rows are written as-is even when their length differs from the header.
pub fn serialize_table(dataset: &DataSet) -> CleanerResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(&dataset.headers)?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(|v| v.as_text().into_owned()))?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes)
        .map_err(|e| CleanerError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// UTF-8 bytes of [`serialize_table`].
pub fn to_bytes(dataset: &DataSet) -> CleanerResult<Vec<u8>> {
    serialize_table(dataset).map(String::into_bytes)
}

/// Replace the last extension of `original` with `suffix + ".csv"` (or append it when there is no
/// extension).
///
/// An extension is a final `.` followed by at least one character that is neither `.` nor `/`.
pub fn to_download_name(original: &str, suffix: &str) -> String {
    format!("{}{suffix}.csv", strip_extension(original))
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos + 1 < name.len() && !name[pos + 1..].contains('/') => &name[..pos],
        _ => name,
    }
}

/// Write the serialized dataset to `path`.
pub fn write_to_path(dataset: &DataSet, path: impl AsRef<Path>) -> CleanerResult<()> {
    let path = path.as_ref();
    std::fs::write(path, to_bytes(dataset)?)?;
    info!(path = %path.display(), rows = dataset.row_count(), "dataset written");
    Ok(())
}
