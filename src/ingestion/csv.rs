//! CSV parsing.
//!
//! The tokenizer is deliberately small: double quotes only toggle "inside quotes" mode (so commas
//! inside quotes do not split fields) and are never part of the output. A doubled quote is two
//! toggles, not an escaped quote.

use tracing::debug;

use crate::error::{CleanerError, CleanerResult};
use crate::types::{DataSet, Value};

/// Split a single line into trimmed fields.
///
/// Never fails and always returns at least one field (an empty line yields `[""]`).
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_owned());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_owned());

    fields
}

/// Parse delimited text into a [`DataSet`].
///
/// Rules:
///
/// - A leading UTF-8 byte order mark is dropped.
/// - Lines that are empty after trimming are discarded (including a trailing blank line).
/// - The first remaining line is the header; every following line is a row.
/// - Rows are kept as parsed, even when their field count differs from the header.
///
/// Fails with [`CleanerError::Parse`] when no header line remains.
pub fn parse_table(content: &str) -> CleanerResult<DataSet> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    let headers = match lines.next() {
        Some(line) => parse_line(line),
        None => return Err(CleanerError::parse("no header line found (content is empty)")),
    };

    let rows: Vec<Vec<Value>> = lines
        .map(|line| parse_line(line).into_iter().map(Value::Text).collect())
        .collect();

    let ragged = rows.iter().filter(|r| r.len() != headers.len()).count();
    if ragged > 0 {
        debug!(
            ragged,
            columns = headers.len(),
            "rows with a field count different from the header kept as-is"
        );
    }

    Ok(DataSet::new(headers, rows))
}
