// ============================================================
// CSV DOCUMENT
// ============================================================

use super::{header_line, CsvRow};

/// Appends `row` to the current file content.
///
/// `existing` is `None` when the file does not exist yet. Existing rows are
/// never touched; the header is written only when the file is missing or
/// holds nothing but whitespace.
pub fn append_row(existing: Option<&str>, row: &CsvRow) -> String {
    match existing.map(str::trim_end) {
        Some(content) if !content.is_empty() => format!("{}\n{}\n", content, row),
        _ => format!("{}\n{}\n", header_line(), row),
    }
}
