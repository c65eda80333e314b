// ============================================================
// CELL SANITIZATION
// ============================================================

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAKS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());

static FORMULA_PREFIX_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[=+\-@]").unwrap());

/// Turns an arbitrary value into a single CSV-safe cell.
///
/// - runs of CR/LF collapse into one space, then the value is trimmed
/// - a leading `=`, `+`, `-` or `@` gets a `'` prefix so spreadsheets
///   do not evaluate it as a formula
/// - a value containing `,` or `"` is quoted, with inner quotes doubled
pub fn sanitize_cell(value: &str) -> String {
    let flattened = LINE_BREAKS_PATTERN.replace_all(value, " ");
    let mut cell = flattened.trim().to_string();

    if FORMULA_PREFIX_PATTERN.is_match(&cell) {
        cell.insert(0, '\'');
    }

    if cell.contains(',') || cell.contains('"') {
        cell = format!("\"{}\"", cell.replace('"', "\"\""));
    }

    cell
}
