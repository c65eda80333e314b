// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Cell sanitization, row layout and append-only document composition
// No I/O, no async

mod cell;
mod csv_row;
mod document;

pub use cell::sanitize_cell;
pub use csv_row::{header_line, CsvRow, COLUMNS};
pub use document::append_row;
