// ============================================================
// CSV ROW
// ============================================================
// Fixed 15-column layout: timestamp followed by the submission fields

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

use super::sanitize_cell;
use crate::domain::submission::{Submission, FIELD_NAMES};

/// Column names, in file order.
pub const COLUMNS: [&str; 15] = [
    "timestamp",
    "parent_name",
    "email",
    "phone",
    "student_name",
    "current_grade",
    "target_entry_year",
    "region",
    "boarding",
    "school_size",
    "standardized_tests",
    "target_ranking_tier",
    "interests",
    "budget",
    "notes",
];

/// The header line of the submissions file, without a trailing newline.
pub fn header_line() -> String {
    COLUMNS.join(",")
}

/// One sanitized row ready to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    cells: Vec<String>,
}

impl CsvRow {
    pub fn from_submission(submission: &Submission, received_at: DateTime<Utc>) -> Self {
        let timestamp = received_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        let cells = std::iter::once(timestamp)
            .chain(FIELD_NAMES.iter().map(|name| {
                submission
                    .field(name)
                    .map(|value| value.cell_text())
                    .unwrap_or_default()
            }))
            .map(|text| sanitize_cell(&text))
            .collect();

        Self { cells }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

impl fmt::Display for CsvRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cells.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::submission::FieldValue;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_header_matches_field_order() {
        assert_eq!(COLUMNS[0], "timestamp");
        assert_eq!(&COLUMNS[1..], &FIELD_NAMES[..]);
        assert!(header_line().starts_with("timestamp,parent_name,email,phone,student_name,"));
        assert!(header_line().ends_with(",interests,budget,notes"));
    }

    #[test]
    fn test_minimal_submission_row() {
        let submission = Submission {
            parent_name: Some(FieldValue::text("Jo, Ann")),
            email: Some(FieldValue::text("a@b.com")),
            student_name: Some(FieldValue::text("Kid")),
            ..Default::default()
        };
        let row = CsvRow::from_submission(&submission, fixed_time());

        assert_eq!(row.cells().len(), 15);
        assert_eq!(
            row.to_string(),
            "2025-03-01T09:30:00.000Z,\"Jo, Ann\",a@b.com,,Kid,,,,,,,,,,"
        );
    }

    #[test]
    fn test_lists_join_before_sanitizing() {
        let submission = Submission {
            region: Some(FieldValue::list(["North", "South, East"])),
            standardized_tests: Some(FieldValue::Text("SSAT".into())),
            ..Default::default()
        };
        let row = CsvRow::from_submission(&submission, fixed_time());

        assert_eq!(row.cells()[7], "\"North; South, East\"");
        assert_eq!(row.cells()[10], "SSAT");
    }

    #[test]
    fn test_every_cell_is_sanitized() {
        let submission = Submission {
            notes: Some(FieldValue::text("line one\nline two")),
            budget: Some(FieldValue::text("-5000")),
            ..Default::default()
        };
        let row = CsvRow::from_submission(&submission, fixed_time());

        assert_eq!(row.cells()[14], "line one line two");
        assert_eq!(row.cells()[13], "'-5000");
    }
}
