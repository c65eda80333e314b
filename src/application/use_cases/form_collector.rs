use crate::domain::error::Result;
use crate::domain::submission::{merge_entries, Submission};
use serde_json::Value;

/// Fields trimmed before sending; everything else is sent as typed.
const TRIMMED_FIELDS: [&str; 3] = ["parent_name", "email", "student_name"];

/// What a submitted survey form holds at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    /// Every successful control as a name/value pair, in document order.
    pub entries: Vec<(String, String)>,
    /// Selected options of the `region` multi-select, or `None` when the form has no such control.
    pub region_selection: Option<Vec<String>>,
    /// Values of the checked `standardized_tests` checkboxes.
    pub checked_tests: Vec<String>,
}

impl FormSnapshot {
    pub fn entry(mut self, name: &str, value: &str) -> Self {
        self.entries.push((name.to_string(), value.to_string()));
        self
    }
}

/// Turns a submitted form into the payload posted to the append endpoint.
///
/// Repeated names become lists, `region` and `standardized_tests` are always
/// lists, and the three contact fields are trimmed. Nothing is validated here.
pub fn collect_submission(form: &FormSnapshot) -> Result<Submission> {
    let mut data = merge_entries(form.entries.iter().cloned());

    if let Some(selected) = &form.region_selection {
        data.insert("region".to_string(), string_array(selected));
    }
    data.insert(
        "standardized_tests".to_string(),
        string_array(&form.checked_tests),
    );

    for name in TRIMMED_FIELDS {
        if let Some(Value::String(value)) = data.get_mut(name) {
            *value = value.trim().to_string();
        }
    }

    Submission::from_map(data)
}

fn string_array(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}
