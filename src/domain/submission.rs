use crate::domain::error::{AppError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Submission fields in the order they appear as CSV columns.
pub const FIELD_NAMES: [&str; 14] = [
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

/// Fields that must be present and non-blank, checked in this order.
pub const REQUIRED_FIELDS: [&str; 3] = ["parent_name", "email", "student_name"];

/// A single form value: one string, or the ordered values of a repeated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(value) => value.trim().is_empty(),
            FieldValue::List(values) => values.iter().all(|v| v.trim().is_empty()),
        }
    }

    /// Text written into the CSV cell before sanitization.
    pub fn cell_text(&self) -> String {
        match self {
            FieldValue::Text(value) => value.clone(),
            FieldValue::List(values) => values.join("; "),
        }
    }

    fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) => FieldValue::List(items.iter().map(scalar_text).collect()),
            other => FieldValue::Text(scalar_text(&other)),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(FieldValue::from_json)
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One survey submission. Absent keys stay `None` and render as empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_grade: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_entry_year: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boarding: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_size: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standardized_tests: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ranking_tier: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<FieldValue>,
}

impl Submission {
    /// Parses a request body, choosing the format from the `Content-Type` header.
    ///
    /// JSON and url-encoded forms are accepted. Any other content type is read
    /// as JSON when the body is non-empty and as an empty submission otherwise.
    pub fn from_body(content_type: &str, raw: &[u8]) -> Result<Self> {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("application/x-www-form-urlencoded") {
            return Self::from_form_pairs(url::form_urlencoded::parse(raw).into_owned());
        }
        Self::from_json_slice(raw)
    }

    pub fn from_json_slice(raw: &[u8]) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(raw).map_err(|_| invalid_body())
    }

    /// Builds a submission from name/value pairs, merging repeated names into a list.
    pub fn from_form_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_map(merge_entries(pairs))
    }

    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(map)).map_err(|_| invalid_body())
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        match name {
            "parent_name" => self.parent_name.as_ref(),
            "email" => self.email.as_ref(),
            "phone" => self.phone.as_ref(),
            "student_name" => self.student_name.as_ref(),
            "current_grade" => self.current_grade.as_ref(),
            "target_entry_year" => self.target_entry_year.as_ref(),
            "region" => self.region.as_ref(),
            "boarding" => self.boarding.as_ref(),
            "school_size" => self.school_size.as_ref(),
            "standardized_tests" => self.standardized_tests.as_ref(),
            "target_ranking_tier" => self.target_ranking_tier.as_ref(),
            "interests" => self.interests.as_ref(),
            "budget" => self.budget.as_ref(),
            "notes" => self.notes.as_ref(),
            _ => None,
        }
    }

    /// Fails on the first required field that is missing or blank.
    pub fn validate_required(&self) -> Result<()> {
        for name in REQUIRED_FIELDS {
            let present = self.field(name).map(|v| !v.is_blank()).unwrap_or(false);
            if !present {
                return Err(AppError::ValidationError(format!(
                    "Missing required field: {}",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Collects name/value pairs into a JSON object. The first occurrence of a
/// name is kept as a string; later ones turn it into an ordered array.
pub fn merge_entries<I, K, V>(pairs: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut map = Map::new();
    for (key, value) in pairs {
        let key = key.into();
        let value = Value::String(value.into());
        match map.get_mut(&key) {
            None => {
                map.insert(key, value);
            }
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
    map
}

fn invalid_body() -> AppError {
    AppError::ParseError("Invalid request body".to_string())
}
