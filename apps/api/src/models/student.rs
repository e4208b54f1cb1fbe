use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Largest batch accepted, both per uploaded file and per generation request.
pub const MAX_STUDENTS: usize = 50;

/// One student's classroom observations, normalized onto the fixed schema.
///
/// Only `name` is required; the other fields are free text and may be empty.
/// Fields arrive from browser clients: `null` reads as empty, numbers and
/// booleans are kept as their text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub good: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub bad: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub suggestion: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub extra: String,
}

impl StudentRecord {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Reads any JSON scalar as text. `null`, arrays and objects become empty.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Reads a student list. Anything other than an array is an empty list;
/// entries that are not objects become nameless records.
pub fn lenient_students<'de, D>(deserializer: D) -> Result<Vec<StudentRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries,
        _ => return Ok(Vec::new()),
    };

    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            Value::Object(_) => serde_json::from_value(entry).unwrap_or_default(),
            _ => StudentRecord::default(),
        })
        .collect())
}

/// Generated feedback for one student, or a flagged placeholder on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    pub name: String,
    pub report: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl ReportResult {
    pub fn generated(name: &str, report: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            report: report.trim().to_string(),
            error: false,
        }
    }

    pub fn failed(name: &str, placeholder: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            report: placeholder.to_string(),
            error: true,
        }
    }
}
