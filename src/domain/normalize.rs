//! Input normalization for untyped request fields.
//!
//! Every inbound text field passes through here before validation, so that a
//! missing, non-string, or whitespace-only value degrades to `""` instead of
//! surfacing as a parse error.

use serde_json::{Map, Value};

/// Returns the trimmed string if `value` is a JSON string, otherwise `""`.
pub fn normalize(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// Same contract as [`normalize`] for values that are already optional text
/// (headers, configuration).
pub fn normalize_str(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Normalizes the named field of an untyped object.
pub fn field(fields: &Map<String, Value>, name: &str) -> String {
    normalize(fields.get(name))
}

/// Length in characters, the unit every length limit is expressed in.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}
