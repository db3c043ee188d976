//! Field accessors for the generic string-keyed document shape.
//!
//! Decoding is strict and all-or-nothing: a missing or mistyped mandatory
//! field fails with `StoreError::Malformed` and no partial record is built.
//! Optional fields are lenient — absent or mistyped values read as `None`.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::store::StoreError;

/// The generic string-keyed, dynamically-typed document shape shared by the
/// store and by AI-response JSON parsing.
pub type Document = serde_json::Map<String, Value>;

pub fn require_str(doc: &Document, key: &str) -> Result<String, StoreError> {
    doc.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing(key))
}

pub fn require_i64(doc: &Document, key: &str) -> Result<i64, StoreError> {
    doc.get(key).and_then(Value::as_i64).ok_or_else(|| missing(key))
}

pub fn require_bool(doc: &Document, key: &str) -> Result<bool, StoreError> {
    doc.get(key).and_then(Value::as_bool).ok_or_else(|| missing(key))
}

/// Mandatory RFC 3339 timestamp field.
pub fn require_timestamp(doc: &Document, key: &str) -> Result<DateTime<Utc>, StoreError> {
    let raw = require_str(doc, key)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::Malformed(format!("field '{key}' is not a valid timestamp")))
}

pub fn require_array<'a>(doc: &'a Document, key: &str) -> Result<&'a Vec<Value>, StoreError> {
    doc.get(key).and_then(Value::as_array).ok_or_else(|| missing(key))
}

pub fn optional_str(doc: &Document, key: &str) -> Option<String> {
    doc.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Optional ISO calendar date (`YYYY-MM-DD`). An unparsable value reads as
/// `None` rather than failing the decode.
pub fn optional_date(doc: &Document, key: &str) -> Option<NaiveDate> {
    doc.get(key)
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// String array field, defaulting to empty when absent. Non-string elements
/// are skipped.
pub fn string_array(doc: &Document, key: &str) -> Vec<String> {
    doc.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// String-to-bool map field, defaulting to empty when absent.
pub fn bool_map(doc: &Document, key: &str) -> std::collections::HashMap<String, bool> {
    doc.get(key)
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_bool().map(|b| (k.clone(), b)))
                .collect()
        })
        .unwrap_or_default()
}

fn missing(key: &str) -> StoreError {
    StoreError::Malformed(format!("missing or mistyped field '{key}'"))
}
