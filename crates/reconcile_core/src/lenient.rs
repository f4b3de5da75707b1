//! Forgiving field decoders for backend payloads
//!
//! The component table is model-generated JSON, so any field can arrive
//! with the wrong type. These helpers are used with
//! `#[serde(default, deserialize_with = "...")]` and never fail: a value
//! of the wrong type decodes as the field's empty value.

use crate::types::{ComponentId, Status};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn value<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer)
}

/// Strings pass through, numbers and booleans are rendered as text
fn as_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Nullable text field
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    value(deserializer).map(as_text)
}

/// Required text field; anything unreadable becomes `""`
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    value(deserializer).map(|v| as_text(v).unwrap_or_default())
}

/// Nullable number; numeric strings such as `"2"` are accepted
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    value(deserializer).map(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Tri-state flag: only a real JSON boolean counts
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    value(deserializer).map(|v| v.as_bool())
}

pub fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    flag(deserializer).map(|b| b.unwrap_or(false))
}

pub fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    value(deserializer).map(|v| v.as_u64().and_then(|n| u32::try_from(n).ok()))
}

pub fn count_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    count(deserializer).map(|n| n.unwrap_or(0))
}

/// Unknown or missing status names classify the record as new
pub fn status<'de, D>(deserializer: D) -> Result<Status, D::Error>
where
    D: Deserializer<'de>,
{
    value(deserializer).map(|v| {
        v.as_str()
            .and_then(|s| s.parse::<Status>().ok())
            .unwrap_or_default()
    })
}

/// Record identity; a missing or unusable id gets a fresh one
pub fn component_id<'de, D>(deserializer: D) -> Result<ComponentId, D::Error>
where
    D: Deserializer<'de>,
{
    value(deserializer).map(|v| match as_text(v) {
        Some(id) if !id.is_empty() => ComponentId(id),
        _ => ComponentId::fresh(),
    })
}

/// A list whose unreadable entries are skipped; a non-list is empty
pub fn rows<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = value(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(row) => Some(row),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping unreadable row");
                None
            }
        })
        .collect())
}

/// An optional object that decodes as absent when unreadable
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match value(deserializer)? {
        Value::Null => Ok(None),
        other => match serde_json::from_value(other) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable object");
                Ok(None)
            }
        },
    }
}

pub fn object_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    optional(deserializer).map(Option::unwrap_or_default)
}

/// Epoch milliseconds; fractional values are truncated
pub fn millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    value(deserializer).map(|v| {
        v.as_i64()
            .or_else(|| v.as_f64().map(|f| f as i64))
            .unwrap_or(0)
    })
}

/// Cell values of a row map, rendered as text
pub fn cells<'de, D>(deserializer: D) -> Result<Vec<crate::types::Table3Row>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = value(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(
                map.into_iter()
                    .filter_map(|(key, cell)| as_text(cell).map(|text| (key, text)))
                    .collect(),
            ),
            _ => None,
        })
        .collect())
}
