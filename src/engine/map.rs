//! Map Builder
//!
//! Converts a flat collection of records into a keyed lookup map.
//! Any duplicate key fails the whole batch.

use crate::error::ConvertError;
use crate::types::{key_string, JmiMap, Record};
use serde_json::Value;
use tracing::debug;

/// Convert flat JMI data (a JSON array of objects) into a map keyed by `key_field`.
pub fn to_map(data: Value, key_field: &str) -> Result<JmiMap, ConvertError> {
    let records = into_records(data)?;
    records_to_map(records, key_field)
}

/// Split a flat JSON array into its records.
pub fn into_records(data: Value) -> Result<Vec<Record>, ConvertError> {
    let items = match data {
        Value::Array(items) => items,
        _ => {
            return Err(ConvertError::InvalidFormat(
                "data is not in flat JMI format (expected an array)".to_string(),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(ConvertError::InvalidFormat(format!(
                "record at index {} is not an object (found {})",
                index,
                json_type_name(&other)
            ))),
        })
        .collect()
}

/// Build the map from already split records, consuming them.
pub fn records_to_map(records: Vec<Record>, key_field: &str) -> Result<JmiMap, ConvertError> {
    let mut map = JmiMap::new();
    let count = records.len();

    for (index, record) in records.into_iter().enumerate() {
        let key = record_key(&record, key_field).map_err(|reason| {
            ConvertError::InvalidFormat(format!("record at index {}: {}", index, reason))
        })?;

        if map.contains_key(&key) {
            return Err(ConvertError::InvalidFormat(format!(
                "duplicate keys exist: '{}'",
                key
            )));
        }
        map.insert(key, Value::Object(record));
    }

    debug!(records = count, key_field, "built JMI map");
    Ok(map)
}

/// Read the key of a record, describing why it is unusable on failure.
pub(crate) fn record_key(record: &Record, key_field: &str) -> Result<String, String> {
    match record.get(key_field) {
        None => Err(format!("missing key field '{}'", key_field)),
        Some(value) => key_string(value).ok_or_else(|| {
            format!(
                "key field '{}' must be a string or number (found {})",
                key_field,
                json_type_name(value)
            )
        }),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
