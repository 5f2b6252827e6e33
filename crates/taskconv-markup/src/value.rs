//! Typed access into schema-less descriptor values
//!
//! A descriptor is a JSON-like tree. Locations are reached by convention,
//! so every accessor here either returns the expected shape, reports the
//! location as absent, or fails with a [`ShapeError`] naming the path.

use crate::error::ShapeError;
use serde_json::{Map, Value};

/// One task's configuration record: a mapping from string keys to values
pub type Descriptor = Map<String, Value>;

/// Human-readable name of a value's shape
#[must_use]
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Join a parent path and a key with a dot
#[must_use]
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Truthiness of a descriptor value
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` are falsy; everything else is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// View a value as a mapping
///
/// # Errors
/// `ShapeError` if `value` is not a mapping
pub fn as_mapping_mut<'a>(value: &'a mut Value, path: &str) -> Result<&'a mut Descriptor, ShapeError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ShapeError::new(path, "mapping", other)),
    }
}

/// Get the mapping stored under `key`, if any
///
/// Absent and `null` values both read as `Ok(None)`.
///
/// # Errors
/// `ShapeError` if the value is present with another shape
pub fn mapping_mut<'a>(
    scope: &'a mut Descriptor,
    key: &str,
    parent: &str,
) -> Result<Option<&'a mut Descriptor>, ShapeError> {
    match scope.get_mut(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(ShapeError::new(join_path(parent, key), "mapping", other)),
    }
}

/// Get the sequence stored under `key`, if any
///
/// Absent and `null` values both read as `Ok(None)`.
///
/// # Errors
/// `ShapeError` if the value is present with another shape
pub fn sequence_mut<'a>(
    scope: &'a mut Descriptor,
    key: &str,
    parent: &str,
) -> Result<Option<&'a mut Vec<Value>>, ShapeError> {
    match scope.get_mut(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(seq)) => Ok(Some(seq)),
        Some(other) => Err(ShapeError::new(join_path(parent, key), "sequence", other)),
    }
}
