//! Shape validation for metadata server responses.
//!
//! Validation runs on the raw JSON value before it is deserialized, so that a
//! rejected body produces a reason naming the offending path instead of a
//! generic serde message.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::TableSchema;
use crate::error::{SchemaError, SchemaResult};

const RLS_FLAGS: [&str; 4] = ["select", "insert", "update", "delete"];

/// Parses and validates a response body for `table`.
pub fn parse_table_schema(table: &str, body: &str) -> SchemaResult<TableSchema> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SchemaError::shape(table, format!("body is not valid JSON: {e}")))?;
    validate_value(table, value)
}

/// Validates an already parsed JSON value for `table`.
pub fn validate_value(table: &str, value: Value) -> SchemaResult<TableSchema> {
    check_shape(table, &value).map_err(|reason| SchemaError::shape(table, reason))?;

    serde_json::from_value(value).map_err(|e| SchemaError::shape(table, e.to_string()))
}

fn check_shape(requested: &str, value: &Value) -> Result<(), String> {
    let root = value
        .as_object()
        .ok_or_else(|| format!("expected an object, found {}", kind(value)))?;

    let name = require_str(root, "table", "table")?;
    if name.trim().is_empty() {
        return Err("table must not be empty".to_string());
    }
    if name != requested {
        return Err(format!("table is '{name}', expected '{requested}'"));
    }

    let columns = match root.get("columns") {
        Some(Value::Array(columns)) => columns,
        Some(other) => return Err(format!("columns: expected an array, found {}", kind(other))),
        None => return Err("columns is missing".to_string()),
    };

    let mut seen = HashSet::new();
    for (index, column) in columns.iter().enumerate() {
        let name = check_column(index, column)?;
        if !seen.insert(name) {
            return Err(format!("columns[{index}].name: duplicate column '{name}'"));
        }
    }

    let rls = match root.get("rls") {
        Some(Value::Object(rls)) => rls,
        Some(other) => return Err(format!("rls: expected an object, found {}", kind(other))),
        None => return Err("rls is missing".to_string()),
    };
    for flag in RLS_FLAGS {
        match rls.get(flag) {
            Some(Value::Bool(_)) => {}
            Some(other) => {
                return Err(format!("rls.{flag}: expected a boolean, found {}", kind(other)))
            }
            None => return Err(format!("rls.{flag} is missing")),
        }
    }

    for (key, required) in [("indexes", ["name"]), ("triggers", ["name"])] {
        check_descriptor_list(root, key, &required)?;
    }

    Ok(())
}

fn check_column(index: usize, value: &Value) -> Result<&str, String> {
    let path = format!("columns[{index}]");
    let column = value
        .as_object()
        .ok_or_else(|| format!("{path}: expected an object, found {}", kind(value)))?;

    let name = require_str(column, "name", &format!("{path}.name"))?;
    if name.is_empty() {
        return Err(format!("{path}.name must not be empty"));
    }
    require_str(column, "type", &format!("{path}.type"))?;

    for flag in ["primary", "not_null"] {
        optional(column, flag, &path, "a boolean", Value::is_boolean)?;
    }
    for text in ["foreign_key", "default", "check"] {
        optional(column, text, &path, "a string", Value::is_string)?;
    }
    optional(column, "enum_values", &path, "an array of strings", |v| {
        v.as_array()
            .is_some_and(|items| items.iter().all(Value::is_string))
    })?;

    Ok(name)
}

fn check_descriptor_list(
    root: &Map<String, Value>,
    key: &str,
    required: &[&str],
) -> Result<(), String> {
    let items = match root.get(key) {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Array(items)) => items,
        Some(other) => return Err(format!("{key}: expected an array, found {}", kind(other))),
    };

    for (index, item) in items.iter().enumerate() {
        let path = format!("{key}[{index}]");
        let object = item
            .as_object()
            .ok_or_else(|| format!("{path}: expected an object, found {}", kind(item)))?;
        for field in required {
            require_str(object, field, &format!("{path}.{field}"))?;
        }
    }
    Ok(())
}

fn require_str<'a>(object: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a str, String> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(format!("{path}: expected a string, found {}", kind(other))),
        None => Err(format!("{path} is missing")),
    }
}

fn optional(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
    expected: &str,
    accept: impl Fn(&Value) -> bool,
) -> Result<(), String> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(()),
        Some(value) if accept(value) => Ok(()),
        Some(other) => Err(format!("{path}.{key}: expected {expected}, found {}", kind(other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
