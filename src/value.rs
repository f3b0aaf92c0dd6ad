//! Value coercion helpers
//!
//! Template data is plain `serde_json::Value`. Null is the absent value and
//! fills as the empty string almost everywhere. These helpers do the
//! per-node domain checks so each template only handles its own shape.

use crate::error::{FabError, Result};
use serde_json::{Map, Value};

/// Short name of a value's variant, for error messages
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Array items, `None` for null, error for anything else
pub fn as_sequence<'v>(value: &'v Value, template: &'static str) -> Result<Option<&'v [Value]>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => Ok(Some(items)),
        other => Err(FabError::TypeMismatch {
            template,
            expected: "array",
            found: kind_name(other),
        }),
    }
}

/// Object fields, `None` for null, error for anything else
pub fn as_record<'v>(
    value: &'v Value,
    template: &'static str,
) -> Result<Option<&'v Map<String, Value>>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(fields) => Ok(Some(fields)),
        other => Err(FabError::TypeMismatch {
            template,
            expected: "object",
            found: kind_name(other),
        }),
    }
}

/// String contents, `None` for null, error for anything else
pub fn as_text<'v>(value: &'v Value, template: &'static str) -> Result<Option<&'v str>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(FabError::TypeMismatch {
            template,
            expected: "string",
            found: kind_name(other),
        }),
    }
}

/// Signed integer from an integer number or a decimal string
pub fn as_integer(value: &Value, template: &'static str) -> Result<Option<i64>> {
    let mismatch = |found| FabError::TypeMismatch {
        template,
        expected: "integer",
        found,
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_i64().map(Some).ok_or_else(|| mismatch(kind_name(value))),
        Value::String(s) => s.parse::<i64>().map(Some).map_err(|_| mismatch("string")),
        other => Err(mismatch(kind_name(other))),
    }
}
