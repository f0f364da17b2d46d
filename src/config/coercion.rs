//! Conversion of raw values to declared field types
//!
//! Two entry points: [`coerce`] for values that already have a parsed shape
//! (file layers, schema defaults) and [`coerce_env`] for raw environment
//! strings. Both are pure.

use crate::config::FieldType;
use crate::error::Error;
use serde_json::{Number, Value};

/// Coercion failure without path context
///
/// Converted into an [`Error`] once the caller knows which path and which
/// layer the raw value came from.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("cannot convert {raw} to {target}")]
    Invalid { raw: String, target: FieldType },

    #[error("conversion of {raw} to {target} is not supported")]
    Unsupported { raw: String, target: FieldType },
}

impl CoercionError {
    /// Attach the path and source label the raw value belongs to
    pub fn with_context(self, path: &str, source_label: &str) -> Error {
        match self {
            CoercionError::Invalid { raw, target } => Error::TypeCoercion {
                path: path.to_string(),
                source_label: source_label.to_string(),
                raw,
                target: target.to_string(),
            },
            CoercionError::Unsupported { raw, target } => Error::UnsupportedConversion {
                path: path.to_string(),
                source_label: source_label.to_string(),
                raw,
                target: target.to_string(),
            },
        }
    }
}

fn invalid(raw: &Value, target: FieldType) -> CoercionError {
    CoercionError::Invalid {
        raw: raw.to_string(),
        target,
    }
}

/// Convert a parsed value to `target`
///
/// Strings are interpreted (`"yes"` → `true`, `"42"` → `42`, `"a, b"` →
/// `["a", "b"]`); native values of a compatible kind pass through, with
/// integers widened when a float is requested. `Null` passes through for
/// every target.
///
/// # Errors
///
/// Returns [`CoercionError::Invalid`] when the value cannot be read as
/// `target`.
///
/// # Example
///
/// ```
/// use layerconf::{coerce, FieldType};
/// use serde_json::json;
///
/// assert_eq!(coerce(&json!("on"), FieldType::Bool).unwrap(), json!(true));
/// assert_eq!(coerce(&json!(3), FieldType::Float).unwrap(), json!(3.0));
/// assert!(coerce(&json!("maybe"), FieldType::Bool).is_err());
/// ```
pub fn coerce(raw: &Value, target: FieldType) -> Result<Value, CoercionError> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    if let Value::String(s) = raw {
        if target == FieldType::Mapping {
            return Err(invalid(raw, target));
        }
        return coerce_str(s, target);
    }

    match target {
        FieldType::Bool if raw.is_boolean() => Ok(raw.clone()),
        FieldType::Int if raw.is_i64() || raw.is_u64() => Ok(raw.clone()),
        FieldType::Float => match raw {
            Value::Number(n) if n.is_f64() => Ok(raw.clone()),
            Value::Number(n) => n
                .as_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| invalid(raw, target)),
            _ => Err(invalid(raw, target)),
        },
        FieldType::String => match raw {
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            _ => Err(invalid(raw, target)),
        },
        FieldType::List if raw.is_array() => Ok(raw.clone()),
        FieldType::Mapping if raw.is_object() => Ok(raw.clone()),
        _ => Err(invalid(raw, target)),
    }
}

/// Convert an environment variable value to `target`
///
/// # Errors
///
/// - [`CoercionError::Unsupported`] for [`FieldType::Mapping`]
/// - [`CoercionError::Invalid`] when the string cannot be read as `target`
pub fn coerce_env(raw: &str, target: FieldType) -> Result<Value, CoercionError> {
    if target == FieldType::Mapping {
        return Err(CoercionError::Unsupported {
            raw: Value::String(raw.to_string()).to_string(),
            target,
        });
    }
    coerce_str(raw, target)
}

fn coerce_str(s: &str, target: FieldType) -> Result<Value, CoercionError> {
    let fail = || CoercionError::Invalid {
        raw: Value::String(s.to_string()).to_string(),
        target,
    };

    match target {
        FieldType::Bool => parse_bool(s).map(Value::Bool).ok_or_else(fail),
        FieldType::Int => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| fail()),
        FieldType::Float => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(fail),
        FieldType::String => Ok(Value::String(s.to_string())),
        FieldType::List => Ok(Value::Array(split_list(s))),
        FieldType::Mapping => Err(fail()),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Comma-separated list, elements trimmed, no escaping
fn split_list(s: &str) -> Vec<Value> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    s.split(',')
        .map(|item| Value::String(item.trim().to_string()))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
