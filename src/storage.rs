//! Storage backend trait and implementations
//!
//! A backend turns file contents into a [`ConfigTree`]. Only TOML ships with
//! the crate; the trait exists so callers can plug in another parser.

use crate::error::{Error, Result};
use crate::merge::ConfigTree;
use serde_json::{Map, Number, Value};
use std::path::Path;

/// Trait for storage backend implementations
pub trait StorageBackend: Send + Sync {
    /// File extension for this storage format (e.g., "toml")
    fn extension(&self) -> &str;

    /// Parse file contents into a tree
    ///
    /// `label` identifies the input in error messages.
    fn parse(&self, content: &str, label: &str) -> Result<ConfigTree>;

    /// Read and parse a file; its display path is the label
    fn read(&self, path: &Path) -> Result<ConfigTree> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse(&content, &path.display().to_string())
    }
}

// =============================================================================
// TOML Storage Implementation
// =============================================================================

/// TOML storage backend (default)
///
/// Datetimes become their RFC 3339 string form. Non-finite floats (`nan`,
/// `inf`) have no representation in the value model and are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlStorage;

impl StorageBackend for TomlStorage {
    fn extension(&self) -> &str {
        "toml"
    }

    fn parse(&self, content: &str, label: &str) -> Result<ConfigTree> {
        let table: toml::Table = toml::from_str(content).map_err(|e| Error::Parse {
            label: label.to_string(),
            message: e.to_string(),
        })?;
        convert_table(table, "", label)
    }
}

fn convert_table(table: toml::Table, prefix: &str, label: &str) -> Result<ConfigTree> {
    let mut out = Map::new();
    for (key, value) in table {
        let path = crate::config::join_path(prefix, &key);
        let converted = convert_value(value, &path, label)?;
        out.insert(key, converted);
    }
    Ok(out)
}

fn convert_value(value: toml::Value, path: &str, label: &str) -> Result<Value> {
    Ok(match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| Error::Parse {
                label: label.to_string(),
                message: format!("'{path}' holds a non-finite float ({f})"),
            })?,
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| convert_value(item, path, label))
                .collect::<Result<Vec<_>>>()?,
        ),
        toml::Value::Table(table) => Value::Object(convert_table(table, path, label)?),
    })
}

// =============================================================================
// Tests
// =============================================================================
