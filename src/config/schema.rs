//! Schema declaration types
//!
//! # Overview
//!
//! A [`SchemaTree`] declares which configuration keys an application expects,
//! what type each one has, its default and whether it must be present after
//! all layers are merged. Trees nest: a level holds either leaf fields or
//! further trees under a name, never both for the same name.
//!
//! ```rust
//! use layerconf::{FieldType, SchemaField, SchemaTree};
//! use serde_json::json;
//!
//! let database = SchemaTree::new()
//!     .field(SchemaField::new("host", FieldType::String).default(json!("localhost")))?
//!     .field(SchemaField::new("port", FieldType::Int).default(json!(5432)))?
//!     .field(SchemaField::new("user", FieldType::String).required())?;
//!
//! let schema = SchemaTree::new()
//!     .field(SchemaField::new("debug", FieldType::Bool).default(json!(false)))?
//!     .nested("database", database)?;
//!
//! assert!(schema.required_paths().contains("database.user"));
//! # Ok::<(), layerconf::Error>(())
//! ```
//!
//! Defaults are coerced to the declared type when the field is added, so a
//! default of `"8080"` on an [`FieldType::Int`] field is stored as `8080`
//! and an uncoercible default is rejected immediately.

use crate::config::coerce;
use crate::error::{Error, Result};
use crate::manager::NESTING_SEPARATOR;
use crate::sources::DEFAULT_SOURCE;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

// =============================================================================
// Field Types
// =============================================================================

/// Declared type of a leaf field
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Boolean (`true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0` from strings)
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// Plain string
    #[default]
    String,
    /// Sequence; comma-separated when read from a string
    List,
    /// Table taken as a whole; cannot come from the environment
    Mapping,
}

impl FieldType {
    /// Lowercase name used in error messages and docs
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::String => "string",
            FieldType::List => "list",
            FieldType::Mapping => "mapping",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Schema Field
// =============================================================================

/// Declaration of a single leaf
///
/// # Example
///
/// ```
/// use layerconf::{FieldType, SchemaField};
/// use serde_json::json;
///
/// let port = SchemaField::new("port", FieldType::Int)
///     .default(json!(8080))
///     .description("Port the HTTP server listens on");
///
/// assert_eq!(port.default_value(), Some(&json!(8080)));
/// assert!(!port.is_required());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Key at its own level (no dots)
    pub name: String,

    /// Declared type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Default value, lowest precedence layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Must be present once every layer is merged
    #[serde(default)]
    pub required: bool,

    /// Human readable description (docs only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaField {
    /// Create an optional field with no default
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: None,
            required: false,
            description: None,
        }
    }

    /// Set the default value
    #[must_use]
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Mark as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a description
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

// =============================================================================
// Schema Tree
// =============================================================================

/// Entry at one level of a [`SchemaTree`]
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Leaf field
    Field(SchemaField),
    /// Nested section
    Nested(SchemaTree),
}

/// Ordered, recursive schema declaration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaTree {
    entries: Vec<(String, SchemaNode)>,
}

fn field_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^.\s]+$").expect("static regex is valid"))
}

impl SchemaTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a leaf field
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFieldName`] if the name is empty or contains `.`,
    ///   whitespace or `__` (the environment nesting separator)
    /// - [`Error::DuplicateField`] if the name is already used at this level
    /// - [`Error::TypeCoercion`] if the default does not fit the declared type
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        field_type: FieldType,
        default: Option<Value>,
        required: bool,
    ) -> Result<()> {
        let mut field = SchemaField::new(name, field_type);
        field.default = default;
        field.required = required;
        self.insert_field(field)
    }

    /// Register a nested tree under `name`
    ///
    /// # Errors
    ///
    /// Same name checks as [`SchemaTree::add_field`].
    pub fn add_nested(&mut self, name: impl Into<String>, subtree: SchemaTree) -> Result<()> {
        let name = name.into();
        self.check_name(&name)?;
        self.entries.push((name, SchemaNode::Nested(subtree)));
        Ok(())
    }

    /// Builder form of [`SchemaTree::add_field`] taking a prepared field
    ///
    /// # Errors
    ///
    /// Same as [`SchemaTree::add_field`].
    pub fn field(mut self, field: SchemaField) -> Result<Self> {
        self.insert_field(field)?;
        Ok(self)
    }

    /// Builder form of [`SchemaTree::add_nested`]
    ///
    /// # Errors
    ///
    /// Same as [`SchemaTree::add_nested`].
    pub fn nested(mut self, name: impl Into<String>, subtree: SchemaTree) -> Result<Self> {
        self.add_nested(name, subtree)?;
        Ok(self)
    }

    fn insert_field(&mut self, mut field: SchemaField) -> Result<()> {
        self.check_name(&field.name)?;
        if let Some(default) = field.default.take() {
            let coerced = coerce(&default, field.field_type)
                .map_err(|e| e.with_context(&field.name, DEFAULT_SOURCE))?;
            field.default = Some(coerced);
        }
        self.entries.push((field.name.clone(), SchemaNode::Field(field)));
        Ok(())
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if !field_name_pattern().is_match(name) || name.contains(NESTING_SEPARATOR) {
            return Err(Error::InvalidFieldName {
                name: name.to_string(),
            });
        }
        if self.entries.iter().any(|(existing, _)| existing == name) {
            return Err(Error::DuplicateField {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Entry declared directly at this level
    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node)
    }

    /// Resolve a dot-path to the node declared there
    pub fn lookup(&self, path: &str) -> Option<&SchemaNode> {
        let mut segments = path.split('.');
        let mut node = self.get(segments.next()?)?;
        for segment in segments {
            match node {
                SchemaNode::Nested(tree) => node = tree.get(segment)?,
                SchemaNode::Field(_) => return None,
            }
        }
        Some(node)
    }

    /// Iterate entries at this level in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every leaf with its full dot-path, in declaration order
    pub fn leaves(&self) -> Vec<(String, &SchemaField)> {
        let mut out = Vec::new();
        self.collect_leaves("", &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a SchemaField)>) {
        for (name, node) in &self.entries {
            let path = join_path(prefix, name);
            match node {
                SchemaNode::Field(field) => out.push((path, field)),
                SchemaNode::Nested(tree) => tree.collect_leaves(&path, out),
            }
        }
    }

    /// Tree holding every declared default
    ///
    /// Fields without a default are absent. Sections that end up empty are
    /// omitted.
    pub fn collect_defaults(&self) -> Map<String, Value> {
        let mut out = Map::new();
        for (name, node) in &self.entries {
            match node {
                SchemaNode::Field(field) => {
                    if let Some(default) = &field.default {
                        out.insert(name.clone(), default.clone());
                    }
                }
                SchemaNode::Nested(tree) => {
                    let section = tree.collect_defaults();
                    if !section.is_empty() {
                        out.insert(name.clone(), Value::Object(section));
                    }
                }
            }
        }
        out
    }

    /// Dot-paths of all required leaves
    pub fn required_paths(&self) -> BTreeSet<String> {
        self.leaves()
            .into_iter()
            .filter(|(_, field)| field.required)
            .map(|(path, _)| path)
            .collect()
    }
}

pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

// =============================================================================
// Tests
// =============================================================================
