//! Common test utilities for layerconf integration tests
//!
//! Provides the shared schema, temp-dir fixtures and helper functions.

#![allow(dead_code)]

use layerconf::{ConfigTree, FieldType, Layer, SchemaField, SchemaTree};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Test Schema
// =============================================================================

/// Schema covering every field type, one nested section and one required leaf
///
/// ```toml
/// debug = false          # bool
/// workers = 4            # int
/// tags = []              # list
///
/// [database]
/// host = "localhost"     # string
/// port = 5432            # int
/// user                   # string, required
/// timeout = 2.5          # float
/// options                # mapping
/// ```
pub fn app_schema() -> SchemaTree {
    SchemaTree::new()
        .field(SchemaField::new("debug", FieldType::Bool).default(json!(false)))
        .unwrap()
        .field(SchemaField::new("workers", FieldType::Int).default(json!(4)))
        .unwrap()
        .field(SchemaField::new("tags", FieldType::List).default(json!([])))
        .unwrap()
        .nested("database", database_schema())
        .unwrap()
}

pub fn database_schema() -> SchemaTree {
    SchemaTree::new()
        .field(SchemaField::new("host", FieldType::String).default(json!("localhost")))
        .unwrap()
        .field(SchemaField::new("port", FieldType::Int).default(json!(5432)))
        .unwrap()
        .field(SchemaField::new("user", FieldType::String).required())
        .unwrap()
        .field(SchemaField::new("timeout", FieldType::Float).default(json!(2.5)))
        .unwrap()
        .field(SchemaField::new("options", FieldType::Mapping))
        .unwrap()
}

// =============================================================================
// Layers and Environment
// =============================================================================

/// Build a `(label, tree)` layer from a JSON object literal
pub fn layer(label: &str, value: Value) -> Layer {
    (label.to_string(), tree(value))
}

pub fn tree(value: Value) -> ConfigTree {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// File Fixture
// =============================================================================

/// Temp directory holding config files for one test
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Write `content` to `name` inside the fixture and return its path
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("Failed to write config file");
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Label a file layer is recorded under
    pub fn label(&self, name: &str) -> String {
        self.path(name).display().to_string()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
