//! Builder for ConfigManager
//!
//! This module contains [`ConfigManagerBuilder`] which provides a fluent API
//! for creating a [`ConfigManager`](super::ConfigManager).

use crate::config::{EnvSource, LoaderConfigBuilder, SchemaTree};
use crate::error::Result;
use crate::merge::ConfigTree;
use crate::storage::StorageBackend;
use std::path::PathBuf;

use super::ConfigManager;

/// Builder for creating a [`ConfigManager`] with a fluent API.
///
/// Layers are applied in the order they are added: later files override
/// earlier ones, and the environment overrides every file.
///
/// # Example
///
/// ```rust,no_run
/// use layerconf::{ConfigManager, FieldType, SchemaField, SchemaTree};
/// use serde_json::json;
///
/// let schema = SchemaTree::new()
///     .field(SchemaField::new("debug", FieldType::Bool).default(json!(false)))?;
///
/// let manager = ConfigManager::builder()
///     .with_schema(schema)
///     .file("/etc/my-app/config.toml")
///     .optional_file("~/.config/my-app/config.toml")
///     .with_env_prefix("MYAPP")
///     .build()?;
/// # Ok::<(), layerconf::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ConfigManagerBuilder {
    config_builder: LoaderConfigBuilder,
}

impl ConfigManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the expected fields.
    ///
    /// Without a schema, file values are stored as parsed and the
    /// environment is ignored.
    pub fn with_schema(mut self, schema: SchemaTree) -> Self {
        self.config_builder = self.config_builder.with_schema(schema);
        self
    }

    /// Add a file layer that must exist.
    ///
    /// Supports `~` expansion for home directory.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_builder = self.config_builder.file(path);
        self
    }

    /// Add a file layer that is skipped when it does not exist.
    pub fn optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_builder = self.config_builder.optional_file(path);
        self
    }

    /// Add an already-parsed layer under `label`.
    pub fn layer(mut self, label: impl Into<String>, tree: ConfigTree) -> Self {
        self.config_builder = self.config_builder.layer(label, tree);
        self
    }

    /// Enable a prefix for environment variable overrides.
    ///
    /// The format is: `{PREFIX}_{SECTION}__{KEY}` (all uppercase)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let manager = ConfigManager::builder()
    ///     .with_schema(schema)
    ///     .with_env_prefix("MYAPP")
    ///     .build()?;
    ///
    /// // Now MYAPP_DATABASE__HOST=db.local will override "database.host"
    /// ```
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.with_env_prefix(prefix);
        self
    }

    /// Replace the environment provider (defaults to the process environment).
    pub fn with_env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.config_builder = self.config_builder.with_env_source(source);
        self
    }

    /// Replace the file parser (defaults to TOML).
    pub fn with_storage(mut self, storage: impl StorageBackend + 'static) -> Self {
        self.config_builder = self.config_builder.with_storage(storage);
        self
    }

    /// Build the [`ConfigManager`].
    ///
    /// # Errors
    ///
    /// See [`ConfigManager::new`].
    pub fn build(self) -> Result<ConfigManager> {
        ConfigManager::new(self.config_builder.build())
    }
}
