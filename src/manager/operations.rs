use crate::error::{Error, Result};
use crate::manager::core::ConfigManager;
use crate::merge::ConfigTree;
use crate::path;
use crate::sources::{RUNTIME_SOURCE, SourceRegistry};

use log::debug;
use serde_json::Value;

impl ConfigManager {
    /// Get the value at a dot-path.
    ///
    /// Returns `None` when any segment is missing or when a non-table sits
    /// where traversal has to continue. Never fails.
    ///
    /// # Arguments
    ///
    /// * `key` - Dot-path such as `"database.host"`
    pub fn get(&self, key: &str) -> Option<&Value> {
        path::lookup(&self.tree, key)
    }

    /// Get the value at a dot-path, or `default` when it is absent.
    ///
    /// A present `null` is returned as `null`, not replaced by `default`.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).cloned().unwrap_or(default)
    }

    /// Get a value deserialized into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeCoercion`] if the value exists but cannot be
    /// deserialized to `T`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use layerconf::ConfigManager;
    /// use serde_json::json;
    ///
    /// let mut manager = ConfigManager::builder().build()?;
    /// manager.set("server.port", json!(9000))?;
    ///
    /// let port: Option<u16> = manager.get_as("server.port")?;
    /// assert_eq!(port, Some(9000));
    ///
    /// let missing: Option<u16> = manager.get_as("server.timeout")?;
    /// assert_eq!(missing, None);
    /// # Ok::<(), layerconf::Error>(())
    /// ```
    pub fn get_as<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|_| Error::TypeCoercion {
                path: key.to_string(),
                source_label: self.get_source(key).unwrap_or(RUNTIME_SOURCE).to_string(),
                raw: value.to_string(),
                target: std::any::type_name::<T>().to_string(),
            })
    }

    /// Whether the dot-path resolves to a present value
    ///
    /// Any value counts, including `null` and a table: `has("database")` is
    /// `true` when the `database` section exists, matching what
    /// [`get`](Self::get) returns for it.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Label of the layer that supplied the value at `key`
    pub fn get_source(&self, key: &str) -> Option<&str> {
        self.sources.lookup(key)
    }

    /// Set a value with the `"runtime"` source label.
    ///
    /// Missing intermediate tables are created. No type coercion is applied.
    /// A table value records `source` for every leaf inside it. Writing
    /// inside a value recorded as a whole (a mapping leaf) splits that entry
    /// so the untouched leaves keep their old label.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] for an empty path or empty segment
    /// - [`Error::PathConflict`] when an intermediate segment holds a
    ///   non-table value; the tree is left unchanged
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.set_with_source(key, value, RUNTIME_SOURCE)
    }

    /// Set a value and record `source` as its origin.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigManager::set`].
    pub fn set_with_source(&mut self, key: &str, value: Value, source: &str) -> Result<()> {
        let previous = path::insert(&mut self.tree, key, value)?;
        self.sources.split_ancestors(key, &self.tree);
        self.sources.forget_subtree(key);
        if let Some(stored) = path::lookup(&self.tree, key) {
            self.sources.record_value(key, stored, source);
        }
        debug!(
            "Set {key} from '{source}' ({})",
            if previous.is_some() { "replaced" } else { "new" }
        );
        Ok(())
    }

    /// Deep copy of the whole tree
    pub fn to_dict(&self) -> ConfigTree {
        self.tree.clone()
    }

    /// Source label for every leaf
    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }
}

// =============================================================================
// Tests
// =============================================================================
