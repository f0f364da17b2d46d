//! Thread-safe handle around a [`ConfigManager`]

use crate::error::Result;
use crate::merge::ConfigTree;
use crate::sync::RwLockExt;

use serde_json::Value;
use std::sync::{Arc, RwLock};

use super::ConfigManager;

/// Cloneable, thread-safe handle to one [`ConfigManager`].
///
/// Reads take a shared lock and return owned values; writes and reloads take
/// the exclusive lock, so a reader never sees a half-applied change.
///
/// # Example
///
/// ```rust
/// use layerconf::{ConfigManager, SharedConfig};
/// use serde_json::json;
///
/// let shared = SharedConfig::new(ConfigManager::builder().build()?);
/// let writer = shared.clone();
///
/// std::thread::spawn(move || writer.set("workers", json!(4)))
///     .join()
///     .unwrap()?;
///
/// assert_eq!(shared.get("workers"), Some(json!(4)));
/// # Ok::<(), layerconf::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<ConfigManager>>,
}

impl SharedConfig {
    pub fn new(manager: ConfigManager) -> Self {
        Self {
            inner: Arc::new(RwLock::new(manager)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.read_recovered().get(key).cloned()
    }

    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.inner.read_recovered().get_or(key, default)
    }

    pub fn has(&self, key: &str) -> bool {
        self.inner.read_recovered().has(key)
    }

    pub fn get_source(&self, key: &str) -> Option<String> {
        self.inner
            .read_recovered()
            .get_source(key)
            .map(str::to_string)
    }

    /// See [`ConfigManager::set`]
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        self.inner.write_recovered().set(key, value)
    }

    /// See [`ConfigManager::set_with_source`]
    pub fn set_with_source(&self, key: &str, value: Value, source: &str) -> Result<()> {
        self.inner
            .write_recovered()
            .set_with_source(key, value, source)
    }

    pub fn to_dict(&self) -> ConfigTree {
        self.inner.read_recovered().to_dict()
    }

    /// See [`ConfigManager::reload`]
    pub fn reload(&self) -> Result<()> {
        self.inner.write_recovered().reload()
    }

    /// Run `f` against the manager under one read lock.
    ///
    /// Use this to read several keys from the same snapshot.
    pub fn read<R>(&self, f: impl FnOnce(&ConfigManager) -> R) -> R {
        let guard = self.inner.read_recovered();
        f(&*guard)
    }
}

impl From<ConfigManager> for SharedConfig {
    fn from(manager: ConfigManager) -> Self {
        Self::new(manager)
    }
}

// =============================================================================
// Tests
// =============================================================================
