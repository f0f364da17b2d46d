//! Loader configuration types

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::SchemaTree;
use crate::merge::{ConfigTree, Layer};
use crate::storage::{StorageBackend, TomlStorage};

// =============================================================================
// Environment Sources
// =============================================================================

/// Snapshot provider for environment variables
///
/// The loader takes one snapshot per load; implementations only need to
/// return the variables as they are at that moment.
pub trait EnvSource: Send + Sync {
    /// All variables as name → value
    fn vars(&self) -> HashMap<String, String>;
}

/// Reads the process environment
///
/// Variables whose name or value is not valid unicode are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvSource;

impl EnvSource for DefaultEnvSource {
    fn vars(&self) -> HashMap<String, String> {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

/// Fixed set of variables, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnvSource {
    fn vars(&self) -> HashMap<String, String> {
        self.vars.clone()
    }
}

// =============================================================================
// Layer Specs
// =============================================================================

/// One configured layer, applied in declaration order
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSpec {
    /// File read through the storage backend; label = its path
    File { path: PathBuf, optional: bool },
    /// Already-parsed tree
    Inline(Layer),
}

// =============================================================================
// Loader Config
// =============================================================================

/// Everything one load needs: schema, layers, environment
pub struct LoaderConfig {
    /// Declared fields; `None` disables coercion and environment overrides
    pub schema: Option<SchemaTree>,

    /// Layers in ascending precedence
    pub layers: Vec<LayerSpec>,

    /// Environment variable prefix (e.g., "MYAPP" -> MYAPP_DATABASE__HOST)
    pub env_prefix: Option<String>,

    /// Environment snapshot provider
    pub env_source: Arc<dyn EnvSource>,

    /// Parser for file layers
    pub storage: Arc<dyn StorageBackend>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            schema: None,
            layers: Vec::new(),
            env_prefix: None,
            env_source: Arc::new(DefaultEnvSource),
            storage: Arc::new(TomlStorage),
        }
    }
}

impl fmt::Debug for LoaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderConfig")
            .field("schema", &self.schema)
            .field("layers", &self.layers)
            .field("env_prefix", &self.env_prefix)
            .field("env_source", &"dyn EnvSource")
            .field("storage", &self.storage.extension())
            .finish()
    }
}

impl LoaderConfig {
    /// Create a new builder for LoaderConfig
    ///
    /// # Example
    /// ```rust
    /// use layerconf::LoaderConfig;
    ///
    /// let config = LoaderConfig::builder()
    ///     .file("/etc/my-app/config.toml")
    ///     .optional_file("~/.config/my-app/config.toml")
    ///     .with_env_prefix("MYAPP")
    ///     .build();
    ///
    /// assert_eq!(config.layers.len(), 2);
    /// ```
    pub fn builder() -> LoaderConfigBuilder {
        LoaderConfigBuilder::new()
    }
}

/// Builder for creating LoaderConfig with a fluent API
#[derive(Default)]
pub struct LoaderConfigBuilder {
    config: LoaderConfig,
}

impl fmt::Debug for LoaderConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl LoaderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the expected fields
    pub fn with_schema(mut self, schema: SchemaTree) -> Self {
        self.config.schema = Some(schema);
        self
    }

    /// Add a file layer that must exist
    ///
    /// Supports `~` expansion for home directory.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.layers.push(LayerSpec::File {
            path: expand_home(path.into()),
            optional: false,
        });
        self
    }

    /// Add a file layer that is skipped when missing
    ///
    /// Supports `~` expansion for home directory.
    pub fn optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.layers.push(LayerSpec::File {
            path: expand_home(path.into()),
            optional: true,
        });
        self
    }

    /// Add an already-parsed layer under `label`
    pub fn layer(mut self, label: impl Into<String>, tree: ConfigTree) -> Self {
        self.config.layers.push(LayerSpec::Inline((label.into(), tree)));
        self
    }

    /// Enable environment variable overrides with a prefix
    ///
    /// The format is: `{PREFIX}_{SECTION}__{KEY}` (all uppercase, `__` between
    /// nesting levels)
    ///
    /// # Example
    /// ```rust
    /// use layerconf::LoaderConfig;
    ///
    /// let config = LoaderConfig::builder()
    ///     .with_env_prefix("MYAPP")
    ///     .build();
    ///
    /// // Now MYAPP_DATABASE__HOST=db.local overrides "database.host"
    /// assert_eq!(config.env_prefix.as_deref(), Some("MYAPP"));
    /// ```
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.env_prefix = Some(prefix.into());
        self
    }

    /// Replace the environment provider (defaults to the process environment)
    pub fn with_env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.config.env_source = Arc::new(source);
        self
    }

    /// Replace the file parser (defaults to TOML)
    pub fn with_storage(mut self, storage: impl StorageBackend + 'static) -> Self {
        self.config.storage = Arc::new(storage);
        self
    }

    pub fn build(self) -> LoaderConfig {
        self.config
    }
}

fn expand_home(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match dirs::home_dir() {
        Some(home) => home.join(path.strip_prefix("~").unwrap_or(&path)),
        None => path,
    }
}
