use crate::config::{LayerSpec, LoaderConfig, SchemaTree};
use crate::error::Result;
use crate::merge::{self, ConfigTree, Layer};
use crate::sources::SourceRegistry;

use log::{debug, info};

/// Resolved configuration with per-key provenance.
///
/// The `ConfigManager` owns the merged tree and the [`SourceRegistry`] that
/// goes with it:
///
/// - **Load**: Read file layers, snapshot the environment, resolve
/// - **Read**: Dot-path `get` / `has` / `get_source` that never fail
/// - **Write**: Dot-path `set`, recorded with a source label
/// - **Reload**: Re-run the load, keeping the old state on failure
///
/// # Example
///
/// ```rust
/// use layerconf::{ConfigManager, FieldType, MapEnvSource, SchemaField, SchemaTree};
/// use serde_json::json;
///
/// let schema = SchemaTree::new()
///     .field(SchemaField::new("port", FieldType::Int).default(json!(8080)))?;
///
/// let manager = ConfigManager::builder()
///     .with_schema(schema)
///     .with_env_prefix("MYAPP")
///     .with_env_source(MapEnvSource::new().with("MYAPP_PORT", "9000"))
///     .build()?;
///
/// assert_eq!(manager.get("port"), Some(&json!(9000)));
/// assert_eq!(manager.get_source("port"), Some("environment"));
/// # Ok::<(), layerconf::Error>(())
/// ```
///
/// `ConfigManager` is a plain owned value: reads take `&self`, writes take
/// `&mut self`. Use [`SharedConfig`](crate::SharedConfig) to share one
/// instance across threads.
#[derive(Debug)]
pub struct ConfigManager {
    /// Configuration used for the initial load and reloads
    pub(crate) config: LoaderConfig,

    /// Merged tree
    pub(crate) tree: ConfigTree,

    /// Source label for every leaf in `tree`
    pub(crate) sources: SourceRegistry,
}

impl ConfigManager {
    /// Load every configured layer and resolve them.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required file is missing or unreadable
    /// - A file fails to parse
    /// - A value does not fit its declared type
    /// - Required fields are missing after all layers
    pub fn new(config: LoaderConfig) -> Result<Self> {
        let (tree, sources) = load(&config)?;
        info!("Initialized layerconf ConfigManager with {} layer(s)", config.layers.len());
        Ok(Self {
            config,
            tree,
            sources,
        })
    }

    /// Wrap a tree and registry produced by [`resolve`](crate::resolve)
    ///
    /// [`reload`](Self::reload) on such a manager yields an empty tree, since
    /// no layers are configured.
    pub fn from_resolved(tree: ConfigTree, sources: SourceRegistry) -> Self {
        Self {
            config: LoaderConfig::default(),
            tree,
            sources,
        }
    }

    /// Create a builder for `ConfigManager` with a fluent API.
    ///
    /// This is the recommended way to create a `ConfigManager`.
    pub fn builder() -> crate::manager::ConfigManagerBuilder {
        crate::manager::ConfigManagerBuilder::new()
    }

    /// Get the loader configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Schema the tree was resolved against, if any
    pub fn schema(&self) -> Option<&SchemaTree> {
        self.config.schema.as_ref()
    }

    /// Re-read every layer and the environment
    ///
    /// Values written with `set` are discarded. On error the current tree and
    /// sources are kept unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigManager::new`].
    pub fn reload(&mut self) -> Result<()> {
        let (tree, sources) = load(&self.config)?;
        self.tree = tree;
        self.sources = sources;
        info!("Configuration reloaded");
        Ok(())
    }
}

/// Read file layers in order, snapshot the environment and resolve
fn load(config: &LoaderConfig) -> Result<(ConfigTree, SourceRegistry)> {
    let mut layers: Vec<Layer> = Vec::with_capacity(config.layers.len());

    for spec in &config.layers {
        match spec {
            LayerSpec::File { path, optional } => {
                if *optional && !path.exists() {
                    debug!("Optional config file {} not found, skipping", path.display());
                    continue;
                }
                let tree = config.storage.read(path)?;
                layers.push((path.display().to_string(), tree));
            }
            LayerSpec::Inline(layer) => layers.push(layer.clone()),
        }
    }

    let env = config.env_source.vars();
    merge::resolve(
        config.schema.as_ref(),
        &layers,
        &env,
        config.env_prefix.as_deref(),
    )
}
