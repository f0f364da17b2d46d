//! # layerconf - Layered Configuration Loader
//!
//! Declare the fields your application expects, then resolve schema
//! defaults, TOML files and environment variables into one nested tree that
//! remembers where every value came from.
//!
//! ## Features
//!
//! - **Schema**: Typed fields with defaults, required flags and nested sections
//! - **Layering**: defaults < files (in order) < environment variables
//! - **Coercion**: Environment strings converted to the declared type
//!   (`"yes"` → `true`, `"a, b"` → `["a", "b"]`)
//! - **Provenance**: Every leaf records the layer that supplied it
//! - **Dot-path access**: `get("database.host")`, `set("server.port", ...)`
//! - **Thread safety**: [`SharedConfig`] for concurrent readers and writers
//! - **Docs**: Markdown reference generated from the schema
//!
//! ## Quick Start
//!
//! ```rust
//! use layerconf::{ConfigManager, FieldType, MapEnvSource, SchemaField, SchemaTree};
//! use serde_json::json;
//!
//! let schema = SchemaTree::new()
//!     .field(SchemaField::new("debug", FieldType::Bool).default(json!(false)))?
//!     .nested(
//!         "database",
//!         SchemaTree::new()
//!             .field(SchemaField::new("host", FieldType::String).required())?
//!             .field(SchemaField::new("port", FieldType::Int).default(json!(5432)))?,
//!     )?;
//!
//! let mut file = serde_json::Map::new();
//! file.insert("database".into(), json!({"host": "db.internal"}));
//!
//! let manager = ConfigManager::builder()
//!     .with_schema(schema)
//!     .layer("base.toml", file)
//!     .with_env_prefix("MYAPP")
//!     .with_env_source(MapEnvSource::new().with("MYAPP_DATABASE__PORT", "6543"))
//!     .build()?;
//!
//! assert_eq!(manager.get("debug"), Some(&json!(false)));
//! assert_eq!(manager.get_source("database.host"), Some("base.toml"));
//! assert_eq!(manager.get("database.port"), Some(&json!(6543)));
//! assert_eq!(manager.get_source("database.port"), Some("environment"));
//! # Ok::<(), layerconf::Error>(())
//! ```
//!
//! ## Environment Variables
//!
//! With prefix `MYAPP`, the path `database.host` is read from
//! `MYAPP_DATABASE__HOST`: segments are uppercased and joined with `__`.
//! Only fields declared in the schema are looked up.
//!
//! ## Files
//!
//! ```rust,no_run
//! use layerconf::ConfigManager;
//!
//! let manager = ConfigManager::builder()
//!     .file("/etc/my-app/config.toml")
//!     .optional_file("~/.config/my-app/config.toml")
//!     .build()?;
//! # Ok::<(), layerconf::Error>(())
//! ```
//!
//! Later files override earlier ones key by key; tables merge, everything
//! else is replaced.

mod config;
mod docs;
mod error;
mod manager;
mod merge;
mod path;
mod sources;
mod storage;
mod sync;

// Re-exports
pub use config::{
    CoercionError, DefaultEnvSource, EnvSource, FieldType, LayerSpec, LoaderConfig,
    LoaderConfigBuilder, MapEnvSource, SchemaField, SchemaNode, SchemaTree, coerce, coerce_env,
};
pub use docs::{DocsConfig, generate_docs};
pub use error::{Error, Result};
pub use manager::{
    ConfigManager, ConfigManagerBuilder, EnvironmentHandler, NESTING_SEPARATOR, SharedConfig,
};
pub use merge::{ConfigTree, Layer, resolve};
pub use sources::{DEFAULT_SOURCE, ENV_SOURCE, RUNTIME_SOURCE, SourceRegistry};
pub use storage::{StorageBackend, TomlStorage};
