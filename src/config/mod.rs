//! Schema declaration, type coercion and loader configuration
//!
//! This module contains the declarative side of layerconf:
//! - `SchemaTree` / `SchemaField` - Expected keys, types, defaults
//! - `coerce` / `coerce_env` - Raw value to declared type conversion
//! - `LoaderConfig` - Which files, environment and prefix a load uses

mod coercion;
mod schema;
mod types;

pub use coercion::{CoercionError, coerce, coerce_env};
pub(crate) use schema::join_path;
pub use schema::{FieldType, SchemaField, SchemaNode, SchemaTree};
pub use types::{
    DefaultEnvSource, EnvSource, LayerSpec, LoaderConfig, LoaderConfigBuilder, MapEnvSource,
};
