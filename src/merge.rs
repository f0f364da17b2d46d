//! Layer resolution
//!
//! [`resolve`] combines schema defaults, file trees and an environment
//! snapshot into one [`ConfigTree`] plus a [`SourceRegistry`].
//!
//! Precedence, lowest to highest:
//!
//! 1. schema defaults (source `"default"`)
//! 2. file trees, in the order given (source = the layer label)
//! 3. environment variables for schema leaves (source `"environment"`)
//!
//! Tables merge key by key; lists and scalars replace the previous value
//! wholesale. A leaf declared as [`FieldType::Mapping`](crate::FieldType)
//! is a single value and is replaced, not merged.

use crate::config::{SchemaNode, SchemaTree, coerce, coerce_env, join_path};
use crate::manager::EnvironmentHandler;
use crate::error::{Error, Result};
use crate::path;
use crate::sources::{DEFAULT_SOURCE, ENV_SOURCE, SourceRegistry};

use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Fully merged configuration
pub type ConfigTree = Map<String, Value>;

/// A parsed file (or in-memory) layer: `(label, tree)`
pub type Layer = (String, ConfigTree);

/// Merge every layer into one tree and record where each leaf came from
///
/// Without a schema the environment is not consulted, since variable names
/// are derived from declared fields.
///
/// # Errors
///
/// - [`Error::TypeCoercion`] / [`Error::UnsupportedConversion`] for the first
///   value that does not fit its declared type
/// - [`Error::MissingRequiredFields`] listing every required path absent
///   after all layers
///
/// # Example
///
/// ```
/// use layerconf::{resolve, FieldType, SchemaField, SchemaTree};
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let schema = SchemaTree::new()
///     .field(SchemaField::new("debug", FieldType::Bool).default(json!(false)))?
///     .field(SchemaField::new("port", FieldType::Int).default(json!(8080)))?;
///
/// let file = json!({"port": 9000}).as_object().cloned().unwrap();
/// let env = HashMap::from([("MYAPP_DEBUG".to_string(), "true".to_string())]);
///
/// let (tree, sources) = resolve(
///     Some(&schema),
///     &[("config.toml".to_string(), file)],
///     &env,
///     Some("MYAPP"),
/// )?;
///
/// assert_eq!(tree["debug"], json!(true));
/// assert_eq!(tree["port"], json!(9000));
/// assert_eq!(sources.lookup("debug"), Some("environment"));
/// assert_eq!(sources.lookup("port"), Some("config.toml"));
/// # Ok::<(), layerconf::Error>(())
/// ```
pub fn resolve(
    schema: Option<&SchemaTree>,
    file_trees: &[Layer],
    env: &HashMap<String, String>,
    env_prefix: Option<&str>,
) -> Result<(ConfigTree, SourceRegistry)> {
    let mut tree = ConfigTree::new();
    let mut sources = SourceRegistry::new();

    if let Some(schema) = schema {
        tree = schema.collect_defaults();
        for (leaf_path, field) in schema.leaves() {
            if field.default.is_some() {
                sources.record(leaf_path, DEFAULT_SOURCE);
            }
        }
    }

    for (label, layer) in file_trees {
        merge_layer(&mut tree, &mut sources, layer, schema, "", label)?;
        debug!("Merged layer '{label}' ({} top-level keys)", layer.len());
    }

    if let Some(schema) = schema {
        apply_env(
            &mut tree,
            &mut sources,
            schema,
            env,
            &EnvironmentHandler::new(env_prefix),
        )?;

        let missing: Vec<String> = schema
            .required_paths()
            .into_iter()
            .filter(|p| path::lookup(&tree, p).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingRequiredFields { paths: missing });
        }
    }

    info!(
        "Configuration resolved from {} layer(s): {} value(s)",
        file_trees.len(),
        sources.len()
    );
    Ok((tree, sources))
}

/// Deep-merge `overlay` into `target`, coercing declared leaves
fn merge_layer(
    target: &mut ConfigTree,
    sources: &mut SourceRegistry,
    overlay: &ConfigTree,
    schema: Option<&SchemaTree>,
    prefix: &str,
    label: &str,
) -> Result<()> {
    for (key, value) in overlay {
        let key_path = join_path(prefix, key);
        match schema.and_then(|s| s.get(key)) {
            Some(SchemaNode::Field(field)) => {
                let coerced = coerce(value, field.field_type)
                    .map_err(|e| e.with_context(&key_path, label))?;
                replace_leaf(target, sources, key, &key_path, coerced, label);
            }
            Some(SchemaNode::Nested(section)) => {
                let Value::Object(table) = value else {
                    return Err(Error::TypeCoercion {
                        path: key_path,
                        source_label: label.to_string(),
                        raw: value.to_string(),
                        target: "mapping".to_string(),
                    });
                };
                merge_section(target, sources, key, &key_path, table, Some(section), label)?;
            }
            None => match value {
                Value::Object(table) => {
                    merge_section(target, sources, key, &key_path, table, None, label)?;
                }
                _ => replace_leaf(target, sources, key, &key_path, value.clone(), label),
            },
        }
    }
    Ok(())
}

fn merge_section(
    target: &mut ConfigTree,
    sources: &mut SourceRegistry,
    key: &str,
    key_path: &str,
    table: &ConfigTree,
    schema: Option<&SchemaTree>,
    label: &str,
) -> Result<()> {
    let slot = target
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        // a leaf becomes a table: its provenance goes with it
        sources.forget_subtree(key_path);
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(section) => merge_layer(section, sources, table, schema, key_path, label),
        _ => Ok(()),
    }
}

fn replace_leaf(
    target: &mut ConfigTree,
    sources: &mut SourceRegistry,
    key: &str,
    key_path: &str,
    value: Value,
    label: &str,
) {
    sources.forget_subtree(key_path);
    target.insert(key.to_string(), value);
    sources.record(key_path, label);
}

fn apply_env(
    tree: &mut ConfigTree,
    sources: &mut SourceRegistry,
    schema: &SchemaTree,
    env: &HashMap<String, String>,
    handler: &EnvironmentHandler,
) -> Result<()> {
    for (leaf_path, field) in schema.leaves() {
        let Some((var, raw)) = handler.get_override(env, &leaf_path) else {
            continue;
        };
        let value = coerce_env(raw, field.field_type)
            .map_err(|e| e.with_context(&leaf_path, ENV_SOURCE))?;

        path::insert(tree, &leaf_path, value)?;
        sources.forget_subtree(&leaf_path);
        sources.record(leaf_path.as_str(), ENV_SOURCE);
        debug!("Setting {leaf_path} overridden by env var {var}");
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
