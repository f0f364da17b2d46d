//! Resolve Workflow Integration Tests
//!
//! Exercises the public resolve pipeline end to end:
//! - Defaults, file layers and environment precedence
//! - Deep merge of tables, wholesale replacement of lists
//! - Coercion of environment strings and reporting of failures
//! - Required field checks

mod common;

use common::{app_schema, env, layer};
use layerconf::{
    ConfigManager, DEFAULT_SOURCE, ENV_SOURCE, Error, FieldType, SchemaField, SchemaTree,
    resolve,
};
use serde_json::{Value, json};
use std::collections::HashMap;

fn with_user() -> layerconf::Layer {
    layer("base.toml", json!({"database": {"user": "app"}}))
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn test_empty_inputs_yield_defaults() {
    let schema = SchemaTree::new()
        .field(SchemaField::new("debug", FieldType::Bool).default(json!(false)))
        .unwrap()
        .nested(
            "server",
            SchemaTree::new()
                .field(SchemaField::new("port", FieldType::Int).default(json!(8080)))
                .unwrap()
                .field(SchemaField::new("name", FieldType::String))
                .unwrap(),
        )
        .unwrap();

    let (tree, sources) = resolve(Some(&schema), &[], &HashMap::new(), None).unwrap();

    assert_eq!(tree, schema.collect_defaults());
    assert_eq!(sources.len(), 2);
    assert_eq!(sources.lookup("debug"), Some(DEFAULT_SOURCE));
    assert_eq!(sources.lookup("server.port"), Some(DEFAULT_SOURCE));
    assert_eq!(sources.lookup("server.name"), None);
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn test_end_to_end_scenario() {
    let schema = SchemaTree::new()
        .field(SchemaField::new("debug", FieldType::Bool).default(json!(false)))
        .unwrap()
        .field(SchemaField::new("port", FieldType::Int).default(json!(8080)))
        .unwrap();

    let files = [layer("config.toml", json!({"port": 9000}))];
    let vars = env(&[("MYAPP_DEBUG", "true")]);

    let (tree, sources) = resolve(Some(&schema), &files, &vars, Some("MYAPP")).unwrap();

    assert_eq!(Value::Object(tree), json!({"debug": true, "port": 9000}));
    assert_eq!(sources.lookup("debug"), Some(ENV_SOURCE));
    assert_eq!(sources.lookup("port"), Some("config.toml"));
}

#[test]
fn test_environment_beats_file_and_default() {
    let files = [
        with_user(),
        layer("app.toml", json!({"database": {"port": 6000}})),
    ];
    let vars = env(&[("APP_DATABASE__PORT", "7000")]);

    let (tree, sources) = resolve(Some(&app_schema()), &files, &vars, Some("APP")).unwrap();

    assert_eq!(tree["database"]["port"], json!(7000));
    assert_eq!(sources.lookup("database.port"), Some(ENV_SOURCE));
}

#[test]
fn test_later_file_wins() {
    let files = [
        with_user(),
        layer("one.toml", json!({"workers": 1})),
        layer("two.toml", json!({"workers": 2})),
    ];

    let (tree, sources) = resolve(Some(&app_schema()), &files, &HashMap::new(), None).unwrap();

    assert_eq!(tree["workers"], json!(2));
    assert_eq!(sources.lookup("workers"), Some("two.toml"));
}

#[test]
fn test_nested_merge_keeps_siblings() {
    let files = [
        layer("one.toml", json!({"db": {"host": "x"}})),
        layer("two.toml", json!({"db": {"port": 5432}})),
    ];

    let (tree, sources) = resolve(None, &files, &HashMap::new(), None).unwrap();

    assert_eq!(tree["db"], json!({"host": "x", "port": 5432}));
    assert_eq!(sources.lookup("db.host"), Some("one.toml"));
    assert_eq!(sources.lookup("db.port"), Some("two.toml"));
}

#[test]
fn test_lists_replace_wholesale() {
    let files = [
        layer("one.toml", json!({"hosts": ["a"]})),
        layer("two.toml", json!({"hosts": ["b", "c"]})),
    ];

    let (tree, _) = resolve(None, &files, &HashMap::new(), None).unwrap();
    assert_eq!(tree["hosts"], json!(["b", "c"]));
}

#[test]
fn test_environment_ignored_without_schema() {
    let files = [layer("one.toml", json!({"debug": false}))];
    let vars = env(&[("APP_DEBUG", "true")]);

    let (tree, sources) = resolve(None, &files, &vars, Some("APP")).unwrap();

    assert_eq!(tree["debug"], json!(false));
    assert_eq!(sources.lookup("debug"), Some("one.toml"));
}

#[test]
fn test_environment_without_prefix() {
    let vars = env(&[("DATABASE__USER", "svc"), ("TAGS", "a, b ,c")]);

    let (tree, sources) = resolve(Some(&app_schema()), &[], &vars, None).unwrap();

    assert_eq!(tree["database"]["user"], json!("svc"));
    assert_eq!(tree["tags"], json!(["a", "b", "c"]));
    assert_eq!(sources.lookup("tags"), Some(ENV_SOURCE));
}

// =============================================================================
// Coercion
// =============================================================================

#[test]
fn test_bool_table_from_environment() {
    for (raw, expected) in [("yes", true), ("off", false), ("ON", true), ("0", false)] {
        let vars = env(&[("APP_DEBUG", raw), ("APP_DATABASE__USER", "u")]);
        let (tree, _) = resolve(Some(&app_schema()), &[], &vars, Some("APP")).unwrap();
        assert_eq!(tree["debug"], json!(expected), "raw value {raw:?}");
    }
}

#[test]
fn test_bad_bool_reports_context() {
    let vars = env(&[("APP_DEBUG", "maybe"), ("APP_DATABASE__USER", "u")]);
    let err = resolve(Some(&app_schema()), &[], &vars, Some("APP")).unwrap_err();

    assert!(err.is_coercion_error());
    let msg = err.to_string();
    assert!(msg.contains("debug"));
    assert!(msg.contains("maybe"));
    assert!(msg.contains("environment"));
    assert!(msg.contains("bool"));
}

#[test]
fn test_mapping_from_environment_unsupported() {
    let vars = env(&[
        ("APP_DATABASE__OPTIONS", "sslmode=require"),
        ("APP_DATABASE__USER", "u"),
    ]);
    let err = resolve(Some(&app_schema()), &[], &vars, Some("APP")).unwrap_err();

    assert!(matches!(
        err,
        Error::UnsupportedConversion { ref path, .. } if path == "database.options"
    ));
}

#[test]
fn test_mapping_leaf_replaced_not_merged() {
    let files = [
        with_user(),
        layer("one.toml", json!({"database": {"options": {"a": 1, "b": 2}}})),
        layer("two.toml", json!({"database": {"options": {"c": 3}}})),
    ];

    let (tree, sources) = resolve(Some(&app_schema()), &files, &HashMap::new(), None).unwrap();

    assert_eq!(tree["database"]["options"], json!({"c": 3}));
    assert_eq!(sources.lookup("database.options"), Some("two.toml"));
    assert_eq!(sources.lookup("database.options.c"), None);
}

#[test]
fn test_file_strings_coerced_to_declared_type() {
    let files = [
        with_user(),
        layer("app.toml", json!({"workers": "8", "database": {"timeout": 3}})),
    ];

    let (tree, _) = resolve(Some(&app_schema()), &files, &HashMap::new(), None).unwrap();

    assert_eq!(tree["workers"], json!(8));
    assert_eq!(tree["database"]["timeout"], json!(3.0));
}

// =============================================================================
// Required Fields
// =============================================================================

#[test]
fn test_missing_required_named() {
    let err = resolve(Some(&app_schema()), &[], &HashMap::new(), None).unwrap_err();

    match err {
        Error::MissingRequiredFields { paths } => assert_eq!(paths, vec!["database.user"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_every_missing_required_named_once() {
    let schema = SchemaTree::new()
        .field(SchemaField::new("user", FieldType::String).required())
        .unwrap()
        .field(SchemaField::new("token", FieldType::String).required())
        .unwrap();

    let err = resolve(Some(&schema), &[], &HashMap::new(), None).unwrap_err();

    assert!(err.is_schema_error());
    let msg = err.to_string();
    assert!(msg.contains("user"));
    assert!(msg.contains("token"));
}

#[test]
fn test_required_satisfied_by_environment() {
    let vars = env(&[("APP_DATABASE__USER", "svc")]);
    let (tree, _) = resolve(Some(&app_schema()), &[], &vars, Some("app_")).unwrap();
    assert_eq!(tree["database"]["user"], json!("svc"));
}

// =============================================================================
// Accessor Round Trip
// =============================================================================

#[test]
fn test_manager_set_get_round_trip() {
    let (tree, sources) =
        resolve(Some(&app_schema()), &[with_user()], &HashMap::new(), None).unwrap();
    let mut manager = ConfigManager::from_resolved(tree, sources);

    manager.set("database.host", json!("db.internal")).unwrap();
    assert_eq!(manager.get("database.host"), Some(&json!("db.internal")));
    assert_eq!(manager.get_source("database.host"), Some("runtime"));

    manager.set_with_source("workers", json!(16), "cli").unwrap();
    assert_eq!(manager.get_source("workers"), Some("cli"));

    manager.set("x", Value::Null).unwrap();
    assert!(manager.has("x"));
    assert_eq!(manager.get_or("x", json!("fallback")), Value::Null);

    let err = manager.set("debug.verbose", json!(true)).unwrap_err();
    assert!(matches!(err, Error::PathConflict { .. }));
}

#[test]
fn test_set_inside_mapping_leaf_keeps_registry_exact() {
    let files = [
        with_user(),
        layer("app.toml", json!({"database": {"options": {"sslmode": "require", "pool": 4}}})),
    ];
    let (tree, sources) = resolve(Some(&app_schema()), &files, &HashMap::new(), None).unwrap();
    let mut manager = ConfigManager::from_resolved(tree, sources);
    assert_eq!(manager.get_source("database.options"), Some("app.toml"));

    manager.set("database.options.sslmode", json!("disable")).unwrap();

    let sources = manager.sources().all();
    assert!(!sources.contains_key("database.options"));
    assert_eq!(sources["database.options.sslmode"], "runtime");
    assert_eq!(sources["database.options.pool"], "app.toml");
}

#[test]
fn test_set_table_gives_every_leaf_a_source() {
    let (tree, sources) =
        resolve(Some(&app_schema()), &[with_user()], &HashMap::new(), None).unwrap();
    let mut manager = ConfigManager::from_resolved(tree, sources);

    manager
        .set_with_source("cache", json!({"size": 10, "ttl": {"secs": 60}}), "cli")
        .unwrap();

    assert_eq!(manager.get_source("cache.size"), Some("cli"));
    assert_eq!(manager.get_source("cache.ttl.secs"), Some("cli"));
    assert_eq!(manager.get_source("cache"), None);
}
