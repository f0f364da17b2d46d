//! Provenance tracking for resolved values
//!
//! Maps every leaf dot-path in a resolved tree to the label of the layer
//! that supplied it.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Label recorded for values coming from schema defaults
pub const DEFAULT_SOURCE: &str = "default";

/// Label recorded for values coming from environment variables
pub const ENV_SOURCE: &str = "environment";

/// Label recorded by `set` when the caller gives none
pub const RUNTIME_SOURCE: &str = "runtime";

/// Dot-path → source label store
///
/// Last write wins. Overwriting a value with an identical one still
/// replaces its label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceRegistry {
    entries: BTreeMap<String, String>,
}

impl SourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `source` as the origin of `path`
    pub fn record(&mut self, path: impl Into<String>, source: impl Into<String>) {
        self.entries.insert(path.into(), source.into());
    }

    /// Source label for `path`, if it was ever recorded
    pub fn lookup(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// All recorded entries, sorted by path
    pub fn all(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Drop the entry for `path` and every entry below it
    ///
    /// Used when the value at `path` is replaced by one of a different
    /// shape, so stale leaf entries do not outlive their values.
    pub fn forget_subtree(&mut self, path: &str) {
        let nested = format!("{path}.");
        self.entries
            .retain(|key, _| key != path && !key.starts_with(&nested));
    }

    /// Record `source` for every leaf of `value` stored at `path`
    ///
    /// A non-empty table records each leaf beneath it; anything else,
    /// including an empty table, is a single entry at `path`.
    pub fn record_value(&mut self, path: &str, value: &Value, source: &str) {
        match value {
            Value::Object(table) if !table.is_empty() => {
                for (key, child) in table {
                    self.record_value(&format!("{path}.{key}"), child, source);
                }
            }
            _ => self.record(path, source),
        }
    }

    /// Split any entry recorded at a proper ancestor of `path`
    ///
    /// A table recorded as a single value (a mapping leaf) stops being one
    /// once something is written inside it: its entry is replaced by one per
    /// leaf of `tree` below it, keeping the old label.
    pub(crate) fn split_ancestors(&mut self, path: &str, tree: &Map<String, Value>) {
        let mut end = 0;
        while let Some(offset) = path[end..].find('.') {
            end += offset;
            let ancestor = &path[..end];
            if let Some(source) = self.entries.remove(ancestor) {
                if let Some(value) = crate::path::lookup(tree, ancestor) {
                    self.record_value(ancestor, value, &source);
                }
            }
            end += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_last_write_wins() {
        let mut registry = SourceRegistry::new();
        registry.record("server.port", DEFAULT_SOURCE);
        registry.record("server.port", "config.toml");

        assert_eq!(registry.lookup("server.port"), Some("config.toml"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_missing() {
        let registry = SourceRegistry::new();
        assert_eq!(registry.lookup("nope"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_forget_subtree() {
        let mut registry = SourceRegistry::new();
        registry.record("db", "a.toml");
        registry.record("db.host", "a.toml");
        registry.record("db.port", "b.toml");
        registry.record("dbx", "b.toml");

        registry.forget_subtree("db");

        assert_eq!(registry.lookup("db"), None);
        assert_eq!(registry.lookup("db.host"), None);
        assert_eq!(registry.lookup("db.port"), None);
        assert_eq!(registry.lookup("dbx"), Some("b.toml"));
    }

    #[test]
    fn test_record_value_covers_every_leaf() {
        let mut registry = SourceRegistry::new();
        registry.record_value(
            "db",
            &json!({"host": "a", "pool": {"size": 4}, "extra": {}}),
            RUNTIME_SOURCE,
        );

        assert_eq!(registry.lookup("db"), None);
        assert_eq!(registry.lookup("db.host"), Some(RUNTIME_SOURCE));
        assert_eq!(registry.lookup("db.pool.size"), Some(RUNTIME_SOURCE));
        assert_eq!(registry.lookup("db.extra"), Some(RUNTIME_SOURCE));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_split_ancestors_keeps_sibling_labels() {
        let tree = match json!({"labels": {"team": "web", "tier": "gold"}}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let mut registry = SourceRegistry::new();
        registry.record("labels", "app.toml");

        registry.split_ancestors("labels.team", &tree);

        assert_eq!(registry.lookup("labels"), None);
        assert_eq!(registry.lookup("labels.team"), Some("app.toml"));
        assert_eq!(registry.lookup("labels.tier"), Some("app.toml"));
    }

    #[test]
    fn test_serializes_as_map() {
        let mut registry = SourceRegistry::new();
        registry.record("debug", ENV_SOURCE);
        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(json, json!({"debug": "environment"}));
    }
}
