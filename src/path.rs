//! Dot-path traversal over configuration trees
//!
//! A path is one or more non-empty segments separated by `.`; every segment
//! is a table key. There is no array indexing.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Split a dot-path into segments
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] for an empty path or an empty segment
/// (`"a..b"`, `".a"`, `"a."`).
pub fn segments(path: &str) -> Result<Vec<&str>> {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.iter().any(|s| s.is_empty()) {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(parts)
}

/// Value at `path`, or `None` if any segment is missing or a non-table is
/// found where traversal must continue
pub fn lookup<'a>(tree: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = tree.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Assign `value` at `path`, creating missing intermediate tables
///
/// Returns the previous value at `path`, if any. On error the tree is left
/// unchanged.
///
/// # Errors
///
/// - [`Error::InvalidPath`] for malformed paths
/// - [`Error::PathConflict`] when an intermediate segment holds a non-table
pub fn insert(tree: &mut Map<String, Value>, path: &str, value: Value) -> Result<Option<Value>> {
    let parts = segments(path)?;
    check_descent(tree, path, &parts)?;

    let (leaf, parents) = parts
        .split_last()
        .ok_or_else(|| Error::InvalidPath(path.to_string()))?;

    let mut current = tree;
    for (depth, part) in parents.iter().enumerate() {
        let slot = current
            .entry((*part).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match slot {
            Value::Object(map) => map,
            _ => return Err(conflict(path, &parts, depth)),
        };
    }
    Ok(current.insert((*leaf).to_string(), value))
}

/// Verify every existing intermediate is a table before mutating anything
fn check_descent(tree: &Map<String, Value>, path: &str, parts: &[&str]) -> Result<()> {
    let mut current = tree;
    for (depth, part) in parts[..parts.len().saturating_sub(1)].iter().enumerate() {
        match current.get(*part) {
            None => return Ok(()),
            Some(Value::Object(map)) => current = map,
            Some(_) => return Err(conflict(path, parts, depth)),
        }
    }
    Ok(())
}

fn conflict(path: &str, parts: &[&str], depth: usize) -> Error {
    Error::PathConflict {
        path: path.to_string(),
        segment: parts[..=depth].join("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("a.b.c").unwrap(), ["a", "b", "c"]);
        assert!(segments("").is_err());
        assert!(segments("a..b").is_err());
        assert!(segments(".a").is_err());
        assert!(segments("a.").is_err());
    }

    #[test]
    fn test_lookup() {
        let t = tree(json!({"db": {"host": "x", "port": 5432}, "debug": true}));
        assert_eq!(lookup(&t, "db.host"), Some(&json!("x")));
        assert_eq!(lookup(&t, "debug"), Some(&json!(true)));
        assert_eq!(lookup(&t, "db.user"), None);
        assert_eq!(lookup(&t, "debug.nested"), None);
        assert_eq!(lookup(&t, ""), None);
    }

    #[test]
    fn test_insert_creates_tables() {
        let mut t = Map::new();
        let previous = insert(&mut t, "a.b.c", json!(1)).unwrap();
        assert_eq!(previous, None);
        assert_eq!(Value::Object(t), json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_insert_returns_previous() {
        let mut t = tree(json!({"a": {"b": 1}}));
        let previous = insert(&mut t, "a.b", json!(2)).unwrap();
        assert_eq!(previous, Some(json!(1)));
    }

    #[test]
    fn test_insert_through_scalar_conflicts() {
        let mut t = tree(json!({"a": {"b": 1}}));
        let err = insert(&mut t, "a.b.c", json!(2)).unwrap_err();
        match err {
            Error::PathConflict { path, segment } => {
                assert_eq!(path, "a.b.c");
                assert_eq!(segment, "a.b");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(Value::Object(t), json!({"a": {"b": 1}}));
    }
}
