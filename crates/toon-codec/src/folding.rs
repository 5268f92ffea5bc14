//! Key folding and its inverse, path expansion.
//!
//! Folding rewrites `{"a": {"b": {"c": 1}}}` as `{"a.b.c": 1}` before encoding. Expansion
//! rebuilds the nested objects from dotted keys while decoding.

use serde_json::{Map, Value};

use crate::syntax::is_identifier_segment;

/// Collapse chains of single-key objects into dotted keys, recursively.
///
/// Only identifier segments fold, a folded key never shadows a sibling key, and folded
/// keys carry at most `flatten_depth` segments (`None` = unbounded, below 2 = no folding).
pub fn fold_keys(value: &Value, flatten_depth: Option<usize>) -> Value {
    let limit = flatten_depth.unwrap_or(usize::MAX);
    if limit < 2 {
        return value.clone();
    }
    fold_value(value, limit)
}

fn fold_value(value: &Value, limit: usize) -> Value {
    match value {
        Value::Object(map) => Value::Object(fold_object(map, limit)),
        Value::Array(items) => Value::Array(items.iter().map(|v| fold_value(v, limit)).collect()),
        other => other.clone(),
    }
}

fn fold_object(map: &Map<String, Value>, limit: usize) -> Map<String, Value> {
    let mut out = Map::with_capacity(map.len());

    for (key, value) in map {
        let (segments, leaf) = fold_chain(key, value, limit);
        if segments.len() >= 2 {
            let folded = segments.join(".");
            if !map.contains_key(&folded) && !out.contains_key(&folded) {
                out.insert(folded, fold_value(leaf, limit));
                continue;
            }
            tracing::trace!(key = %folded, "skipping fold that would collide with a sibling");
        }
        out.insert(key.clone(), fold_value(value, limit));
    }

    out
}

/// Follow single-key objects from `key` down as far as folding allows.
fn fold_chain<'a>(key: &'a str, value: &'a Value, limit: usize) -> (Vec<&'a str>, &'a Value) {
    let mut segments = vec![key];
    let mut leaf = value;

    if !is_identifier_segment(key) {
        return (segments, leaf);
    }

    while segments.len() < limit {
        let Value::Object(inner) = leaf else { break };
        if inner.len() != 1 {
            break;
        }
        let Some((next_key, next_value)) = inner.iter().next() else {
            break;
        };
        if !is_identifier_segment(next_key) {
            break;
        }
        segments.push(next_key);
        leaf = next_value;
    }

    (segments, leaf)
}

/// Split a key into expandable segments, if every segment is an identifier.
pub(crate) fn expandable_segments(key: &str) -> Option<Vec<&str>> {
    if !key.contains('.') {
        return None;
    }
    let segments: Vec<&str> = key.split('.').collect();
    segments
        .iter()
        .all(|s| is_identifier_segment(s))
        .then_some(segments)
}

/// Raised when a value cannot be merged into an existing one during expansion.
#[derive(Debug)]
pub(crate) struct MergeConflict;

/// Insert `value` under the nested `path`, deep-merging objects.
///
/// In strict mode an object meeting a non-object is a conflict. Otherwise the later
/// value wins.
pub(crate) fn insert_path(
    map: &mut Map<String, Value>,
    path: &[&str],
    value: Value,
    strict: bool,
) -> Result<(), MergeConflict> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(());
    };

    if rest.is_empty() {
        return merge_entry(map, first, value, strict);
    }

    let slot = map
        .entry(first.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        if strict {
            return Err(MergeConflict);
        }
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(inner) => insert_path(inner, rest, value, strict),
        _ => Err(MergeConflict),
    }
}

/// Insert a single key, deep-merging when both sides are objects.
pub(crate) fn merge_entry(
    map: &mut Map<String, Value>,
    key: &str,
    value: Value,
    strict: bool,
) -> Result<(), MergeConflict> {
    if let Some(existing) = map.get_mut(key) {
        return match (existing, value) {
            (Value::Object(existing), Value::Object(incoming)) => {
                for (k, v) in incoming {
                    merge_entry(existing, &k, v, strict)?;
                }
                Ok(())
            }
            (existing, value) => {
                if strict && (existing.is_object() || value.is_object()) {
                    return Err(MergeConflict);
                }
                *existing = value;
                Ok(())
            }
        };
    }

    map.insert(key.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fold_full_chain() {
        let folded = fold_keys(&json!({ "a": { "b": { "c": 1 } } }), None);
        assert_eq!(folded, json!({ "a.b.c": 1 }));
    }

    #[test]
    fn test_fold_respects_depth() {
        let folded = fold_keys(&json!({ "a": { "b": { "c": 1 } } }), Some(2));
        assert_eq!(folded, json!({ "a.b": { "c": 1 } }));
        let untouched = fold_keys(&json!({ "a": { "b": 1 } }), Some(1));
        assert_eq!(untouched, json!({ "a": { "b": 1 } }));
    }

    #[test]
    fn test_fold_stops_at_multi_key_objects() {
        let folded = fold_keys(&json!({ "a": { "b": { "x": 1, "y": 2 } } }), None);
        assert_eq!(folded, json!({ "a.b": { "x": 1, "y": 2 } }));
    }

    #[test]
    fn test_fold_skips_non_identifier_segments() {
        let folded = fold_keys(&json!({ "a": { "b-c": { "d": 1 } } }), None);
        assert_eq!(folded, json!({ "a": { "b-c": { "d": 1 } } }));
    }

    #[test]
    fn test_fold_avoids_collisions() {
        let input = json!({ "a": { "b": 1 }, "a.b": 2 });
        let folded = fold_keys(&input, None);
        assert_eq!(folded, input);
    }

    #[test]
    fn test_fold_inside_arrays() {
        let folded = fold_keys(&json!([{ "x": { "y": true } }]), None);
        assert_eq!(folded, json!([{ "x.y": true }]));
    }

    #[test]
    fn test_expandable_segments() {
        assert_eq!(expandable_segments("a.b"), Some(vec!["a", "b"]));
        assert_eq!(expandable_segments("plain"), None);
        assert_eq!(expandable_segments("a..b"), None);
        assert_eq!(expandable_segments("a.1"), None);
    }

    #[test]
    fn test_insert_path_merges() {
        let mut map = Map::new();
        insert_path(&mut map, &["a", "b"], json!(1), true).unwrap();
        insert_path(&mut map, &["a", "c"], json!(2), true).unwrap();
        assert_eq!(Value::Object(map), json!({ "a": { "b": 1, "c": 2 } }));
    }

    #[test]
    fn test_insert_path_conflicts() {
        let mut map = Map::new();
        map.insert("a".into(), json!(1));
        assert!(insert_path(&mut map, &["a", "b"], json!(2), true).is_err());
        insert_path(&mut map, &["a", "b"], json!(2), false).unwrap();
        assert_eq!(Value::Object(map), json!({ "a": { "b": 2 } }));
    }
}
