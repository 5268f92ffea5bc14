//! Field selection applied before encoding.
//!
//! Paths are dotted (`user.name`). Arrays are transparent: a path applies to every element.

use serde_json::{Map, Value};

/// A set of dotted field paths to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilter {
    paths: Vec<Vec<String>>,
}

impl FieldFilter {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = paths
            .into_iter()
            .map(|p| {
                p.as_ref()
                    .split('.')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|segments| !segments.is_empty())
            .collect();
        Self { paths }
    }

    /// No paths: the filter keeps everything.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Keep only the fields named by `filter`. An empty filter returns the value unchanged.
pub fn filter_fields(value: &Value, filter: &FieldFilter) -> Value {
    if filter.is_empty() {
        return value.clone();
    }
    let paths: Vec<&[String]> = filter.paths.iter().map(Vec::as_slice).collect();
    select(value, &paths)
}

fn select(value: &Value, paths: &[&[String]]) -> Value {
    match value {
        Value::Object(map) => Value::Object(select_object(map, paths)),
        Value::Array(items) => Value::Array(items.iter().map(|v| select(v, paths)).collect()),
        other => other.clone(),
    }
}

fn select_object(map: &Map<String, Value>, paths: &[&[String]]) -> Map<String, Value> {
    let mut out = Map::new();

    for (key, value) in map {
        let matching: Vec<&[String]> = paths
            .iter()
            .filter(|p| p.first() == Some(key))
            .map(|p| &p[1..])
            .collect();
        if matching.is_empty() {
            continue;
        }
        if matching.iter().any(|tail| tail.is_empty()) {
            out.insert(key.clone(), value.clone());
        } else {
            out.insert(key.clone(), select(value, &matching));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keeps_top_level_fields() {
        let filter = FieldFilter::new(["keep"]);
        assert_eq!(
            filter_fields(&json!({ "keep": 1, "drop": 2 }), &filter),
            json!({ "keep": 1 })
        );
    }

    #[test]
    fn test_nested_paths() {
        let filter = FieldFilter::new(["user.name", "status"]);
        let value = json!({ "user": { "name": "Ada", "email": "a@x" }, "status": "ok", "id": 1 });
        assert_eq!(
            filter_fields(&value, &filter),
            json!({ "user": { "name": "Ada" }, "status": "ok" })
        );
    }

    #[test]
    fn test_paths_apply_through_arrays() {
        let filter = FieldFilter::new(["users.id"]);
        let value = json!({ "users": [{ "id": 1, "name": "a" }, { "id": 2, "name": "b" }] });
        assert_eq!(
            filter_fields(&value, &filter),
            json!({ "users": [{ "id": 1 }, { "id": 2 }] })
        );
    }

    #[test]
    fn test_kept_field_keeps_whole_value() {
        let filter = FieldFilter::new(["tags", "tags.ignored"]);
        let value = json!({ "tags": ["a", "b", "c"], "other": true });
        assert_eq!(filter_fields(&value, &filter), json!({ "tags": ["a", "b", "c"] }));
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let value = json!({ "a": 1 });
        assert_eq!(filter_fields(&value, &FieldFilter::new(Vec::<String>::new())), value);
        assert!(FieldFilter::new(["", "."]).is_empty());
    }
}
