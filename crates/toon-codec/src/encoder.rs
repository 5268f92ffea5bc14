//! JSON value → TOON text.

use std::borrow::Cow;

use serde_json::{Map, Number, Value};

use crate::error::ToonResult;
use crate::folding::fold_keys;
use crate::options::{Delimiter, EncodeOptions, KeyFolding};
use crate::syntax::{is_bare_key, looks_numeric, quote};

/// Encode a JSON value as TOON.
pub fn encode(value: &Value, options: &EncodeOptions) -> ToonResult<String> {
    options.validate()?;

    let value = match options.key_folding {
        KeyFolding::Safe => Cow::Owned(fold_keys(value, options.flatten_depth)),
        KeyFolding::Off => Cow::Borrowed(value),
    };

    let mut encoder = Encoder::new(options);
    encoder.encode_root(&value);
    Ok(encoder.finish())
}

struct Encoder<'a> {
    options: &'a EncodeOptions,
    lines: Vec<String>,
}

impl<'a> Encoder<'a> {
    fn new(options: &'a EncodeOptions) -> Self {
        Self {
            options,
            lines: Vec::new(),
        }
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }

    fn push(&mut self, depth: usize, content: String) {
        let mut line = " ".repeat(depth * self.options.indent);
        line.push_str(&content);
        self.lines.push(line);
    }

    fn encode_root(&mut self, value: &Value) {
        match value {
            Value::Object(map) => self.encode_fields(map, 0),
            Value::Array(items) => self.encode_array("", items, 0, 1),
            primitive => {
                let text = self.primitive(primitive, self.options.delimiter);
                self.push(0, text);
            }
        }
    }

    fn encode_fields(&mut self, map: &Map<String, Value>, depth: usize) {
        for (key, value) in map {
            self.encode_field(&encode_key(key), value, depth, depth + 1);
        }
    }

    /// Write `prefix` (a key, possibly preceded by `- `) and its value. Nested content
    /// goes to `child_depth`.
    fn encode_field(&mut self, prefix: &str, value: &Value, depth: usize, child_depth: usize) {
        match value {
            Value::Object(map) => {
                self.push(depth, format!("{prefix}:"));
                self.encode_fields(map, child_depth);
            }
            Value::Array(items) => self.encode_array(prefix, items, depth, child_depth),
            primitive => {
                let text = self.primitive(primitive, self.options.delimiter);
                self.push(depth, format!("{prefix}: {text}"));
            }
        }
    }

    fn encode_array(&mut self, prefix: &str, items: &[Value], depth: usize, child_depth: usize) {
        let delimiter = self.options.delimiter;

        if items.iter().all(is_primitive) {
            let header = self.header(items.len(), None);
            if items.is_empty() {
                self.push(depth, format!("{prefix}{header}"));
            } else {
                let values = self.join_primitives(items.iter(), delimiter);
                self.push(depth, format!("{prefix}{header} {values}"));
            }
            return;
        }

        if let Some(fields) = tabular_fields(items) {
            let header = self.header(items.len(), Some(fields.as_slice()));
            self.push(depth, format!("{prefix}{header}"));
            for item in items {
                if let Value::Object(row) = item {
                    let cells = fields.iter().filter_map(|field| row.get(*field));
                    let line = self.join_primitives(cells, delimiter);
                    self.push(child_depth, line);
                }
            }
            return;
        }

        let header = self.header(items.len(), None);
        self.push(depth, format!("{prefix}{header}"));
        for item in items {
            self.encode_list_item(item, child_depth);
        }
    }

    fn encode_list_item(&mut self, item: &Value, depth: usize) {
        match item {
            Value::Object(map) if map.is_empty() => self.push(depth, "-".to_string()),
            Value::Object(map) => {
                let mut fields = map.iter();
                if let Some((key, value)) = fields.next() {
                    let prefix = format!("- {}", encode_key(key));
                    self.encode_field(&prefix, value, depth, depth + 2);
                }
                for (key, value) in fields {
                    self.encode_field(&encode_key(key), value, depth + 1, depth + 2);
                }
            }
            Value::Array(inner) => self.encode_array("- ", inner, depth, depth + 1),
            primitive => {
                let text = self.primitive(primitive, self.options.delimiter);
                self.push(depth, format!("- {text}"));
            }
        }
    }

    /// `[N]`, `[N|]{a|b}:` and so on, always ending in `:`.
    fn header(&self, len: usize, fields: Option<&[&str]>) -> String {
        let delimiter = self.options.delimiter;
        let mut header = format!("[{len}{}]", delimiter.header_symbol());
        if let Some(fields) = fields {
            let names: Vec<String> = fields.iter().map(|f| encode_key(f)).collect();
            header.push('{');
            header.push_str(&names.join(&delimiter.as_char().to_string()));
            header.push('}');
        }
        header.push(':');
        header
    }

    fn join_primitives<'v>(
        &self,
        values: impl Iterator<Item = &'v Value>,
        delimiter: Delimiter,
    ) -> String {
        values
            .map(|v| self.primitive(v, delimiter))
            .collect::<Vec<_>>()
            .join(&delimiter.as_char().to_string())
    }

    fn primitive(&self, value: &Value, delimiter: Delimiter) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => canonical_number(n),
            Value::String(s) => encode_string(s, delimiter),
            // Only reachable for malformed tabular input; tabular detection excludes it.
            Value::Array(_) | Value::Object(_) => "null".to_string(),
        }
    }
}

fn is_primitive(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Field names for tabular form: every item is a non-empty object with the same keys as
/// the first, and every value is a primitive.
///
/// Rows are written in the first item's key order, so a later row with the same keys in
/// another order decodes in that first order.
fn tabular_fields(items: &[Value]) -> Option<Vec<&str>> {
    let first = items.first()?.as_object()?;
    if first.is_empty() {
        return None;
    }
    let fields: Vec<&str> = first.keys().map(String::as_str).collect();

    let uniform = items.iter().all(|item| {
        item.as_object().is_some_and(|row| {
            row.len() == fields.len()
                && fields
                    .iter()
                    .all(|field| row.get(*field).is_some_and(is_primitive))
        })
    });

    uniform.then_some(fields)
}

fn encode_key(key: &str) -> String {
    if is_bare_key(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn encode_string(s: &str, delimiter: Delimiter) -> String {
    if needs_quotes(s, delimiter) {
        quote(s)
    } else {
        s.to_string()
    }
}

fn needs_quotes(s: &str, delimiter: Delimiter) -> bool {
    s.is_empty()
        || s.trim() != s
        || matches!(s, "true" | "false" | "null")
        || s.starts_with('-')
        || looks_numeric(s)
        || s.contains(delimiter.as_char())
        || s.chars().any(|c| {
            matches!(c, ':' | '"' | '\\' | '[' | ']' | '{' | '}') || c.is_control()
        })
}

/// Decimal form without exponent; `-0` becomes `0`.
fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        // f64's Display never uses exponent notation.
        Some(f) if f.is_finite() => format!("{f}"),
        _ => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn enc(value: Value) -> String {
        encode(&value, &EncodeOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_root_object() {
        assert_eq!(enc(json!({})), "");
    }

    #[test]
    fn test_simple_object() {
        assert_eq!(enc(json!({ "a": 1, "b": 2 })), "a: 1\nb: 2");
    }

    #[test]
    fn test_nested_object() {
        let out = enc(json!({ "user": { "name": "Ada", "meta": {} } }));
        assert_eq!(out, "user:\n  name: Ada\n  meta:");
    }

    #[test]
    fn test_root_primitives() {
        assert_eq!(enc(json!("hello world")), "hello world");
        assert_eq!(enc(json!(42)), "42");
        assert_eq!(enc(json!(null)), "null");
        assert_eq!(enc(json!("true")), "\"true\"");
    }

    #[test]
    fn test_inline_primitive_array() {
        assert_eq!(enc(json!({ "tags": ["a", "b", "c"] })), "tags[3]: a,b,c");
        assert_eq!(enc(json!({ "mixed": [1, "x", true, null] })), "mixed[4]: 1,x,true,null");
        assert_eq!(enc(json!({ "none": [] })), "none[0]:");
    }

    #[test]
    fn test_root_array() {
        assert_eq!(enc(json!([1, 2, 3])), "[3]: 1,2,3");
    }

    #[test]
    fn test_tabular_array() {
        let out = enc(json!({
            "users": [
                { "id": 1, "name": "Ada" },
                { "id": 2, "name": "Bob" }
            ]
        }));
        assert_eq!(out, "users[2]{id,name}:\n  1,Ada\n  2,Bob");
    }

    #[test]
    fn test_tabular_rows_follow_first_key_order() {
        let out = enc(json!({
            "points": [
                { "x": 1, "y": 2 },
                { "y": 3, "x": 4 }
            ]
        }));
        assert_eq!(out, "points[2]{x,y}:\n  1,2\n  4,3");

        let back = crate::decode(&out, &crate::DecodeOptions::default()).unwrap();
        let keys: Vec<&str> = back["points"][1]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn test_non_uniform_objects_use_list() {
        let out = enc(json!({ "items": [{ "a": 1 }, { "b": 2, "c": 3 }] }));
        assert_eq!(out, "items[2]:\n  - a: 1\n  - b: 2\n    c: 3");
    }

    #[test]
    fn test_list_item_first_field_nesting() {
        let out = enc(json!({
            "items": [
                { "tags": [{ "k": 1 }, { "k": 2 }], "status": "ok" },
                "plain"
            ]
        }));
        assert_eq!(
            out,
            "items[2]:\n  - tags[2]{k}:\n      1\n      2\n    status: ok\n  - plain"
        );
    }

    #[test]
    fn test_nested_arrays_in_list() {
        let out = enc(json!({ "grid": [[1, 2], [], [{ "x": 1 }, 3]] }));
        assert_eq!(
            out,
            "grid[3]:\n  - [2]: 1,2\n  - [0]:\n  - [2]:\n    - x: 1\n    - 3"
        );
    }

    #[test]
    fn test_pipe_and_tab_delimiters() {
        let options = EncodeOptions {
            delimiter: Delimiter::Pipe,
            ..EncodeOptions::default()
        };
        let out = encode(&json!({ "t": ["a,b", "c"] }), &options).unwrap();
        assert_eq!(out, "t[2|]: a,b|c");

        let options = EncodeOptions {
            delimiter: Delimiter::Tab,
            ..EncodeOptions::default()
        };
        let out = encode(&json!({ "rows": [{ "a": 1, "b": 2 }] }), &options).unwrap();
        assert_eq!(out, "rows[1\t]{a\tb}:\n  1\t2");
    }

    #[test]
    fn test_string_quoting() {
        let out = enc(json!({
            "empty": "",
            "padded": " x",
            "colon": "a:b",
            "comma": "a,b",
            "number": "42",
            "zero": "007",
            "dash": "-flag",
            "newline": "a\nb",
            "plain": "hello world"
        }));
        let expected = [
            "empty: \"\"",
            "padded: \" x\"",
            "colon: \"a:b\"",
            "comma: \"a,b\"",
            "number: \"42\"",
            "zero: \"007\"",
            "dash: \"-flag\"",
            "newline: \"a\\nb\"",
            "plain: hello world",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_key_quoting() {
        let out = enc(json!({ "user-id": 1, "2nd": 2, "a.b": 3, "": 4 }));
        assert_eq!(out, "\"user-id\": 1\n\"2nd\": 2\na.b: 3\n\"\": 4");
    }

    #[test]
    fn test_number_canonical_form() {
        let out = enc(json!({ "big": 1e20, "small": 0.000001, "neg_zero": -0.0, "pi": 3.5 }));
        assert_eq!(
            out,
            "big: 100000000000000000000\nsmall: 0.000001\nneg_zero: 0\npi: 3.5"
        );
    }

    #[test]
    fn test_indent_option() {
        let options = EncodeOptions {
            indent: 4,
            ..EncodeOptions::default()
        };
        let out = encode(&json!({ "a": { "b": 1 } }), &options).unwrap();
        assert_eq!(out, "a:\n    b: 1");
    }

    #[test]
    fn test_rejects_zero_indent() {
        let options = EncodeOptions {
            indent: 0,
            ..EncodeOptions::default()
        };
        assert!(encode(&json!({ "a": 1 }), &options).is_err());
    }

    #[test]
    fn test_key_folding() {
        let options = EncodeOptions {
            key_folding: KeyFolding::Safe,
            ..EncodeOptions::default()
        };
        let out = encode(&json!({ "data": { "meta": { "count": 3 } }, "x": 1 }), &options).unwrap();
        assert_eq!(out, "data.meta.count: 3\nx: 1");

        let limited = EncodeOptions {
            flatten_depth: Some(2),
            ..options
        };
        let out = encode(&json!({ "data": { "meta": { "count": 3, "n": 1 } } }), &limited).unwrap();
        assert_eq!(out, "data.meta:\n  count: 3\n  n: 1");
    }
}
