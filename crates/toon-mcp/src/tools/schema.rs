//! Tool argument schemas: typed params with their defaults, and the JSON Schema each
//! tool advertises.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use toon_codec::{
    DecodeOptions, Delimiter, EncodeOptions, FieldFilter, KeyFolding, PathExpansion,
    DEFAULT_INDENT,
};

use crate::types::{McpError, McpResult};

fn default_indent() -> usize {
    DEFAULT_INDENT
}

fn default_strict() -> bool {
    true
}

/// Arguments of `encode_toon`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeParams {
    /// JSON text. Only its type is checked here; the handler parses it.
    pub json: String,
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default)]
    pub delimiter: Delimiter,
    #[serde(default)]
    pub key_folding: KeyFolding,
    /// `None` = unbounded.
    #[serde(default)]
    pub flatten_depth: Option<usize>,
    /// Dotted paths to keep. Empty keeps everything.
    #[serde(default)]
    pub fields: Vec<String>,
}

impl EncodeParams {
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            indent: self.indent,
            delimiter: self.delimiter,
            key_folding: self.key_folding,
            flatten_depth: self.flatten_depth,
        }
    }

    pub fn field_filter(&self) -> FieldFilter {
        FieldFilter::new(&self.fields)
    }

    pub fn input_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "json": {
                    "type": "string",
                    "description": "The JSON data (as a string) to encode into TOON format."
                },
                "indent": {
                    "type": "integer",
                    "minimum": 0,
                    "default": DEFAULT_INDENT,
                    "description": "Number of spaces for indentation. Defaults to 2."
                },
                "delimiter": {
                    "type": "string",
                    "enum": [",", "\t", "|"],
                    "default": ",",
                    "description": "Delimiter for array values (comma, tab, or pipe). Defaults to comma."
                },
                "keyFolding": {
                    "type": "string",
                    "enum": ["off", "safe"],
                    "default": "off",
                    "description": "Collapse single-key wrapper chains into dotted paths. Defaults to 'off'."
                },
                "flattenDepth": {
                    "type": ["integer", "null"],
                    "minimum": 0,
                    "description": "Maximum number of segments in a folded key. Unbounded when omitted."
                },
                "fields": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Dotted field paths to keep (e.g. \"user.name\"). Arrays apply the paths to every element. Omit to keep everything."
                }
            },
            "required": ["json"]
        })
    }
}

/// Arguments of `decode_toon`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeParams {
    pub toon: String,
    #[serde(default = "default_strict")]
    pub strict: bool,
    #[serde(default)]
    pub expand_paths: PathExpansion,
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl DecodeParams {
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            indent: self.indent,
            strict: self.strict,
            expand_paths: self.expand_paths,
        }
    }

    pub fn input_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "toon": {
                    "type": "string",
                    "description": "The TOON formatted string to decode."
                },
                "strict": {
                    "type": "boolean",
                    "default": true,
                    "description": "Enforce strict validation (e.g. array lengths). Defaults to true."
                },
                "expandPaths": {
                    "type": "string",
                    "enum": ["off", "safe"],
                    "default": "off",
                    "description": "Reconstruct dotted keys into nested objects. Defaults to 'off'."
                },
                "indent": {
                    "type": "integer",
                    "minimum": 0,
                    "default": DEFAULT_INDENT,
                    "description": "Spaces per indentation level in the input. Defaults to 2."
                }
            },
            "required": ["toon"]
        })
    }
}

/// Check raw tool arguments against `T`, filling defaults. Missing arguments count as
/// an empty object, so required fields still report.
pub fn validate<T: DeserializeOwned>(arguments: Option<Value>) -> McpResult<T> {
    let args = arguments.unwrap_or_else(|| Value::Object(Map::new()));
    if !args.is_object() {
        return Err(McpError::InvalidParams(
            "Tool arguments must be an object".to_string(),
        ));
    }
    serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))
}
