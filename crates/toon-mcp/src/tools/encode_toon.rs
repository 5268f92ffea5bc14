//! Tool: encode_toon: convert JSON text into TOON.

use std::borrow::Cow;

use serde_json::Value;

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::outcome::{ToolFailure, ToolOutcome};
use super::schema::{validate, EncodeParams};

pub const NAME: &str = "encode_toon";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some("Convert JSON data into compact TOON format to save tokens.".to_string()),
        input_schema: EncodeParams::input_schema(),
    }
}

pub fn execute(args: Option<Value>) -> McpResult<ToolCallResult> {
    let params: EncodeParams = validate(args)?;
    Ok(ToolCallResult::from_outcome(encode(&params)))
}

/// Parse, filter, encode. The TOON text is returned untouched.
pub fn encode(params: &EncodeParams) -> ToolOutcome {
    let value: Value =
        serde_json::from_str(&params.json).map_err(|e| ToolFailure::InvalidJson(e.to_string()))?;

    let filter = params.field_filter();
    let value = if filter.is_empty() {
        Cow::Borrowed(&value)
    } else {
        Cow::Owned(toon_codec::filter_fields(&value, &filter))
    };

    let text = toon_codec::encode(&value, &params.encode_options())
        .map_err(|e| ToolFailure::Encode(e.to_string()))?;

    tracing::debug!(
        input_bytes = params.json.len(),
        output_bytes = text.len(),
        "encoded JSON as TOON"
    );
    Ok(text)
}
