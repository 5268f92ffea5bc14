//! Tool: decode_toon: convert TOON text back into pretty-printed JSON.

use serde_json::Value;

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::outcome::{ToolFailure, ToolOutcome};
use super::schema::{validate, DecodeParams};

pub const NAME: &str = "decode_toon";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some("Convert TOON formatted text back into standard JSON.".to_string()),
        input_schema: DecodeParams::input_schema(),
    }
}

pub fn execute(args: Option<Value>) -> McpResult<ToolCallResult> {
    let params: DecodeParams = validate(args)?;
    Ok(ToolCallResult::from_outcome(decode(&params)))
}

pub fn decode(params: &DecodeParams) -> ToolOutcome {
    let value = toon_codec::decode(&params.toon, &params.decode_options())
        .map_err(|e| ToolFailure::Decode(e.to_string()))?;
    serde_json::to_string_pretty(&value).map_err(|e| ToolFailure::Decode(e.to_string()))
}
