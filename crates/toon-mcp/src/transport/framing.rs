//! Message framing for newline-delimited JSON.

use serde_json::Value;

use crate::types::{JsonRpcMessage, McpError, McpResult};

/// Parse one line (or HTTP body) as a JSON-RPC message.
///
/// Text that is not JSON is a parse error; JSON that is not a JSON-RPC message is an
/// invalid request.
pub fn parse_message(line: &str) -> McpResult<JsonRpcMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))?;
    serde_json::from_value(value).map_err(|_| {
        McpError::InvalidRequest("Not a JSON-RPC 2.0 request or notification".to_string())
    })
}

/// Serialize a value to a JSON line (with trailing newline).
pub fn frame_message(value: &Value) -> McpResult<String> {
    let mut json = serde_json::to_string(value).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_message("   "), Err(McpError::ParseError(_))));
        assert!(matches!(parse_message("{oops"), Err(McpError::ParseError(_))));
        assert!(matches!(
            parse_message(r#"{"hello":"world"}"#),
            Err(McpError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_frame_is_one_line() {
        let framed = frame_message(&json!({ "a": "multi\nline" })).unwrap();
        assert_eq!(framed, "{\"a\":\"multi\\nline\"}\n");
    }
}
