//! MCP response types for tools.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::ToolOutcome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(default, rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolCallResult {
    pub fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent::Text { text }],
            is_error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            content: vec![ToolContent::Text { text: message }],
            is_error: Some(true),
        }
    }

    /// Render a handler outcome. Failures become their prefixed message, flagged `isError`.
    pub fn from_outcome(outcome: ToolOutcome) -> Self {
        match outcome {
            Ok(text) => Self::text(text),
            Err(failure) => Self::error(failure.to_string()),
        }
    }

    /// Text of the first content item.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|c| match c {
            ToolContent::Text { text } => Some(text.as_str()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolListResult {
    pub tools: Vec<ToolDefinition>,
    #[serde(default, rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolFailure;
    use serde_json::json;

    #[test]
    fn test_success_has_no_error_flag() {
        let result = ToolCallResult::from_outcome(Ok("a: 1".to_string()));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "content": [{ "type": "text", "text": "a: 1" }] })
        );
    }

    #[test]
    fn test_failure_keeps_prefix_and_flags_error() {
        let result = ToolCallResult::from_outcome(Err(ToolFailure::Decode("bad".to_string())));
        assert_eq!(result.first_text(), Some("Error decoding TOON: bad"));
        assert_eq!(result.is_error, Some(true));
    }
}
