//! Tool registration and dispatch.

use serde_json::Value;

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{decode_toon, encode_toon};

/// Validates its arguments and runs one tool.
pub type ToolExecutor = fn(Option<Value>) -> McpResult<ToolCallResult>;

/// The tools a server offers, in registration order. Built once at startup.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<(ToolDefinition, ToolExecutor)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `encode_toon` and `decode_toon`.
    pub fn with_toon_tools() -> Self {
        let mut registry = Self::new();
        registry.register(encode_toon::definition(), encode_toon::execute);
        registry.register(decode_toon::definition(), decode_toon::execute);
        registry
    }

    /// Add a tool. A second registration under the same name replaces the first.
    pub fn register(&mut self, definition: ToolDefinition, executor: ToolExecutor) {
        if let Some(slot) = self
            .tools
            .iter_mut()
            .find(|(existing, _)| existing.name == definition.name)
        {
            *slot = (definition, executor);
            return;
        }
        self.tools.push((definition, executor));
    }

    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|(def, _)| def.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn call(&self, name: &str, arguments: Option<Value>) -> McpResult<ToolCallResult> {
        let (_, execute) = self
            .tools
            .iter()
            .find(|(def, _)| def.name == name)
            .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;

        tracing::debug!(tool = name, "calling tool");
        execute(arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lists_in_registration_order() {
        let registry = ToolRegistry::with_toon_tools();
        let names: Vec<String> = registry.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["encode_toon", "decode_toon"]);
    }

    #[test]
    fn test_unknown_tool() {
        let registry = ToolRegistry::with_toon_tools();
        let err = registry.call("compress", None).unwrap_err();
        assert!(matches!(err, McpError::ToolNotFound(ref n) if n == "compress"));
    }

    #[test]
    fn test_reregistration_replaces() {
        fn echo(_: Option<Value>) -> McpResult<ToolCallResult> {
            Ok(ToolCallResult::text("echo".to_string()))
        }

        let mut registry = ToolRegistry::with_toon_tools();
        registry.register(encode_toon::definition(), echo);
        assert_eq!(registry.len(), 2);
        let result = registry.call("encode_toon", Some(json!({ "json": "{}" }))).unwrap();
        assert_eq!(result.first_text(), Some("echo"));
    }
}
