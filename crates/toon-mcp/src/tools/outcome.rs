//! Handler results, kept typed until the protocol edge renders them.

/// Why a tool call failed. `Display` is the exact text a client receives.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolFailure {
    #[error("Error: Invalid JSON input. {0}")]
    InvalidJson(String),

    #[error("Error encoding TOON: {0}")]
    Encode(String),

    #[error("Error decoding TOON: {0}")]
    Decode(String),
}

pub type ToolOutcome = Result<String, ToolFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert!(ToolFailure::InvalidJson("eof".into())
            .to_string()
            .starts_with("Error: Invalid JSON input."));
        assert_eq!(
            ToolFailure::Encode("indent".into()).to_string(),
            "Error encoding TOON: indent"
        );
        assert_eq!(
            ToolFailure::Decode("line 1".into()).to_string(),
            "Error decoding TOON: line 1"
        );
    }
}
