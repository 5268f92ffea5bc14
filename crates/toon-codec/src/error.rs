//! Error types for encoding and decoding.

/// Everything that can go wrong while converting to or from TOON.
///
/// Line numbers are 1-based and refer to the decoded document.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ToonError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Line {line}: indentation is not a multiple of {indent} spaces")]
    InvalidIndentation { line: usize, indent: usize },

    #[error("Line {line}: tabs are not allowed in indentation")]
    TabIndentation { line: usize },

    #[error("Line {line}: unexpected indentation")]
    UnexpectedIndentation { line: usize },

    #[error("Line {line}: missing key before ':'")]
    MissingKey { line: usize },

    #[error("Line {line}: expected `key: value`, found `{content}`")]
    InvalidLine { line: usize, content: String },

    #[error("Line {line}: invalid array header: {reason}")]
    InvalidArrayHeader { line: usize, reason: String },

    #[error("Line {line}: array declares {expected} items but has {found}")]
    ArrayLengthMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: row has {found} values but the header declares {expected} fields")]
    RowWidthMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: unterminated string")]
    UnterminatedString { line: usize },

    #[error("Line {line}: invalid escape sequence `\\{sequence}`")]
    InvalidEscape { line: usize, sequence: String },

    #[error("Line {line}: unexpected characters after closing quote: `{rest}`")]
    TrailingCharacters { line: usize, rest: String },

    #[error("Line {line}: nesting exceeds the maximum depth of {max}")]
    NestingTooDeep { line: usize, max: usize },

    #[error("Line {line}: path expansion conflict at `{path}`")]
    PathConflict { line: usize, path: String },
}

pub type ToonResult<T> = Result<T, ToonError>;
