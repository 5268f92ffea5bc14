//! Encoder and decoder configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ToonError, ToonResult};

/// Spaces per indentation level unless configured otherwise.
pub const DEFAULT_INDENT: usize = 2;

/// Largest indentation width the codec accepts.
pub const MAX_INDENT: usize = 64;

/// Deepest nesting the decoder accepts, counting indentation levels and expanded key
/// segments. Same bound as serde_json's recursion limit.
pub const MAX_DEPTH: usize = 128;

/// Separator between inline array values and tabular cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Delimiter {
    #[default]
    #[serde(rename = ",", alias = "comma")]
    Comma,
    #[serde(rename = "\t", alias = "tab")]
    Tab,
    #[serde(rename = "|", alias = "pipe")]
    Pipe,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    /// Symbol written inside an array header. Comma is implied and never written.
    pub fn header_symbol(self) -> &'static str {
        match self {
            Delimiter::Comma => "",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    pub(crate) fn from_header_symbol(c: char) -> Option<Self> {
        match c {
            '\t' => Some(Delimiter::Tab),
            '|' => Some(Delimiter::Pipe),
            ',' => Some(Delimiter::Comma),
            _ => None,
        }
    }
}

/// Whether chains of single-key objects collapse into dotted keys when encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyFolding {
    #[default]
    Off,
    Safe,
}

/// Whether dotted keys expand back into nested objects when decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathExpansion {
    #[default]
    Off,
    Safe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Spaces per indentation level.
    pub indent: usize,
    /// Delimiter for inline arrays and tabular rows.
    pub delimiter: Delimiter,
    pub key_folding: KeyFolding,
    /// Maximum number of segments in a folded key. `None` means unbounded.
    pub flatten_depth: Option<usize>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            delimiter: Delimiter::Comma,
            key_folding: KeyFolding::Off,
            flatten_depth: None,
        }
    }
}

impl EncodeOptions {
    pub fn validate(&self) -> ToonResult<()> {
        validate_indent(self.indent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Spaces per indentation level expected in the input.
    pub indent: usize,
    /// Enforce declared lengths, row widths, exact indentation and conflict-free expansion.
    pub strict: bool,
    pub expand_paths: PathExpansion,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            strict: true,
            expand_paths: PathExpansion::Off,
        }
    }
}

impl DecodeOptions {
    pub fn validate(&self) -> ToonResult<()> {
        validate_indent(self.indent)
    }
}

fn validate_indent(indent: usize) -> ToonResult<()> {
    if indent == 0 || indent > MAX_INDENT {
        return Err(ToonError::InvalidOptions(format!(
            "indent must be between 1 and {MAX_INDENT} spaces, got {indent}"
        )));
    }
    Ok(())
}
