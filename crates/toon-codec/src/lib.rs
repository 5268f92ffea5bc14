//! TOON codec: converts JSON values to the compact, line-oriented TOON notation and back.
//!
//! TOON drops braces and most quotes in favour of indentation, declares array lengths in
//! headers, and writes uniform arrays of objects as delimiter-separated tables. It is meant
//! for handing structured data to language models with fewer tokens than JSON.
//!
//! ```rust
//! use serde_json::json;
//! use toon_codec::{decode, encode, DecodeOptions, EncodeOptions};
//!
//! let value = json!({ "name": "Ada", "tags": ["admin", "ops"] });
//! let text = encode(&value, &EncodeOptions::default()).unwrap();
//! assert_eq!(text, "name: Ada\ntags[2]: admin,ops");
//!
//! let back = decode(&text, &DecodeOptions::default()).unwrap();
//! assert_eq!(back, value);
//! ```

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod folding;
pub mod options;
mod syntax;

pub use decoder::decode;
pub use encoder::encode;
pub use error::{ToonError, ToonResult};
pub use filter::{filter_fields, FieldFilter};
pub use folding::fold_keys;
pub use options::{
    DecodeOptions, Delimiter, EncodeOptions, KeyFolding, PathExpansion, DEFAULT_INDENT, MAX_DEPTH,
    MAX_INDENT,
};
