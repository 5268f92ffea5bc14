//! MCP tool implementations.

pub mod decode_toon;
pub mod encode_toon;
pub mod outcome;
pub mod registry;
pub mod schema;

pub use outcome::{ToolFailure, ToolOutcome};
pub use registry::{ToolExecutor, ToolRegistry};
pub use schema::{validate, DecodeParams, EncodeParams};
