//! TOON MCP Server: `encode_toon` and `decode_toon` tools for LLM agents.

pub mod config;
pub mod protocol;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{select_transport, TransportSelection};
pub use protocol::ProtocolHandler;
pub use tools::ToolRegistry;
#[cfg(feature = "http-stream")]
pub use transport::HttpTransport;
pub use transport::StdioTransport;
