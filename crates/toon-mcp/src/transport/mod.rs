//! Transport layer for MCP communication.

pub mod framing;
#[cfg(feature = "http-stream")]
pub mod http;
pub mod stdio;

#[cfg(feature = "http-stream")]
pub use http::HttpTransport;
pub use stdio::StdioTransport;
