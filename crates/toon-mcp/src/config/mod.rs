//! Startup configuration: which transport to run and on which port.

/// Port used by the network transport when neither `--port` nor `PORT` is set.
pub const DEFAULT_PORT: &str = "8080";

/// Environment variable consulted for the port when `--port` is absent.
pub const PORT_ENV: &str = "PORT";

pub const DEFAULT_HOST: &str = "127.0.0.1";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid port specified: '{0}'.")]
    InvalidPort(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Stdio,
    HttpStream,
}

impl TransportKind {
    /// `http-stream` / `httpStream` in any case selects HTTP; anything else is stdio.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "http-stream" | "httpstream" => TransportKind::HttpStream,
            "stdio" => TransportKind::Stdio,
            other => {
                tracing::warn!("Unknown transport '{other}', falling back to stdio");
                TransportKind::Stdio
            }
        }
    }
}

/// The transport chosen at startup, with everything needed to start it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportSelection {
    Stdio,
    HttpStream { port: u16 },
}

/// Port by priority: flag, then environment, then [`DEFAULT_PORT`].
pub fn resolve_port(flag: Option<&str>, env: Option<&str>) -> Result<u16, ConfigError> {
    let raw = flag.or(env).unwrap_or(DEFAULT_PORT);
    raw.trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

/// Decide the transport once. The port is only looked at for HTTP.
pub fn select_transport(
    transport: Option<&str>,
    port_flag: Option<&str>,
    port_env: Option<&str>,
) -> Result<TransportSelection, ConfigError> {
    match transport.map(TransportKind::parse) {
        Some(TransportKind::HttpStream) => Ok(TransportSelection::HttpStream {
            port: resolve_port(port_flag, port_env)?,
        }),
        Some(TransportKind::Stdio) | None => Ok(TransportSelection::Stdio),
    }
}
