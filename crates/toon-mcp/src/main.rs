//! TOON MCP Server: entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use toon_mcp::config::{self, TransportSelection};
use toon_mcp::protocol::ProtocolHandler;
use toon_mcp::tools::ToolRegistry;
use toon_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "toon-mcp",
    about = "MCP server converting JSON to token-efficient TOON and back",
    version
)]
struct Cli {
    /// Transport to serve: stdio, http-stream (or httpStream).
    #[arg(long, default_value = "stdio")]
    transport: String,

    /// Port for http-stream. Falls back to $PORT, then 8080.
    #[arg(long)]
    port: Option<String>,

    /// Listen host for http-stream.
    #[arg(long, default_value = config::DEFAULT_HOST)]
    host: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print server info, capabilities and tools as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   toon-mcp completions bash > ~/.local/share/bash-completion/completions/toon-mcp
    ///   toon-mcp completions zsh > ~/.zfunc/_toon-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let registry = Arc::new(ToolRegistry::with_toon_tools());

    match cli.command {
        Some(Commands::Info) => {
            let capabilities = toon_mcp::types::InitializeResult::default_result();
            let tools = registry.list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "toon-mcp", &mut std::io::stdout());
        }

        None => {
            let port_env = std::env::var(config::PORT_ENV).ok();
            let selection = match config::select_transport(
                Some(cli.transport.as_str()),
                cli.port.as_deref(),
                port_env.as_deref(),
            ) {
                Ok(selection) => selection,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            };

            let handler = ProtocolHandler::new(registry);
            match selection {
                TransportSelection::Stdio => {
                    StdioTransport::new(handler).run().await?;
                }
                TransportSelection::HttpStream { port } => serve_http(handler, &cli.host, port).await?,
            }
        }
    }

    Ok(())
}

#[cfg(feature = "http-stream")]
async fn serve_http(handler: ProtocolHandler, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    toon_mcp::transport::HttpTransport::new(handler)
        .run(&addr)
        .await?;
    Ok(())
}

#[cfg(not(feature = "http-stream"))]
async fn serve_http(_handler: ProtocolHandler, _host: &str, _port: u16) -> anyhow::Result<()> {
    eprintln!("Error: this build does not include the http-stream transport.");
    std::process::exit(1);
}
