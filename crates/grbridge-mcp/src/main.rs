//! grbridge-mcp: MCP server binary for the gUtils R bridge.
//!
//! This binary runs grbridge as an MCP server over stdio transport.
//!
//! # Usage
//!
//! ```bash
//! # Run directly (requires R with the gUtils and jsonlite packages)
//! grbridge-mcp
//!
//! # Configure in an MCP client:
//! # {
//! #   "mcpServers": {
//! #     "grbridge": {
//! #       "command": "grbridge-mcp"
//! #     }
//! #   }
//! # }
//! ```
//!
//! Log verbosity comes from `RUST_LOG`; set `GRBRIDGE_DEV=1` (or
//! `development = true` in the config file) for ANSI development output.
//! Logs go to stderr — stdout belongs to the MCP transport.

use anyhow::{Context, Result};
use rmcp::service::ServiceExt;
use rmcp::transport::io::stdio;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use grbridge_mcp::server::{BridgeConfig, GrBridgeHandler};

#[tokio::main]
async fn main() -> Result<()> {
    let config = BridgeConfig::load().context("Failed to load configuration")?;

    let development = config.development || std::env::var("GRBRIDGE_DEV").is_ok();
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(development),
        )
        .with(
            EnvFilter::from_default_env()
                .add_directive("grbridge_mcp=info".parse()?)
                .add_directive("grbridge_core=info".parse()?),
        )
        .init();

    tracing::info!("Starting grbridge MCP server");
    tracing::info!(
        name = %config.name,
        version = %config.version,
        rscript = %config.rscript,
        "server config"
    );

    let handler = GrBridgeHandler::new(config).context("Failed to create server handler")?;

    // Fail fast: the interpreter and the gUtils library must be reachable
    // before the transport accepts a single call.
    handler
        .initialize()
        .await
        .context("R bridge initialization failed")?;
    tracing::info!("R bridge initialized");

    tracing::info!("Serving on stdio");
    let service = handler
        .clone()
        .serve(stdio())
        .await
        .context("Failed to start MCP service")?;

    service.waiting().await?;

    handler.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}
