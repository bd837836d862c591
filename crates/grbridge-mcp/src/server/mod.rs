//! MCP server functionality for grbridge.
//!
//! # Example
//!
//! ```ignore
//! use grbridge_mcp::server::{BridgeConfig, GrBridgeHandler};
//! use rmcp::service::ServiceExt;
//! use rmcp::transport::io::stdio;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BridgeConfig::load()?;
//!     let handler = GrBridgeHandler::new(config)?;
//!     handler.initialize().await?;
//!     handler.serve(stdio()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod handler;
pub mod schema;

pub use config::BridgeConfig;
pub use handler::GrBridgeHandler;
