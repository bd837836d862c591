//! grbridge-mcp: MCP server for gUtils genomic interval operations.
//!
//! Exposes the full operation catalog of `grbridge-core` as MCP tools over
//! stdio. Every call is routed through the bridge dispatcher: arguments are
//! serialized into one R command, executed in a fresh `Rscript` process, and
//! the tagged result is returned as JSON text content.

pub mod server;
