//! # agenr-mcp
//!
//! The `agenr_recall` MCP tool surface: a
//! newline-delimited JSON-RPC 2.0 stdio server that delegates straight
//! into `agenr-retrieval`. Grounded in `vestige-mcp`'s protocol/server
//! split, trimmed to one tool and made synchronous to match the rest of
//! this workspace.

pub mod protocol;
pub mod server;
pub mod stdio;
pub mod tool;

pub use server::McpServer;
pub use stdio::StdioTransport;
