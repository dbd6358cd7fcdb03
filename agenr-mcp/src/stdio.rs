//! Newline-delimited JSON-RPC stdio transport, grounded
//! in `vestige-mcp::protocol::stdio::StdioTransport` but synchronous: one
//! line in, dispatch, one line out, malformed lines get a parse-error
//! response instead of crashing the loop.

use std::io::{self, BufRead, Write};

use tracing::{debug, error, warn};

use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::server::McpServer;

pub struct StdioTransport;

impl StdioTransport {
    pub fn new() -> Self {
        Self
    }

    pub fn run(self, mut server: McpServer) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout().lock();

        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    error!(error = %e, "failed to read stdin line");
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            debug!(bytes = line.len(), "received request");

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "failed to parse request");
                    write_response(&mut stdout, &JsonRpcResponse::error(None, JsonRpcError::parse_error()))?;
                    continue;
                }
            };

            if let Some(response) = server.handle_request(request) {
                write_response(&mut stdout, &response)?;
            }
        }

        Ok(())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn write_response(stdout: &mut impl Write, response: &JsonRpcResponse) -> io::Result<()> {
    match serde_json::to_string(response) {
        Ok(json) => {
            writeln!(stdout, "{json}")?;
            stdout.flush()
        }
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            let fallback = r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;
            writeln!(stdout, "{fallback}")?;
            stdout.flush()
        }
    }
}
