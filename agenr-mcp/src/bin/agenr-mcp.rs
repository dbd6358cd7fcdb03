//! `agenr-mcp` binary: runs the stdio MCP server over an on-disk store.

use std::path::Path;
use std::process::ExitCode;

use agenr_core::config::AgenrConfig;
use agenr_lifecycle::Lifecycle;
use agenr_mcp::{McpServer, StdioTransport};
use agenr_storage::StorageEngine;

fn main() -> ExitCode {
    agenr_core::tracing_setup::init_tracing(false);

    if let Err(e) = Lifecycle::install() {
        tracing::error!(error = %e, "failed to install signal handlers");
        return ExitCode::FAILURE;
    }

    let config = match AgenrConfig::load(None) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to load config");
            return ExitCode::FAILURE;
        }
    };

    let store = match StorageEngine::open(Path::new(&config.db.path)) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to open store");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(db = %config.db.path, "agenr-mcp starting");

    let server = McpServer::new(&store, None, config);
    match StdioTransport::new().run(server) {
        Ok(()) => {
            Lifecycle::run_shutdown_handlers();
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "stdio transport exited with an error");
            Lifecycle::run_shutdown_handlers();
            ExitCode::FAILURE
        }
    }
}
