//! Structured logging setup. `AGENR_LOG` takes precedence, falling back
//! to `RUST_LOG`, falling back to `info`.
//!
//! Only binaries (`agenr-cli`, `agenr-mcp`) call this, each exactly once,
//! guarded so a second call is a harmless no-op.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global tracing subscriber. `verbose` raises the default
/// filter to `debug` for this invocation only, unless `AGENR_LOG` or
/// `RUST_LOG` is already set, in which case the environment wins.
pub fn init_tracing(verbose: bool) {
    INIT.get_or_init(|| {
        let default_level = if verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_env("AGENR_LOG")
            .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .init();
    });
}
