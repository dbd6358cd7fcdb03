//! Typed error taxonomy.
//!
//! Each subsystem crate owns a `thiserror` enum scoped to its own concern;
//! this module defines the ones that belong to the data model itself plus
//! the umbrella [`AgenrError`] that CLI/MCP boundary code converts into
//! exit codes or JSON-RPC error objects.

mod consolidation_error;
mod lock_error;
mod retrieval_error;
mod storage_error;

pub use consolidation_error::ConsolidationError;
pub use lock_error::LockError;
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;

/// Top-level error type returned across crate boundaries.
#[derive(Debug, thiserror::Error)]
pub enum AgenrError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Consolidation(#[from] ConsolidationError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type AgenrResult<T> = Result<T, AgenrError>;
