//! # agenr-storage
//!
//! SQLite-backed storage engine: connection pool, migrations, PID lockfile,
//! backup/reset, and the [`agenr_core::traits::EntryStore`] implementation.

pub mod backup;
pub mod engine;
pub mod lock;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;
pub use lock::{acquire_db_lock, is_db_locked, release_db_lock, LockGuard};

use agenr_core::errors::{AgenrError, StorageError};

/// Wrap a rusqlite error as a generic storage error.
pub(crate) fn to_storage_err(message: impl Into<String>) -> AgenrError {
    AgenrError::Storage(StorageError::Sqlite {
        message: message.into(),
    })
}
