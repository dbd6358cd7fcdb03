//! The single writer connection. SQLite allows exactly one writer at a
//! time; serializing through a mutex here means the pool never has to
//! retry on `SQLITE_BUSY` for same-process writers.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use agenr_core::errors::AgenrResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> AgenrResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> AgenrResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure holding the writer lock.
    pub fn with_conn_sync<F, T>(&self, f: F) -> AgenrResult<T>
    where
        F: FnOnce(&Connection) -> AgenrResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("writer lock poisoned: {e}")))?;
        f(&guard)
    }
}
