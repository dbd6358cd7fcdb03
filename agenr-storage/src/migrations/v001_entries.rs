//! v001: entries table and its lookup indexes.

use rusqlite::Connection;

use agenr_core::errors::AgenrResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> AgenrResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS entries (
            id              TEXT PRIMARY KEY,
            entry_type      TEXT NOT NULL,
            subject         TEXT NOT NULL,
            content         TEXT NOT NULL,
            canonical_key   TEXT,
            fingerprint     TEXT NOT NULL,
            importance      INTEGER NOT NULL DEFAULT 5,
            expiry          TEXT NOT NULL DEFAULT 'permanent',
            scope           TEXT NOT NULL DEFAULT 'private',
            project         TEXT,
            source_file     TEXT,
            source_context  TEXT,
            platform        TEXT,
            created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            recall_count    INTEGER NOT NULL DEFAULT 0,
            last_recalled_at TEXT,
            confirmations   INTEGER NOT NULL DEFAULT 1,
            quality_score   REAL NOT NULL DEFAULT 1.0,
            retired         INTEGER NOT NULL DEFAULT 0,
            tags            TEXT NOT NULL DEFAULT '[]',
            embedding       BLOB,
            embedding_dims  INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_entries_fingerprint ON entries(fingerprint);
        CREATE INDEX IF NOT EXISTS idx_entries_type ON entries(entry_type);
        CREATE INDEX IF NOT EXISTS idx_entries_project ON entries(project);
        CREATE INDEX IF NOT EXISTS idx_entries_retired ON entries(retired);
        CREATE INDEX IF NOT EXISTS idx_entries_expiry ON entries(expiry);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
