//! v003: append-only provenance table, plus the two consolidation
//! bookkeeping columns on `entries` (merged_from, consolidated_at).

use rusqlite::Connection;

use agenr_core::errors::AgenrResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> AgenrResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS entry_sources (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id             TEXT NOT NULL,
            source_file          TEXT,
            ingest_content_hash  TEXT,
            observed_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_entry_sources_entry ON entry_sources(entry_id);

        ALTER TABLE entries ADD COLUMN merged_from INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE entries ADD COLUMN consolidated_at TEXT DEFAULT NULL;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
