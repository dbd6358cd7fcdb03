//! Numbered, idempotent migrations tracked in `_migrations`.
//!
//! `run_migrations` applies every version greater than the current one
//! inside a single transaction each. A failure rolls back that version
//! only; lower versions remain applied.

mod v001_entries;
mod v002_relations_sources;
mod v003_entry_sources;
mod v004_review_watermark;

use rusqlite::Connection;

use agenr_core::errors::{AgenrError, AgenrResult, StorageError};

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> AgenrResult<()>;

const MIGRATIONS: &[(u32, MigrationFn)] = &[
    (1, v001_entries::migrate),
    (2, v002_relations_sources::migrate),
    (3, v003_entry_sources::migrate),
    (4, v004_review_watermark::migrate),
];

pub fn run_migrations(conn: &Connection) -> AgenrResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current: u32 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| {
            row.get(0)
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (version, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| to_storage_err(e.to_string()))?;
        match migrate(conn).and_then(|_| {
            conn.execute(
                "INSERT INTO _migrations (version) VALUES (?1)",
                [version],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(())
        }) {
            Ok(()) => {
                conn.execute_batch("COMMIT")
                    .map_err(|e| to_storage_err(e.to_string()))?;
                tracing::info!(version, "migration applied");
            }
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(AgenrError::Storage(StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                }));
            }
        }
    }

    Ok(())
}
