//! v004: review_queue and signal_watermarks.

use rusqlite::Connection;

use agenr_core::errors::AgenrResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> AgenrResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS review_queue (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id          TEXT NOT NULL,
            reason            TEXT NOT NULL,
            detail            TEXT NOT NULL DEFAULT '',
            suggested_action  TEXT NOT NULL DEFAULT 'review',
            status            TEXT NOT NULL DEFAULT 'pending',
            created_at        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            resolved_at       TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_review_pending_unique
            ON review_queue(entry_id, reason)
            WHERE status = 'pending';
        CREATE INDEX IF NOT EXISTS idx_review_status ON review_queue(status);

        CREATE TABLE IF NOT EXISTS signal_watermarks (
            consumer_id  TEXT PRIMARY KEY,
            max_seq      INTEGER NOT NULL DEFAULT 0
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
