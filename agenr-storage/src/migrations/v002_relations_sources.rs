//! v002: flat relations edge table, never an ownership graph.

use rusqlite::Connection;

use agenr_core::errors::AgenrResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> AgenrResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS relations (
            source_id     TEXT NOT NULL,
            target_id     TEXT NOT NULL,
            relation_type TEXT NOT NULL,
            created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (source_id, target_id, relation_type)
        );

        CREATE INDEX IF NOT EXISTS idx_relations_source ON relations(source_id);
        CREATE INDEX IF NOT EXISTS idx_relations_target ON relations(target_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
