//! Per-consumer signal watermark.

use rusqlite::{params, Connection, OptionalExtension};

use agenr_core::errors::AgenrResult;
use agenr_core::models::Watermark;

use agenr_core::models::Entry;

use super::entry_crud::max_rowid;
use crate::to_storage_err;

/// If no watermark row exists yet, seed it at the current max rowid so
/// pre-existing entries are never replayed as "new" signals.
pub fn initialize_watermark(conn: &Connection, consumer_id: &str) -> AgenrResult<Watermark> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT max_seq FROM signal_watermarks WHERE consumer_id = ?1",
            [consumer_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    if let Some(max_seq) = existing {
        return Ok(Watermark::new(max_seq));
    }

    let seed = max_rowid(conn)?;
    conn.execute(
        "INSERT INTO signal_watermarks (consumer_id, max_seq) VALUES (?1, ?2)",
        params![consumer_id, seed],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(Watermark::new(seed))
}

pub fn get_watermark(conn: &Connection, consumer_id: &str) -> AgenrResult<Option<Watermark>> {
    conn.query_row(
        "SELECT max_seq FROM signal_watermarks WHERE consumer_id = ?1",
        [consumer_id],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
    .map(|opt| opt.map(Watermark::new))
}

/// Monotonic advance: never decreases the stored watermark.
pub fn set_watermark(conn: &Connection, consumer_id: &str, max_seq: i64) -> AgenrResult<()> {
    conn.execute(
        "INSERT INTO signal_watermarks (consumer_id, max_seq) VALUES (?1, ?2)
         ON CONFLICT(consumer_id) DO UPDATE SET max_seq = MAX(signal_watermarks.max_seq, excluded.max_seq)",
        params![consumer_id, max_seq],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Entries above `watermark` that qualify as signal-worthy: non-retired
/// and at or above `min_importance`, ascending by rowid, capped at
/// `max_per_signal`. Returns the entries plus the highest rowid observed
/// (equal to `watermark` itself when nothing new qualified).
pub fn fetch_new_signal_entries(
    conn: &Connection,
    watermark: i64,
    min_importance: u8,
    max_per_signal: usize,
) -> AgenrResult<(Vec<Entry>, i64)> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {cols} FROM entries
             WHERE rowid > ?1 AND retired = 0 AND importance >= ?2
             ORDER BY rowid ASC LIMIT ?3",
            cols = super::entry_crud::select_columns()
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(
            params![watermark, min_importance as i64, max_per_signal as i64],
            super::entry_crud::row_to_entry,
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entries = Vec::new();
    let mut max_seq = watermark;
    for row in rows {
        let entry = row.map_err(|e| to_storage_err(e.to_string()))?;
        if let Some(rowid) = entry.rowid {
            max_seq = max_seq.max(rowid);
        }
        entries.push(entry);
    }
    Ok((entries, max_seq))
}
