//! Review queue helpers.

use rusqlite::{params, Connection, OptionalExtension};

use agenr_core::errors::AgenrResult;
use agenr_core::models::{ReviewAction, ReviewItem, ReviewStatus};

use crate::to_storage_err;

/// Insert a pending review row unless one already exists for this
/// `(entry_id, reason)` pair. Returns `(created, review_id)`.
pub fn flag_for_review(
    conn: &Connection,
    entry_id: &str,
    reason: &str,
    detail: &str,
    suggested_action: ReviewAction,
) -> AgenrResult<(bool, i64)> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM review_queue WHERE entry_id = ?1 AND reason = ?2 AND status = 'pending'",
            params![entry_id, reason],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    if let Some(id) = existing {
        return Ok((false, id));
    }

    conn.execute(
        "INSERT INTO review_queue (entry_id, reason, detail, suggested_action)
         VALUES (?1, ?2, ?3, ?4)",
        params![entry_id, reason, detail, suggested_action.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let id = conn.last_insert_rowid();
    tracing::info!(entry_id, reason, review_id = id, "flagged for review");
    Ok((true, id))
}

pub fn resolve_review(conn: &Connection, review_id: i64, status: ReviewStatus) -> AgenrResult<bool> {
    let updated = conn
        .execute(
            "UPDATE review_queue SET status = ?2, resolved_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1 AND status = 'pending'",
            params![review_id, status.as_str()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(updated > 0)
}

fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<ReviewItem> {
    let suggested: String = row.get("suggested_action")?;
    let status: String = row.get("status")?;
    Ok(ReviewItem {
        id: row.get("id")?,
        entry_id: row.get("entry_id")?,
        reason: row.get("reason")?,
        detail: row.get("detail")?,
        suggested_action: ReviewAction::parse(&suggested).unwrap_or(ReviewAction::Review),
        status: ReviewStatus::parse(&status).unwrap_or(ReviewStatus::Pending),
        created_at: row.get("created_at")?,
        resolved_at: row.get("resolved_at")?,
    })
}

pub fn list_review_items(
    conn: &Connection,
    status: Option<ReviewStatus>,
    limit: usize,
) -> AgenrResult<Vec<ReviewItem>> {
    let sql = match status {
        Some(_) => {
            "SELECT id, entry_id, reason, detail, suggested_action, status, created_at, resolved_at
             FROM review_queue WHERE status = ?1 ORDER BY created_at ASC LIMIT ?2"
        }
        None => {
            "SELECT id, entry_id, reason, detail, suggested_action, status, created_at, resolved_at
             FROM review_queue ORDER BY created_at ASC LIMIT ?1"
        }
    };
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = match status {
        Some(s) => stmt.query_map(params![s.as_str(), limit as i64], row_to_item),
        None => stmt.query_map(params![limit as i64], row_to_item),
    }
    .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(out)
}

pub fn get_review_item(conn: &Connection, review_id: i64) -> AgenrResult<Option<ReviewItem>> {
    conn.query_row(
        "SELECT id, entry_id, reason, detail, suggested_action, status, created_at, resolved_at
         FROM review_queue WHERE id = ?1",
        [review_id],
        row_to_item,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}
