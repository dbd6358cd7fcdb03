//! Entry CRUD, fingerprint lookup, retirement, and recall-counter updates.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use agenr_core::models::{Entry, EntryType, Expiry, Scope};

use agenr_core::errors::AgenrResult;

use crate::to_storage_err;

pub(crate) fn row_to_entry(row: &Row) -> rusqlite::Result<Entry> {
    let entry_type: String = row.get("entry_type")?;
    let expiry: String = row.get("expiry")?;
    let scope: String = row.get("scope")?;
    let tags_json: String = row.get("tags")?;
    let embedding_blob: Option<Vec<u8>> = row.get("embedding")?;
    let embedding_dims: Option<i64> = row.get("embedding_dims")?;

    let embedding = match (embedding_blob, embedding_dims) {
        (Some(blob), Some(dims)) => Some(bytes_to_f32_vec(&blob, dims as usize)),
        _ => None,
    };

    Ok(Entry {
        id: row.get("id")?,
        entry_type: EntryType::parse(&entry_type).unwrap_or(EntryType::Fact),
        subject: row.get("subject")?,
        content: row.get("content")?,
        canonical_key: row.get("canonical_key")?,
        importance: row.get::<_, i64>("importance")? as u8,
        expiry: Expiry::parse(&expiry).unwrap_or(Expiry::Permanent),
        scope: Scope::parse(&scope).unwrap_or(Scope::Private),
        project: row.get("project")?,
        source_file: row.get("source_file")?,
        source_context: row.get("source_context")?,
        platform: row.get("platform")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        recall_count: row.get::<_, i64>("recall_count")? as u32,
        last_recalled_at: row.get("last_recalled_at")?,
        confirmations: row.get::<_, i64>("confirmations")? as u32,
        quality_score: row.get("quality_score")?,
        merged_from: row.get::<_, i64>("merged_from")? as u32,
        consolidated_at: row.get("consolidated_at")?,
        retired: row.get::<_, i64>("retired")? != 0,
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        embedding,
        rowid: row.get("rowid")?,
    })
}

const SELECT_COLUMNS: &str = "rowid, id, entry_type, subject, content, canonical_key, importance,
    expiry, scope, project, source_file, source_context, platform, created_at, updated_at,
    recall_count, last_recalled_at, confirmations, quality_score, merged_from, consolidated_at,
    retired, tags, embedding, embedding_dims";

pub(crate) fn select_columns() -> &'static str {
    SELECT_COLUMNS
}

pub fn insert_entry(conn: &Connection, entry: &mut Entry) -> AgenrResult<()> {
    if entry.id.is_empty() {
        entry.id = uuid::Uuid::new_v4().to_string();
    }
    let fingerprint = entry.fingerprint();
    let tags_json = serde_json::to_string(&entry.tags).unwrap_or_else(|_| "[]".to_string());
    let (embedding_blob, embedding_dims) = match &entry.embedding {
        Some(vec) => (Some(f32_vec_to_bytes(vec)), Some(vec.len() as i64)),
        None => (None, None),
    };

    conn.execute(
        &format!(
            "INSERT INTO entries (
                id, entry_type, subject, content, canonical_key, fingerprint, importance, expiry,
                scope, project, source_file, source_context, platform, created_at, updated_at,
                recall_count, last_recalled_at, confirmations, quality_score, merged_from,
                consolidated_at, retired, tags, embedding, embedding_dims
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25)"
        ),
        params![
            entry.id,
            entry.entry_type.as_str(),
            entry.subject,
            entry.content,
            entry.canonical_key,
            fingerprint,
            entry.importance as i64,
            entry.expiry.as_str(),
            entry.scope.as_str(),
            entry.project,
            entry.source_file,
            entry.source_context,
            entry.platform,
            entry.created_at,
            entry.updated_at,
            entry.recall_count as i64,
            entry.last_recalled_at,
            entry.confirmations as i64,
            entry.quality_score,
            entry.merged_from as i64,
            entry.consolidated_at,
            entry.retired as i64,
            tags_json,
            embedding_blob,
            embedding_dims,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    entry.rowid = conn
        .query_row("SELECT rowid FROM entries WHERE id = ?1", [&entry.id], |r| r.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    tracing::info!(entry_id = %entry.id, entry_type = %entry.entry_type, "entry inserted");
    Ok(())
}

pub fn update_entry(conn: &Connection, entry: &Entry) -> AgenrResult<()> {
    let tags_json = serde_json::to_string(&entry.tags).unwrap_or_else(|_| "[]".to_string());
    let (embedding_blob, embedding_dims) = match &entry.embedding {
        Some(vec) => (Some(f32_vec_to_bytes(vec)), Some(vec.len() as i64)),
        None => (None, None),
    };
    conn.execute(
        "UPDATE entries SET
            subject = ?2, content = ?3, canonical_key = ?4, fingerprint = ?5, importance = ?6,
            expiry = ?7, scope = ?8, project = ?9, updated_at = ?10, recall_count = ?11,
            last_recalled_at = ?12, confirmations = ?13, quality_score = ?14, merged_from = ?15,
            consolidated_at = ?16, retired = ?17, tags = ?18, embedding = ?19, embedding_dims = ?20
         WHERE id = ?1",
        params![
            entry.id,
            entry.subject,
            entry.content,
            entry.canonical_key,
            entry.fingerprint(),
            entry.importance as i64,
            entry.expiry.as_str(),
            entry.scope.as_str(),
            entry.project,
            entry.updated_at,
            entry.recall_count as i64,
            entry.last_recalled_at,
            entry.confirmations as i64,
            entry.quality_score,
            entry.merged_from as i64,
            entry.consolidated_at,
            entry.retired as i64,
            tags_json,
            embedding_blob,
            embedding_dims,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_entry(conn: &Connection, id: &str) -> AgenrResult<Option<Entry>> {
    conn.query_row(
        &format!("SELECT {SELECT_COLUMNS} FROM entries WHERE id = ?1"),
        [id],
        row_to_entry,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn find_by_fingerprint(conn: &Connection, fingerprint: &str) -> AgenrResult<Option<Entry>> {
    conn.query_row(
        &format!(
            "SELECT {SELECT_COLUMNS} FROM entries WHERE fingerprint = ?1 AND retired = 0
             ORDER BY created_at ASC LIMIT 1"
        ),
        [fingerprint],
        row_to_entry,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn insert_source_row(
    conn: &Connection,
    entry_id: &str,
    source_file: Option<&str>,
    ingest_content_hash: Option<&str>,
) -> AgenrResult<()> {
    conn.execute(
        "INSERT INTO entry_sources (entry_id, source_file, ingest_content_hash) VALUES (?1, ?2, ?3)",
        params![entry_id, source_file, ingest_content_hash],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn append_source(
    conn: &Connection,
    entry_id: &str,
    source_file: Option<&str>,
    ingest_content_hash: Option<&str>,
) -> AgenrResult<()> {
    insert_source_row(conn, entry_id, source_file, ingest_content_hash)?;
    conn.execute(
        "UPDATE entries SET confirmations = confirmations + 1, updated_at = ?2 WHERE id = ?1",
        params![entry_id, Utc::now()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn retire_by_id(conn: &Connection, entry_id: &str, reason: &str) -> AgenrResult<usize> {
    let updated = conn
        .execute(
            "UPDATE entries SET retired = 1, updated_at = ?2 WHERE id = ?1 AND retired = 0",
            params![entry_id, Utc::now()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if updated > 0 {
        tracing::info!(entry_id, reason, "entry retired");
    }
    Ok(updated)
}

pub fn retire_expired_before(
    conn: &Connection,
    expiry: &str,
    cutoff: DateTime<Utc>,
) -> AgenrResult<usize> {
    let updated = conn
        .execute(
            "UPDATE entries SET retired = 1, updated_at = ?3
             WHERE retired = 0 AND expiry = ?1 AND recall_count = 0 AND created_at < ?2",
            params![expiry, cutoff, Utc::now()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(updated)
}

pub fn rehabilitate_entry(conn: &Connection, entry_id: &str) -> AgenrResult<()> {
    conn.execute(
        "UPDATE entries SET retired = 0, updated_at = ?2 WHERE id = ?1",
        params![entry_id, Utc::now()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn entries_since_rowid(conn: &Connection, since_rowid: i64) -> AgenrResult<Vec<Entry>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM entries WHERE rowid > ?1 AND retired = 0 ORDER BY rowid ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([since_rowid], row_to_entry)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(out)
}

pub fn max_rowid(conn: &Connection) -> AgenrResult<i64> {
    conn.query_row("SELECT COALESCE(MAX(rowid), 0) FROM entries", [], |r| r.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn update_recall_stats(conn: &Connection, entry_ids: &[String]) -> AgenrResult<()> {
    let now = Utc::now();
    for id in entry_ids {
        conn.execute(
            "UPDATE entries SET recall_count = recall_count + 1, last_recalled_at = ?2 WHERE id = ?1",
            params![id, now],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

pub fn count_entries(conn: &Connection) -> AgenrResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM entries", [], |r| r.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

pub fn bytes_to_f32_vec(bytes: &[u8], expected_dims: usize) -> Vec<f32> {
    let mut result = Vec::with_capacity(expected_dims);
    for chunk in bytes.chunks_exact(4) {
        result.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    result
}
