//! The flat relations edge table.

use rusqlite::{params, Connection};

use agenr_core::errors::AgenrResult;
use agenr_core::models::{Relation, RelationType};

use crate::to_storage_err;

pub fn insert_relation(conn: &Connection, relation: &Relation) -> AgenrResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO relations (source_id, target_id, relation_type) VALUES (?1, ?2, ?3)",
        params![
            relation.source_id,
            relation.target_id,
            relation.relation_type.as_str()
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_relations(conn: &Connection, entry_id: &str) -> AgenrResult<Vec<Relation>> {
    let mut stmt = conn
        .prepare(
            "SELECT source_id, target_id, relation_type FROM relations
             WHERE source_id = ?1 OR target_id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([entry_id], |row| {
            let relation_type: String = row.get(2)?;
            Ok(Relation {
                source_id: row.get(0)?,
                target_id: row.get(1)?,
                relation_type: RelationType::parse(&relation_type)
                    .unwrap_or(RelationType::Related),
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(out)
}

/// Delete relation rows whose source or target no longer exists or has
/// been retired.
pub fn clean_orphan_relations(conn: &Connection) -> AgenrResult<usize> {
    let deleted = conn
        .execute(
            "DELETE FROM relations
             WHERE source_id NOT IN (SELECT id FROM entries WHERE retired = 0)
                OR target_id NOT IN (SELECT id FROM entries WHERE retired = 0)",
            [],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(deleted)
}
