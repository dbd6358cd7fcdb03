//! Brute-force cosine similarity scan over entry embeddings.
//!
//! No sqlite-vec virtual table dependency: every embedding is packed as a
//! little-endian f32 blob on the entry row itself and scored in Rust.

use rusqlite::Connection;

use agenr_core::errors::AgenrResult;
use agenr_core::models::Entry;

use super::entry_crud::{bytes_to_f32_vec, get_entry};
use crate::to_storage_err;

pub fn find_similar(
    conn: &Connection,
    query_embedding: &[f32],
    limit: usize,
    exclude_ids: &[String],
) -> AgenrResult<Vec<(Entry, f64)>> {
    let query_norm_sq: f64 = query_embedding.iter().map(|x| (*x as f64) * (*x as f64)).sum();
    if query_norm_sq == 0.0 {
        return Ok(vec![]);
    }
    let query_len = query_embedding.len();

    let mut stmt = conn
        .prepare(
            "SELECT id, embedding, embedding_dims FROM entries
             WHERE retired = 0 AND embedding IS NOT NULL",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            let id: String = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            let dims: i64 = row.get(2)?;
            Ok((id, blob, dims))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut scored: Vec<(String, f64)> = Vec::new();
    for row in rows {
        let (id, blob, dims) = row.map_err(|e| to_storage_err(e.to_string()))?;
        if exclude_ids.iter().any(|x| x == &id) {
            continue;
        }
        if dims as usize != query_len {
            continue;
        }
        let stored = bytes_to_f32_vec(&blob, dims as usize);
        let sim = cosine_similarity(query_embedding, &stored);
        if sim > 0.0 {
            scored.push((id, sim));
        }
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);

    let mut results = Vec::with_capacity(scored.len());
    for (id, sim) in scored {
        if let Some(entry) = get_entry(conn, &id)? {
            results.push((entry, sim));
        }
    }
    Ok(results)
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = vec![1.0_f32, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_vector_scores_zero() {
        let a = vec![0.0_f32, 0.0];
        let b = vec![1.0_f32, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }
}
