//! # agenr-retrieval
//!
//! The recall engine: hybrid-scored text recall, two-tier session-start
//! recall, and since-seq incremental recall — no intent classification,
//! query expansion, or RRF fusion, just the scoring factors the core has
//! inputs for.

pub mod project_scope;
pub mod scoring;

use agenr_core::config::AgenrConfig;
use agenr_core::errors::AgenrResult;
use agenr_core::models::{Entry, Expiry};
use agenr_core::traits::{EmbeddingProvider, EntryStore};

const OVER_FETCH_FACTOR: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct RecallQuery {
    pub text: Option<String>,
    pub context: Option<String>,
    pub limit: usize,
    pub no_update: bool,
    pub since_seq: Option<i64>,
    pub project: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Core,
    NonCore,
}

#[derive(Debug, Clone)]
pub struct RankedEntry {
    pub entry: Entry,
    pub score: f64,
    pub category: Option<Category>,
}

#[derive(Debug, Clone)]
pub enum RecallResponse {
    Items(Vec<RankedEntry>),
    NoNewEntries { since_seq: i64 },
}

/// Run the recall pipeline described by `query` against `store`.
///
/// `embedder` is optional: when `query.text` is set and an embedder is
/// supplied, candidates are gathered by vector similarity and rescored
/// with the full hybrid formula; without an embedder (or without text)
/// scoring falls back to recency + importance only.
pub fn recall(
    store: &dyn EntryStore,
    embedder: Option<&dyn EmbeddingProvider>,
    config: &AgenrConfig,
    query: &RecallQuery,
) -> AgenrResult<RecallResponse> {
    if let Some(since_seq) = query.since_seq {
        return since_seq_recall(store, config, query, since_seq);
    }

    if query.context.as_deref() == Some("session-start") {
        return session_start_recall(store, embedder, config, query);
    }

    text_recall(store, embedder, config, query)
}

fn project_filtered(entries: Vec<Entry>, config: &AgenrConfig, query: &RecallQuery) -> Vec<Entry> {
    entries
        .into_iter()
        .filter(|e| project_scope::in_scope(e, query.project.as_deref(), &config.project))
        .collect()
}

fn text_recall(
    store: &dyn EntryStore,
    embedder: Option<&dyn EmbeddingProvider>,
    config: &AgenrConfig,
    query: &RecallQuery,
) -> AgenrResult<RecallResponse> {
    let limit = query.limit.max(1);
    let candidates = match (query.text.as_deref(), embedder) {
        (Some(text), Some(embedder)) if !text.trim().is_empty() => {
            let embedding = embedder.embed_one(text)?;
            let over_fetch = limit.saturating_mul(OVER_FETCH_FACTOR).max(limit);
            let found = store.find_similar(&embedding, over_fetch, &[])?;
            found.into_iter().map(|(e, cos)| (e, cos)).collect::<Vec<_>>()
        }
        _ => {
            let all = store.entries_since_rowid(0)?;
            all.into_iter().map(|e| (e, 0.0)).collect()
        }
    };

    let text = query.text.as_deref();
    let mut scored: Vec<RankedEntry> = candidates
        .into_iter()
        .filter(|(e, _)| project_scope::in_scope(e, query.project.as_deref(), &config.project))
        .map(|(entry, cos_sim)| {
            let score = scoring::combine(&config.recall, text, &entry, cos_sim);
            RankedEntry { entry, score, category: None }
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);

    maybe_update_recall_stats(store, query, &scored)?;
    Ok(RecallResponse::Items(scored))
}

/// Two-tier session-start recall: all `core` entries unbounded, plus up
/// to `non_core_limit` non-core entries, both ranked by the hybrid
/// formula with no text query (recency + importance only).
fn session_start_recall(
    store: &dyn EntryStore,
    embedder: Option<&dyn EmbeddingProvider>,
    config: &AgenrConfig,
    query: &RecallQuery,
) -> AgenrResult<RecallResponse> {
    let _ = embedder;
    let all = project_filtered(store.entries_since_rowid(0)?, config, query);

    let mut core: Vec<RankedEntry> = all
        .iter()
        .filter(|e| e.expiry == Expiry::Core)
        .map(|e| RankedEntry {
            score: scoring::combine(&config.recall, None, e, 0.0),
            entry: e.clone(),
            category: Some(Category::Core),
        })
        .collect();
    core.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut non_core: Vec<RankedEntry> = all
        .iter()
        .filter(|e| e.expiry != Expiry::Core)
        .map(|e| RankedEntry {
            score: scoring::combine(&config.recall, None, e, 0.0),
            entry: e.clone(),
            category: Some(Category::NonCore),
        })
        .collect();
    non_core.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    non_core.truncate(config.recall.non_core_limit);

    let mut combined = core;
    combined.extend(non_core);

    maybe_update_recall_stats(store, query, &combined)?;
    Ok(RecallResponse::Items(combined))
}

fn since_seq_recall(
    store: &dyn EntryStore,
    config: &AgenrConfig,
    query: &RecallQuery,
    since_seq: i64,
) -> AgenrResult<RecallResponse> {
    let entries = project_filtered(store.entries_since_rowid(since_seq)?, config, query);
    if entries.is_empty() {
        return Ok(RecallResponse::NoNewEntries { since_seq });
    }

    let ranked: Vec<RankedEntry> = entries
        .into_iter()
        .map(|entry| RankedEntry { entry, score: 0.0, category: None })
        .collect();

    maybe_update_recall_stats(store, query, &ranked)?;
    Ok(RecallResponse::Items(ranked))
}

fn maybe_update_recall_stats(store: &dyn EntryStore, query: &RecallQuery, items: &[RankedEntry]) -> AgenrResult<()> {
    if query.no_update || items.is_empty() {
        return Ok(());
    }
    let ids: Vec<String> = items.iter().map(|r| r.entry.id.clone()).collect();
    store.update_recall_stats(&ids)
}

/// Render recall items as the MCP text-block format:
/// rowid-bearing responses carry `[rowid=R] [id=X]` prefixes in
/// ascending rowid order.
pub fn format_with_rowids(response: &RecallResponse) -> String {
    match response {
        RecallResponse::NoNewEntries { since_seq } => format!("No new entries since seq {since_seq}."),
        RecallResponse::Items(items) => {
            let mut sorted = items.clone();
            sorted.sort_by_key(|r| r.entry.rowid.unwrap_or(0));
            sorted
                .iter()
                .map(|r| {
                    format!(
                        "[rowid={}] [id={}] [{}] {}",
                        r.entry.rowid.unwrap_or(0),
                        r.entry.id,
                        r.entry.subject,
                        r.entry.content
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}
