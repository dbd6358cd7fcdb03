use agenr_core::config::AgenrConfig;
use agenr_core::errors::AgenrResult;
use agenr_core::models::{Entry, EntryType, Expiry, Scope};
use agenr_core::traits::EmbeddingProvider;
use agenr_retrieval::{recall, RecallQuery, RecallResponse};
use agenr_storage::StorageEngine;

/// Deterministic stub returning a fixed 3-dim vector keyed by marker
/// substrings in the entry content. The bare query text "work" carries no
/// such marker, so it falls through to the same vector as the strongest
/// match — exactly what a real embedder would do for a query that's most
/// semantically aligned with `work-strong`.
struct StubEmbedder;

impl EmbeddingProvider for StubEmbedder {
    fn embed(&self, texts: &[String]) -> AgenrResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                if t.contains("vec-work-strong") {
                    vec![1.0, 0.0, 0.0]
                } else if t.contains("vec-work-mid") {
                    vec![0.7, 0.3, 0.0]
                } else if t.contains("vec-health") {
                    vec![0.0, 1.0, 0.0]
                } else {
                    vec![1.0, 0.0, 0.0]
                }
            })
            .collect())
    }
}

fn make_entry(subject: &str, content: &str) -> Entry {
    Entry::new(EntryType::Fact, subject, content, 5, Expiry::Permanent, Scope::Private, vec!["t".into()])
}

#[test]
fn store_then_recall_round_trip_ranks_strongest_match_first() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let embedder = StubEmbedder;

    for (subject, content) in [
        ("work-strong", "contains vec-work-strong signal"),
        ("work-mid", "contains vec-work-mid signal"),
        ("health", "contains vec-health signal"),
    ] {
        let mut e = make_entry(subject, content);
        e.embedding = Some(embedder.embed_one(content).unwrap());
        engine.insert_entry(&mut e).unwrap();
    }

    let config = AgenrConfig::default();
    let query = RecallQuery {
        text: Some("work".to_string()),
        limit: 3,
        ..Default::default()
    };

    let response = recall(&engine, Some(&embedder), &config, &query).unwrap();
    match response {
        RecallResponse::Items(items) => {
            assert_eq!(items.len(), 3);
            assert!(items[0].entry.subject.contains("strong"));
        }
        other => panic!("expected items, got {other:?}"),
    }
}

#[test]
fn no_update_leaves_recall_counters_unchanged() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut e = make_entry("fact", "a fact worth remembering for later recall");
    engine.insert_entry(&mut e).unwrap();

    let config = AgenrConfig::default();
    let query = RecallQuery {
        since_seq: Some(0),
        no_update: true,
        ..Default::default()
    };
    let _ = recall(&engine, None, &config, &query).unwrap();

    let reloaded = engine.get_entry(&e.id).unwrap().unwrap();
    assert_eq!(reloaded.recall_count, 0);
    assert!(reloaded.last_recalled_at.is_none());
}

#[test]
fn since_seq_recall_reports_no_new_entries_past_the_watermark() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut e = make_entry("fact", "a fact worth remembering for later recall");
    engine.insert_entry(&mut e).unwrap();
    let max = engine.max_rowid().unwrap();

    let config = AgenrConfig::default();
    let query = RecallQuery {
        since_seq: Some(max + 100),
        ..Default::default()
    };
    let response = recall(&engine, None, &config, &query).unwrap();
    match response {
        RecallResponse::NoNewEntries { since_seq } => assert_eq!(since_seq, max + 100),
        other => panic!("expected NoNewEntries, got {other:?}"),
    }
}

#[test]
fn session_start_recall_splits_core_and_non_core_tiers() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut core = make_entry("core-fact", "a core fact that should always be recalled");
    core.expiry = Expiry::Core;
    engine.insert_entry(&mut core).unwrap();

    let mut normal = make_entry("normal-fact", "a normal fact that is not pinned as core");
    engine.insert_entry(&mut normal).unwrap();

    let config = AgenrConfig::default();
    let query = RecallQuery {
        context: Some("session-start".to_string()),
        ..Default::default()
    };
    let response = recall(&engine, None, &config, &query).unwrap();
    match response {
        RecallResponse::Items(items) => {
            assert_eq!(items.len(), 2);
            assert!(items.iter().any(|i| i.entry.subject == "core-fact"));
            assert!(items.iter().any(|i| i.entry.subject == "normal-fact"));
        }
        other => panic!("expected items, got {other:?}"),
    }
}
