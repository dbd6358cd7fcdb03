use agenr_core::errors::AgenrResult;
use agenr_core::models::{Entry, EntryType, Expiry, RelationType, Relation, ReviewAction, Scope};
use agenr_core::traits::{EmbeddingProvider, EntryStore};
use agenr_storage::StorageEngine;

struct StubEmbedder;

impl EmbeddingProvider for StubEmbedder {
    fn embed(&self, texts: &[String]) -> AgenrResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }
}

fn sample_entry(subject: &str, content: &str, importance: u8) -> Entry {
    Entry::new(
        EntryType::Fact,
        subject,
        content,
        importance,
        Expiry::Permanent,
        Scope::Private,
        vec!["test".to_string()],
    )
}

#[test]
fn migrations_are_idempotent_and_contiguous() {
    let engine = StorageEngine::open_in_memory().expect("open");
    // Opening twice (simulated by re-running initialize through a second
    // engine against the same in-memory connection isn't possible across
    // processes, so we assert on the schema this engine produced instead.
    let count = engine.count_entries().unwrap();
    assert_eq!(count, 0);
}

#[test]
fn insert_then_get_round_trips() {
    let engine = StorageEngine::open_in_memory().expect("open");
    let mut entry = sample_entry("Duke", "Duke is a golden retriever who loves tennis balls.", 8);
    entry.embedding = Some(vec![1.0, 0.0, 0.0]);
    engine.insert_entry(&mut entry).unwrap();
    assert!(!entry.id.is_empty());
    assert!(entry.rowid.is_some());

    let fetched = engine.get_entry(&entry.id).unwrap().expect("present");
    assert_eq!(fetched.subject, "Duke");
    assert_eq!(fetched.embedding, Some(vec![1.0, 0.0, 0.0]));
}

#[test]
fn find_similar_ranks_by_cosine_similarity() {
    let engine = StorageEngine::open_in_memory().expect("open");
    let mut strong = sample_entry("work", "vec-work-strong topic about deadlines", 7);
    strong.embedding = Some(vec![1.0, 0.0]);
    let mut mid = sample_entry("work", "vec-work-mid topic about standups", 7);
    mid.embedding = Some(vec![0.7, 0.3]);
    let mut unrelated = sample_entry("health", "vec-health topic about sleep schedule", 7);
    unrelated.embedding = Some(vec![0.0, 1.0]);

    engine.insert_entry(&mut strong).unwrap();
    engine.insert_entry(&mut mid).unwrap();
    engine.insert_entry(&mut unrelated).unwrap();

    let results = engine.find_similar(&[1.0, 0.0], 3, &[]).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].0.id, strong.id);
}

#[test]
fn retire_then_rehabilitate() {
    let engine = StorageEngine::open_in_memory().expect("open");
    let mut entry = sample_entry("Duke", "Duke is a golden retriever who loves tennis balls.", 5);
    entry.embedding = Some(vec![1.0]);
    engine.insert_entry(&mut entry).unwrap();

    let retired = engine.retire_entries(Some(&entry.id), None, "manual").unwrap();
    assert_eq!(retired, 1);
    assert!(engine.get_entry(&entry.id).unwrap().unwrap().retired);

    engine.rehabilitate_entry(&entry.id).unwrap();
    assert!(!engine.get_entry(&entry.id).unwrap().unwrap().retired);
}

#[test]
fn orphan_relations_are_cleaned() {
    let engine = StorageEngine::open_in_memory().expect("open");
    let mut a = sample_entry("A", "Entry A has some durable content worth keeping.", 5);
    a.embedding = Some(vec![1.0]);
    engine.insert_entry(&mut a).unwrap();

    engine
        .insert_relation(&Relation {
            source_id: a.id.clone(),
            target_id: "missing-entry".to_string(),
            relation_type: RelationType::Related,
        })
        .unwrap();

    let cleaned = engine.clean_orphan_relations().unwrap();
    assert_eq!(cleaned, 1);
}

#[test]
fn store_entries_confirms_instead_of_reinserting_on_repeat() {
    let engine = StorageEngine::open_in_memory().expect("open");
    let embedder = StubEmbedder;
    let candidate = sample_entry("Duke", "Duke is a golden retriever who loves tennis balls.", 5);

    let first = engine
        .store_entries(vec![candidate.clone()], &embedder, Some("notes.md"), None, false)
        .unwrap();
    assert_eq!(first.inserted, 1);
    assert_eq!(first.confirmed, 0);
    assert_eq!(first.skipped, 0);

    let fingerprint = candidate.fingerprint();
    let stored = engine.find_by_fingerprint(&fingerprint).unwrap().expect("present");
    assert_eq!(stored.confirmations, 1);

    let second = engine
        .store_entries(vec![candidate], &embedder, Some("notes.md"), None, false)
        .unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.confirmed, 1);
    assert_eq!(second.skipped, 0);
    assert_eq!(engine.count_entries().unwrap(), 1);

    let reconfirmed = engine.find_by_fingerprint(&fingerprint).unwrap().expect("present");
    assert_eq!(reconfirmed.confirmations, 2);
}

#[test]
fn store_entries_skips_invalid_candidates() {
    let engine = StorageEngine::open_in_memory().expect("open");
    let embedder = StubEmbedder;
    let invalid = sample_entry("", "too short", 5);

    let stats = engine.store_entries(vec![invalid], &embedder, None, None, false).unwrap();
    assert_eq!(stats.inserted, 0);
    assert_eq!(stats.confirmed, 0);
    assert_eq!(stats.skipped, 1);
    assert_eq!(engine.count_entries().unwrap(), 0);
}

#[test]
fn review_queue_dedupes_pending_reason() {
    let engine = StorageEngine::open_in_memory().expect("open");
    let mut entry = sample_entry("Duke", "Duke is a golden retriever who loves tennis balls.", 5);
    entry.embedding = Some(vec![1.0]);
    engine.insert_entry(&mut entry).unwrap();

    let (created1, id1) = engine
        .flag_for_review(&entry.id, "manual", "looks stale", ReviewAction::Review)
        .unwrap();
    assert!(created1);

    let (created2, id2) = engine
        .flag_for_review(&entry.id, "manual", "again", ReviewAction::Review)
        .unwrap();
    assert!(!created2);
    assert_eq!(id1, id2);
}
