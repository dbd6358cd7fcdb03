use std::path::Path;

use agenr_consolidation::{consolidate_rules, ConsolidateOptions};
use agenr_core::models::{Entry, EntryType, Expiry, Scope};
use agenr_storage::StorageEngine;

fn make_entry(subject: &str, content: &str, importance: u8, expiry: Expiry) -> Entry {
    Entry::new(EntryType::Fact, subject, content, importance, expiry, Scope::Private, vec!["t".into()])
}

#[test]
fn merges_duplicate_fingerprints_into_a_single_survivor() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("agenr.db");
    let engine = StorageEngine::open(&db_path).unwrap();

    let mut low = make_entry("same fact", "identical content used twice here", 3, Expiry::Permanent);
    engine.insert_entry(&mut low).unwrap();
    let mut high = make_entry("same fact", "identical content used twice here", 8, Expiry::Permanent);
    engine.insert_entry(&mut high).unwrap();

    let options = ConsolidateOptions { dry_run: false, verbose: false, base_ttl_days: 14.0 };
    let stats = consolidate_rules(&engine, &db_path, &options).unwrap();

    assert_eq!(stats.merged_count, 1);
    assert!(stats.backup_path.is_some());
    assert!(Path::new(stats.backup_path.as_ref().unwrap()).exists());

    let survivor = engine.get_entry(&high.id).unwrap().unwrap();
    assert_eq!(survivor.merged_from, 1);
    assert!(!survivor.retired);

    let loser = engine.get_entry(&low.id).unwrap().unwrap();
    assert!(loser.retired);
}

#[test]
fn dry_run_reports_candidates_without_mutating() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("agenr.db");
    let engine = StorageEngine::open(&db_path).unwrap();

    let mut a = make_entry("dup", "duplicate content for dry run test case", 5, Expiry::Permanent);
    engine.insert_entry(&mut a).unwrap();
    let mut b = make_entry("dup", "duplicate content for dry run test case", 5, Expiry::Permanent);
    engine.insert_entry(&mut b).unwrap();

    let options = ConsolidateOptions { dry_run: true, verbose: false, base_ttl_days: 14.0 };
    let stats = consolidate_rules(&engine, &db_path, &options).unwrap();
    assert_eq!(stats.merged_count, 1);

    let still_there = engine.get_entry(&a.id).unwrap().unwrap();
    assert!(!still_there.retired);
}

#[test]
fn in_memory_databases_are_rejected() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let options = ConsolidateOptions::default();
    let result = consolidate_rules(&engine, Path::new(":memory:"), &options);
    assert!(result.is_err());
}
