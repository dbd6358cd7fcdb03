//! Review-queue helpers layered on top of [`EntryStore`]'s storage-level
//! primitives.

use agenr_core::constants::{LOW_QUALITY_MIN_RECALLS, LOW_QUALITY_THRESHOLD};
use agenr_core::errors::AgenrResult;
use agenr_core::models::ReviewAction;
use agenr_core::traits::EntryStore;

/// Flag `entry_id` for review iff `quality < LOW_QUALITY_THRESHOLD AND
/// recall_count >= LOW_QUALITY_MIN_RECALLS`. Returns `(created, id)`
/// from the underlying flag, or `(false, -1)` when the quality gate
/// doesn't trip.
pub fn check_and_flag_low_quality(
    store: &dyn EntryStore,
    entry_id: &str,
    quality: f64,
    recall_count: u32,
) -> AgenrResult<(bool, i64)> {
    if quality < LOW_QUALITY_THRESHOLD && recall_count >= LOW_QUALITY_MIN_RECALLS {
        let detail = format!("quality={quality:.3} recall_count={recall_count}");
        return store.flag_for_review(entry_id, "low_quality", &detail, ReviewAction::Retire);
    }
    Ok((false, -1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenr_core::models::{Entry, EntryType, Expiry, Scope};
    use agenr_storage::StorageEngine;

    fn make_entry() -> Entry {
        Entry::new(EntryType::Fact, "low-quality subject", "content long enough to satisfy the invariant", 3, Expiry::Permanent, Scope::Private, vec!["t".into()])
    }

    #[test]
    fn low_quality_with_enough_recalls_is_flagged() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let mut e = make_entry();
        engine.insert_entry(&mut e).unwrap();

        let (created, id) = check_and_flag_low_quality(&engine, &e.id, 0.1, 12).unwrap();
        assert!(created);
        assert!(id > 0);
    }

    #[test]
    fn low_quality_without_enough_recalls_is_not_flagged() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let mut e = make_entry();
        engine.insert_entry(&mut e).unwrap();

        let (created, _) = check_and_flag_low_quality(&engine, &e.id, 0.1, 2).unwrap();
        assert!(!created);
    }
}
