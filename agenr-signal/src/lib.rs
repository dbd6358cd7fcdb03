//! # agenr-signal
//!
//! The signal watermark stream: per-consumer
//! exactly-once delivery of new high-importance entries, keyed by rowid.

use agenr_core::constants::{DEFAULT_SIGNAL_MAX_PER_SIGNAL, DEFAULT_SIGNAL_MIN_IMPORTANCE};
use agenr_core::errors::AgenrResult;
use agenr_core::models::Entry;
use agenr_core::traits::EntryStore;

#[derive(Debug, Clone, Copy)]
pub struct SignalOptions {
    pub min_importance: u8,
    pub max_per_signal: usize,
}

impl Default for SignalOptions {
    fn default() -> Self {
        Self {
            min_importance: DEFAULT_SIGNAL_MIN_IMPORTANCE,
            max_per_signal: DEFAULT_SIGNAL_MAX_PER_SIGNAL,
        }
    }
}

/// Check for new signal-worthy entries for `consumer_id`, advancing the
/// watermark before returning so a re-delivered crash-before-advance is
/// the only possible duplicate.
///
/// Returns `None` when there is nothing new (including the very first
/// call on a non-empty database, which seeds the watermark instead of
/// replaying history).
pub fn check_signals(
    store: &dyn EntryStore,
    consumer_id: &str,
    options: SignalOptions,
) -> AgenrResult<Option<Vec<Entry>>> {
    let watermark = store.initialize_watermark(consumer_id)?;
    let (entries, max_seq) = store.fetch_new_signal_entries(
        watermark.max_seq,
        options.min_importance,
        options.max_per_signal,
    )?;

    if entries.is_empty() {
        return Ok(None);
    }

    store.set_watermark(consumer_id, max_seq)?;
    tracing::info!(consumer_id, count = entries.len(), max_seq, "signal delivered");
    Ok(Some(entries))
}

/// Render the `AGENR SIGNAL: ...` block surfaced to session-start recall.
pub fn format_signal(entries: &[Entry]) -> String {
    let mut out = format!("AGENR SIGNAL: {} new high-importance entries\n", entries.len());
    for entry in entries {
        out.push_str(&format!(
            "- [{}, imp:{}] \"{}\"\n",
            entry.entry_type, entry.importance, entry.subject
        ));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenr_core::models::{EntryType, Expiry, Scope};
    use agenr_storage::StorageEngine;

    fn make_entry(subject: &str, importance: u8) -> Entry {
        Entry::new(
            EntryType::Fact,
            subject,
            "Content long enough to satisfy the minimum length invariant.",
            importance,
            Expiry::Permanent,
            Scope::Private,
            vec!["t".to_string()],
        )
    }

    #[test]
    fn first_call_on_nonempty_db_does_not_replay() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let mut a = make_entry("pre-existing-high", 9);
        engine.insert_entry(&mut a).unwrap();

        let result = check_signals(&engine, "consumer-a", SignalOptions::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn new_high_importance_entry_is_delivered_once() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let mut pre = make_entry("pre-existing", 9);
        engine.insert_entry(&mut pre).unwrap();
        let _ = check_signals(&engine, "consumer-a", SignalOptions::default()).unwrap();

        let mut fresh = make_entry("new-fact", 7);
        engine.insert_entry(&mut fresh).unwrap();

        let result = check_signals(&engine, "consumer-a", SignalOptions::default())
            .unwrap()
            .expect("should deliver the new entry");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].subject, "new-fact");

        let again = check_signals(&engine, "consumer-a", SignalOptions::default()).unwrap();
        assert!(again.is_none());
    }

    #[test]
    fn low_importance_entries_are_not_delivered() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let _ = check_signals(&engine, "consumer-a", SignalOptions::default()).unwrap();
        let mut low = make_entry("trivial", 3);
        engine.insert_entry(&mut low).unwrap();

        let result = check_signals(&engine, "consumer-a", SignalOptions::default()).unwrap();
        assert!(result.is_none());
    }
}
