//! Phase 1a — prune expired temporary entries, following the same
//! archival shape as a scheduled pruning pass but keyed on age-derived
//! thresholds instead of access frequency.

use agenr_core::errors::AgenrResult;
use agenr_core::models::{Entry, Expiry};
use agenr_core::traits::EntryStore;
use chrono::Utc;

/// Age (in days) after which a temporary entry of the given `importance`
/// becomes prune-eligible. Low importance decays fastest: importance 1
/// survives a tenth of `base_ttl_days`, importance 10 survives the full
/// `base_ttl_days`.
pub fn expiry_threshold_days(importance: u8, base_ttl_days: f64) -> f64 {
    base_ttl_days * (importance.max(1) as f64 / 10.0)
}

fn is_prune_candidate(entry: &Entry, base_ttl_days: f64) -> bool {
    if entry.expiry != Expiry::Temporary || entry.retired || entry.recall_count != 0 {
        return false;
    }
    let age_days = (Utc::now() - entry.created_at).num_seconds().max(0) as f64 / 86_400.0;
    age_days >= expiry_threshold_days(entry.importance, base_ttl_days)
}

/// Entries eligible for pruning (not yet retired).
pub fn find_prune_candidates(store: &dyn EntryStore, base_ttl_days: f64) -> AgenrResult<Vec<Entry>> {
    let all = store.entries_since_rowid(0)?;
    Ok(all.into_iter().filter(|e| is_prune_candidate(e, base_ttl_days)).collect())
}

/// Retire every prune candidate, returning the count retired.
pub fn apply_prune(store: &dyn EntryStore, candidates: &[Entry]) -> AgenrResult<usize> {
    let mut count = 0;
    for entry in candidates {
        count += store.retire_entries(Some(&entry.id), None, "consolidation:expired")?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_importance_decays_faster_than_high_importance() {
        assert!(expiry_threshold_days(1, 14.0) < expiry_threshold_days(10, 14.0));
    }

    #[test]
    fn importance_ten_survives_the_full_base_ttl() {
        assert_eq!(expiry_threshold_days(10, 14.0), 14.0);
    }
}
