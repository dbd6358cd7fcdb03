//! Phase 1b — merge near-exact duplicates grouped by normalized
//! fingerprint.

use std::collections::HashMap;

use agenr_core::errors::AgenrResult;
use agenr_core::models::Entry;
use agenr_core::traits::EntryStore;

/// One fingerprint-duplicate group: the survivor (highest importance,
/// then oldest) and the others to retire into it.
#[derive(Debug, Clone)]
pub struct MergeGroup {
    pub survivor: Entry,
    pub others: Vec<Entry>,
}

fn pick_survivor(mut group: Vec<Entry>) -> (Entry, Vec<Entry>) {
    group.sort_by(|a, b| {
        b.importance
            .cmp(&a.importance)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    let survivor = group.remove(0);
    (survivor, group)
}

/// Group non-retired entries by normalized fingerprint, keeping only
/// groups with more than one member.
pub fn find_merge_groups(store: &dyn EntryStore) -> AgenrResult<Vec<MergeGroup>> {
    let all = store.entries_since_rowid(0)?;
    let mut by_fingerprint: HashMap<String, Vec<Entry>> = HashMap::new();
    for entry in all.into_iter().filter(|e| !e.retired) {
        by_fingerprint.entry(entry.fingerprint()).or_default().push(entry);
    }

    Ok(by_fingerprint
        .into_values()
        .filter(|group| group.len() > 1)
        .map(|group| {
            let (survivor, others) = pick_survivor(group);
            MergeGroup { survivor, others }
        })
        .collect())
}

/// Merge each group's duplicates into its survivor: union tags, sum
/// `recall_count`/`confirmations`, increment `merged_from`, then retire
/// the others. Returns the number of entries retired via merge.
pub fn apply_merge(store: &dyn EntryStore, groups: &[MergeGroup]) -> AgenrResult<usize> {
    let mut merged = 0;
    for group in groups {
        let mut survivor = group.survivor.clone();
        for other in &group.others {
            for tag in &other.tags {
                if !survivor.tags.contains(tag) {
                    survivor.tags.push(tag.clone());
                }
            }
            survivor.recall_count += other.recall_count;
            survivor.confirmations += other.confirmations;
            survivor.merged_from += 1;
        }
        store.update_entry(&survivor)?;

        for other in &group.others {
            merged += store.retire_entries(Some(&other.id), None, "consolidation:merged_duplicate")?;
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenr_core::models::{EntryType, Expiry, Scope};

    fn entry(importance: u8) -> Entry {
        Entry::new(EntryType::Fact, "same subject", "identical content for dedup test here", importance, Expiry::Permanent, Scope::Private, vec!["a".into()])
    }

    #[test]
    fn survivor_is_highest_importance() {
        let group = vec![entry(3), entry(9), entry(5)];
        let (survivor, others) = pick_survivor(group);
        assert_eq!(survivor.importance, 9);
        assert_eq!(others.len(), 2);
    }
}
