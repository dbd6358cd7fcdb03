//! `consolidateRules` entry point: backup, then the
//! three strictly sequential phases prune → merge → orphan-clean.

use std::path::Path;

use serde::Serialize;

use agenr_core::errors::{AgenrError, AgenrResult, ConsolidationError};
use agenr_core::traits::EntryStore;

use crate::{merge, prune};

#[derive(Debug, Clone, Default)]
pub struct ConsolidateOptions {
    pub dry_run: bool,
    pub verbose: bool,
    pub base_ttl_days: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsolidationStats {
    pub backup_path: Option<std::path::PathBuf>,
    pub expired_count: usize,
    pub merged_count: usize,
    pub orphaned_relations_cleaned: usize,
    pub entries_before: usize,
    pub entries_after: usize,
}

pub fn consolidate_rules(
    store: &dyn EntryStore,
    db_path: &Path,
    options: &ConsolidateOptions,
) -> AgenrResult<ConsolidationStats> {
    if db_path.as_os_str() == ":memory:" {
        return Err(AgenrError::Consolidation(ConsolidationError::InMemoryUnsupported));
    }

    let entries_before = store.count_entries()?;
    let backup_path = agenr_storage::backup::backup_db(db_path)?;
    if options.verbose {
        tracing::info!(path = %backup_path.display(), "pre-consolidation backup written");
    }

    let prune_candidates = prune::find_prune_candidates(store, options.base_ttl_days)?;
    let merge_groups = merge::find_merge_groups(store)?;

    if options.dry_run {
        let merge_candidate_count: usize = merge_groups.iter().map(|g| g.others.len()).sum();
        return Ok(ConsolidationStats {
            backup_path: Some(backup_path),
            expired_count: prune_candidates.len(),
            merged_count: merge_candidate_count,
            orphaned_relations_cleaned: 0,
            entries_before,
            entries_after: entries_before,
        });
    }

    let expired_count = prune::apply_prune(store, &prune_candidates)?;
    let merged_count = merge::apply_merge(store, &merge_groups)?;
    let orphaned_relations_cleaned = store.clean_orphan_relations()?;

    let entries_after = store.count_entries()?;

    if options.verbose {
        tracing::info!(
            expired_count,
            merged_count,
            orphaned_relations_cleaned,
            entries_before,
            entries_after,
            "consolidation rules phase complete"
        );
    }

    Ok(ConsolidationStats {
        backup_path: Some(backup_path),
        expired_count,
        merged_count,
        orphaned_relations_cleaned,
        entries_before,
        entries_after,
    })
}
