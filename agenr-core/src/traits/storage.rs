use crate::errors::AgenrResult;
use crate::models::{Entry, Relation, ReviewAction, ReviewItem, ReviewStatus, Watermark};
use crate::traits::EmbeddingProvider;

/// Counts returned by [`EntryStore::store_entries`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub inserted: usize,
    pub confirmed: usize,
    pub skipped: usize,
}

/// Filter used by [`EntryStore::retire_entries`] when retiring by
/// criteria rather than by a single id.
#[derive(Debug, Clone, Default)]
pub struct RetireFilter {
    pub entry_type: Option<crate::models::EntryType>,
    pub project: Option<String>,
    pub older_than_days: Option<f64>,
}

/// The storage seam every other crate programs against, mirroring the
/// shape of `cortex-core::traits::storage::IMemoryStorage`.
pub trait EntryStore: Send + Sync {
    fn find_similar(
        &self,
        embedding: &[f32],
        limit: usize,
        exclude_ids: &[String],
    ) -> AgenrResult<Vec<(Entry, f64)>>;

    fn get_entry(&self, id: &str) -> AgenrResult<Option<Entry>>;

    fn insert_entry(&self, entry: &mut Entry) -> AgenrResult<()>;

    fn update_entry(&self, entry: &Entry) -> AgenrResult<()>;

    fn find_by_fingerprint(&self, fingerprint: &str) -> AgenrResult<Option<Entry>>;

    fn append_source(
        &self,
        entry_id: &str,
        source_file: Option<&str>,
        ingest_content_hash: Option<&str>,
    ) -> AgenrResult<()>;

    /// Inserts the first provenance row for a brand-new entry. Unlike
    /// [`EntryStore::append_source`], this never touches `confirmations` —
    /// `Entry::new` already seeds it at 1.
    fn insert_source(
        &self,
        entry_id: &str,
        source_file: Option<&str>,
        ingest_content_hash: Option<&str>,
    ) -> AgenrResult<()>;

    fn retire_entries(
        &self,
        entry_id: Option<&str>,
        filter: Option<&RetireFilter>,
        reason: &str,
    ) -> AgenrResult<usize>;

    fn rehabilitate_entry(&self, entry_id: &str) -> AgenrResult<()>;

    fn insert_relation(&self, relation: &Relation) -> AgenrResult<()>;

    fn clean_orphan_relations(&self) -> AgenrResult<usize>;

    fn entries_since_rowid(&self, since_rowid: i64) -> AgenrResult<Vec<Entry>>;

    fn max_rowid(&self) -> AgenrResult<i64>;

    fn update_recall_stats(&self, entry_ids: &[String]) -> AgenrResult<()>;

    fn flag_for_review(
        &self,
        entry_id: &str,
        reason: &str,
        detail: &str,
        suggested_action: ReviewAction,
    ) -> AgenrResult<(bool, i64)>;

    fn resolve_review(&self, review_id: i64, status: ReviewStatus) -> AgenrResult<bool>;

    fn list_review_items(&self, status: Option<ReviewStatus>, limit: usize) -> AgenrResult<Vec<ReviewItem>>;

    fn get_review_item(&self, review_id: i64) -> AgenrResult<Option<ReviewItem>>;

    fn count_entries(&self) -> AgenrResult<usize>;

    fn initialize_watermark(&self, consumer_id: &str) -> AgenrResult<Watermark>;

    fn fetch_new_signal_entries(
        &self,
        watermark: i64,
        min_importance: u8,
        max_per_signal: usize,
    ) -> AgenrResult<(Vec<Entry>, i64)>;

    fn set_watermark(&self, consumer_id: &str, max_seq: i64) -> AgenrResult<()>;

    /// Store a batch of candidate entries, deduplicating by fingerprint.
    ///
    /// For each candidate: entries that fail [`Entry::validate`] are
    /// skipped. Otherwise, unless `force` is set, an existing non-retired
    /// entry with the same fingerprint is confirmed in place — a source
    /// row is appended, `confirmations` increments, and the candidate is
    /// never embedded. Anything left over is embedded, inserted fresh, and
    /// given its first source row.
    fn store_entries(
        &self,
        candidates: Vec<Entry>,
        embedder: &dyn EmbeddingProvider,
        source_file: Option<&str>,
        ingest_content_hash: Option<&str>,
        force: bool,
    ) -> AgenrResult<StoreStats> {
        let mut stats = StoreStats::default();

        for mut candidate in candidates {
            if candidate.validate().is_err() {
                stats.skipped += 1;
                continue;
            }

            let fingerprint = candidate.fingerprint();
            if !force {
                if let Some(existing) = self.find_by_fingerprint(&fingerprint)? {
                    self.append_source(&existing.id, source_file, ingest_content_hash)?;
                    stats.confirmed += 1;
                    continue;
                }
            }

            candidate.embedding = Some(embedder.embed_one(&candidate.content)?);
            self.insert_entry(&mut candidate)?;
            self.insert_source(&candidate.id, source_file, ingest_content_hash)?;
            stats.inserted += 1;
        }

        Ok(stats)
    }
}
