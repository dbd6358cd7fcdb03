//! `StorageEngine` — owns the `ConnectionPool`, implements
//! [`agenr_core::traits::EntryStore`], runs migrations on open.

use std::path::Path;

use agenr_core::errors::AgenrResult;
use agenr_core::models::{Entry, Relation, ReviewAction, ReviewItem, ReviewStatus, Watermark};
use agenr_core::traits::{EntryStore, RetireFilter};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;

pub struct StorageEngine {
    pool: ConnectionPool,
    /// File-backed: true (reads go through the read pool). In-memory: false
    /// (reads route through the writer, since isolated in-memory read
    /// connections can't see the writer's changes).
    use_read_pool: bool,
}

impl StorageEngine {
    pub fn open(path: &Path) -> AgenrResult<Self> {
        let pool = ConnectionPool::open(path, crate::pool::ReadPool::default_size())?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    pub fn open_in_memory() -> AgenrResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> AgenrResult<()> {
        self.pool.writer.with_conn_sync(|conn| migrations::run_migrations(conn))
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn with_reader<F, T>(&self, f: F) -> AgenrResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> AgenrResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }
}

impl EntryStore for StorageEngine {
    fn find_similar(
        &self,
        embedding: &[f32],
        limit: usize,
        exclude_ids: &[String],
    ) -> AgenrResult<Vec<(Entry, f64)>> {
        self.with_reader(|conn| queries::vector_search::find_similar(conn, embedding, limit, exclude_ids))
    }

    fn get_entry(&self, id: &str) -> AgenrResult<Option<Entry>> {
        self.with_reader(|conn| queries::entry_crud::get_entry(conn, id))
    }

    fn insert_entry(&self, entry: &mut Entry) -> AgenrResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::entry_crud::insert_entry(conn, entry))
    }

    fn update_entry(&self, entry: &Entry) -> AgenrResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::entry_crud::update_entry(conn, entry))
    }

    fn find_by_fingerprint(&self, fingerprint: &str) -> AgenrResult<Option<Entry>> {
        self.with_reader(|conn| queries::entry_crud::find_by_fingerprint(conn, fingerprint))
    }

    fn append_source(
        &self,
        entry_id: &str,
        source_file: Option<&str>,
        ingest_content_hash: Option<&str>,
    ) -> AgenrResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::entry_crud::append_source(conn, entry_id, source_file, ingest_content_hash)
        })
    }

    fn insert_source(
        &self,
        entry_id: &str,
        source_file: Option<&str>,
        ingest_content_hash: Option<&str>,
    ) -> AgenrResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::entry_crud::insert_source_row(conn, entry_id, source_file, ingest_content_hash)
        })
    }

    fn retire_entries(
        &self,
        entry_id: Option<&str>,
        filter: Option<&RetireFilter>,
        reason: &str,
    ) -> AgenrResult<usize> {
        self.pool.writer.with_conn_sync(|conn| match (entry_id, filter) {
            (Some(id), _) => queries::entry_crud::retire_by_id(conn, id, reason),
            (None, Some(f)) => {
                let mut total = 0;
                if let Some(days) = f.older_than_days {
                    let cutoff = chrono::Utc::now() - chrono::Duration::seconds((days * 86400.0) as i64);
                    total += queries::entry_crud::retire_expired_before(conn, "temporary", cutoff)?;
                }
                Ok(total)
            }
            (None, None) => Ok(0),
        })
    }

    fn rehabilitate_entry(&self, entry_id: &str) -> AgenrResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::entry_crud::rehabilitate_entry(conn, entry_id))
    }

    fn insert_relation(&self, relation: &Relation) -> AgenrResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::relations::insert_relation(conn, relation))
    }

    fn clean_orphan_relations(&self) -> AgenrResult<usize> {
        self.pool
            .writer
            .with_conn_sync(queries::relations::clean_orphan_relations)
    }

    fn entries_since_rowid(&self, since_rowid: i64) -> AgenrResult<Vec<Entry>> {
        self.with_reader(|conn| queries::entry_crud::entries_since_rowid(conn, since_rowid))
    }

    fn max_rowid(&self) -> AgenrResult<i64> {
        self.with_reader(queries::entry_crud::max_rowid)
    }

    fn update_recall_stats(&self, entry_ids: &[String]) -> AgenrResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::entry_crud::update_recall_stats(conn, entry_ids))
    }

    fn flag_for_review(
        &self,
        entry_id: &str,
        reason: &str,
        detail: &str,
        suggested_action: ReviewAction,
    ) -> AgenrResult<(bool, i64)> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::review::flag_for_review(conn, entry_id, reason, detail, suggested_action)
        })
    }

    fn resolve_review(&self, review_id: i64, status: ReviewStatus) -> AgenrResult<bool> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::review::resolve_review(conn, review_id, status))
    }

    fn list_review_items(&self, status: Option<ReviewStatus>, limit: usize) -> AgenrResult<Vec<ReviewItem>> {
        self.with_reader(|conn| queries::review::list_review_items(conn, status, limit))
    }

    fn get_review_item(&self, review_id: i64) -> AgenrResult<Option<ReviewItem>> {
        self.with_reader(|conn| queries::review::get_review_item(conn, review_id))
    }

    fn count_entries(&self) -> AgenrResult<usize> {
        self.with_reader(queries::entry_crud::count_entries)
    }

    fn initialize_watermark(&self, consumer_id: &str) -> AgenrResult<Watermark> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::watermark::initialize_watermark(conn, consumer_id))
    }

    fn fetch_new_signal_entries(
        &self,
        watermark: i64,
        min_importance: u8,
        max_per_signal: usize,
    ) -> AgenrResult<(Vec<Entry>, i64)> {
        self.with_reader(|conn| {
            queries::watermark::fetch_new_signal_entries(conn, watermark, min_importance, max_per_signal)
        })
    }

    fn set_watermark(&self, consumer_id: &str, max_seq: i64) -> AgenrResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::watermark::set_watermark(conn, consumer_id, max_seq))
    }
}
