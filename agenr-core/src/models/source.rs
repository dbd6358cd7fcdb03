use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only provenance row linking an entry to an ingest event.
/// Inserted once per entry, appended to on re-confirm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub entry_id: String,
    pub source_file: Option<String>,
    pub ingest_content_hash: Option<String>,
    pub observed_at: DateTime<Utc>,
}
