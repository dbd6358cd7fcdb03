use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_IMPORTANCE, MAX_TAGS, MIN_CONTENT_LEN, MIN_IMPORTANCE};

/// The seven kinds of knowledge the store recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Fact,
    Decision,
    Preference,
    Todo,
    Relationship,
    Event,
    Lesson,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Fact => "fact",
            EntryType::Decision => "decision",
            EntryType::Preference => "preference",
            EntryType::Todo => "todo",
            EntryType::Relationship => "relationship",
            EntryType::Event => "event",
            EntryType::Lesson => "lesson",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fact" => Some(EntryType::Fact),
            "decision" => Some(EntryType::Decision),
            "preference" => Some(EntryType::Preference),
            "todo" => Some(EntryType::Todo),
            "relationship" => Some(EntryType::Relationship),
            "event" => Some(EntryType::Event),
            "lesson" => Some(EntryType::Lesson),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long an entry should persist before consolidation considers it for
/// expiry. `Core` is a distinguished permanent tier that always ranks in
/// the first tier of session-start recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiry {
    Permanent,
    Temporary,
    Core,
}

impl Expiry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Expiry::Permanent => "permanent",
            Expiry::Temporary => "temporary",
            Expiry::Core => "core",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "permanent" => Some(Expiry::Permanent),
            "temporary" => Some(Expiry::Temporary),
            "core" => Some(Expiry::Core),
            _ => None,
        }
    }
}

impl std::fmt::Display for Expiry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility tier: who may ever see this entry surfaced back to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Private,
    Personal,
    Public,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Private => "private",
            Scope::Personal => "personal",
            Scope::Public => "public",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "private" => Some(Scope::Private),
            "personal" => Some(Scope::Personal),
            "public" => Some(Scope::Public),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of memory.
///
/// `id` is assigned on first insert; callers building a candidate entry for
/// [`crate::traits::EntryStore::store_entries`] leave it empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub entry_type: EntryType,
    pub subject: String,
    pub content: String,
    pub canonical_key: Option<String>,
    pub importance: u8,
    pub expiry: Expiry,
    pub scope: Scope,
    pub project: Option<String>,
    pub source_file: Option<String>,
    pub source_context: Option<String>,
    pub platform: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub recall_count: u32,
    pub last_recalled_at: Option<DateTime<Utc>>,
    pub confirmations: u32,
    pub quality_score: f64,
    pub merged_from: u32,
    pub consolidated_at: Option<DateTime<Utc>>,
    pub retired: bool,
    pub tags: Vec<String>,
    pub embedding: Option<Vec<f32>>,
    /// SQLite `rowid`, populated once the entry has been persisted.
    pub rowid: Option<i64>,
}

impl Entry {
    /// Build a fresh candidate entry with clamped salience fields and
    /// server-assigned bookkeeping. Panics are never used here: out-of-range
    /// importance is clamped rather than rejected, a clamp-on-construct
    /// invariant rather than a validation error.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entry_type: EntryType,
        subject: impl Into<String>,
        content: impl Into<String>,
        importance: u8,
        expiry: Expiry,
        scope: Scope,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            entry_type,
            subject: subject.into(),
            content: content.into(),
            canonical_key: None,
            importance: importance.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE),
            expiry,
            scope,
            project: None,
            source_file: None,
            source_context: None,
            platform: None,
            created_at: now,
            updated_at: now,
            recall_count: 0,
            last_recalled_at: None,
            confirmations: 1,
            quality_score: 1.0,
            merged_from: 0,
            consolidated_at: None,
            retired: false,
            tags: tags.into_iter().take(MAX_TAGS).collect(),
            embedding: None,
            rowid: None,
        }
    }

    /// Validates the invariants not already enforced by construction
    /// (content length, tag count, quality range).
    pub fn validate(&self) -> Result<(), String> {
        if self.content.chars().count() < MIN_CONTENT_LEN {
            return Err(format!(
                "content must be at least {MIN_CONTENT_LEN} characters"
            ));
        }
        if self.subject.trim().is_empty() {
            return Err("subject must not be empty".to_string());
        }
        if self.tags.is_empty() || self.tags.len() > MAX_TAGS {
            return Err(format!("tags must have between 1 and {MAX_TAGS} entries"));
        }
        if !(MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&self.importance) {
            return Err(format!(
                "importance must be between {MIN_IMPORTANCE} and {MAX_IMPORTANCE}"
            ));
        }
        if !(0.0..=1.0).contains(&self.quality_score) {
            return Err("quality_score must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }

    /// Deterministic fingerprint used to detect re-seen content:
    /// `type + subject + content`, case-folded and whitespace-collapsed.
    pub fn fingerprint(&self) -> String {
        crate::models::fingerprint(self.entry_type, &self.subject, &self.content)
    }
}
