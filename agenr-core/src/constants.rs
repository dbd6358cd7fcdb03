//! Shared tunables that are not meaningfully configurable per-user.

/// Crate version, re-exported for diagnostics/health output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Entry content must be at least this many characters.
pub const MIN_CONTENT_LEN: usize = 20;

/// Entries carry between one and this many tags.
pub const MAX_TAGS: usize = 4;

/// Importance is clamped to this closed range.
pub const MIN_IMPORTANCE: u8 = 1;
pub const MAX_IMPORTANCE: u8 = 10;

/// Default cap for the embedding LRU cache.
pub const DEFAULT_EMBEDDING_CACHE_CAP: usize = 5000;

/// Default non-core recall limit for session-start two-tier recall.
pub const DEFAULT_NON_CORE_LIMIT: usize = 10;

/// Default minimum importance for signal-stream delivery.
pub const DEFAULT_SIGNAL_MIN_IMPORTANCE: u8 = 7;

/// Default max entries delivered per signal check.
pub const DEFAULT_SIGNAL_MAX_PER_SIGNAL: usize = 5;

/// Ring-buffer capacity for mid-session recent messages.
pub const MID_SESSION_BUFFER_CAP: usize = 5;

/// Max characters retained per buffered mid-session message.
pub const MID_SESSION_MESSAGE_TRUNCATE: usize = 200;

/// Jaccard similarity above which a candidate recall query is considered
/// a repeat of the last one and suppressed.
pub const MID_SESSION_JACCARD_THRESHOLD: f64 = 0.85;

/// Quality threshold below which a frequently-recalled entry is flagged
/// for review as low quality.
pub const LOW_QUALITY_THRESHOLD: f64 = 0.2;
pub const LOW_QUALITY_MIN_RECALLS: u32 = 10;

/// Neighbor over-fetch multiplier used by clustering when a type filter
/// is active (some fetched neighbors will be filtered out afterward).
pub const CLUSTER_TYPE_FILTER_OVERFETCH: usize = 3;
