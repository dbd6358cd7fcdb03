//! Seam traits the storage/recall/consolidation crates implement or
//! consume, mirroring `cortex-core::traits::storage::IMemoryStorage`.

mod embedding;
mod judge;
mod storage;

pub use embedding::EmbeddingProvider;
pub use judge::{JudgeVerdict, RelationJudge};
pub use storage::{EntryStore, RetireFilter, StoreStats};
