//! The entry data model.

mod entry;
mod fingerprint;
mod relation;
mod review;
mod source;
mod watermark;

pub use entry::{Entry, EntryType, Expiry, Scope};
pub use fingerprint::fingerprint;
pub use relation::{Relation, RelationType};
pub use review::{ReviewAction, ReviewItem, ReviewStatus};
pub use source::Source;
pub use watermark::Watermark;
