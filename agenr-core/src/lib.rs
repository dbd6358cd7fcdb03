//! # agenr-core
//!
//! Foundation crate for the agenr memory engine.
//! Defines the entry data model, typed errors, layered config, and shared
//! constants. Every other crate in the workspace depends on this one.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;
pub mod tracing_setup;

pub use config::AgenrConfig;
pub use errors::{AgenrError, AgenrResult};
pub use models::{
    Entry, EntryType, Expiry, Relation, RelationType, ReviewAction, ReviewItem, ReviewStatus,
    Scope, Source, Watermark,
};
