//! # agenr-embeddings
//!
//! The embedding LRU cache. `moka`'s TinyLFU admission policy does not
//! give the exact promote-on-access / evict-from-tail ordering a strict
//! LRU needs, so this is a hand-rolled intrusive doubly linked list over
//! a slab instead.

mod cache;

pub use cache::{CacheError, EmbeddingCache};
