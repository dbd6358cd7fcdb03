//! # agenr-consolidation
//!
//! Rules-based consolidation: prune expired temporary entries, merge
//! near-duplicates, clean orphan relations, plus the cluster-building and
//! review-queue contracts the broader consolidation pipeline builds on.
//! Limited to the rules-only phase (no LLM-judge phase, no density-based
//! clustering — see `clusters.rs`).

pub mod clusters;
pub mod merge;
pub mod prune;
pub mod review;
pub mod rules;

pub use clusters::{build_clusters, ClusterOptions};
pub use review::check_and_flag_low_quality;
pub use rules::{consolidate_rules, ConsolidateOptions, ConsolidationStats};
