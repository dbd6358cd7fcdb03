//! Hybrid relevance scoring: a 4-factor blend of vector similarity,
//! keyword overlap, recency decay, and importance — no file/pattern/intent
//! signals, since the core has no inputs for them.

use std::collections::HashSet;

use agenr_core::config::RecallConfig;
use agenr_core::models::Entry;
use chrono::Utc;

fn normalize_tokens(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| c.is_ascii_punctuation()).to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Token-set Jaccard similarity between the query and an entry's
/// subject + content, after simple normalization.
pub fn keyword_overlap(query: &str, entry: &Entry) -> f64 {
    let query_tokens = normalize_tokens(query);
    if query_tokens.is_empty() {
        return 0.0;
    }
    let entry_tokens = normalize_tokens(&format!("{} {}", entry.subject, entry.content));
    let intersection = query_tokens.intersection(&entry_tokens).count();
    let union = query_tokens.union(&entry_tokens).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Exponential recency decay: `0.5 ^ (age_days / half_life_days)`.
pub fn recency_decay(entry: &Entry, half_life_days: f64) -> f64 {
    if half_life_days <= 0.0 {
        return 1.0;
    }
    let age_days = (Utc::now() - entry.created_at).num_seconds().max(0) as f64 / 86_400.0;
    0.5_f64.powf(age_days / half_life_days)
}

/// `score = w_vec*cos_sim + w_kw*keyword_overlap + w_recency*recency_decay + w_importance*(importance/10)`
pub fn combine(config: &RecallConfig, query: Option<&str>, entry: &Entry, cos_sim: f64) -> f64 {
    let kw = query.map(|q| keyword_overlap(q, entry)).unwrap_or(0.0);
    let recency = recency_decay(entry, config.recency_half_life_days);
    let importance = entry.importance as f64 / 10.0;

    config.weight_vector * cos_sim
        + config.weight_keyword * kw
        + config.weight_recency * recency
        + config.weight_importance * importance
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenr_core::models::{EntryType, Expiry, Scope};

    fn entry(subject: &str, content: &str, importance: u8) -> Entry {
        Entry::new(EntryType::Fact, subject, content, importance, Expiry::Permanent, Scope::Private, vec!["t".into()])
    }

    #[test]
    fn keyword_overlap_is_one_for_identical_text() {
        let e = entry("work project", "work project details here", 5);
        assert!((keyword_overlap("work project", &e) - keyword_overlap("work project", &e)).abs() < 1e-9);
        assert!(keyword_overlap("work project", &e) > 0.0);
    }

    #[test]
    fn recency_decay_is_near_one_for_fresh_entries() {
        let e = entry("fresh", "a freshly created entry right now", 5);
        assert!(recency_decay(&e, 30.0) > 0.99);
    }
}
