//! Recall-query construction and the `shouldRecall` gate.

use std::collections::HashSet;

use crate::classify::is_stopword;

fn tokens_of(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| c.is_ascii_punctuation()).to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_stopword_only(message: &str) -> bool {
    let words: Vec<&str> = message.split_whitespace().collect();
    !words.is_empty() && words.iter().all(|w| is_stopword(w))
}

/// Build the recall query from the buffered messages: the last two are
/// kept verbatim, older ones compress to their first token, and
/// stopword-only messages are dropped entirely. Returns an empty string
/// when nothing worth recalling on remains.
pub fn build_query(recent_messages: &[String]) -> String {
    let meaningful: Vec<&String> = recent_messages
        .iter()
        .filter(|m| !is_stopword_only(m))
        .collect();

    if meaningful.is_empty() {
        return String::new();
    }
    if meaningful.len() == 1 {
        return meaningful[0].clone();
    }

    let split = meaningful.len().saturating_sub(2);
    let (older, recent) = meaningful.split_at(split);

    let mut parts: Vec<String> = older
        .iter()
        .filter_map(|m| m.split_whitespace().next().map(str::to_string))
        .collect();
    parts.extend(recent.iter().map(|m| m.to_string()));

    parts.join(" ")
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Decide whether `query` warrants a new recall given the previous query.
pub fn should_recall(query: &str, last_query: Option<&str>, jaccard_threshold: f64) -> bool {
    if query.trim().is_empty() {
        return false;
    }

    let tokens = tokens_of(query);
    let is_two_token_entity = tokens.len() == 2 && query.chars().any(|c| c.is_uppercase() || c == '#' || c == '/');
    if tokens.len() < 2 && !is_two_token_entity {
        return false;
    }

    let last_query = match last_query {
        None => return true,
        Some(q) => q,
    };

    let last_tokens = tokens_of(last_query);
    jaccard(&tokens, &last_tokens) < jaccard_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_meaningful_message_used_as_is() {
        assert_eq!(build_query(&["Duke's health status".to_string()]), "Duke's health status");
    }

    #[test]
    fn stopword_only_messages_are_dropped() {
        let messages = vec!["yes".to_string(), "Duke's health status".to_string()];
        assert_eq!(build_query(&messages), "Duke's health status");
    }

    #[test]
    fn older_messages_compress_to_first_token() {
        let messages = vec![
            "Remind me about the database migration plan".to_string(),
            "What about the rollback strategy".to_string(),
            "Did it complete".to_string(),
        ];
        assert_eq!(build_query(&messages), "Remind What about the rollback strategy Did it complete");
    }

    #[test]
    fn no_last_query_always_allows_recall() {
        assert!(should_recall("database migration", None, 0.85));
    }

    #[test]
    fn near_identical_query_is_suppressed() {
        assert!(!should_recall(
            "database migration plan",
            Some("database migration plan"),
            0.85
        ));
    }

    #[test]
    fn single_token_query_is_rejected() {
        assert!(!should_recall("database", None, 0.85));
    }
}
