//! Message classification for the mid-session recall gate.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Trivial,
    Normal,
    Complex,
}

impl Classification {
    pub fn is_trivial(self) -> bool {
        matches!(self, Classification::Trivial)
    }
}

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "to", "of", "in", "on", "for",
    "and", "or", "but", "it", "this", "that", "i", "you", "we", "they", "he", "she", "do", "does",
    "did", "can", "could", "will", "would", "should", "fix", "check", "please", "ok", "okay",
    "yes", "no", "sure", "thanks", "thank",
];

fn issue_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\d+").unwrap())
}

fn slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+\b").unwrap())
}

fn proper_noun_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][a-z]+$").unwrap())
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token.to_lowercase().as_str())
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace())
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation() && c != '#' && c != '/'))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Count entity-shaped tokens: issue references, org/repo slugs, and
/// mid-message proper nouns (sentence-initial capitalization doesn't count).
fn entity_count(text: &str, tokens: &[&str]) -> usize {
    let mut count = issue_ref_re().find_iter(text).count() + slug_re().find_iter(text).count();
    for (i, token) in tokens.iter().enumerate() {
        if i == 0 {
            continue;
        }
        let bare = token.trim_end_matches(['\'', 's']);
        if proper_noun_re().is_match(bare) && !is_stopword(bare) {
            count += 1;
        }
    }
    count
}

/// Classify a single user message as a question, a correction, or a
/// plain statement.
pub fn classify_message(text: &str) -> Classification {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Classification::Trivial;
    }

    let tokens = tokenize(trimmed);
    if entity_count(trimmed, &tokens) > 0 {
        return Classification::Complex;
    }

    let stopword_count = tokens.iter().filter(|t| is_stopword(t)).count();
    let stopword_dominant = !tokens.is_empty() && stopword_count * 2 >= tokens.len();
    if tokens.len() <= 3 || stopword_dominant {
        return Classification::Trivial;
    }

    Classification::Normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_is_trivial() {
        assert_eq!(classify_message("yes"), Classification::Trivial);
    }

    #[test]
    fn question_naming_entity_is_complex() {
        assert_eq!(classify_message("How's Duke doing?"), Classification::Complex);
    }

    #[test]
    fn issue_reference_is_complex() {
        assert_eq!(classify_message("Can you check PR #312?"), Classification::Complex);
    }

    #[test]
    fn short_command_is_trivial() {
        assert_eq!(classify_message("fix the bug"), Classification::Trivial);
    }

    #[test]
    fn org_repo_slug_is_complex() {
        assert_eq!(
            classify_message("look at rust-lang/rust for context"),
            Classification::Complex
        );
    }
}
