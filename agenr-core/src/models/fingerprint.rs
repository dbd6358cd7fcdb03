use super::EntryType;

/// Deterministic fingerprint over `(type, subject, content)`, case-folded,
/// whitespace-collapsed, and hashed with blake3 for dedup.
pub fn fingerprint(entry_type: EntryType, subject: &str, content: &str) -> String {
    let normalized = format!(
        "{}\u{0}{}\u{0}{}",
        entry_type.as_str(),
        normalize(subject),
        normalize(content)
    );
    blake3::hash(normalized.as_bytes()).to_hex().to_string()
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_and_case_do_not_affect_fingerprint() {
        let a = fingerprint(EntryType::Fact, "Duke", "Duke  is a golden retriever.");
        let b = fingerprint(EntryType::Fact, "duke", "duke is a golden   retriever.");
        assert_eq!(a, b);
    }

    #[test]
    fn different_type_changes_fingerprint() {
        let a = fingerprint(EntryType::Fact, "Duke", "Duke is a golden retriever.");
        let b = fingerprint(EntryType::Lesson, "Duke", "Duke is a golden retriever.");
        assert_ne!(a, b);
    }
}
