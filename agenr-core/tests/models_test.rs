use agenr_core::models::{Entry, EntryType, Expiry, Scope};

#[test]
fn importance_clamps_into_range() {
    let entry = Entry::new(
        EntryType::Fact,
        "Duke",
        "Duke is a golden retriever who loves tennis balls.",
        200,
        Expiry::Permanent,
        Scope::Private,
        vec!["pets".to_string()],
    );
    assert_eq!(entry.importance, 10);
}

#[test]
fn validate_rejects_short_content() {
    let entry = Entry::new(
        EntryType::Fact,
        "Duke",
        "too short",
        5,
        Expiry::Permanent,
        Scope::Private,
        vec!["pets".to_string()],
    );
    assert!(entry.validate().is_err());
}

#[test]
fn validate_rejects_empty_tags() {
    let entry = Entry::new(
        EntryType::Fact,
        "Duke",
        "Duke is a golden retriever who loves tennis balls.",
        5,
        Expiry::Permanent,
        Scope::Private,
        vec![],
    );
    assert!(entry.validate().is_err());
}

#[test]
fn entry_type_round_trips_through_strings() {
    for t in [
        EntryType::Fact,
        EntryType::Decision,
        EntryType::Preference,
        EntryType::Todo,
        EntryType::Relationship,
        EntryType::Event,
        EntryType::Lesson,
    ] {
        assert_eq!(EntryType::parse(t.as_str()), Some(t));
    }
}
