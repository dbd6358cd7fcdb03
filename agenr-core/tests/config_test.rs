use agenr_core::AgenrConfig;

#[test]
fn defaults_are_sane() {
    let config = AgenrConfig::default();
    assert!(config.db.path.ends_with(".agenr/agenr.db"));
    assert_eq!(config.recall.non_core_limit, 10);
    assert!(config.project.dependencies.is_empty());
}

#[test]
fn partial_toml_fills_in_defaults() {
    let config = AgenrConfig::from_toml(
        r#"
        [project]
        current = "agenr"
        dependencies = ["shared-utils"]
        "#,
    )
    .expect("valid toml");
    assert_eq!(config.project.current.as_deref(), Some("agenr"));
    assert_eq!(config.project.dependencies, vec!["shared-utils".to_string()]);
    // untouched sections keep their defaults
    assert_eq!(config.recall.non_core_limit, 10);
}
