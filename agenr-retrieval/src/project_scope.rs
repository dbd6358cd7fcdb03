//! Project scoping: restrict recall to the configured
//! project plus its declared dependencies, unless the caller opts out
//! with `project = "*"`.

use std::collections::HashSet;

use agenr_core::config::ProjectConfig;
use agenr_core::models::Entry;

pub const WILDCARD: &str = "*";

pub fn allowed_projects(config: &ProjectConfig) -> HashSet<String> {
    let mut set: HashSet<String> = config.dependencies.iter().cloned().collect();
    if let Some(current) = &config.current {
        set.insert(current.clone());
    }
    set
}

/// Whether `entry` passes the project filter. Entries with no project
/// tag are considered global and always pass.
pub fn in_scope(entry: &Entry, requested_project: Option<&str>, config: &ProjectConfig) -> bool {
    if requested_project == Some(WILDCARD) {
        return true;
    }
    let Some(entry_project) = &entry.project else {
        return true;
    };
    allowed_projects(config).contains(entry_project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenr_core::models::{EntryType, Expiry, Scope};

    fn entry_with_project(project: Option<&str>) -> Entry {
        let mut e = Entry::new(EntryType::Fact, "s", "content long enough for validation rules", 5, Expiry::Permanent, Scope::Private, vec!["t".into()]);
        e.project = project.map(str::to_string);
        e
    }

    #[test]
    fn wildcard_bypasses_filter() {
        let config = ProjectConfig { current: Some("a".into()), dependencies: vec![] };
        let e = entry_with_project(Some("other"));
        assert!(in_scope(&e, Some(WILDCARD), &config));
    }

    #[test]
    fn unscoped_entries_always_pass() {
        let config = ProjectConfig { current: Some("a".into()), dependencies: vec![] };
        let e = entry_with_project(None);
        assert!(in_scope(&e, None, &config));
    }

    #[test]
    fn out_of_scope_project_is_excluded() {
        let config = ProjectConfig { current: Some("a".into()), dependencies: vec!["b".into()] };
        let e = entry_with_project(Some("c"));
        assert!(!in_scope(&e, None, &config));
    }

    #[test]
    fn dependency_project_is_in_scope() {
        let config = ProjectConfig { current: Some("a".into()), dependencies: vec!["b".into()] };
        let e = entry_with_project(Some("b"));
        assert!(in_scope(&e, None, &config));
    }
}
