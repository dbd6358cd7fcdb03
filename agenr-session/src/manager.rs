//! `SessionManager` — concurrent per-session access via `DashMap`.

use dashmap::DashMap;

use crate::state::SessionState;

pub struct SessionManager {
    sessions: DashMap<String, SessionState>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Record an incoming message for `session_key`, creating session
    /// state on first use. Empty keys are a no-op and return `None`.
    pub fn record_message(&self, session_key: &str, message: &str) -> Option<SessionState> {
        if session_key.is_empty() {
            return None;
        }
        let mut entry = self.sessions.entry(session_key.to_string()).or_default();
        entry.record_message(message);
        Some(entry.clone())
    }

    pub fn mark_store_call(&self, session_key: &str) {
        if session_key.is_empty() {
            return;
        }
        let mut entry = self.sessions.entry(session_key.to_string()).or_default();
        entry.mark_store_call();
    }

    pub fn note_recall(&self, session_key: &str, query: &str, entry_ids: impl IntoIterator<Item = String>) {
        if let Some(mut entry) = self.sessions.get_mut(session_key) {
            entry.note_recall(query, entry_ids);
        }
    }

    pub fn get(&self, session_key: &str) -> Option<SessionState> {
        self.sessions.get(session_key).map(|r| r.clone())
    }

    pub fn clear_mid_session_state(&self, session_key: &str) {
        self.sessions.remove(session_key);
    }

    pub fn clear_mid_session_states(&self) {
        self.sessions.clear();
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
