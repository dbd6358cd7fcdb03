//! `SessionState` — per-conversation mid-session recall bookkeeping.

use std::collections::{HashSet, VecDeque};

use agenr_core::constants::{MID_SESSION_BUFFER_CAP, MID_SESSION_MESSAGE_TRUNCATE};

/// Tracks what a single conversation has already recalled and said, so
/// the policy can decide whether a new message warrants another recall.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub turn_count: u64,
    pub last_recall_query: Option<String>,
    pub recent_messages: VecDeque<String>,
    pub recalled_ids: HashSet<String>,
    pub last_store_turn: Option<u64>,
    pub nudge_count: u32,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            turn_count: 0,
            last_recall_query: None,
            recent_messages: VecDeque::with_capacity(MID_SESSION_BUFFER_CAP),
            recalled_ids: HashSet::new(),
            last_store_turn: None,
            nudge_count: 0,
        }
    }

    /// Record an incoming message, advancing the turn counter and pushing
    /// a truncated copy onto the ring buffer.
    pub fn record_message(&mut self, message: &str) {
        self.turn_count += 1;
        let truncated: String = message.chars().take(MID_SESSION_MESSAGE_TRUNCATE).collect();
        if self.recent_messages.len() == MID_SESSION_BUFFER_CAP {
            self.recent_messages.pop_front();
        }
        self.recent_messages.push_back(truncated);
    }

    pub fn mark_store_call(&mut self) {
        self.last_store_turn = Some(self.turn_count);
    }

    pub fn note_recall(&mut self, query: &str, entry_ids: impl IntoIterator<Item = String>) {
        self.last_recall_query = Some(query.to_string());
        self.recalled_ids.extend(entry_ids);
        self.nudge_count += 1;
    }

    /// Turns elapsed since the last explicit store call, or since session
    /// start if none has happened yet.
    pub fn turns_since_store(&self) -> u64 {
        match self.last_store_turn {
            Some(t) => self.turn_count.saturating_sub(t),
            None => self.turn_count,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
