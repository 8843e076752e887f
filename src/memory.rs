//! Session-scoped conversation memory.
//!
//! Each session id maps to an ordered transcript of role-tagged turns.
//! Transcripts are created lazily on first reference, live for the process
//! lifetime, and are only ever appended to. The store is an injected trait
//! so the in-memory implementation can later be swapped for a bounded or
//! persistent backend without touching the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Session id used when the caller does not supply one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Speaker role for a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One turn in a session transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Storage abstraction for session transcripts.
///
/// `append_exchange` writes a completed user/assistant pair in one call.
/// Appending the pair atomically means concurrent requests on the same
/// session id can reorder whole exchanges but never interleave inside
/// one; the intended usage is still one in-flight request per session.
pub trait SessionStore: Send + Sync {
    /// Returns a snapshot of the transcript for `session_id`, oldest turn
    /// first. An unknown session id yields an empty transcript.
    fn history(&self, session_id: &str) -> Vec<ChatTurn>;

    /// Appends a completed exchange to the session's transcript, creating
    /// the transcript on first use.
    fn append_exchange(&self, session_id: &str, user: &str, assistant: &str);
}

/// Process-resident session store. No TTL, no persistence; an optional
/// turn cap bounds per-session growth.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Vec<ChatTurn>>>,
    /// Maximum turns retained per session; `0` = unbounded.
    max_turns: usize,
}

impl InMemorySessionStore {
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_turns,
        }
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

impl SessionStore for InMemorySessionStore {
    fn history(&self, session_id: &str) -> Vec<ChatTurn> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    fn append_exchange(&self, session_id: &str, user: &str, assistant: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        let transcript = sessions.entry(session_id.to_string()).or_default();
        transcript.push(ChatTurn::new(ChatRole::User, user));
        transcript.push(ChatTurn::new(ChatRole::Assistant, assistant));

        if self.max_turns > 0 && transcript.len() > self.max_turns {
            // Drop oldest turns in pairs so the transcript never starts
            // mid-exchange.
            let mut excess = transcript.len() - self.max_turns;
            if excess % 2 != 0 {
                excess += 1;
            }
            transcript.drain(..excess.min(transcript.len()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_session_is_empty() {
        let store = InMemorySessionStore::new(0);
        assert!(store.history("nope").is_empty());
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_append_preserves_order() {
        let store = InMemorySessionStore::new(0);
        store.append_exchange("s1", "My name is Alex", "Nice to meet you, Alex!");
        store.append_exchange("s1", "What is my name?", "Your name is Alex.");

        let history = store.history("s1");
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[0].content, "My name is Alex");
        assert_eq!(history[1].role, ChatRole::Assistant);
        assert_eq!(history[3].content, "Your name is Alex.");
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = InMemorySessionStore::new(0);
        store.append_exchange("s1", "hello", "hi");
        store.append_exchange("s2", "bonjour", "salut");

        assert_eq!(store.history("s1").len(), 2);
        assert_eq!(store.history("s2").len(), 2);
        assert_eq!(store.history("s1")[0].content, "hello");
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_unbounded_by_default() {
        let store = InMemorySessionStore::new(0);
        for i in 0..50 {
            store.append_exchange("s1", &format!("q{}", i), &format!("a{}", i));
        }
        assert_eq!(store.history("s1").len(), 100);
    }

    #[test]
    fn test_max_turns_drops_whole_exchanges() {
        let store = InMemorySessionStore::new(4);
        store.append_exchange("s1", "q1", "a1");
        store.append_exchange("s1", "q2", "a2");
        store.append_exchange("s1", "q3", "a3");

        let history = store.history("s1");
        assert_eq!(history.len(), 4);
        // Oldest exchange dropped; remaining transcript starts with a user turn
        assert_eq!(history[0].content, "q2");
        assert_eq!(history[0].role, ChatRole::User);
    }
}
