//! Chat orchestration.
//!
//! [`ChatEngine`] ties the pieces together: it lazily loads the handbook
//! index, retrieves relevant chunks for the incoming message, assembles
//! the outbound message list (persona + transcript + user message), calls
//! the model endpoint, and persists the completed exchange.
//!
//! The transcript is only written after a successful model call — a failed
//! exchange leaves session memory exactly as it was.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::document::HandbookIndex;
use crate::memory::{ChatRole, SessionStore};
use crate::model::{ChatMessage, ChatModel};
use crate::retrieval::{retrieve, SubstringScorer, TermScorer};

/// Result of one chat exchange: the model's reply and the handbook
/// excerpts that were injected as context (empty when retrieval was
/// disabled or found nothing).
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: String,
    pub sources: Vec<String>,
}

pub struct ChatEngine {
    config: Config,
    index: OnceCell<HandbookIndex>,
    store: Arc<dyn SessionStore>,
    scorer: Box<dyn TermScorer>,
    model: Arc<dyn ChatModel>,
}

impl ChatEngine {
    pub fn new(config: Config, store: Arc<dyn SessionStore>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            config,
            index: OnceCell::new(),
            store,
            scorer: Box::new(SubstringScorer),
            model,
        }
    }

    /// Replaces the default substring scorer with a custom ranking
    /// strategy.
    pub fn with_scorer(mut self, scorer: Box<dyn TermScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Handbook index, loaded on first use and cached for the process
    /// lifetime.
    pub async fn index(&self) -> &HandbookIndex {
        self.index
            .get_or_init(|| async { HandbookIndex::load(&self.config) })
            .await
    }

    /// Runs retrieval for `query` against the cached chunks.
    pub async fn retrieve_sources(&self, query: &str) -> Vec<String> {
        let index = self.index().await;
        retrieve(
            query,
            &index.chunks,
            self.config.retrieval.top_k,
            self.config.retrieval.min_term_len,
            self.scorer.as_ref(),
        )
    }

    /// Handles one chat exchange for `session_id`.
    ///
    /// On success the exchange is appended to the session transcript and
    /// the reply plus any injected excerpts are returned. On failure the
    /// error propagates and the transcript is left untouched.
    pub async fn respond(
        &self,
        session_id: &str,
        message: &str,
        use_handbook: bool,
    ) -> Result<ChatOutcome> {
        let sources = if use_handbook {
            self.retrieve_sources(message).await
        } else {
            Vec::new()
        };

        let messages = self.build_messages(session_id, message, &sources);

        tracing::debug!(
            session = session_id,
            outbound = messages.len(),
            sources = sources.len(),
            "calling model endpoint"
        );

        let reply = self.model.complete(&messages).await?;

        // Persist the raw user message, not the context-augmented one.
        self.store.append_exchange(session_id, message, &reply);

        Ok(ChatOutcome { reply, sources })
    }

    /// Assembles the outbound message list: fixed persona, full prior
    /// transcript in order, then the new user message (prefixed with a
    /// context block when excerpts were retrieved).
    fn build_messages(
        &self,
        session_id: &str,
        message: &str,
        sources: &[String],
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::new();
        messages.push(ChatMessage::new(
            ChatRole::System,
            self.config.chat.system_prompt.clone(),
        ));

        for turn in self.store.history(session_id) {
            messages.push(ChatMessage::new(turn.role, turn.content));
        }

        let content = if sources.is_empty() {
            message.to_string()
        } else {
            let excerpts = sources
                .iter()
                .enumerate()
                .map(|(i, s)| format!("[{}] {}", i + 1, s))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "Use the following excerpts from the employee handbook when they are relevant:\n\
                 {}\n\nQuestion: {}",
                excerpts, message
            )
        };
        messages.push(ChatMessage::new(ChatRole::User, content));

        messages
    }
}
