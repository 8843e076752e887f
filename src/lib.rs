//! # Handbook Chat
//!
//! A retrieval-augmented chat service over a single reference document.
//!
//! A browser chat widget POSTs user messages to this service; the service
//! pulls the most relevant excerpts from the employee handbook, forwards
//! the conversation (persona + session transcript + augmented message) to
//! an OpenAI-compatible chat-completion endpoint, and returns the reply
//! together with the excerpts it used. Conversation memory is kept
//! in-process, scoped by a caller-supplied session id.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────┐   ┌───────────┐
//! │ Document │──▶│ Chunker │──▶│  Chunks   │  (loaded once, cached)
//! └──────────┘   └─────────┘   └─────┬─────┘
//!                                    │ per request
//!                                    ▼
//!                              ┌───────────┐   ┌────────────┐
//!  POST /chat ───────────────▶ │ Retriever │──▶│ ChatEngine │──▶ model endpoint
//!                              └───────────┘   └─────┬──────┘
//!                                                    ▼
//!                                             ┌─────────────┐
//!                                             │ SessionStore│
//!                                             └─────────────┘
//! ```
//!
//! Retrieval is intentionally lexical: chunks are ranked by case-insensitive
//! term-frequency match, top three win. No embeddings, no persistent index,
//! one document — a deliberately simple baseline.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`extract`] | Document text extraction (PDF, Markdown, plain text) |
//! | [`chunk`] | Bounded-size text chunking |
//! | [`document`] | Process-wide handbook index cache |
//! | [`retrieval`] | Query normalization, scoring, top-K selection |
//! | [`memory`] | Session transcript store |
//! | [`model`] | OpenAI-compatible endpoint client |
//! | [`chat`] | Chat orchestration |
//! | [`server`] | HTTP boundary |

pub mod chat;
pub mod chunk;
pub mod config;
pub mod document;
pub mod extract;
pub mod memory;
pub mod model;
pub mod retrieval;
pub mod server;
