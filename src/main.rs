//! # Handbook Chat CLI (`hbchat`)
//!
//! The `hbchat` binary runs the chat HTTP server and provides terminal
//! shortcuts for exercising the retrieval core without a browser.
//!
//! ## Usage
//!
//! ```bash
//! hbchat --config ./config/hbchat.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hbchat serve` | Start the chat HTTP server |
//! | `hbchat ask "<message>"` | One-shot chat exchange from the terminal |
//! | `hbchat retrieve "<query>"` | Show the handbook chunks retrieval would inject |
//! | `hbchat chunks` | Print chunk statistics for the configured document |

mod chat;
mod chunk;
mod config;
mod document;
mod extract;
mod memory;
mod model;
mod retrieval;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::chat::ChatEngine;
use crate::memory::{InMemorySessionStore, DEFAULT_SESSION_ID};
use crate::model::OpenAiCompatModel;

/// Handbook Chat — a retrieval-augmented chat service over a single
/// reference document.
#[derive(Parser)]
#[command(
    name = "hbchat",
    about = "Handbook Chat — a retrieval-augmented chat service over a single reference document",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/hbchat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the chat HTTP server.
    ///
    /// Binds to `[server].bind` and serves `POST /chat` and `GET /health`
    /// until terminated. The handbook is loaded lazily on first use.
    Serve,

    /// Send one message and print the reply.
    ///
    /// Useful for smoke-testing the model endpoint configuration without
    /// the browser widget. Session memory only lives for this process, so
    /// repeated invocations do not share history.
    Ask {
        /// The user message.
        message: String,

        /// Session id for the exchange.
        #[arg(long, default_value = DEFAULT_SESSION_ID)]
        session: String,

        /// Skip handbook retrieval for this exchange.
        #[arg(long)]
        no_handbook: bool,
    },

    /// Show which handbook chunks a query would retrieve.
    ///
    /// Runs query normalization and scoring exactly as the chat path does
    /// and prints the winning chunks with their scores.
    Retrieve {
        /// The query string.
        query: String,

        /// Maximum number of chunks to show.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print chunk statistics for the configured document.
    Chunks,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("handbook_chat=info,hbchat=info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            let engine = build_engine(&cfg)?;
            server::run_server(&cfg, engine).await?;
        }
        Commands::Ask {
            message,
            session,
            no_handbook,
        } => {
            let engine = build_engine(&cfg)?;
            let outcome = engine.respond(&session, &message, !no_handbook).await?;
            println!("{}", outcome.reply);
            if !outcome.sources.is_empty() {
                println!();
                println!("Sources:");
                for (i, source) in outcome.sources.iter().enumerate() {
                    println!("  [{}] {}", i + 1, truncate(source, 120));
                }
            }
        }
        Commands::Retrieve { query, limit } => {
            let index = document::HandbookIndex::load(&cfg);
            if index.is_empty() {
                println!("Document unavailable — nothing to retrieve.");
                return Ok(());
            }
            let top_k = limit.unwrap_or(cfg.retrieval.top_k);
            let scorer = retrieval::SubstringScorer;
            let results = retrieval::retrieve(
                &query,
                &index.chunks,
                top_k,
                cfg.retrieval.min_term_len,
                &scorer,
            );
            if results.is_empty() {
                println!("No matching chunks.");
                return Ok(());
            }
            let terms = retrieval::query_terms(&query, cfg.retrieval.min_term_len);
            for (i, chunk) in results.iter().enumerate() {
                let score: usize = terms
                    .iter()
                    .map(|t| retrieval::TermScorer::score(&scorer, t, chunk))
                    .sum();
                println!("{}. [{}] {}", i + 1, score, chunk);
            }
        }
        Commands::Chunks => {
            let index = document::HandbookIndex::load(&cfg);
            if index.is_empty() {
                println!("Document unavailable: {}", cfg.document.path.display());
                return Ok(());
            }
            let total: usize = index.chunks.iter().map(String::len).sum();
            let longest = index.chunks.iter().map(String::len).max().unwrap_or(0);
            println!("document: {}", cfg.document.path.display());
            println!("extracted text: {} chars", index.text.len());
            println!("chunks: {}", index.chunks.len());
            println!("bound: {} chars", cfg.chunking.max_chars);
            println!("longest chunk: {} chars", longest);
            println!(
                "average chunk: {} chars",
                if index.chunks.is_empty() {
                    0
                } else {
                    total / index.chunks.len()
                }
            );
        }
    }

    Ok(())
}

fn build_engine(cfg: &config::Config) -> Result<Arc<ChatEngine>> {
    let store = Arc::new(InMemorySessionStore::new(cfg.chat.max_turns));
    let model = Arc::new(OpenAiCompatModel::new(&cfg.model)?);
    Ok(Arc::new(ChatEngine::new(cfg.clone(), store, model)))
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}
