//! Reference-document loading and the process-wide chunk cache.
//!
//! The handbook is extracted and chunked at most once per process; the
//! result is immutable afterwards and is only refreshed by a restart. A
//! missing or unreadable document is not fatal — it yields an empty index,
//! which the retrieval path must treat as "retrieval unavailable" rather
//! than "no matches".

use crate::chunk::chunk_text;
use crate::config::Config;
use crate::extract::{extract_text, ExtractError};

/// Extracted text plus its ordered chunk sequence.
pub struct HandbookIndex {
    pub text: String,
    pub chunks: Vec<String>,
}

impl HandbookIndex {
    /// Extracts and chunks the configured document.
    ///
    /// Extraction failures degrade to an empty index with a logged
    /// warning; chat keeps working without grounding context.
    pub fn load(config: &Config) -> Self {
        match extract_text(&config.document.path) {
            Ok(text) => {
                let chunks = chunk_text(&text, config.chunking.max_chars);
                tracing::info!(
                    path = %config.document.path.display(),
                    chunks = chunks.len(),
                    "loaded reference document"
                );
                Self { text, chunks }
            }
            Err(ExtractError::NotFound(path)) => {
                tracing::warn!(
                    path = %path.display(),
                    "reference document not found; retrieval unavailable"
                );
                Self::empty()
            }
            Err(e) => {
                tracing::warn!(error = %e, "reference document unreadable; retrieval unavailable");
                Self::empty()
            }
        }
    }

    pub fn empty() -> Self {
        Self {
            text: String::new(),
            chunks: Vec::new(),
        }
    }

    /// True when no document content is available for retrieval.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_document_yields_empty_index() {
        let config = Config::minimal("/nonexistent/handbook.pdf");
        let index = HandbookIndex::load(&config);
        assert!(index.is_empty());
    }

    #[test]
    fn test_text_document_is_chunked() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("handbook.txt");
        std::fs::write(
            &path,
            "Employees receive 15 days of paid vacation annually. \
             Remote work requires manager approval.",
        )
        .unwrap();

        let mut config = Config::minimal(&path);
        config.chunking.max_chars = 40;
        let index = HandbookIndex::load(&config);
        assert_eq!(index.chunks.len(), 3);
        assert!(!index.is_empty());
    }
}
