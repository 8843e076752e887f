//! Bounded-size text chunker.
//!
//! Splits a document's body text into segments of at most `max_chars`
//! characters. Splitting is word-greedy: tokens are accumulated into a
//! buffer joined by single spaces, and the buffer is flushed whenever the
//! next token would push it past the bound. Chunks never overlap and keep
//! the document's original token order.

/// Split text into bounded chunks on whitespace boundaries.
///
/// Each chunk is at most `max_chars` characters, with one exception: a
/// single token longer than the bound starts (and typically exceeds) its
/// own chunk rather than being truncated. Whitespace-only input produces
/// no chunks.
///
/// Deterministic and idempotent — identical `(text, max_chars)` inputs
/// always yield identical chunk sequences.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    // Length bookkeeping is in characters, not bytes, so multi-byte text
    // gets the same budget as ASCII.
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        // +1 for the joining space when the buffer is non-empty
        let would_be = if current.is_empty() {
            word_chars
        } else {
            current_chars + 1 + word_chars
        };

        if would_be > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
