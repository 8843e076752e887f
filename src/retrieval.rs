//! Lexical chunk retrieval.
//!
//! Ranks document chunks against a user query by term-frequency match and
//! returns the top-K. This is a deliberately cheap, dependency-free
//! relevance heuristic — a stand-in for an inverted index or embedding
//! search that is perfectly adequate for a single small document, where an
//! O(terms × chunks) scan costs nothing. There is no IDF weighting, no
//! stemming, and no precomputed statistics.

/// Punctuation stripped from query tokens before matching.
const QUERY_PUNCT: &[char] = &['.', ',', '?', '!', ';', ':', '(', ')', '"', '\''];

/// Scoring strategy for a single (term, chunk) pair.
///
/// Kept as a seam so the ranking function can be swapped (e.g. for BM25 or
/// word-boundary-aware matching) without touching the retrieval control
/// flow in [`retrieve`].
pub trait TermScorer: Send + Sync {
    /// Returns the number of points `term` contributes against `chunk`.
    fn score(&self, term: &str, chunk: &str) -> usize;
}

/// Default scorer: case-insensitive substring occurrence count.
///
/// Every non-overlapping occurrence of the term counts, including matches
/// inside longer unrelated words — there is no word-boundary anchoring.
pub struct SubstringScorer;

impl TermScorer for SubstringScorer {
    fn score(&self, term: &str, chunk: &str) -> usize {
        if term.is_empty() {
            return 0;
        }
        chunk.to_lowercase().match_indices(term).count()
    }
}

/// Normalize a raw query into its term set.
///
/// Lowercases, splits on whitespace, keeps tokens of at least
/// `min_term_len` characters, then strips the fixed punctuation set from
/// the survivors. The length filter runs on the raw token, so a short word
/// carrying punctuation ("pay,") still qualifies and matches as "pay";
/// stopword-ish tokens ("is", "the", "a") fall out via the filter. A token
/// that is all punctuation survives as an empty term, which the scorer
/// treats as worthless.
pub fn query_terms(query: &str, min_term_len: usize) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|t| t.chars().count() >= min_term_len)
        .map(|t| t.replace(QUERY_PUNCT, ""))
        .collect()
}

/// Retrieve the `top_k` most relevant chunks for a query.
///
/// An empty term set short-circuits to an empty result — no scoring is
/// performed, and callers must treat this as "no relevant content" rather
/// than an error. A chunk's score is the sum of the scorer's points over
/// all query terms; zero-scoring chunks are discarded. The sort is stable,
/// so equal-scoring chunks keep their original document order.
pub fn retrieve(
    query: &str,
    chunks: &[String],
    top_k: usize,
    min_term_len: usize,
    scorer: &dyn TermScorer,
) -> Vec<String> {
    let terms = query_terms(query, min_term_len);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &String)> = chunks
        .iter()
        .map(|chunk| {
            let score = terms.iter().map(|t| scorer.score(t, chunk)).sum::<usize>();
            (score, chunk)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(top_k)
        .map(|(_, chunk)| chunk.clone())
        .collect()
}
