//! Fixed English stopword list for term extraction.
//!
//! Kept deliberately short and stable so scores stay comparable across runs.

use std::collections::HashSet;

use once_cell::sync::Lazy;

const WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "else", "for", "to", "of", "in", "on",
    "with", "by", "from", "as", "at", "is", "are", "was", "were", "be", "been", "being", "this",
    "that", "these", "those", "it", "its", "i", "you", "we", "they", "he", "she", "them", "our",
    "your", "my",
];

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| WORDS.iter().copied().collect());

/// Expects a lowercase token.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}
