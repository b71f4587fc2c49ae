// Alignment Scorer: lexical coverage of a reference text's terms by a candidate text.
// Terms are deduplicated, so this measures coverage, not frequency.

pub mod stopwords;

use std::collections::BTreeSet;

use serde::Serialize;

use self::stopwords::is_stopword;

/// How many matched / missing terms a report lists.
pub const PREVIEW_LIMIT: usize = 25;

const MIN_TERM_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentReport {
    /// `round(100 * matched / reference_terms)`, 0 when the reference has no terms.
    pub coverage_percent: u32,
    pub candidate_term_count: usize,
    pub reference_term_count: usize,
    pub matched_count: usize,
    /// Sorted, at most [`PREVIEW_LIMIT`] entries.
    pub matched_preview: Vec<String>,
    pub missing_preview: Vec<String>,
}

/// Lowercases, treats everything outside `[a-z0-9]` as a separator, and drops
/// stopwords and tokens shorter than three characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|t| t.len() >= MIN_TERM_LEN && !is_stopword(t))
        .map(str::to_string)
        .collect()
}

/// Distinct terms, in sorted order.
pub fn term_set(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

/// Scores how much of `reference`'s vocabulary `candidate` covers.
pub fn score(candidate: &str, reference: &str) -> AlignmentReport {
    let candidate_terms = term_set(candidate);
    let reference_terms = term_set(reference);

    let matched: Vec<&String> = reference_terms.intersection(&candidate_terms).collect();
    let missing: Vec<&String> = reference_terms.difference(&candidate_terms).collect();

    let coverage_percent = if reference_terms.is_empty() {
        0
    } else {
        let ratio = matched.len() as f64 / reference_terms.len() as f64;
        (ratio * 100.0).round_ties_even() as u32
    };

    AlignmentReport {
        coverage_percent,
        candidate_term_count: candidate_terms.len(),
        reference_term_count: reference_terms.len(),
        matched_count: matched.len(),
        matched_preview: preview(&matched),
        missing_preview: preview(&missing),
    }
}

fn preview(terms: &[&String]) -> Vec<String> {
    terms
        .iter()
        .take(PREVIEW_LIMIT)
        .map(|t| (*t).clone())
        .collect()
}
