//! Layer 3: fuzzy title matching.
//!
//! Titles are compared as word sets with the Jaccard index. This catches
//! reordered words and swapped connectives ("after" vs "following"), but
//! carries no notion of synonyms: "jump" and "surge" are simply different
//! words.

use std::collections::HashSet;

use super::similarity::jaccard_similarity;

/// Tokens of this many characters or fewer are dropped.
const MAX_DROPPED_TOKEN_LEN: usize = 2;

/// Scores title similarity.
///
/// # Example
///
/// ```rust
/// use signal_dedup::services::deduplication::TitleSimilarityScorer;
///
/// let score = TitleSimilarityScorer::similarity(
///     "Apple Stock Rises 5% After Strong Quarterly Earnings",
///     "Apple Stock Rises 5% Following Strong Quarterly Earnings",
/// );
/// assert!((score - 0.75).abs() < 1e-9);
/// ```
pub struct TitleSimilarityScorer;

impl TitleSimilarityScorer {
    /// Splits a title into its comparable word set.
    ///
    /// Lower-cases, splits on whitespace, and drops tokens of two characters
    /// or fewer. Punctuation is kept, so `"Targets,"` and `"targets"` differ.
    #[must_use]
    pub fn tokens(title: &str) -> HashSet<String> {
        title
            .to_lowercase()
            .split_whitespace()
            .filter(|token| token.chars().count() > MAX_DROPPED_TOKEN_LEN)
            .map(str::to_string)
            .collect()
    }

    /// Jaccard similarity of two titles' word sets.
    ///
    /// A title made only of short words (`"Up"`, `"Q3 EU"`) has no tokens
    /// and scores `0.0`, even against itself. Check [`Self::tokens`] first
    /// when that case matters; the pipeline treats it as not applicable.
    #[must_use]
    pub fn similarity(a: &str, b: &str) -> f64 {
        jaccard_similarity(&Self::tokens(a), &Self::tokens(b))
    }

    /// Layer 3 verdict for two titles at the given threshold.
    #[must_use]
    pub fn is_duplicate(a: &str, b: &str, threshold: f64) -> bool {
        Self::similarity(a, b) >= threshold
    }
}
