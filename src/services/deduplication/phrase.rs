//! Layer 4: key-phrase (bigram) overlap.
//!
//! Content that keeps multi-word facts (names, figures) under moderate
//! rewriting shares many adjacent word pairs. Heavy paraphrase defeats this
//! layer, so it is one corroborating signal, not a classifier on its own.

// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::normalizer::Normalizer;
use super::similarity::jaccard_similarity;

/// Everything that is neither a word character nor whitespace.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static regex: non-word"));

/// Tokens of this many characters or fewer are dropped.
const MAX_DROPPED_TOKEN_LEN: usize = 2;

/// Scores bigram overlap between two bodies of text.
///
/// # Example
///
/// ```rust
/// use signal_dedup::services::deduplication::PhraseOverlapScorer;
///
/// let bigrams = PhraseOverlapScorer::bigrams("Apple Inc. reported record revenue");
/// assert!(bigrams.contains("apple inc"));
/// assert!(bigrams.contains("record revenue"));
/// assert_eq!(bigrams.len(), 4);
/// ```
pub struct PhraseOverlapScorer;

impl PhraseOverlapScorer {
    /// Builds the bigram set of raw text.
    #[must_use]
    pub fn bigrams(raw: &str) -> HashSet<String> {
        Self::bigrams_normalized(&Normalizer::normalize(raw))
    }

    /// Builds the bigram set of already normalized text.
    ///
    /// Strips non-word characters, splits on whitespace, drops tokens of two
    /// characters or fewer, then joins each adjacent pair with a space.
    #[must_use]
    pub fn bigrams_normalized(normalized: &str) -> HashSet<String> {
        let stripped = NON_WORD.replace_all(normalized, "");
        let words: Vec<&str> = stripped
            .split_whitespace()
            .filter(|word| word.chars().count() > MAX_DROPPED_TOKEN_LEN)
            .collect();

        words
            .windows(2)
            .map(|pair| format!("{} {}", pair[0], pair[1]))
            .collect()
    }

    /// Jaccard overlap of two texts' bigram sets.
    ///
    /// Text with fewer than two significant words has no bigrams and scores
    /// `0.0`, even against itself. Check [`Self::bigrams`] first when that
    /// case matters; the pipeline treats it as not applicable.
    #[must_use]
    pub fn overlap(a: &str, b: &str) -> f64 {
        jaccard_similarity(&Self::bigrams(a), &Self::bigrams(b))
    }

    /// Layer 4 verdict for two texts at the given threshold.
    #[must_use]
    pub fn is_duplicate(a: &str, b: &str, threshold: f64) -> bool {
        Self::overlap(a, b) >= threshold
    }
}
