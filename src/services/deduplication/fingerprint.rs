//! Content fingerprints and key-phrase extraction.
//!
//! A fingerprint pairs the Layer 1 content hash with the salient phrases of
//! the raw text. Layer 2 (cross-source) uses the hash; the phrases are kept
//! for provenance reporting on matched pairs.

// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::hasher::ContentHasher;
use crate::models::ContentItem;

/// Two or more adjacent words that start with an upper-case letter.
static CAPITALIZED_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z0-9&'\-]*(?:[ \t]+[A-Z][A-Za-z0-9&'\-]*)+")
        .expect("static regex: capitalized sequence")
});

/// Currency amounts, percentages, and numbers followed by a magnitude word.
static NUMERIC_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)",
        r"[$€£¥]\s?\d(?:[\d,]*\d)?(?:\.\d+)?(?:\s?(?:bn|mn|thousand|million|billion|trillion|[kmbt])\b)?",
        r"|[+\-]?\d(?:[\d,]*\d)?(?:\.\d+)?\s?%",
        r"|\b\d(?:[\d,]*\d)?(?:\.\d+)?\s(?:thousand|million|billion|trillion|shares|bps|basis points)\b",
    ))
    .expect("static regex: numeric unit")
});

/// Leading words dropped from capitalized sequences.
const LEADING_ARTICLES: &[&str] = &["The", "A", "An"];

/// Hash plus key phrases for one piece of content.
///
/// # Example
///
/// ```rust
/// use signal_dedup::services::deduplication::Fingerprinter;
///
/// let fp = Fingerprinter::fingerprint("Apple Inc. beat estimates, rising 5% to $190.10.");
/// assert_eq!(fp.hash.len(), 64);
/// assert_eq!(fp.key_phrases, vec!["apple inc", "5%", "$190.10"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFingerprint {
    /// Layer 1 content hash.
    pub hash: String,
    /// Key phrases in order of first appearance, without duplicates.
    pub key_phrases: Vec<String>,
}

impl ContentFingerprint {
    /// Returns the phrases present in both fingerprints, in `self` order.
    #[must_use]
    pub fn shared_key_phrases(&self, other: &Self) -> Vec<String> {
        let theirs: HashSet<&str> = other.key_phrases.iter().map(String::as_str).collect();
        self.key_phrases
            .iter()
            .filter(|phrase| theirs.contains(phrase.as_str()))
            .cloned()
            .collect()
    }
}

/// Builds content fingerprints.
pub struct Fingerprinter;

impl Fingerprinter {
    /// Computes the fingerprint of raw text.
    #[must_use]
    pub fn fingerprint(text: &str) -> ContentFingerprint {
        ContentFingerprint {
            hash: ContentHasher::hash(text),
            key_phrases: Self::extract_key_phrases(text),
        }
    }

    /// Extracts salient multi-word terms and numeric+unit tokens.
    ///
    /// Works on raw text, since capitalization is part of the signal. The
    /// output is lower-cased, whitespace-collapsed, ordered by first
    /// appearance, and free of duplicates. The same input always yields the
    /// same output.
    #[must_use]
    pub fn extract_key_phrases(text: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = Vec::new();

        for m in CAPITALIZED_SEQUENCE.find_iter(text) {
            if let Some((offset, phrase)) = strip_leading_article(m.as_str()) {
                found.push((m.start() + offset, phrase));
            }
        }
        for m in NUMERIC_UNIT.find_iter(text) {
            found.push((m.start(), m.as_str().to_string()));
        }

        // Stable sort keeps capitalized matches ahead on equal offsets
        found.sort_by_key(|(start, _)| *start);

        let mut seen = HashSet::new();
        found
            .into_iter()
            .map(|(_, phrase)| canonical_phrase(&phrase))
            .filter(|phrase| seen.insert(phrase.clone()))
            .collect()
    }

    /// Layer 2 verdict: same normalized content published by different sources.
    ///
    /// Items whose text normalizes to nothing are never duplicates.
    #[must_use]
    pub fn is_cross_source_duplicate(a: &ContentItem, b: &ContentItem) -> bool {
        a.source() != b.source() && ContentHasher::is_exact_match(a.raw_text(), b.raw_text())
    }
}

/// Drops a leading article, keeping the sequence only if two words remain.
fn strip_leading_article(sequence: &str) -> Option<(usize, String)> {
    let words: Vec<&str> = sequence.split_whitespace().collect();
    let skip = usize::from(words.first().is_some_and(|w| LEADING_ARTICLES.contains(w)));
    if words.len() - skip < 2 {
        return None;
    }
    let offset = if skip == 1 {
        sequence.find(words[1]).unwrap_or(0)
    } else {
        0
    };
    Some((offset, words[skip..].join(" ")))
}

fn canonical_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
