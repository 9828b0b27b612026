//! Property-based tests for the deduplication layers.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Hashing ignores case and whitespace differences
//! - Title and phrase scorers are symmetric and bounded
//! - Non-empty text is fully similar to itself
//! - Pipeline runs are deterministic

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{TimeDelta, TimeZone, Utc};
use proptest::prelude::*;
use signal_dedup::models::ContentItem;
use signal_dedup::services::deduplication::{
    ContentHasher, DeduplicationPipeline, Normalizer, PhraseOverlapScorer, ThresholdConfig,
    TitleSimilarityScorer,
};

/// Sentences of plain words, so at least some tokens survive filtering.
fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z]{3,9}", 1..12).prop_map(|words| words.join(" "))
}

proptest! {
    /// Property: hash is stable under case and whitespace changes.
    #[test]
    fn prop_hash_ignores_case_and_spacing(text in sentence(), pad in 0usize..4) {
        let padded = format!(
            "{}{}{}",
            " ".repeat(pad),
            text.to_uppercase().replace(' ', "  \t"),
            "\n".repeat(pad)
        );
        prop_assert_eq!(ContentHasher::hash(&text), ContentHasher::hash(&padded));
    }

    /// Property: hash is 64 lowercase hex characters.
    #[test]
    fn prop_hash_is_hex(text in ".{0,200}") {
        let hash = ContentHasher::hash(&text);
        prop_assert_eq!(hash.len(), 64);
        prop_assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// Property: normalization collapses whitespace and trims.
    #[test]
    fn prop_normalized_has_no_double_spaces(text in "[a-z \\t\\n]{0,100}") {
        let normalized = Normalizer::normalize(&text);
        prop_assert!(!normalized.contains("  "));
        prop_assert_eq!(normalized.trim(), normalized.as_str());
    }

    /// Property: title similarity is symmetric and within [0, 1].
    #[test]
    fn prop_title_similarity_symmetric(a in sentence(), b in sentence()) {
        let ab = TitleSimilarityScorer::similarity(&a, &b);
        let ba = TitleSimilarityScorer::similarity(&b, &a);
        prop_assert!((ab - ba).abs() < f64::EPSILON);
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    /// Property: phrase overlap is symmetric and within [0, 1].
    #[test]
    fn prop_phrase_overlap_symmetric(a in sentence(), b in sentence()) {
        let ab = PhraseOverlapScorer::overlap(&a, &b);
        let ba = PhraseOverlapScorer::overlap(&b, &a);
        prop_assert!((ab - ba).abs() < f64::EPSILON);
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    /// Property: a non-empty text is fully similar to itself.
    #[test]
    fn prop_self_similarity_is_one(text in sentence()) {
        prop_assert!((TitleSimilarityScorer::similarity(&text, &text) - 1.0).abs() < f64::EPSILON);
        if !PhraseOverlapScorer::bigrams(&text).is_empty() {
            prop_assert!((PhraseOverlapScorer::overlap(&text, &text) - 1.0).abs() < f64::EPSILON);
        }
    }

    /// Property: texts over disjoint vocabularies score zero.
    #[test]
    fn prop_disjoint_texts_score_zero(
        a in prop::collection::vec("[a-m]{3,8}", 2..8),
        b in prop::collection::vec("[n-z]{3,8}", 2..8),
    ) {
        let (a, b) = (a.join(" "), b.join(" "));
        prop_assert!(TitleSimilarityScorer::similarity(&a, &b).abs() < f64::EPSILON);
        prop_assert!(PhraseOverlapScorer::overlap(&a, &b).abs() < f64::EPSILON);
    }

    /// Property: identical arguments produce identical decisions.
    #[test]
    fn prop_run_is_deterministic(
        candidate in sentence(),
        window in prop::collection::vec(sentence(), 0..6),
        offsets in prop::collection::vec(-100i64..100, 6),
    ) {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let window: Vec<ContentItem> = window
            .iter()
            .zip(&offsets)
            .enumerate()
            .map(|(i, (text, offset))| {
                let published_at = now + TimeDelta::hours(*offset);
                ContentItem::new(text.as_str(), format!("src-{}", i % 2), published_at)
                    .with_id(format!("w{i}"))
                    .with_title(text.as_str())
            })
            .collect();
        let candidate = ContentItem::new(candidate.as_str(), "src-0", now)
            .with_id("candidate")
            .with_title(candidate.as_str());
        let config = ThresholdConfig::default();
        let pipeline = DeduplicationPipeline::new();

        let first = pipeline.run(&candidate, &window, &config);
        let second = pipeline.run(&candidate, &window, &config);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.is_duplicate, first.matched_item_id.is_some());
        prop_assert!(first.comparisons.len() <= window.len());
    }
}
