//! Four-layer deduplication pipeline.
//!
//! Compares a candidate against a caller-supplied window of recent items:
//! 1. **Exact hash**: SHA256 of normalized content
//! 2. **Cross-source**: exact hash published by a different source
//! 3. **Title similarity**: Jaccard over title word sets
//! 4. **Phrase overlap**: Jaccard over content bigrams
//!
//! Every layer runs for every in-window item; there is no short-circuit, so
//! the breakdown is complete for audit and tuning. The verdict is an OR over
//! applicable results.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::instrument;

use super::config::ThresholdConfig;
use super::fingerprint::{ContentFingerprint, Fingerprinter};
use super::hasher::ContentHasher;
use super::normalizer::Normalizer;
use super::phrase::PhraseOverlapScorer;
use super::similarity::jaccard_similarity;
use super::title::TitleSimilarityScorer;
use super::types::{DedupLayer, DeduplicationDecision, DeduplicationResult, PairComparison};
use crate::models::{ContentItem, ItemId};

/// Everything the layers need from one item, derived once.
///
/// Preparing is `O(|text|)`; comparing two prepared items is linear in
/// their token and bigram counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedContent {
    id: ItemId,
    source: String,
    published_at: DateTime<Utc>,
    normalized: String,
    fingerprint: ContentFingerprint,
    title_tokens: Option<HashSet<String>>,
    bigrams: HashSet<String>,
}

impl PreparedContent {
    /// Derives normalized text, fingerprint, title tokens, and bigrams.
    #[must_use]
    pub fn from_item(item: &ContentItem) -> Self {
        let normalized = Normalizer::normalize(item.raw_text());
        let fingerprint = ContentFingerprint {
            hash: ContentHasher::hash_normalized(&normalized),
            key_phrases: Fingerprinter::extract_key_phrases(item.raw_text()),
        };
        let bigrams = PhraseOverlapScorer::bigrams_normalized(&normalized);

        Self {
            id: item.id().clone(),
            source: item.source().to_string(),
            published_at: item.published_at(),
            title_tokens: item.title().map(TitleSimilarityScorer::tokens),
            normalized,
            fingerprint,
            bigrams,
        }
    }

    /// Returns the item ID.
    #[must_use]
    pub const fn id(&self) -> &ItemId {
        &self.id
    }

    /// Returns the normalized text.
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Returns the content fingerprint.
    #[must_use]
    pub const fn fingerprint(&self) -> &ContentFingerprint {
        &self.fingerprint
    }

    /// Returns the publication timestamp.
    #[must_use]
    pub const fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

/// Stateless orchestrator for the four layers.
///
/// Holds no configuration: thresholds arrive with every call, so a single
/// instance can be shared across workers with different tuning.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use signal_dedup::models::ContentItem;
/// use signal_dedup::services::deduplication::{DedupLayer, DeduplicationPipeline, ThresholdConfig};
///
/// let at = Utc.with_ymd_and_hms(2024, 5, 2, 14, 0, 0).unwrap();
/// let seen = ContentItem::new("Apple Inc. reported quarterly earnings.", "reuters", at)
///     .with_id("seen-1");
/// let candidate = ContentItem::new("Apple Inc. reported quarterly earnings.", "yahoo", at);
///
/// let config = ThresholdConfig::default();
/// let decision = DeduplicationPipeline::new().run(&candidate, &[seen], &config);
/// assert!(decision.is_duplicate);
/// assert!(decision.layer(DedupLayer::Layer2).is_duplicate);
/// assert_eq!(decision.matched_item_id.unwrap().as_str(), "seen-1");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DeduplicationPipeline;

impl DeduplicationPipeline {
    /// Creates a pipeline.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Classifies `candidate` against `recent_window`.
    ///
    /// Items published more than `dedup_hours_back` hours before or after
    /// the candidate, and items sharing the candidate's ID, are skipped. The
    /// window is never modified.
    #[instrument(
        skip_all,
        fields(
            operation = "dedup_pipeline_run",
            candidate_id = %candidate.id(),
            window_len = recent_window.len()
        )
    )]
    pub fn run(
        &self,
        candidate: &ContentItem,
        recent_window: &[ContentItem],
        config: &ThresholdConfig,
    ) -> DeduplicationDecision {
        let prepared_candidate = PreparedContent::from_item(candidate);
        let window: Vec<PreparedContent> = recent_window
            .iter()
            .filter(|item| {
                is_comparable(
                    candidate.id(),
                    candidate.published_at(),
                    item.id(),
                    item.published_at(),
                    config,
                )
            })
            .map(PreparedContent::from_item)
            .collect();

        self.run_prepared(&prepared_candidate, &window, config)
    }

    /// Classifies an already prepared candidate against prepared items.
    ///
    /// Applies the same window bounds as [`Self::run`].
    pub fn run_prepared<'a, I>(
        &self,
        candidate: &PreparedContent,
        window: I,
        config: &ThresholdConfig,
    ) -> DeduplicationDecision
    where
        I: IntoIterator<Item = &'a PreparedContent>,
    {
        let comparisons: Vec<PairComparison> = window
            .into_iter()
            .filter(|item| {
                is_comparable(
                    &candidate.id,
                    candidate.published_at,
                    &item.id,
                    item.published_at,
                    config,
                )
            })
            .map(|item| compare(candidate, item, config))
            .collect();

        for comparison in comparisons.iter().filter(|c| c.is_duplicate) {
            tracing::debug!(
                item_id = %comparison.item_id,
                layers = ?comparison
                    .results
                    .iter()
                    .filter(|r| r.counts_as_duplicate())
                    .map(|r| r.layer.as_str())
                    .collect::<Vec<_>>(),
                "Candidate matches window item"
            );
        }

        DeduplicationDecision::from_comparisons(comparisons)
    }
}

/// True when the item lies inside the window and is not the candidate itself.
fn is_comparable(
    candidate_id: &ItemId,
    candidate_at: DateTime<Utc>,
    item_id: &ItemId,
    item_at: DateTime<Utc>,
    config: &ThresholdConfig,
) -> bool {
    candidate_id != item_id && (candidate_at - item_at).abs() <= config.window()
}

/// Runs all four layers for one pair.
fn compare(
    candidate: &PreparedContent,
    item: &PreparedContent,
    config: &ThresholdConfig,
) -> PairComparison {
    // Empty content carries no evidence; two empty items are never duplicates
    let has_content = !candidate.normalized.is_empty() && !item.normalized.is_empty();
    let same_hash = has_content && candidate.fingerprint.hash == item.fingerprint.hash;

    let exact_hash = if has_content {
        DeduplicationResult::exact(DedupLayer::Layer1, same_hash)
    } else {
        DeduplicationResult::not_applicable(DedupLayer::Layer1)
    };

    let cross_source = if has_content {
        DeduplicationResult::exact(
            DedupLayer::Layer2,
            same_hash && candidate.source != item.source,
        )
    } else {
        DeduplicationResult::not_applicable(DedupLayer::Layer2)
    };

    let title = match (&candidate.title_tokens, &item.title_tokens) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => DeduplicationResult::scored(
            DedupLayer::Layer3,
            jaccard_similarity(a, b),
            config.title_similarity_threshold(),
        ),
        _ => DeduplicationResult::not_applicable(DedupLayer::Layer3),
    };

    let phrase = if candidate.bigrams.is_empty() || item.bigrams.is_empty() {
        DeduplicationResult::not_applicable(DedupLayer::Layer4)
    } else {
        DeduplicationResult::scored(
            DedupLayer::Layer4,
            jaccard_similarity(&candidate.bigrams, &item.bigrams),
            config.phrase_overlap_threshold(),
        )
    };

    PairComparison::new(
        item.id.clone(),
        [exact_hash, cross_source, title, phrase],
        candidate.fingerprint.shared_key_phrases(&item.fingerprint),
    )
}
