//! Deduplication result types.
//!
//! This module defines the per-layer results and the decision returned by a
//! pipeline run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::ItemId;

/// The four detection layers, in canonical evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupLayer {
    /// Exact hash of normalized content.
    Layer1,
    /// Exact hash published by a different source.
    Layer2,
    /// Fuzzy title word-set similarity.
    Layer3,
    /// Bigram overlap of normalized content.
    Layer4,
}

impl DedupLayer {
    /// All layers in canonical order.
    pub const ALL: [Self; 4] = [Self::Layer1, Self::Layer2, Self::Layer3, Self::Layer4];

    /// Returns a stable label, used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Layer1 => "exact_hash",
            Self::Layer2 => "cross_source",
            Self::Layer3 => "title_similarity",
            Self::Layer4 => "phrase_overlap",
        }
    }
}

impl fmt::Display for DedupLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one layer.
///
/// A result with `applicable == false` had no data to score (missing title,
/// empty content) and takes no part in aggregation.
///
/// # Example
///
/// ```rust
/// use signal_dedup::services::deduplication::{DedupLayer, DeduplicationResult};
///
/// let result = DeduplicationResult::scored(DedupLayer::Layer3, 0.9, 0.85);
/// assert!(result.applicable);
/// assert!(result.is_duplicate);
///
/// let skipped = DeduplicationResult::not_applicable(DedupLayer::Layer3);
/// assert!(!skipped.counts_as_duplicate());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeduplicationResult {
    /// Which layer produced this result.
    pub layer: DedupLayer,
    /// Whether the layer had data to score.
    pub applicable: bool,
    /// Whether the layer flags a duplicate.
    pub is_duplicate: bool,
    /// Layer confidence in `[0, 1]`: `1.0` for a hash match, the similarity
    /// score for Layers 3 and 4.
    pub confidence: f64,
}

impl DeduplicationResult {
    /// A layer with nothing to compare.
    #[must_use]
    pub const fn not_applicable(layer: DedupLayer) -> Self {
        Self {
            layer,
            applicable: false,
            is_duplicate: false,
            confidence: 0.0,
        }
    }

    /// A hash-based verdict (Layers 1 and 2).
    #[must_use]
    pub const fn exact(layer: DedupLayer, matched: bool) -> Self {
        Self {
            layer,
            applicable: true,
            is_duplicate: matched,
            confidence: if matched { 1.0 } else { 0.0 },
        }
    }

    /// A similarity score checked against a threshold (Layers 3 and 4).
    #[must_use]
    pub fn scored(layer: DedupLayer, score: f64, threshold: f64) -> Self {
        Self {
            layer,
            applicable: true,
            is_duplicate: score >= threshold,
            confidence: score,
        }
    }

    /// True when the layer is applicable and flags a duplicate.
    #[must_use]
    pub const fn counts_as_duplicate(&self) -> bool {
        self.applicable && self.is_duplicate
    }
}

/// The candidate compared against one window item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairComparison {
    /// The window item the candidate was compared with.
    pub item_id: ItemId,
    /// One result per layer, in canonical order.
    pub results: [DeduplicationResult; 4],
    /// OR across applicable results.
    pub is_duplicate: bool,
    /// Key phrases found in both texts, in candidate order.
    pub shared_key_phrases: Vec<String>,
}

impl PairComparison {
    /// Builds a comparison, deriving the pair verdict from the results.
    #[must_use]
    pub fn new(
        item_id: ItemId,
        results: [DeduplicationResult; 4],
        shared_key_phrases: Vec<String>,
    ) -> Self {
        let is_duplicate = results.iter().any(DeduplicationResult::counts_as_duplicate);
        Self {
            item_id,
            results,
            is_duplicate,
            shared_key_phrases,
        }
    }

    /// Returns the result for one layer.
    #[must_use]
    pub const fn result(&self, layer: DedupLayer) -> &DeduplicationResult {
        &self.results[layer as usize]
    }
}

/// Verdict for a candidate against its whole window.
///
/// `layers` summarizes each layer across all comparisons: applicable if any
/// comparison could score it, duplicate if any comparison flagged it, and
/// the highest applicable confidence. The caller alone decides whether to
/// persist, link, or discard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeduplicationDecision {
    /// OR across all applicable layer results.
    pub is_duplicate: bool,
    /// First window item (in window order) the candidate duplicates.
    pub matched_item_id: Option<ItemId>,
    /// One summary per layer, in canonical order.
    pub layers: [DeduplicationResult; 4],
    /// Per-item breakdown, in window order.
    pub comparisons: Vec<PairComparison>,
}

impl DeduplicationDecision {
    /// A decision for a candidate with nothing to compare against.
    #[must_use]
    pub const fn unique() -> Self {
        Self {
            is_duplicate: false,
            matched_item_id: None,
            layers: [
                DeduplicationResult::not_applicable(DedupLayer::Layer1),
                DeduplicationResult::not_applicable(DedupLayer::Layer2),
                DeduplicationResult::not_applicable(DedupLayer::Layer3),
                DeduplicationResult::not_applicable(DedupLayer::Layer4),
            ],
            comparisons: Vec::new(),
        }
    }

    /// Aggregates per-item comparisons into a decision.
    #[must_use]
    pub fn from_comparisons(comparisons: Vec<PairComparison>) -> Self {
        let layers = DedupLayer::ALL.map(|layer| {
            let mut summary = DeduplicationResult::not_applicable(layer);
            for result in comparisons.iter().map(|c| c.result(layer)) {
                if result.applicable {
                    summary.applicable = true;
                    summary.is_duplicate |= result.is_duplicate;
                    summary.confidence = summary.confidence.max(result.confidence);
                }
            }
            summary
        });

        let matched_item_id = comparisons
            .iter()
            .find(|c| c.is_duplicate)
            .map(|c| c.item_id.clone());

        Self {
            is_duplicate: matched_item_id.is_some(),
            matched_item_id,
            layers,
            comparisons,
        }
    }

    /// Returns the summary for one layer.
    #[must_use]
    pub const fn layer(&self, layer: DedupLayer) -> &DeduplicationResult {
        &self.layers[layer as usize]
    }

    /// Layers that flagged a duplicate, in canonical order.
    #[must_use]
    pub fn matched_layers(&self) -> Vec<DedupLayer> {
        self.layers
            .iter()
            .filter(|r| r.counts_as_duplicate())
            .map(|r| r.layer)
            .collect()
    }
}

impl Default for DeduplicationDecision {
    fn default() -> Self {
        Self::unique()
    }
}

/// Trait for deduplication checking.
///
/// Implemented by [`super::DeduplicationService`].
pub trait Deduplicator: Send + Sync {
    /// Classifies a freshly fetched item.
    ///
    /// # Errors
    ///
    /// Returns an error if the recent window cannot be obtained.
    fn check_duplicate(
        &self,
        candidate: &crate::models::ContentItem,
        config: &super::config::ThresholdConfig,
    ) -> crate::Result<DeduplicationDecision>;
}
