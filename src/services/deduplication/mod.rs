//! Multi-layer duplicate detection for ingested signals.
//!
//! A freshly fetched item (the candidate) is compared against every item
//! published within a recent time window. Four layers run per pair:
//! 1. **Exact hash**: SHA-256 of the normalized text
//! 2. **Cross-source**: the same hash published by a different source
//! 3. **Title similarity**: Jaccard over significant title words
//! 4. **Phrase overlap**: Jaccard over adjacent word pairs of the body
//!
//! Any applicable layer flagging a pair makes the candidate a duplicate.
//! Every layer always runs so the decision carries the full breakdown.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     DeduplicationService                         │
//! │  RecentItemSource ──► window ──► PreparedContentCache (optional) │
//! │                                      │                           │
//! │  ┌───────────────────────────────────▼────────────────────────┐  │
//! │  │                  DeduplicationPipeline                     │  │
//! │  │  Normalizer ─► ContentHasher ─► Fingerprinter              │  │
//! │  │  TitleSimilarityScorer    PhraseOverlapScorer              │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use signal_dedup::models::ContentItem;
//! use signal_dedup::services::deduplication::{DeduplicationPipeline, ThresholdConfig};
//!
//! let now = Utc::now();
//! let window = vec![ContentItem::new("Oil prices rose 3% today.", "reuters", now)];
//! let candidate = ContentItem::new("  OIL prices rose 3%   today. ", "bloomberg", now);
//!
//! let config = ThresholdConfig::default();
//! let decision = DeduplicationPipeline::new().run(&candidate, &window, &config);
//! assert!(decision.is_duplicate);
//! ```

mod cache;
mod config;
mod fingerprint;
mod hasher;
mod normalizer;
mod phrase;
mod pipeline;
mod service;
mod similarity;
mod source;
mod title;
mod types;

pub use cache::PreparedContentCache;
pub use config::{ConfigFile, ConfigFileDedup, DedupProfile, ThresholdConfig};
pub use fingerprint::{ContentFingerprint, Fingerprinter};
pub use hasher::ContentHasher;
pub use normalizer::{Normalizer, URL_TOKEN};
pub use phrase::PhraseOverlapScorer;
pub use pipeline::{DeduplicationPipeline, PreparedContent};
pub use service::DeduplicationService;
pub use similarity::jaccard_similarity;
pub use source::{InMemoryItemSource, RecentItemSource};
pub use title::TitleSimilarityScorer;
pub use types::{
    DedupLayer, DeduplicationDecision, DeduplicationResult, Deduplicator, PairComparison,
};
