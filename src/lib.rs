//! # Signal Dedup
//!
//! Multi-layer duplicate detection for market-intelligence ingestion.
//!
//! A crawler fetches articles, filings and posts from many sources. The same
//! story often arrives several times: verbatim from one feed, syndicated by
//! another, or lightly rewritten. This crate decides, for each freshly
//! fetched item, whether it duplicates something already seen in a recent
//! window.
//!
//! ## Features
//!
//! - Four independent layers: exact hash, cross-source hash, title
//!   similarity, phrase overlap
//! - Full per-layer breakdown on every decision
//! - Tunable thresholds with `default` and `aggressive` profiles, loaded from
//!   the environment or a TOML file
//! - Pure, deterministic pipeline; storage is behind a single trait
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use signal_dedup::models::ContentItem;
//! use signal_dedup::services::deduplication::{DedupLayer, DeduplicationPipeline, ThresholdConfig};
//!
//! let now = Utc::now();
//! let window = vec![ContentItem::new("Copper futures jumped 4%.", "reuters", now)];
//! let candidate = ContentItem::new("Copper futures jumped 4%.", "bloomberg", now);
//!
//! let config = ThresholdConfig::default();
//! let decision = DeduplicationPipeline::new().run(&candidate, &window, &config);
//! assert!(decision.is_duplicate);
//! assert!(decision.layer(DedupLayer::Layer2).is_duplicate);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use models::{ContentItem, ItemId};
pub use services::deduplication::{
    DedupLayer, DedupProfile, DeduplicationDecision, DeduplicationPipeline, DeduplicationResult,
    DeduplicationService, Deduplicator, RecentItemSource, ThresholdConfig,
};

/// Error type for signal-dedup operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Zero cache capacity, other malformed arguments |
/// | `InvalidConfig` | Threshold outside `[0, 1]`, zero window, unknown profile |
/// | `OperationFailed` | Window source fails, config file unreadable, logging init |
///
/// The pipeline itself never fails: it is pure and total over its inputs.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A configuration value failed validation.
    ///
    /// Raised when:
    /// - A threshold is not finite or lies outside `[0, 1]`
    /// - `dedup_hours_back` is zero
    /// - An environment variable does not parse
    /// - The profile name is unknown
    #[error("invalid config '{field}': {reason}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An operation failed.
    ///
    /// Raised when:
    /// - A [`RecentItemSource`] cannot produce the window
    /// - A config file cannot be read or parsed
    /// - The logging subscriber cannot be installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for signal-dedup operations.
pub type Result<T> = std::result::Result<T, Error>;
