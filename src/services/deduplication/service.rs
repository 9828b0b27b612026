//! Deduplication service for the ingestion path.
//!
//! Fetches the recent window from a [`RecentItemSource`], runs the
//! [`DeduplicationPipeline`], and records logs and metrics. Optionally
//! memoizes prepared window items in a [`PreparedContentCache`].

use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

use super::cache::PreparedContentCache;
use super::config::ThresholdConfig;
use super::pipeline::{DeduplicationPipeline, PreparedContent};
use super::source::RecentItemSource;
use super::types::{DeduplicationDecision, Deduplicator};
use crate::Result;
use crate::models::ContentItem;

/// Service for deduplication checking.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use signal_dedup::models::ContentItem;
/// use signal_dedup::services::deduplication::{
///     DeduplicationService, InMemoryItemSource, ThresholdConfig,
/// };
/// use std::sync::Arc;
///
/// let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
/// let source = Arc::new(InMemoryItemSource::new().anchored_at(now));
/// source.insert(ContentItem::new("Gold hit a record.", "reuters", now)).unwrap();
///
/// let service = DeduplicationService::new(Arc::clone(&source));
/// let candidate = ContentItem::new("Gold hit a record.", "cnbc", now);
///
/// let decision = service.check(&candidate, &ThresholdConfig::default()).unwrap();
/// assert!(decision.is_duplicate);
/// ```
pub struct DeduplicationService<S: RecentItemSource> {
    /// Window supplier.
    source: Arc<S>,
    /// The stateless four-layer pipeline.
    pipeline: DeduplicationPipeline,
    /// Prepared window items (optional - off by default).
    cache: Option<PreparedContentCache>,
}

impl<S: RecentItemSource> DeduplicationService<S> {
    /// Creates a service without caching.
    #[must_use]
    pub const fn new(source: Arc<S>) -> Self {
        Self {
            source,
            pipeline: DeduplicationPipeline::new(),
            cache: None,
        }
    }

    /// Enables memoization of prepared window items.
    #[must_use]
    pub fn with_cache(mut self, cache: PreparedContentCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Returns the cache, if enabled.
    #[must_use]
    pub const fn cache(&self) -> Option<&PreparedContentCache> {
        self.cache.as_ref()
    }

    /// Classifies `candidate` against the items published within
    /// `config.dedup_hours_back()` hours.
    ///
    /// The decision is the same with or without the cache.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the window cannot be fetched.
    #[allow(clippy::cast_possible_truncation)] // Duration in ms won't exceed u64::MAX
    #[instrument(
        skip_all,
        fields(
            operation = "dedup_check",
            candidate_id = %candidate.id(),
            source = %candidate.source(),
            hours_back = config.dedup_hours_back()
        )
    )]
    pub fn check(
        &self,
        candidate: &ContentItem,
        config: &ThresholdConfig,
    ) -> Result<DeduplicationDecision> {
        let start = Instant::now();

        let window = self
            .source
            .find_recent(config.dedup_hours_back())
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to fetch recent window"))?;

        let decision = match &self.cache {
            Some(cache) => {
                let prepared: Vec<Arc<PreparedContent>> =
                    window.iter().map(|item| cache.get_or_prepare(item)).collect();
                self.pipeline.run_prepared(
                    &PreparedContent::from_item(candidate),
                    prepared.iter().map(|p| &**p),
                    config,
                )
            },
            None => self.pipeline.run(candidate, &window, config),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        self.record_metrics(&decision, duration_ms);

        if decision.is_duplicate {
            tracing::info!(
                matched_item_id = ?decision.matched_item_id,
                layers = ?decision.matched_layers(),
                window_len = window.len(),
                duration_ms = duration_ms,
                "Duplicate content detected"
            );
        } else {
            tracing::debug!(
                window_len = window.len(),
                duration_ms = duration_ms,
                "No duplicate found"
            );
        }

        Ok(decision)
    }

    #[allow(clippy::cast_precision_loss)]
    fn record_metrics(&self, decision: &DeduplicationDecision, duration_ms: u64) {
        let result = if decision.is_duplicate {
            "duplicate"
        } else {
            "unique"
        };
        metrics::counter!("dedup_checks_total", "result" => result).increment(1);

        for layer in decision.matched_layers() {
            metrics::counter!("dedup_layer_matches_total", "layer" => layer.as_str())
                .increment(1);
        }

        metrics::histogram!(
            "dedup_check_duration_ms",
            "cached" => if self.cache.is_some() { "true" } else { "false" }
        )
        .record(duration_ms as f64);
    }
}

/// Implementation of the Deduplicator trait.
impl<S: RecentItemSource> Deduplicator for DeduplicationService<S> {
    fn check_duplicate(
        &self,
        candidate: &ContentItem,
        config: &ThresholdConfig,
    ) -> Result<DeduplicationDecision> {
        self.check(candidate, config)
    }
}
