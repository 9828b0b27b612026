//! Integration tests for signal-dedup.
#![allow(
    clippy::panic,
    clippy::too_many_lines,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown
)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::sync::Arc;

use signal_dedup::Error;
use signal_dedup::models::{ContentItem, ItemId};
use signal_dedup::services::deduplication::{
    ContentHasher, DedupLayer, DedupProfile, DeduplicationPipeline, DeduplicationService,
    Deduplicator, Fingerprinter, InMemoryItemSource, PreparedContentCache, ThresholdConfig,
    TitleSimilarityScorer,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 15, 16, 30, 0).unwrap()
}

fn pipeline() -> DeduplicationPipeline {
    DeduplicationPipeline::new()
}

// ============================================================================
// Acceptance scenarios
// ============================================================================

#[test]
fn test_whitespace_variants_hash_equal() {
    let a = ContentHasher::hash("Apple Inc. reported quarterly earnings...");
    let b = ContentHasher::hash("  Apple Inc.  reported quarterly earnings...   ");
    assert_eq!(a, b);
}

#[test]
fn test_reworded_titles_are_similar() {
    let score = TitleSimilarityScorer::similarity(
        "Apple Stock Rises 5% After Strong Quarterly Earnings",
        "Apple Stock Rises 5% Following Strong Quarterly Earnings",
    );
    assert!(score >= 0.70, "score was {score}");
}

#[test]
fn test_unrelated_titles_are_dissimilar() {
    let score = TitleSimilarityScorer::similarity(
        "Apple Stock Rises 5% on Strong Earnings",
        "Tesla Misses Delivery Targets, Stock Falls",
    );
    assert!(score < 0.50, "score was {score}");
}

#[test]
fn test_same_content_two_sources_flags_layers_one_and_two() {
    let text = "Apple Inc. reported quarterly earnings above expectations.";
    let window = vec![ContentItem::new(text, "reuters", now()).with_id("r-1")];
    let candidate = ContentItem::new(text, "yahoo-finance", now());

    let decision = pipeline().run(&candidate, &window, &ThresholdConfig::default());

    assert!(decision.is_duplicate);
    assert!(decision.layer(DedupLayer::Layer1).is_duplicate);
    assert!(decision.layer(DedupLayer::Layer2).is_duplicate);
    assert_eq!(decision.matched_item_id, Some(ItemId::new("r-1")));
    assert!(Fingerprinter::is_cross_source_duplicate(&candidate, &window[0]));
}

#[test]
fn test_sequential_price_ticks_stay_distinct() {
    let a = "AAPL: $175.25 (+2.3%)";
    let b = "AAPL: $175.50 (+2.4%)";
    assert_ne!(ContentHasher::hash(a), ContentHasher::hash(b));

    let window = vec![ContentItem::new(a, "ticker", now() - TimeDelta::minutes(1))];
    let candidate = ContentItem::new(b, "ticker", now());
    let decision = pipeline().run(&candidate, &window, &ThresholdConfig::default());

    assert!(!decision.is_duplicate);
}

// ============================================================================
// Pipeline properties
// ============================================================================

#[test]
fn test_run_is_idempotent() {
    let window = vec![
        ContentItem::new("Fed holds rates steady at 5.25%.", "wsj", now()).with_id("a"),
        ContentItem::new("Crude inventories fell by 3 million barrels.", "eia", now())
            .with_id("b")
            .with_title("Crude Inventories Fall Sharply"),
    ];
    let candidate = ContentItem::new("The Fed holds rates steady at 5.25% again.", "ft", now())
        .with_id("c")
        .with_title("Fed Holds Rates Steady");
    let config = ThresholdConfig::aggressive();

    let first = pipeline().run(&candidate, &window, &config);
    let second = pipeline().run(&candidate, &window, &config);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_empty_items_are_never_duplicates() {
    let window = vec![ContentItem::new("   ", "a", now()).with_id("blank")];
    let candidate = ContentItem::new("", "b", now());

    let decision = pipeline().run(&candidate, &window, &ThresholdConfig::default());

    assert!(!decision.is_duplicate);
    assert!(decision.layers.iter().all(|r| !r.applicable));
}

#[test]
fn test_breakdown_is_in_canonical_order() {
    let window = vec![ContentItem::new("Gold rallies", "a", now())];
    let candidate = ContentItem::new("Silver slumps", "b", now());

    let decision = pipeline().run(&candidate, &window, &ThresholdConfig::default());

    let order: Vec<DedupLayer> = decision.layers.iter().map(|r| r.layer).collect();
    assert_eq!(order, DedupLayer::ALL.to_vec());
    for comparison in &decision.comparisons {
        let order: Vec<DedupLayer> = comparison.results.iter().map(|r| r.layer).collect();
        assert_eq!(order, DedupLayer::ALL.to_vec());
    }
}

#[test]
fn test_window_excludes_items_outside_hours_back() {
    let text = "Lithium miners extend losses.";
    let window = vec![
        ContentItem::new(text, "a", now() - TimeDelta::hours(73)).with_id("stale"),
        ContentItem::new(text, "a", now() + TimeDelta::hours(80)).with_id("future"),
    ];
    let candidate = ContentItem::new(text, "b", now());

    let default = pipeline().run(&candidate, &window, &ThresholdConfig::default());
    assert!(!default.is_duplicate);
    assert!(default.comparisons.is_empty());

    let aggressive = pipeline().run(&candidate, &window, &ThresholdConfig::aggressive());
    assert_eq!(aggressive.comparisons.len(), 2);
    assert_eq!(aggressive.matched_item_id, Some(ItemId::new("stale")));
}

#[test]
fn test_aggressive_profile_catches_rewrites_default_misses() {
    let window = vec![
        ContentItem::new(
            "Shares of Nvidia climbed after the chipmaker posted record datacenter revenue.",
            "reuters",
            now(),
        )
        .with_id("nv-1")
        .with_title("Nvidia Shares Climb After Record Datacenter Revenue"),
    ];
    let candidate = ContentItem::new(
        "Nvidia shares climbed after the chipmaker reported record datacenter revenue.",
        "marketwatch",
        now(),
    )
    .with_title("Nvidia Shares Climb Following Record Datacenter Revenue");

    let default = pipeline().run(&candidate, &window, &ThresholdConfig::default());
    let aggressive = pipeline().run(&candidate, &window, &ThresholdConfig::aggressive());

    assert!(!default.is_duplicate);
    assert!(aggressive.is_duplicate);
    assert!(aggressive.layer(DedupLayer::Layer3).is_duplicate);
    assert!(
        aggressive.layer(DedupLayer::Layer3).confidence
            >= DedupProfile::Aggressive.config().title_similarity_threshold()
    );
}

// ============================================================================
// Service
// ============================================================================

#[test]
fn test_service_end_to_end_with_cache() {
    let source = Arc::new(InMemoryItemSource::new().anchored_at(now()));
    source
        .insert(
            ContentItem::new("OPEC+ agreed to extend output cuts into 2025.", "bloomberg", now())
                .with_id("opec-1"),
        )
        .unwrap();
    source
        .insert(
            ContentItem::new(
                "Natural gas fell 6% on mild weather forecasts.",
                "reuters",
                now() - TimeDelta::hours(2),
            )
            .with_id("ng-1"),
        )
        .unwrap();

    let service = DeduplicationService::new(Arc::clone(&source))
        .with_cache(PreparedContentCache::new(PreparedContentCache::DEFAULT_CAPACITY).unwrap());
    let deduplicator: &dyn Deduplicator = &service;
    let config = ThresholdConfig::default();

    let repeat = ContentItem::new(
        "  OPEC+ agreed to extend output cuts into 2025. ",
        "cnbc",
        now(),
    );
    let decision = deduplicator.check_duplicate(&repeat, &config).unwrap();
    assert!(decision.is_duplicate);
    assert_eq!(decision.matched_item_id, Some(ItemId::new("opec-1")));
    assert_eq!(
        decision.matched_layers(),
        vec![DedupLayer::Layer1, DedupLayer::Layer2, DedupLayer::Layer4]
    );

    let fresh = ContentItem::new("Cocoa futures hit a new all-time high.", "ft", now());
    let decision = deduplicator.check_duplicate(&fresh, &config).unwrap();
    assert!(!decision.is_duplicate);
    assert_eq!(decision.comparisons.len(), 2);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_file_selects_profile_with_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dedup.toml");
    std::fs::write(
        &path,
        "[dedup]\nprofile = \"aggressive\"\ndedup_hours_back = 24\n",
    )
    .unwrap();

    let config = ThresholdConfig::load_from_file(&path).unwrap();
    let aggressive = ThresholdConfig::aggressive();

    assert_eq!(config.dedup_hours_back(), 24);
    assert!(
        (config.title_similarity_threshold() - aggressive.title_similarity_threshold()).abs()
            < f64::EPSILON
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = ThresholdConfig::new(1.5, 0.7, 72).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));
    assert!(err.to_string().contains("title_similarity_threshold"));
}
