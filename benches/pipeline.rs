//! Benchmarks for the deduplication pipeline.
//!
//! Benchmark targets:
//! - Single pair comparison: <50µs
//! - 1,000-item window: <50ms
//!
//! Covers normalization, hashing, token extraction and the four layers, with
//! and without the prepared-content cache.

// Criterion macros generate items without docs - this is expected for benchmarks
// Benchmarks use expect/unwrap for simplicity - panics are acceptable in benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

use signal_dedup::models::ContentItem;
use signal_dedup::services::deduplication::{
    DeduplicationPipeline, DeduplicationService, InMemoryItemSource, PreparedContentCache,
    ThresholdConfig,
};

// ============================================================================
// Helper Functions
// ============================================================================

const TICKERS: [&str; 6] = ["AAPL", "MSFT", "NVDA", "TSLA", "AMZN", "GOOG"];

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap()
}

/// Builds a window of distinct, realistic-looking articles.
fn window(size: usize) -> Vec<ContentItem> {
    (0..size)
        .map(|i| {
            let ticker = TICKERS[i % TICKERS.len()];
            let text = format!(
                "Shares of {ticker} moved {}.{}% in session {i} as analysts at Morgan Stanley \
                 revised guidance. Read more at https://news.example.com/{i}",
                i % 9,
                i % 7
            );
            let published_at = anchor() - TimeDelta::minutes(i64::try_from(i).unwrap());
            ContentItem::new(text, format!("source-{}", i % 5), published_at)
                .with_id(format!("item-{i}"))
                .with_title(format!("{ticker} Moves After Guidance Revision {i}"))
        })
        .collect()
}

fn candidate() -> ContentItem {
    ContentItem::new(
        "Shares of NVDA rallied 4.2% as analysts at Goldman Sachs raised targets.",
        "wire",
        anchor(),
    )
    .with_title("NVDA Rallies After Target Raise")
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_pair(c: &mut Criterion) {
    let pipeline = DeduplicationPipeline::new();
    let config = ThresholdConfig::default();
    let window = window(1);
    let candidate = candidate();

    c.bench_function("dedup_single_pair", |b| {
        b.iter(|| pipeline.run(black_box(&candidate), black_box(&window), &config));
    });
}

fn bench_window_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("dedup_window");
    let pipeline = DeduplicationPipeline::new();
    let config = ThresholdConfig::default();
    let candidate = candidate();

    for size in [10usize, 100, 1_000] {
        let items = window(size);
        group.bench_with_input(BenchmarkId::new("uncached", size), &items, |b, items| {
            b.iter(|| pipeline.run(black_box(&candidate), black_box(items), &config));
        });

        let source = Arc::new(InMemoryItemSource::with_items(items.clone()).anchored_at(anchor()));
        let service = DeduplicationService::new(source)
            .with_cache(PreparedContentCache::new(size).unwrap());
        group.bench_function(BenchmarkId::new("cached_service", size), |b| {
            b.iter(|| service.check(black_box(&candidate), &config).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pair, bench_window_sizes);
criterion_main!(benches);
