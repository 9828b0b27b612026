//! Optional cache of prepared window items.
//!
//! Window items are compared against many candidates over their lifetime.
//! Caching their derived data (normalized text, hash, token sets) keyed by
//! item ID saves re-normalizing them on every check. The pipeline itself
//! never touches this cache; only [`super::DeduplicationService`] does.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};
use tracing::instrument;

use super::pipeline::PreparedContent;
use crate::models::{ContentItem, ItemId};
use crate::{Error, Result};

/// LRU cache of [`PreparedContent`] keyed by [`ItemId`].
///
/// Items are immutable, so an ID always maps to the same derived data. The
/// crawler is expected to assign IDs uniquely.
///
/// # Thread Safety
///
/// Uses `RwLock` for interior mutability. Lookups take the write lock since
/// a hit moves the entry to the most recently used position; `len` and
/// `capacity` take the read lock.
///
/// # Lock Poisoning
///
/// A poisoned lock behaves as a permanent miss: items are prepared on every
/// call and nothing is stored. Results are unaffected, only the saved work
/// is lost.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use signal_dedup::models::ContentItem;
/// use signal_dedup::services::deduplication::PreparedContentCache;
///
/// let cache = PreparedContentCache::new(1000).unwrap();
/// let item = ContentItem::new("Copper hit a record high", "wire", Utc::now());
///
/// let first = cache.get_or_prepare(&item);
/// let second = cache.get_or_prepare(&item);
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// ```
pub struct PreparedContentCache {
    cache: RwLock<LruCache<ItemId, Arc<PreparedContent>>>,
}

impl PreparedContentCache {
    /// Default number of cached items.
    pub const DEFAULT_CAPACITY: usize = 10_000;

    /// Creates a cache holding at most `capacity` items.
    pub fn new(capacity: usize) -> Result<Self> {
        let cap = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::InvalidInput("cache capacity must be > 0".to_string()))?;
        Ok(Self {
            cache: RwLock::new(LruCache::new(cap)),
        })
    }

    /// Returns the prepared form of `item`, preparing and storing it on a miss.
    #[instrument(skip_all, fields(operation = "prepared_cache_lookup", item_id = %item.id()))]
    pub fn get_or_prepare(&self, item: &ContentItem) -> Arc<PreparedContent> {
        // `get` promotes the entry, so hits need the write lock too
        let cached = self
            .cache
            .write()
            .ok()
            .and_then(|mut cache| cache.get(item.id()).cloned());

        if let Some(prepared) = cached {
            metrics::counter!("dedup_prepared_cache_total", "result" => "hit").increment(1);
            return prepared;
        }

        metrics::counter!("dedup_prepared_cache_total", "result" => "miss").increment(1);
        let prepared = Arc::new(PreparedContent::from_item(item));

        if let Ok(mut cache) = self.cache.write() {
            cache.put(item.id().clone(), Arc::clone(&prepared));
            #[allow(clippy::cast_precision_loss)]
            metrics::gauge!("dedup_prepared_cache_size").set(cache.len() as f64);
        } else {
            tracing::debug!("Prepared cache lock poisoned, skipping insert");
        }

        prepared
    }

    /// Returns the current number of cached items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of cached items.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cache.read().map(|c| c.cap().get()).unwrap_or(0)
    }

    /// Removes all cached items.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
            metrics::gauge!("dedup_prepared_cache_size").set(0.0);
        }
    }
}

impl std::fmt::Debug for PreparedContentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedContentCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
