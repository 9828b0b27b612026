//! Window supplier for the deduplication service.
//!
//! The engine's only storage-facing dependency. Production callers back it
//! with their signal store; tests use [`InMemoryItemSource`].

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::RwLock;

use crate::models::ContentItem;
use crate::{Error, Result};

/// Supplies the recent items a candidate is compared against.
///
/// Implementations report storage failures as [`Error::OperationFailed`].
pub trait RecentItemSource: Send + Sync {
    /// Returns items published within the last `hours_back` hours.
    ///
    /// The returned order is the order comparisons are reported in.
    fn find_recent(&self, hours_back: u32) -> Result<Vec<ContentItem>>;
}

/// In-memory window supplier.
///
/// Keeps items in insertion order. "Recent" is measured from the anchor
/// time when one is set, otherwise from the wall clock.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use signal_dedup::models::ContentItem;
/// use signal_dedup::services::deduplication::{InMemoryItemSource, RecentItemSource};
///
/// let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
/// let source = InMemoryItemSource::new().anchored_at(now);
/// source.insert(ContentItem::new("fresh", "wire", now)).unwrap();
///
/// assert_eq!(source.find_recent(24).unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryItemSource {
    items: RwLock<Vec<ContentItem>>,
    anchor: Option<DateTime<Utc>>,
}

impl InMemoryItemSource {
    /// Creates an empty source measured from the wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Measures recency from a fixed point in time.
    #[must_use]
    pub fn anchored_at(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Creates a source pre-filled with `items`.
    #[must_use]
    pub fn with_items(items: Vec<ContentItem>) -> Self {
        Self {
            items: RwLock::new(items),
            anchor: None,
        }
    }

    /// Appends an item.
    pub fn insert(&self, item: ContentItem) -> Result<()> {
        let mut items = self.items.write().map_err(|e| Error::OperationFailed {
            operation: "insert_item".to_string(),
            cause: e.to_string(),
        })?;
        items.push(item);
        Ok(())
    }

    /// Returns the number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecentItemSource for InMemoryItemSource {
    fn find_recent(&self, hours_back: u32) -> Result<Vec<ContentItem>> {
        let now = self.anchor.unwrap_or_else(Utc::now);
        // Windows reaching past the representable range keep everything
        let cutoff = now
            .checked_sub_signed(TimeDelta::hours(i64::from(hours_back)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let items = self.items.read().map_err(|e| Error::OperationFailed {
            operation: "find_recent".to_string(),
            cause: e.to_string(),
        })?;

        Ok(items
            .iter()
            .filter(|item| item.published_at() >= cutoff)
            .cloned()
            .collect())
    }
}
