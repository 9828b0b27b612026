//! Content item types and identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a content item.
///
/// Assigned by the crawler that fetched the item. The engine only compares
/// identifiers, it never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new item ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh, time-ordered ID (`UUIDv7`).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A fetched piece of content: an article, a press release, a price update.
///
/// Immutable once created. Fields are only reachable through accessors, and
/// the `with_*` methods consume the item and return a new one.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use signal_dedup::models::ContentItem;
///
/// let published = Utc.with_ymd_and_hms(2024, 5, 2, 14, 30, 0).unwrap();
/// let item = ContentItem::new("Apple Inc. reported quarterly earnings", "reuters", published)
///     .with_title("Apple Beats Estimates");
///
/// assert_eq!(item.source(), "reuters");
/// assert_eq!(item.title(), Some("Apple Beats Estimates"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    id: ItemId,
    raw_text: String,
    source: String,
    published_at: DateTime<Utc>,
    title: Option<String>,
}

impl ContentItem {
    /// Creates an untitled item with a generated ID.
    #[must_use]
    pub fn new(
        raw_text: impl Into<String>,
        source: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ItemId::generate(),
            raw_text: raw_text.into(),
            source: source.into(),
            published_at,
            title: None,
        }
    }

    /// Replaces the generated ID with a crawler-assigned one.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    /// Attaches a title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns the item ID.
    #[must_use]
    pub const fn id(&self) -> &ItemId {
        &self.id
    }

    /// Returns the raw, unnormalized body text.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Returns the outlet or feed the item came from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the publication timestamp.
    #[must_use]
    pub const fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    /// Returns the title, if the source provided one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}
