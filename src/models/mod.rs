//! Data models for signal deduplication.
//!
//! Content items are created by the crawler and only ever read here.

mod item;

pub use item::{ContentItem, ItemId};
