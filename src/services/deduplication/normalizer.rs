//! Text normalization applied before any hashing or tokenizing.

// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use regex::Regex;
use std::sync::LazyLock;

/// Token substituted for every URL-shaped substring.
pub const URL_TOKEN: &str = "[URL]";

/// Matches `scheme://...` up to the next whitespace.
///
/// Runs after lower-casing, so the scheme class only needs lower-case letters.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-z][a-z0-9+.\-]*://\S+").expect("static regex: url")
});

/// Canonicalizes raw text so that republications differing only by spacing,
/// capitalization, or embedded link targets compare equal.
///
/// # Normalization
///
/// Steps run in this exact order:
/// 1. Collapse consecutive whitespace into a single space and trim
/// 2. Lower-case all characters
/// 3. Replace every `scheme://...` substring with `[URL]`
///
/// # Example
///
/// ```rust
/// use signal_dedup::services::deduplication::Normalizer;
///
/// let normalized = Normalizer::normalize("  Read MORE at  https://example.com/a?b=1  ");
/// assert_eq!(normalized, "read more at [URL]");
/// ```
pub struct Normalizer;

impl Normalizer {
    /// Normalizes raw text.
    ///
    /// Empty or whitespace-only input yields an empty string.
    #[must_use]
    pub fn normalize(raw: &str) -> String {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let lowered = collapsed.to_lowercase();
        URL_PATTERN.replace_all(&lowered, URL_TOKEN).into_owned()
    }
}
