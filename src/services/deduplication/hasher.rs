//! Content hashing for Layer 1 exact-match detection.
//!
//! Content is normalized before hashing so republications that differ only
//! by spacing, capitalization, or link targets produce the same digest.

use sha2::{Digest, Sha256};

use super::normalizer::Normalizer;

/// Content hasher for deduplication.
///
/// Produces lowercase hex SHA256 digests of normalized content. Two inputs
/// hash equal exactly when they normalize equal.
///
/// # Example
///
/// ```rust
/// use signal_dedup::services::deduplication::ContentHasher;
///
/// let hash = ContentHasher::hash("Apple Inc. reported quarterly earnings...");
/// assert_eq!(hash.len(), 64);
///
/// let hash2 = ContentHasher::hash("  Apple Inc.  reported quarterly earnings...   ");
/// assert_eq!(hash, hash2);
/// ```
pub struct ContentHasher;

impl ContentHasher {
    /// Computes the SHA256 hash of normalized content.
    ///
    /// # Returns
    ///
    /// The lowercase hex-encoded SHA256 hash (64 characters). Empty input
    /// still yields a well-defined digest.
    #[must_use]
    pub fn hash(content: &str) -> String {
        Self::hash_normalized(&Normalizer::normalize(content))
    }

    /// Hashes text that has already been through [`Normalizer::normalize`].
    #[must_use]
    pub fn hash_normalized(normalized: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Layer 1 verdict: true when both texts normalize to the same string.
    ///
    /// Text that normalizes to nothing carries no evidence, so empty or
    /// whitespace-only input never matches.
    #[must_use]
    pub fn is_exact_match(a: &str, b: &str) -> bool {
        let (a, b) = (Normalizer::normalize(a), Normalizer::normalize(b));
        !a.is_empty() && !b.is_empty() && Self::hash_normalized(&a) == Self::hash_normalized(&b)
    }
}
