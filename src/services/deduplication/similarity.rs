//! Set similarity shared by the title and phrase scorers.

use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

/// Jaccard index `|A ∩ B| / |A ∪ B|`.
///
/// Returns `0.0` when both sets are empty. Symmetric, and linear in the size
/// of the smaller set.
///
/// # Example
///
/// ```rust
/// use signal_dedup::services::deduplication::jaccard_similarity;
/// use std::collections::HashSet;
///
/// let a: HashSet<&str> = ["apple", "stock", "rises"].into_iter().collect();
/// let b: HashSet<&str> = ["apple", "stock", "falls"].into_iter().collect();
/// assert!((jaccard_similarity(&a, &b) - 0.5).abs() < f64::EPSILON);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)] // Set sizes stay far below 2^52
pub fn jaccard_similarity<T, S>(a: &HashSet<T, S>, b: &HashSet<T, S>) -> f64
where
    T: Eq + Hash,
    S: BuildHasher,
{
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = small.iter().filter(|item| large.contains(*item)).count();
    let union = a.len() + b.len() - intersection;

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}
