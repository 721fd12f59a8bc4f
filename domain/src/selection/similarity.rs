//! Tag-set similarity.

use std::collections::BTreeSet;

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`.
///
/// Defined as `0.0` when both sets are empty, so two untagged experts are
/// never considered redundant with each other.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}
