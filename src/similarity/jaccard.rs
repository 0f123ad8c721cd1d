//! Content-overlap kernel: Jaccard similarity over tokenized word sets
//! (spec.md §4.1).

use std::collections::HashSet;

use super::tokens::tokenize;

/// Jaccard similarity over the tokenized word sets of `a` and `b`.
/// `jacc(a, a) == 1` for any non-empty `a`; symmetric; 0 for disjoint
/// token sets (spec.md §8 property 4).
pub fn content_overlap(a: &str, b: &str) -> f64 {
    let wa: HashSet<String> = tokenize(a).into_iter().collect();
    let wb: HashSet<String> = tokenize(b).into_iter().collect();

    if wa.is_empty() || wb.is_empty() {
        tracing::debug!("content_overlap: no meaningful tokens");
        return 0.0;
    }

    let intersection = wa.intersection(&wb).count();
    let union = wa.union(&wb).count();
    if union == 0 {
        0.0
    } else {
        (intersection as f64 / union as f64).clamp(0.0, 1.0)
    }
}
