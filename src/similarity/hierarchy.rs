//! Hierarchy cue kernel (spec.md §4.1): rule-based detection of
//! definition/example, concept/instance, general/specific, category/item,
//! overview/detail, and summary/elaboration pairings.

use regex::Regex;
use std::sync::LazyLock;

static HIERARCHY_PAIRS: LazyLock<Vec<(Regex, Regex)>> = LazyLock::new(|| {
    let pairs = [
        (r"\bdefinition\b", r"\bexample\b"),
        (r"\bconcept\b", r"\binstance\b"),
        (r"\bgeneral\b", r"\bspecific\b"),
        (r"\bcategory\b", r"\bitem\b"),
        (r"\boverview\b", r"\bdetail\b"),
        (r"\bsummary\b", r"\belaboration\b"),
    ];
    pairs
        .into_iter()
        .map(|(a, b)| (Regex::new(a).unwrap(), Regex::new(b).unwrap()))
        .collect()
});

/// Each matched ordered pair (either direction) contributes 0.3. A
/// significant length ratio (`min/max < 0.5`) adds 0.2. Capped at 1.0.
pub fn hierarchy_cue(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (a_lower, b_lower) = (a.to_lowercase(), b.to_lowercase());

    let mut score = 0.0;
    for (parent, child) in HIERARCHY_PAIRS.iter() {
        let a_to_b = parent.is_match(&a_lower) && child.is_match(&b_lower);
        let b_to_a = child.is_match(&a_lower) && parent.is_match(&b_lower);
        if a_to_b || b_to_a {
            score += 0.3;
        }
    }

    let (shorter, longer) = if a.len() <= b.len() {
        (a.len(), b.len())
    } else {
        (b.len(), a.len())
    };
    if longer > 0 && (shorter as f64 / longer as f64) < 0.5 {
        score += 0.2;
    }

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_example_pair_scores() {
        let a = "The definition of a monad is a monoid in the category of endofunctors.";
        let b = "For example, Option is a monad.";
        assert!(hierarchy_cue(a, b) >= 0.3);
    }

    #[test]
    fn unrelated_content_is_zero() {
        let a = "Coffee tastes good in the morning";
        let b = "The weather today is sunny and warm";
        assert_eq!(hierarchy_cue(a, b), 0.0);
    }

    #[test]
    fn capped_at_one() {
        let a = "definition concept general category overview summary";
        let b = "example instance specific item detail elaboration";
        assert!(hierarchy_cue(a, b) <= 1.0);
    }
}
