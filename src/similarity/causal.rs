//! Causal cue kernel (spec.md §4.1): counts causal connectives in either
//! text, plus a timestamp-ordering bonus.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

const CAUSAL_WORDS: &[&str] = &[
    "because",
    "due to",
    "caused by",
    "results in",
    "leads to",
    "triggers",
    "enables",
    "prevents",
    "influences",
    "affects",
    "therefore",
    "consequently",
    "as a result",
    "thus",
];

static CAUSAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    CAUSAL_WORDS
        .iter()
        .map(|w| Regex::new(&format!(r"\b{}\b", regex::escape(w))).unwrap())
        .collect()
});

/// Each causal connective found in either text contributes 0.2. If both
/// timestamps are known and differ, add 0.1. Capped at 1.0.
pub fn causal_cue(
    a: &str,
    b: &str,
    t1: Option<DateTime<Utc>>,
    t2: Option<DateTime<Utc>>,
) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (a_lower, b_lower) = (a.to_lowercase(), b.to_lowercase());

    let mut score = 0.0;
    for pattern in CAUSAL_PATTERNS.iter() {
        if pattern.is_match(&a_lower) || pattern.is_match(&b_lower) {
            score += 0.2;
        }
    }

    if let (Some(t1), Some(t2)) = (t1, t2) {
        if t1 != t2 {
            score += 0.1;
        }
    }

    score.min(1.0)
}
