//! Content-quality heuristic (spec.md §4.3, `content_quality`).

use regex::Regex;
use std::sync::LazyLock;

use crate::config::QualityIndicators;

static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```|`[^`]+`").unwrap());
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static LIST_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*(\d+\.\s|-\s|\*\s)").unwrap());
static TECHNICAL_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(API|SQL|JSON|HTTP|algorithm|function|class|method)\b").unwrap()
});

const COMPLEXITY_WORDS: &[&str] = &["implementation", "architecture", "optimization", "integration"];

/// Heuristic content-richness score in `[0, 1]`.
pub fn content_quality(content: &str, indicators: &QualityIndicators) -> f64 {
    if content.trim().len() < 10 {
        return 0.1;
    }

    let mut score = 0.3;

    if content.len() >= indicators.min_length {
        score += 0.1;
    }
    if content.len() >= indicators.rich_length {
        score += 0.1;
    }
    if CODE_PATTERN.is_match(content) {
        score += 0.15;
    }
    if URL_PATTERN.is_match(content) {
        score += 0.1;
    }
    if LIST_PATTERN.is_match(content) {
        score += 0.1;
    }

    let tech_matches = TECHNICAL_TERMS.find_iter(content).count();
    score += (tech_matches as f64 * 0.02).min(0.1);

    let content_lower = content.to_lowercase();
    let complexity_matches = COMPLEXITY_WORDS
        .iter()
        .filter(|w| content_lower.contains(**w))
        .count();
    score += (complexity_matches as f64 * 0.03).min(0.1);

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators() -> QualityIndicators {
        QualityIndicators::default()
    }

    #[test]
    fn short_content_is_low_quality() {
        assert_eq!(content_quality("hi", &indicators()), 0.1);
    }

    #[test]
    fn code_and_links_raise_score() {
        let plain = content_quality(&"a".repeat(60), &indicators());
        let rich = content_quality(
            &format!("{} ```fn main() {{}}``` see https://example.com", "a".repeat(60)),
            &indicators(),
        );
        assert!(rich > plain);
    }

    #[test]
    fn capped_at_one() {
        let content = format!(
            "{} ```code``` https://x.com - item 1. item implementation architecture optimization integration API SQL JSON HTTP algorithm function class method",
            "a".repeat(200)
        );
        assert!(content_quality(&content, &indicators()) <= 1.0);
    }
}
