//! Shared tokenization for the content-overlap, hierarchy, and dedup
//! kernels (spec.md §4.1: "lowercased, stop-word-filtered,
//! punctuation-stripped word tokens of length >= 3").

/// Fixed stop-word set, matching the original analyzer's list.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were",
];

/// Lowercase, strip punctuation, split on whitespace, keep tokens of
/// length >= 3 that aren't stop words.
pub fn tokenize(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    content
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 3)
        .filter(|w| !STOP_WORDS.contains(w))
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_stop_words_and_short_tokens() {
        let tokens = tokenize("The cat is on a mat, by the big red door.");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
        assert!(!tokens.contains(&"on".to_string()));
        assert!(tokens.contains(&"cat".to_string()));
        assert!(tokens.contains(&"mat".to_string()));
        assert!(tokens.contains(&"red".to_string()));
        assert!(tokens.contains(&"door".to_string()));
    }

    #[test]
    fn empty_content_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }
}
