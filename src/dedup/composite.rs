//! Shared composite-similarity helpers for the fuzzy and semantic
//! detectors (spec.md §4.5: "plus metadata and structural similarities").

use std::collections::HashMap;

use crate::types::{Memory, MetadataValue};

const FUZZY_FUNCTION_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should",
];

/// Collapse whitespace, strip punctuation, lowercase, and drop a fixed set
/// of function words (spec.md §4.5, "Fuzzy" preprocessing).
pub fn preprocess(content: &str) -> String {
    let lowered = content.to_lowercase();
    let stripped: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();
    let words: Vec<&str> = stripped
        .split_whitespace()
        .filter(|w| !FUZZY_FUNCTION_WORDS.contains(w))
        .collect();
    words.join(" ")
}

/// Character-positional similarity blended with a length-closeness term
/// (spec.md §4.5, "positional-character similarity").
pub fn positional_char_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let (a_chars, b_chars): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
    let max_len = a_chars.len().max(b_chars.len());
    if max_len == 0 {
        return 1.0;
    }

    let matches = a_chars
        .iter()
        .zip(b_chars.iter())
        .filter(|(x, y)| x == y)
        .count();
    let length_similarity = 1.0 - (a_chars.len() as f64 - b_chars.len() as f64).abs() / max_len as f64;

    (matches as f64 / max_len as f64 + length_similarity) / 2.0
}

fn flatten_metadata(memory: &Memory) -> HashMap<&str, &MetadataValue> {
    let mut flat = HashMap::new();
    for (_, bucket) in memory.metadata.buckets() {
        for (k, v) in bucket.iter() {
            flat.insert(k.as_str(), v);
        }
    }
    flat
}

fn numeric_value(v: &MetadataValue) -> Option<f64> {
    match v {
        MetadataValue::Number(n) => Some(*n),
        _ => None,
    }
}

/// Fraction of the union of metadata keys that agree, with partial credit
/// for close numeric values (spec.md §4.5 / original's metadata
/// similarity heuristic, since spec.md is silent on the exact formula).
pub fn metadata_similarity(a: &Memory, b: &Memory) -> f64 {
    let flat_a = flatten_metadata(a);
    let flat_b = flatten_metadata(b);

    if flat_a.is_empty() && flat_b.is_empty() {
        return 1.0;
    }

    let all_keys: std::collections::HashSet<&str> = flat_a.keys().chain(flat_b.keys()).copied().collect();
    if all_keys.is_empty() {
        return 1.0;
    }

    let mut matches = 0.0;
    for key in &all_keys {
        match (flat_a.get(key), flat_b.get(key)) {
            (Some(v1), Some(v2)) if v1 == v2 => matches += 1.0,
            (Some(v1), Some(v2)) => {
                if let (Some(n1), Some(n2)) = (numeric_value(v1), numeric_value(v2)) {
                    let denom = n1.abs().max(n2.abs());
                    if denom > 0.0 {
                        let similarity = 1.0 - (n1 - n2).abs() / denom;
                        if similarity > 0.8 {
                            matches += similarity;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    matches / all_keys.len() as f64
}

/// Blend of content-length and word-count closeness (spec.md §4.5,
/// "structural similarities").
pub fn structural_similarity(a: &Memory, b: &Memory) -> f64 {
    let (len_a, len_b) = (a.content.len(), b.content.len());
    let length_similarity = if len_a == 0 && len_b == 0 {
        1.0
    } else {
        let max_len = len_a.max(len_b) as f64;
        1.0 - (len_a as f64 - len_b as f64).abs() / max_len
    };

    let (words_a, words_b) = (a.content.split_whitespace().count(), b.content.split_whitespace().count());
    let word_similarity = if words_a == 0 && words_b == 0 {
        1.0
    } else {
        let max_words = words_a.max(words_b) as f64;
        1.0 - (words_a as f64 - words_b as f64).abs() / max_words
    };

    (length_similarity + word_similarity) / 2.0
}
