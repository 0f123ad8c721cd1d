//! Fuzzy-match duplicate detector (spec.md §4.5): tokens + positional
//! string similarity blended with metadata and structural similarity.

use std::collections::HashSet;

use crate::config::DeduplicationConfig;
use crate::types::Memory;

use super::composite::{metadata_similarity, positional_char_similarity, preprocess, structural_similarity};
use super::{consolidate_transitively, DuplicateGroup};

fn tokens(processed: &str) -> HashSet<&str> {
    processed.split_whitespace().collect()
}

fn pairwise_similarity(a: &Memory, b: &Memory, processed_a: &str, processed_b: &str, cfg: &DeduplicationConfig) -> f64 {
    let (tokens_a, tokens_b) = (tokens(processed_a), tokens(processed_b));
    let union = tokens_a.union(&tokens_b).count();
    let jaccard = if union == 0 {
        0.0
    } else {
        tokens_a.intersection(&tokens_b).count() as f64 / union as f64
    };

    let string_similarity = if processed_a.is_empty() && processed_b.is_empty() {
        1.0
    } else if processed_a.is_empty() || processed_b.is_empty() {
        0.0
    } else {
        positional_char_similarity(processed_a, processed_b)
    };

    let content_similarity = (jaccard + string_similarity) / 2.0;
    let metadata_sim = metadata_similarity(a, b);
    let structural_sim = structural_similarity(a, b);

    content_similarity * cfg.content_weight + metadata_sim * cfg.metadata_weight + structural_sim * cfg.structural_weight
}

/// O(n^2) pairwise fuzzy comparison within a batch; groups merged
/// transitively via shared memory ids (spec.md §4.5, "Fuzzy").
pub fn detect_fuzzy(memories: &[Memory], cfg: &DeduplicationConfig) -> Vec<DuplicateGroup> {
    let processed: Vec<String> = memories.iter().map(|m| preprocess(&m.content)).collect();

    let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
    for i in 0..memories.len() {
        for j in (i + 1)..memories.len() {
            let score = pairwise_similarity(&memories[i], &memories[j], &processed[i], &processed[j], cfg);
            if score >= cfg.fuzzy_threshold {
                pairs.push((i, j, score));
            }
        }
    }

    if pairs.is_empty() {
        return Vec::new();
    }

    consolidate_transitively(memories, &pairs, "fuzzy")
}
