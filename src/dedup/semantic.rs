//! Semantic duplicate detector (spec.md §4.5): keyword-Jaccard over
//! content words, blended with metadata and structural similarity.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::config::DeduplicationConfig;
use crate::types::Memory;

use super::composite::{metadata_similarity, structural_similarity};
use super::{consolidate_transitively, DuplicateGroup};

const STOP_WORDS: &[&str] = &[
    "this", "that", "these", "those", "with", "from", "your", "have", "there", "their", "about",
    "which", "when", "what", "where", "into", "over", "under", "such", "than", "then", "also",
    "been", "being", "were", "will", "would", "could", "should", "them", "they",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> = LazyLock::new(|| STOP_WORDS.iter().copied().collect());

fn keywords(content: &str) -> HashSet<String> {
    content
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 3 && !STOP_WORD_SET.contains(w))
        .map(|w| w.to_string())
        .collect()
}

fn keyword_jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// O(n^2) pairwise semantic comparison within a batch (spec.md §4.5,
/// "Semantic"). Despite the name, this is keyword-overlap based — the
/// embedding-driven axis lives in the relationship analyzer, not here.
pub fn detect_semantic(memories: &[Memory], cfg: &DeduplicationConfig) -> Vec<DuplicateGroup> {
    let keyword_sets: Vec<HashSet<String>> = memories.iter().map(|m| keywords(&m.content)).collect();

    let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
    for i in 0..memories.len() {
        for j in (i + 1)..memories.len() {
            let content_sim = keyword_jaccard(&keyword_sets[i], &keyword_sets[j]);
            let metadata_sim = metadata_similarity(&memories[i], &memories[j]);
            let structural_sim = structural_similarity(&memories[i], &memories[j]);
            let composite = content_sim * cfg.content_weight + metadata_sim * cfg.metadata_weight + structural_sim * cfg.structural_weight;
            if composite >= cfg.similarity_threshold {
                pairs.push((i, j, composite));
            }
        }
    }

    if pairs.is_empty() {
        return Vec::new();
    }

    consolidate_transitively(memories, &pairs, "semantic")
}
