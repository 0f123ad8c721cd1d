//! Exact-match duplicate detector (spec.md §4.5): content-hash buckets.

use std::collections::HashMap;

use crate::types::Memory;

use super::DuplicateGroup;

/// Groups memories whose trimmed content hashes identically. Blake3
/// substitutes for the spec's literal MD5 — both are used here purely as
/// content fingerprints, not for any collision-resistance property tied
/// to a specific algorithm.
pub fn detect_exact(memories: &[Memory]) -> Vec<DuplicateGroup> {
    let mut buckets: HashMap<[u8; 32], Vec<&Memory>> = HashMap::new();

    for memory in memories {
        let hash = blake3::hash(memory.content.trim().as_bytes());
        buckets.entry(*hash.as_bytes()).or_default().push(memory);
    }

    buckets
        .into_values()
        .filter(|bucket| bucket.len() >= 2)
        .map(|bucket| {
            let memory_ids: Vec<String> = bucket.iter().map(|m| m.id.clone()).collect();
            let similarity_scores = vec![1.0; bucket.len()];
            let confidence = average_metadata_agreement(&bucket);
            DuplicateGroup::new(memory_ids, similarity_scores, "exact", confidence)
        })
        .collect()
}

fn average_metadata_agreement(bucket: &[&Memory]) -> f64 {
    if bucket.len() < 2 {
        return 1.0;
    }
    let mut total = 0.0;
    let mut pairs = 0;
    for i in 0..bucket.len() {
        for j in (i + 1)..bucket.len() {
            total += bucket[i].metadata.agreement_ratio(&bucket[j].metadata);
            pairs += 1;
        }
    }
    if pairs == 0 {
        1.0
    } else {
        total / pairs as f64
    }
}
