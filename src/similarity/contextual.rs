//! Contextual association kernel (spec.md §4.1): per-bucket metadata
//! key-set overlap plus type-match and importance-closeness bonuses.

use crate::types::{Metadata, MemoryType};

/// For each of the three typed metadata buckets, `0.3 * (|common keys| /
/// |total keys|)` (a value-agnostic key-set Jaccard), summed across all
/// three buckets (up to 0.9), +0.2 if both memories share the same
/// [`MemoryType`], +0.2 * (1 - |imp1 - imp2|) when both importance scores
/// are known. Capped at 1.0. Matches
/// `similarity_analyzers.py`'s `_calculate_contextual_association`, which
/// sums a per-bucket key overlap ratio rather than pooling one
/// value-matching ratio across all buckets.
pub fn contextual_association(
    meta_a: &Metadata,
    meta_b: &Metadata,
    type_a: MemoryType,
    type_b: MemoryType,
    importance_a: Option<f64>,
    importance_b: Option<f64>,
) -> f64 {
    let mut score = 0.0;

    for ((_, bucket_a), (_, bucket_b)) in meta_a.buckets().iter().zip(meta_b.buckets().iter()) {
        let keys_a: std::collections::HashSet<&String> = bucket_a.keys().collect();
        let keys_b: std::collections::HashSet<&String> = bucket_b.keys().collect();
        let common = keys_a.intersection(&keys_b).count();
        let total = keys_a.union(&keys_b).count();
        if common > 0 && total > 0 {
            score += 0.3 * (common as f64 / total as f64);
        }
    }

    if type_a == type_b {
        score += 0.2;
    }

    if let (Some(a), Some(b)) = (importance_a, importance_b) {
        score += 0.2 * (1.0 - (a - b).abs()).max(0.0);
    }

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetadataValue;

    fn metadata_with(key: &str, value: &str) -> Metadata {
        let mut m = Metadata::default();
        m.semantic_metadata
            .insert(key.to_string(), MetadataValue::String(value.to_string()));
        m
    }

    fn metadata_with_buckets(semantic_key: &str, episodic_key: &str) -> Metadata {
        let mut m = Metadata::default();
        m.semantic_metadata
            .insert(semantic_key.to_string(), MetadataValue::String("v".to_string()));
        m.episodic_metadata
            .insert(episodic_key.to_string(), MetadataValue::String("v".to_string()));
        m
    }

    #[test]
    fn same_type_adds_bonus() {
        let empty = Metadata::default();
        let with_type = contextual_association(
            &empty,
            &empty,
            MemoryType::Episodic,
            MemoryType::Episodic,
            None,
            None,
        );
        let without_type = contextual_association(
            &empty,
            &empty,
            MemoryType::Episodic,
            MemoryType::Semantic,
            None,
            None,
        );
        assert!(with_type > without_type);
    }

    #[test]
    fn close_importance_scores_higher() {
        let empty = Metadata::default();
        let close = contextual_association(
            &empty,
            &empty,
            MemoryType::Semantic,
            MemoryType::Semantic,
            Some(0.8),
            Some(0.8),
        );
        let far = contextual_association(
            &empty,
            &empty,
            MemoryType::Semantic,
            MemoryType::Semantic,
            Some(0.9),
            Some(0.1),
        );
        assert!(close > far);
    }

    #[test]
    fn metadata_agreement_contributes() {
        let a = metadata_with("project", "memnexus");
        let b = metadata_with("project", "memnexus");
        let none = Metadata::default();
        let agree = contextual_association(
            &a,
            &b,
            MemoryType::Semantic,
            MemoryType::Semantic,
            None,
            None,
        );
        let disagree = contextual_association(
            &a,
            &none,
            MemoryType::Semantic,
            MemoryType::Semantic,
            None,
            None,
        );
        assert!(agree > disagree);
    }

    #[test]
    fn agreement_across_multiple_buckets_sums() {
        let a = metadata_with_buckets("project", "session");
        let b = metadata_with_buckets("project", "session");
        let one_bucket = metadata_with("project", "memnexus");
        let combined = contextual_association(
            &a,
            &b,
            MemoryType::Semantic,
            MemoryType::Semantic,
            None,
            None,
        );
        let single = contextual_association(
            &one_bucket,
            &one_bucket,
            MemoryType::Semantic,
            MemoryType::Semantic,
            None,
            None,
        );
        assert!(combined > single);
    }

    #[test]
    fn capped_at_one() {
        let a = metadata_with("project", "memnexus");
        let score = contextual_association(
            &a,
            &a,
            MemoryType::Semantic,
            MemoryType::Semantic,
            Some(0.5),
            Some(0.5),
        );
        assert!(score <= 1.0);
    }
}
