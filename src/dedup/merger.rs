//! Memory Merger (spec.md §4.7): primary selection, metadata
//! consolidation, and conflict detection for a duplicate group.

use chrono::{DateTime, Utc};

use crate::config::MergeStrategy;
use crate::types::{Memory, Metadata, MetadataValue};

use super::{DuplicateGroup, MergeOperation};

/// The metadata `source` field lives in the free-form side-bag, not as a
/// dedicated `Memory` field — checked across all three typed buckets.
fn source_of(memory: &Memory) -> Option<&MetadataValue> {
    memory.metadata.buckets().iter().find_map(|(_, bucket)| bucket.get("source"))
}

/// Result of merging one group: the operation record plus the
/// consolidated metadata the caller should write back for the primary.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub operation: MergeOperation,
    pub primary_id: String,
    pub consolidated_importance: f64,
    pub consolidated_access_count: u64,
    pub consolidated_last_accessed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryMerger;

impl MemoryMerger {
    pub fn new() -> Self {
        Self
    }

    fn age_days(memory: &Memory, now: DateTime<Utc>) -> f64 {
        (now - memory.created_at).num_seconds() as f64 / 86_400.0
    }

    fn smart_merge_score(memory: &Memory, now: DateTime<Utc>) -> f64 {
        let content_term = (memory.content.len() as f64 / 1000.0).min(1.0);
        let metadata_term = (memory.metadata.entry_count() as f64 / 10.0).min(1.0);
        let recency_term = (1.0 - Self::age_days(memory, now) / 365.0).max(0.0);
        0.40 * memory.importance_score + 0.25 * content_term + 0.20 * metadata_term + 0.15 * recency_term
    }

    /// Select the primary memory in a group per the configured strategy
    /// (spec.md §4.7, "Primary selection").
    fn select_primary<'a>(&self, members: &'a [&Memory], strategy: MergeStrategy, now: DateTime<Utc>) -> &'a Memory {
        match strategy {
            MergeStrategy::KeepOldest => members.iter().min_by_key(|m| m.created_at).copied().unwrap(),
            MergeStrategy::KeepNewest => members.iter().max_by_key(|m| m.created_at).copied().unwrap(),
            MergeStrategy::KeepHighestImportance => members
                .iter()
                .max_by(|a, b| a.importance_score.partial_cmp(&b.importance_score).unwrap_or(std::cmp::Ordering::Equal))
                .copied()
                .unwrap(),
            MergeStrategy::SmartMerge => members
                .iter()
                .max_by(|a, b| {
                    Self::smart_merge_score(a, now)
                        .partial_cmp(&Self::smart_merge_score(b, now))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .copied()
                .unwrap(),
        }
    }

    /// Fields `{source, type, importance_score}` disagreeing between the
    /// primary and any duplicate are recorded, not blocking (spec.md §4.7,
    /// "Conflict detection").
    fn identify_conflicts(&self, primary: &Memory, duplicates: &[&Memory]) -> Vec<String> {
        let mut conflicts = Vec::new();
        for dup in duplicates {
            if source_of(primary) != source_of(dup) && !conflicts.contains(&"source".to_string()) {
                conflicts.push("source".to_string());
            }
            if primary.memory_type != dup.memory_type && !conflicts.contains(&"type".to_string()) {
                conflicts.push("type".to_string());
            }
            if (primary.importance_score - dup.importance_score).abs() > f64::EPSILON
                && !conflicts.contains(&"importance_score".to_string())
            {
                conflicts.push("importance_score".to_string());
            }
        }
        conflicts
    }

    /// Union tags/categories, sum access_count, take max last_accessed,
    /// and stamp provenance via `merged_from`/`merged_at` (spec.md §4.7,
    /// "Metadata consolidation", applies to every strategy).
    fn consolidate_metadata(&self, primary: &Memory, duplicates: &[&Memory], now: DateTime<Utc>) -> Metadata {
        let mut metadata = primary.metadata.clone();
        for dup in duplicates {
            metadata.tags.extend(dup.metadata.tags.iter().cloned());
            metadata.categories.extend(dup.metadata.categories.iter().cloned());
        }
        let merged_from: Vec<String> = duplicates.iter().map(|m| m.id.clone()).collect();
        metadata
            .semantic_metadata
            .insert("merged_from".to_string(), MetadataValue::List(merged_from));
        metadata
            .semantic_metadata
            .insert("merged_at".to_string(), MetadataValue::String(now.to_rfc3339()));
        metadata
    }

    /// Merge one duplicate group, returning `None` if the group has fewer
    /// than 2 members (nothing to merge).
    pub fn merge_group(&self, group: &DuplicateGroup, members: &[Memory], strategy: MergeStrategy, now: DateTime<Utc>) -> Option<MergeOutcome> {
        let members_ref: Vec<&Memory> = members.iter().filter(|m| group.memory_ids.contains(&m.id)).collect();
        if members_ref.len() < 2 {
            return None;
        }

        let primary = self.select_primary(&members_ref, strategy, now);
        let primary_id = primary.id.clone();
        let duplicates: Vec<&Memory> = members_ref.iter().filter(|m| m.id != primary_id).copied().collect();

        let conflicts = self.identify_conflicts(primary, &duplicates);
        let mut metadata = self.consolidate_metadata(primary, &duplicates, now);

        let consolidated_access_count: u64 = members_ref.iter().map(|m| m.access_count).sum();
        let consolidated_last_accessed_at = members_ref.iter().map(|m| m.last_accessed_at).max().unwrap_or(now);

        let consolidated_importance = if matches!(strategy, MergeStrategy::SmartMerge) && !duplicates.is_empty() {
            let n = duplicates.len() as f64 + 1.0;
            let primary_weight = 0.6;
            let duplicate_weight = 0.4 / duplicates.len() as f64;
            let mut weighted = primary.importance_score * primary_weight;
            for dup in &duplicates {
                weighted += dup.importance_score * duplicate_weight;
            }
            let _ = n;
            weighted.clamp(0.0, 1.0)
        } else {
            primary.importance_score
        };

        if matches!(strategy, MergeStrategy::SmartMerge) {
            let confidence = self.merge_confidence(primary, &duplicates);
            metadata.semantic_metadata.insert(
                "merge_confidence".to_string(),
                MetadataValue::Number(confidence),
            );
        }

        let merged_ids: Vec<String> = duplicates.iter().map(|m| m.id.clone()).collect();

        tracing::debug!(
            primary_id = %primary_id,
            merged = merged_ids.len(),
            strategy = ?strategy,
            "merged duplicate group"
        );

        Some(MergeOutcome {
            operation: MergeOperation {
                primary_memory_id: primary_id.clone(),
                merged_memory_ids: merged_ids,
                merge_strategy_used: strategy,
                conflicts_resolved: conflicts,
                metadata_changes: metadata,
                created_at: now,
            },
            primary_id,
            consolidated_importance,
            consolidated_access_count,
            consolidated_last_accessed_at,
        })
    }

    /// Base 0.5 plus up to 0.3 scaled by the fraction of matching values
    /// across `{categories, tags, source}` (spec.md §4.7, "Smart-merge
    /// extras").
    fn merge_confidence(&self, primary: &Memory, duplicates: &[&Memory]) -> f64 {
        if duplicates.is_empty() {
            return 0.5;
        }
        let mut matches = 0usize;
        let mut total = 0usize;
        for dup in duplicates {
            total += 3;
            if primary.metadata.categories == dup.metadata.categories {
                matches += 1;
            }
            if primary.metadata.tags == dup.metadata.tags {
                matches += 1;
            }
            if source_of(primary) == source_of(dup) {
                matches += 1;
            }
        }
        let fraction = if total == 0 { 0.0 } else { matches as f64 / total as f64 };
        (0.5 + 0.3 * fraction).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MemoryType;
    use chrono::Duration;

    fn memory(id: &str, created_offset_days: i64, importance: f64) -> Memory {
        let now = Utc::now();
        Memory {
            id: id.into(),
            content: "some duplicate content here".into(),
            embedding: None,
            memory_type: MemoryType::Semantic,
            importance_score: importance,
            created_at: now - Duration::days(created_offset_days),
            last_accessed_at: now,
            access_count: 1,
            metadata: Metadata::default(),
        }
    }

    #[test]
    fn keep_oldest_selects_minimum_created_at() {
        let merger = MemoryMerger::new();
        let members = vec![memory("a", 1, 0.5), memory("b", 10, 0.5)];
        let group = DuplicateGroup::new(vec!["a".into(), "b".into()], vec![1.0, 1.0], "exact", 1.0);
        let outcome = merger.merge_group(&group, &members, MergeStrategy::KeepOldest, Utc::now()).unwrap();
        assert_eq!(outcome.primary_id, "b");
    }

    #[test]
    fn keep_highest_importance_selects_max_score() {
        let merger = MemoryMerger::new();
        let members = vec![memory("a", 1, 0.9), memory("b", 1, 0.3)];
        let group = DuplicateGroup::new(vec!["a".into(), "b".into()], vec![1.0, 1.0], "exact", 1.0);
        let outcome = merger.merge_group(&group, &members, MergeStrategy::KeepHighestImportance, Utc::now()).unwrap();
        assert_eq!(outcome.primary_id, "a");
    }

    #[test]
    fn smart_merge_importance_is_weighted_average() {
        let merger = MemoryMerger::new();
        let members = vec![memory("a", 1, 1.0), memory("b", 1, 0.0)];
        let group = DuplicateGroup::new(vec!["a".into(), "b".into()], vec![1.0, 1.0], "exact", 1.0);
        let outcome = merger.merge_group(&group, &members, MergeStrategy::SmartMerge, Utc::now()).unwrap();
        // a should win primary (higher content/recency/importance terms); weighted avg != either raw score
        assert!(outcome.consolidated_importance > 0.0 && outcome.consolidated_importance < 1.0);
    }

    #[test]
    fn merge_stamps_provenance() {
        let merger = MemoryMerger::new();
        let members = vec![memory("a", 1, 0.5), memory("b", 10, 0.5)];
        let group = DuplicateGroup::new(vec!["a".into(), "b".into()], vec![1.0, 1.0], "exact", 1.0);
        let outcome = merger.merge_group(&group, &members, MergeStrategy::KeepOldest, Utc::now()).unwrap();
        let metadata = &outcome.operation.metadata_changes;
        assert_eq!(
            metadata.semantic_metadata.get("merged_from"),
            Some(&MetadataValue::List(vec!["a".to_string()]))
        );
        assert!(metadata.semantic_metadata.contains_key("merged_at"));
    }

    #[test]
    fn single_member_group_merges_to_none() {
        let merger = MemoryMerger::new();
        let members = vec![memory("a", 1, 0.5)];
        let group = DuplicateGroup::new(vec!["a".into()], vec![1.0], "exact", 1.0);
        assert!(merger.merge_group(&group, &members, MergeStrategy::KeepOldest, Utc::now()).is_none());
    }
}
