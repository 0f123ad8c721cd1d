//! Deduplication Orchestrator (spec.md §4.5-§4.7): batched multi-method
//! duplicate detection, cross-method consolidation, and strategy-driven
//! merging.

mod composite;
mod exact;
mod fuzzy;
mod merger;
mod orchestrator;
mod semantic;

pub use exact::detect_exact;
pub use fuzzy::detect_fuzzy;
pub use merger::{MemoryMerger, MergeOutcome};
pub use orchestrator::{CancellationToken, DeduplicationOrchestrator, DeduplicationStats, ProgressSnapshot};
pub use semantic::detect_semantic;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A batch of memories flagged as duplicates of one another
/// (spec.md §3, "DuplicateGroup").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub group_id: String,
    pub memory_ids: Vec<String>,
    pub similarity_scores: Vec<f64>,
    pub detection_method: String,
    pub confidence: f64,
}

impl DuplicateGroup {
    /// `memory_ids` must be non-empty (spec.md §3 invariant); callers
    /// filter out singleton buckets before reaching here.
    pub fn new(memory_ids: Vec<String>, similarity_scores: Vec<f64>, detection_method: impl Into<String>, confidence: f64) -> Self {
        let group_id = blake3::hash(memory_ids.join(",").as_bytes()).to_hex().to_string();
        Self {
            group_id,
            memory_ids,
            similarity_scores,
            detection_method: detection_method.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Record of one completed merge (spec.md §3, "MergeOperation").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeOperation {
    pub primary_memory_id: String,
    pub merged_memory_ids: Vec<String>,
    pub merge_strategy_used: crate::config::MergeStrategy,
    pub conflicts_resolved: Vec<String>,
    pub metadata_changes: crate::types::Metadata,
    pub created_at: DateTime<Utc>,
}

/// Merge groups that share at least one memory id, forming the connected
/// components across a set of candidate pairs discovered by a single
/// detector (spec.md §4.5, "merged transitively via shared memory ids").
pub(crate) fn consolidate_transitively(
    memories: &[crate::types::Memory],
    pairs: &[(usize, usize, f64)],
    method: &str,
) -> Vec<DuplicateGroup> {
    let n = memories.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], x: usize) -> usize {
        if parent[x] != x {
            parent[x] = find(parent, parent[x]);
        }
        parent[x]
    }

    for &(i, j, _) in pairs {
        let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
        if ri != rj {
            parent[rj] = ri;
        }
    }

    let mut components: std::collections::HashMap<usize, Vec<usize>> = std::collections::HashMap::new();
    for &(i, j, _) in pairs {
        let root = find(&mut parent, i);
        components.entry(root).or_default();
        let _ = find(&mut parent, j);
    }
    for &(i, j, _) in pairs {
        let root = find(&mut parent, i);
        let bucket = components.entry(root).or_default();
        if !bucket.contains(&i) {
            bucket.push(i);
        }
        if !bucket.contains(&j) {
            bucket.push(j);
        }
    }

    let mut scores_by_root: std::collections::HashMap<usize, Vec<f64>> = std::collections::HashMap::new();
    for &(i, _, score) in pairs {
        let root = find(&mut parent, i);
        scores_by_root.entry(root).or_default().push(score);
    }

    components
        .into_iter()
        .map(|(root, mut indices)| {
            indices.sort_unstable();
            let memory_ids: Vec<String> = indices.iter().map(|&i| memories[i].id.clone()).collect();
            let scores = scores_by_root.get(&root).cloned().unwrap_or_default();
            let avg = if scores.is_empty() { 0.0 } else { scores.iter().sum::<f64>() / scores.len() as f64 };
            let similarity_scores = vec![avg; memory_ids.len()];
            DuplicateGroup::new(memory_ids, similarity_scores, method, avg)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_id_is_deterministic_for_same_ids() {
        let a = DuplicateGroup::new(vec!["x".into(), "y".into()], vec![1.0, 1.0], "exact", 1.0);
        let b = DuplicateGroup::new(vec!["x".into(), "y".into()], vec![1.0, 1.0], "exact", 1.0);
        assert_eq!(a.group_id, b.group_id);
    }

    #[test]
    fn confidence_is_clamped() {
        let g = DuplicateGroup::new(vec!["x".into()], vec![1.0], "exact", 1.5);
        assert_eq!(g.confidence, 1.0);
    }
}
