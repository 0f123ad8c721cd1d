//! Deduplication Orchestrator (spec.md §4.6): paginated loading,
//! per-method batched detection with bounded concurrency, cross-method
//! consolidation, and optional auto-merge.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::config::{DeduplicationConfig, DetectionMethod};
use crate::error::CoreError;
use crate::store::{MemoryFilter, MemoryStore};
use crate::types::Memory;

use super::merger::MemoryMerger;
use super::{detect_exact, detect_fuzzy, detect_semantic, DuplicateGroup};

/// Cooperative cancellation point checked between batches (spec.md §4.6,
/// "Cancellation & retry"). No tokio-util dependency in the teacher's
/// stack, so this is a minimal hand-rolled flag rather than pulling one in.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Statistics block emitted at the end of a run (spec.md §4.6, "Emit a
/// statistics block").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeduplicationStats {
    pub total_memories_scanned: usize,
    pub duplicate_groups_found: usize,
    pub memories_in_duplicate_groups: usize,
    pub memories_merged: usize,
    pub average_confidence: f64,
    pub detector_errors: usize,
    pub elapsed_ms: u128,
    pub throughput_memories_per_sec: f64,
}

/// Point-in-time snapshot of orchestrator progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub stage: String,
    pub memories_processed: usize,
    pub total_memories: usize,
    pub batches_completed: usize,
    pub total_batches: usize,
    pub cancelled: bool,
}

pub struct DeduplicationOrchestrator<S: MemoryStore> {
    store: Arc<S>,
    config: DeduplicationConfig,
    merger: MemoryMerger,
}

impl<S: MemoryStore + 'static> DeduplicationOrchestrator<S> {
    pub fn new(store: Arc<S>, config: DeduplicationConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            merger: MemoryMerger::new(),
        })
    }

    /// Page through the store (spec.md §4.6 step 1: page size `5*batch_size`).
    async fn load_all(&self, filter: &MemoryFilter) -> Result<Vec<Memory>, CoreError> {
        let page_size = self.config.batch_size * 5;
        let mut offset = 0;
        let mut all = Vec::new();
        loop {
            let page = self
                .store
                .get_memories_for_deduplication(filter, page_size, offset)
                .await
                .map_err(CoreError::from)?;
            let fetched = page.items.len();
            all.extend(page.items);
            offset += fetched;
            if !page.has_more || fetched == 0 {
                break;
            }
        }
        Ok(all)
    }

    fn run_detector(method: DetectionMethod, batch: &[Memory], cfg: &DeduplicationConfig) -> Vec<DuplicateGroup> {
        match method {
            DetectionMethod::Exact => detect_exact(batch),
            DetectionMethod::Fuzzy => detect_fuzzy(batch, cfg),
            DetectionMethod::Semantic => detect_semantic(batch, cfg),
            DetectionMethod::Hybrid => {
                let mut groups = detect_exact(batch);
                groups.extend(detect_fuzzy(batch, cfg));
                groups.extend(detect_semantic(batch, cfg));
                groups
            }
        }
    }

    /// Partition into `batch_size` chunks, dispatch each chunk to a
    /// blocking-pool task, bounded by `max_concurrent_batches` concurrent
    /// in flight (spec.md §4.6 step 2). Detector panics/errors increment
    /// `error_count` rather than aborting the run.
    async fn detect_with_method(
        &self,
        method: DetectionMethod,
        memories: &Arc<Vec<Memory>>,
        cancel: &CancellationToken,
        error_count: &AtomicUsize,
        batches_completed: &AtomicUsize,
    ) -> Vec<DuplicateGroup> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_batches));
        let batch_size = self.config.batch_size;
        let chunk_count = memories.len().div_ceil(batch_size.max(1));

        let mut handles = Vec::with_capacity(chunk_count);
        for chunk_idx in 0..chunk_count {
            if cancel.is_cancelled() {
                break;
            }
            let start = chunk_idx * batch_size;
            let end = (start + batch_size).min(memories.len());
            let memories = Arc::clone(memories);
            let cfg = self.config.clone();
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .expect("semaphore never closed");

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let batch = &memories[start..end];
                Self::run_detector(method, batch, &cfg)
            });
            handles.push(handle);
        }

        let mut groups = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(batch_groups) => {
                    groups.extend(batch_groups);
                    batches_completed.fetch_add(1, Ordering::Relaxed);
                }
                Err(_) => {
                    error_count.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
        groups
    }

    /// Build an undirected graph over groups (edge = shared memory id) and
    /// collapse each connected component into one consolidated group
    /// (spec.md §4.6 step 3).
    fn consolidate_across_methods(groups: Vec<DuplicateGroup>) -> Vec<DuplicateGroup> {
        if groups.is_empty() {
            return groups;
        }

        let n = groups.len();
        let mut parent: Vec<usize> = (0..n).collect();
        fn find(parent: &mut [usize], x: usize) -> usize {
            if parent[x] != x {
                parent[x] = find(parent, parent[x]);
            }
            parent[x]
        }

        let mut owner: HashMap<&str, usize> = HashMap::new();
        for (i, group) in groups.iter().enumerate() {
            for id in &group.memory_ids {
                if let Some(&other) = owner.get(id.as_str()) {
                    let (ri, rj) = (find(&mut parent, i), find(&mut parent, other));
                    if ri != rj {
                        parent[rj] = ri;
                    }
                } else {
                    owner.insert(id.as_str(), i);
                }
            }
        }

        let mut components: HashMap<usize, Vec<usize>> = HashMap::new();
        for i in 0..n {
            let root = find(&mut parent, i);
            components.entry(root).or_default().push(i);
        }

        let mut consolidated: Vec<DuplicateGroup> = components
            .into_values()
            .map(|indices| {
                let mut memory_ids: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();
                let mut methods: Vec<String> = Vec::new();
                let mut confidences = Vec::new();
                for &i in &indices {
                    memory_ids.extend(groups[i].memory_ids.iter().cloned());
                    if !methods.contains(&groups[i].detection_method) {
                        methods.push(groups[i].detection_method.clone());
                    }
                    confidences.push(groups[i].confidence);
                }
                let avg_confidence = confidences.iter().sum::<f64>() / confidences.len() as f64;
                let ids: Vec<String> = memory_ids.into_iter().collect();
                let similarity_scores = vec![avg_confidence; ids.len()];
                let method_label = if methods.len() == 1 {
                    methods.remove(0)
                } else {
                    format!("combined_{}", methods.join("+"))
                };
                DuplicateGroup::new(ids, similarity_scores, method_label, avg_confidence)
            })
            .collect();

        consolidated.sort_by(|a, b| a.group_id.cmp(&b.group_id));
        consolidated
    }

    /// Run the full pipeline against `filter` (spec.md §4.6). Returns
    /// the consolidated groups, the per-group merge outcomes (empty
    /// unless `auto_merge`), and summary statistics.
    pub async fn run(
        &self,
        filter: &MemoryFilter,
        cancel: &CancellationToken,
    ) -> Result<(Vec<DuplicateGroup>, DeduplicationStats, ProgressSnapshot), CoreError> {
        let start = Instant::now();
        let memories = self.load_all(filter).await?;
        let total_scanned = memories.len();
        let memories = Arc::new(memories);

        let error_count = AtomicUsize::new(0);
        let batches_completed = AtomicUsize::new(0);
        let total_batches: usize = self
            .config
            .detection_methods
            .iter()
            .map(|_| memories.len().div_ceil(self.config.batch_size.max(1)))
            .sum();
        let mut all_groups = Vec::new();

        for &method in &self.config.detection_methods {
            if cancel.is_cancelled() {
                break;
            }
            let groups = self
                .detect_with_method(method, &memories, cancel, &error_count, &batches_completed)
                .await;
            all_groups.extend(groups);
        }

        let consolidated = Self::consolidate_across_methods(all_groups);

        let mut memories_merged = 0usize;
        if self.config.auto_merge && !cancel.is_cancelled() {
            let id_to_memory: HashMap<&str, &Memory> = memories.iter().map(|m| (m.id.as_str(), m)).collect();
            for group in &consolidated {
                if cancel.is_cancelled() {
                    break;
                }
                if group.confidence < self.config.confidence_threshold {
                    continue;
                }
                let members: Vec<Memory> = group
                    .memory_ids
                    .iter()
                    .filter_map(|id| id_to_memory.get(id.as_str()).map(|m| (*m).clone()))
                    .collect();
                if let Some(outcome) = self.merger.merge_group(group, &members, self.config.merge_strategy, Utc::now()) {
                    let metadata_json = serde_json::to_value(&outcome.operation.metadata_changes)
                        .map_err(|e| CoreError::Computation(e.to_string()))?;
                    self.store
                        .merge_memories(
                            &outcome.primary_id,
                            &outcome.operation.merged_memory_ids,
                            outcome.operation.merge_strategy_used.as_str(),
                            metadata_json,
                        )
                        .await
                        .map_err(CoreError::from)?;
                    memories_merged += outcome.operation.merged_memory_ids.len();
                }
            }
        }

        let memories_in_groups: usize = consolidated.iter().map(|g| g.memory_ids.len()).sum();
        let average_confidence = if consolidated.is_empty() {
            0.0
        } else {
            consolidated.iter().map(|g| g.confidence).sum::<f64>() / consolidated.len() as f64
        };
        let elapsed_ms = start.elapsed().as_millis();
        let throughput = if elapsed_ms == 0 {
            total_scanned as f64
        } else {
            total_scanned as f64 / (elapsed_ms as f64 / 1000.0)
        };

        let stats = DeduplicationStats {
            total_memories_scanned: total_scanned,
            duplicate_groups_found: consolidated.len(),
            memories_in_duplicate_groups: memories_in_groups,
            memories_merged,
            average_confidence,
            detector_errors: error_count.load(Ordering::Relaxed),
            elapsed_ms,
            throughput_memories_per_sec: throughput,
        };

        let progress = ProgressSnapshot {
            stage: if cancel.is_cancelled() { "cancelled".to_string() } else { "completed".to_string() },
            memories_processed: total_scanned,
            total_memories: total_scanned,
            batches_completed: batches_completed.load(Ordering::Relaxed),
            total_batches,
            cancelled: cancel.is_cancelled(),
        };

        tracing::debug!(
            scanned = stats.total_memories_scanned,
            groups = stats.duplicate_groups_found,
            merged = stats.memories_merged,
            "deduplication run complete"
        );

        Ok((consolidated, stats, progress))
    }
}
