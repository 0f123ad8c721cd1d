//! External collaborators (spec.md §6).
//!
//! The core depends only on these two capabilities. Concrete storage
//! technology, embedding models, and wire protocols are deliberately
//! someone else's problem — see spec.md §1's Non-goals.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{EmbeddingError, StoreError};
use crate::types::{Memory, MemoryType};

/// Optional filter used by `get_memories_for_deduplication` and by
/// candidate selection.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilter {
    pub memory_types: Option<Vec<MemoryType>>,
    pub tags: Option<Vec<String>>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

/// A page of memories returned by paginated store queries.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    pub items: Vec<Memory>,
    pub has_more: bool,
}

/// The narrow persistence capability the core requires (spec.md §6).
///
/// Implementations are expected to be internally concurrency-safe: the
/// orchestrator may call `merge_memories` and `update_importance`
/// concurrently with reads from other engines.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn get_memory(&self, id: &str) -> Result<Option<Memory>, StoreError>;

    /// Memories excluding `exclude_id`, requiring a non-null embedding,
    /// sorted by `(importance_score desc, created_at desc)`, capped at
    /// `limit`.
    async fn get_candidate_memories(
        &self,
        exclude_id: &str,
        limit: usize,
        memory_types: Option<&[MemoryType]>,
    ) -> Result<Vec<Memory>, StoreError>;

    async fn get_memories_for_deduplication(
        &self,
        filter: &MemoryFilter,
        limit: usize,
        offset: usize,
    ) -> Result<MemoryPage, StoreError>;

    /// Returns the subset of `ids` present in the store, preserving their
    /// relative order.
    async fn get_memories_by_ids(&self, ids: &[String]) -> Result<Vec<Memory>, StoreError>;

    async fn record_access(
        &self,
        id: &str,
        access_type: &str,
        search_position: Option<u32>,
        user_action: Option<&str>,
    ) -> Result<(), StoreError>;

    async fn update_importance(&self, id: &str, score: f64) -> Result<(), StoreError>;

    /// Atomically fold `duplicate_ids` into `primary_id` under the given
    /// textual strategy name, replacing the primary's metadata with
    /// `merged_metadata` (JSON-shaped, caller-serialized). Either this
    /// fully commits or the store is left unchanged (spec.md §3).
    async fn merge_memories(
        &self,
        primary_id: &str,
        duplicate_ids: &[String],
        strategy: &str,
        merged_metadata: serde_json::Value,
    ) -> Result<(), StoreError>;
}

/// Fixed-dimension text embedding provider (spec.md §6). May be
/// unavailable; the core always treats embeddings as optional.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// The dimension this provider's vectors are fixed at.
    fn dimensions(&self) -> usize;
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    //! An in-memory `MemoryStore`/`EmbeddingProvider` pair for unit and
    //! integration tests. Not a reference storage backend — no
    //! durability, no indexing, just enough to drive the engines.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryStore {
        memories: Mutex<HashMap<String, Memory>>,
        last_merge_strategy: Mutex<Option<String>>,
    }

    impl InMemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&self, memory: Memory) {
            self.memories.lock().unwrap().insert(memory.id.clone(), memory);
        }

        pub fn len(&self) -> usize {
            self.memories.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// The `strategy` string passed to the most recent `merge_memories`
        /// call, for asserting the orchestrator forwards its configured
        /// strategy rather than a hardcoded label.
        pub fn last_merge_strategy(&self) -> Option<String> {
            self.last_merge_strategy.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MemoryStore for InMemoryStore {
        async fn get_memory(&self, id: &str) -> Result<Option<Memory>, StoreError> {
            Ok(self.memories.lock().unwrap().get(id).cloned())
        }

        async fn get_candidate_memories(
            &self,
            exclude_id: &str,
            limit: usize,
            memory_types: Option<&[MemoryType]>,
        ) -> Result<Vec<Memory>, StoreError> {
            let guard = self.memories.lock().unwrap();
            let mut items: Vec<Memory> = guard
                .values()
                .filter(|m| m.id != exclude_id && m.embedding.is_some())
                .filter(|m| {
                    memory_types
                        .map(|types| types.contains(&m.memory_type))
                        .unwrap_or(true)
                })
                .cloned()
                .collect();
            items.sort_by(|a, b| {
                b.importance_score
                    .partial_cmp(&a.importance_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            });
            items.truncate(limit);
            Ok(items)
        }

        async fn get_memories_for_deduplication(
            &self,
            filter: &MemoryFilter,
            limit: usize,
            offset: usize,
        ) -> Result<MemoryPage, StoreError> {
            let guard = self.memories.lock().unwrap();
            let mut items: Vec<Memory> = guard
                .values()
                .filter(|m| {
                    filter
                        .memory_types
                        .as_ref()
                        .map(|types| types.contains(&m.memory_type))
                        .unwrap_or(true)
                })
                .filter(|m| {
                    filter
                        .tags
                        .as_ref()
                        .map(|tags| tags.iter().any(|t| m.metadata.tags.contains(t)))
                        .unwrap_or(true)
                })
                .filter(|m| {
                    filter
                        .created_after
                        .map(|t| m.created_at >= t)
                        .unwrap_or(true)
                })
                .filter(|m| {
                    filter
                        .created_before
                        .map(|t| m.created_at <= t)
                        .unwrap_or(true)
                })
                .cloned()
                .collect();
            items.sort_by_key(|m| m.id.clone());
            let has_more = items.len() > offset + limit;
            let page = items.into_iter().skip(offset).take(limit).collect();
            Ok(MemoryPage {
                items: page,
                has_more,
            })
        }

        async fn get_memories_by_ids(&self, ids: &[String]) -> Result<Vec<Memory>, StoreError> {
            let guard = self.memories.lock().unwrap();
            Ok(ids.iter().filter_map(|id| guard.get(id).cloned()).collect())
        }

        async fn record_access(
            &self,
            id: &str,
            _access_type: &str,
            _search_position: Option<u32>,
            _user_action: Option<&str>,
        ) -> Result<(), StoreError> {
            let mut guard = self.memories.lock().unwrap();
            let memory = guard
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            memory.access_count += 1;
            memory.last_accessed_at = Utc::now();
            Ok(())
        }

        async fn update_importance(&self, id: &str, score: f64) -> Result<(), StoreError> {
            let mut guard = self.memories.lock().unwrap();
            let memory = guard
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            memory.importance_score = score;
            Ok(())
        }

        async fn merge_memories(
            &self,
            primary_id: &str,
            duplicate_ids: &[String],
            strategy: &str,
            merged_metadata: serde_json::Value,
        ) -> Result<(), StoreError> {
            *self.last_merge_strategy.lock().unwrap() = Some(strategy.to_string());
            let mut guard = self.memories.lock().unwrap();
            if !guard.contains_key(primary_id) {
                return Err(StoreError::NotFound(primary_id.to_string()));
            }
            for dup in duplicate_ids {
                if !guard.contains_key(dup) {
                    return Err(StoreError::Conflict(format!(
                        "duplicate {dup} no longer exists"
                    )));
                }
            }
            for dup in duplicate_ids {
                guard.remove(dup);
            }
            if let Some(primary) = guard.get_mut(primary_id) {
                if let Ok(metadata) = serde_json::from_value(merged_metadata) {
                    primary.metadata = metadata;
                }
            }
            Ok(())
        }
    }

    /// Deterministic fake embedding provider: hashes the text into a fixed
    /// pseudo-random vector so identical content produces identical
    /// embeddings without needing a real model.
    pub struct FakeEmbeddingProvider {
        dims: usize,
    }

    impl FakeEmbeddingProvider {
        pub fn new(dims: usize) -> Self {
            Self { dims }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FakeEmbeddingProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            if text.is_empty() {
                return Err(EmbeddingError::Unavailable("empty text".into()));
            }
            let hash = blake3::hash(text.as_bytes());
            let bytes = hash.as_bytes();
            let mut v = Vec::with_capacity(self.dims);
            for i in 0..self.dims {
                let b = bytes[i % bytes.len()];
                v.push((b as f32 / 255.0) * 2.0 - 1.0);
            }
            Ok(v)
        }

        fn dimensions(&self) -> usize {
            self.dims
        }
    }
}
