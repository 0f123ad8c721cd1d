//! Core data model — the records the aging, importance, relationship, and
//! dedup engines all operate over.
//!
//! Mirrors spec.md §3. `Memory` is an input record the store hands to the
//! core; the core never mutates it in place, it only derives results and
//! asks the store to apply them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Fixed embedding width the store was initialized with. Vectors of any
/// other length are rejected rather than silently truncated or padded.
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// Tulving-style memory system classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    /// Facts and generalizations. Stable baseline.
    #[default]
    Semantic,
    /// Events and specific moments. Decays faster, interference-prone.
    Episodic,
    /// How-to knowledge. Most durable, reinforced by repetition.
    Procedural,
}

impl MemoryType {
    /// Weight applied when fusing importance components (spec.md §4.3).
    pub fn importance_weight(self) -> f64 {
        match self {
            MemoryType::Semantic => 1.0,
            MemoryType::Episodic => 0.8,
            MemoryType::Procedural => 1.2,
        }
    }
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MemoryType::Semantic => "semantic",
            MemoryType::Episodic => "episodic",
            MemoryType::Procedural => "procedural",
        };
        write!(f, "{s}")
    }
}

/// A scalar value inside the free-form metadata side-bag (spec.md §9:
/// "a mapping from string to a small sum type").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
}

/// One of the three typed metadata buckets recognized by the core.
pub type MetadataBucket = HashMap<String, MetadataValue>;

/// Structured side-data attached to a memory (spec.md §3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub semantic_metadata: MetadataBucket,
    #[serde(default)]
    pub episodic_metadata: MetadataBucket,
    #[serde(default)]
    pub procedural_metadata: MetadataBucket,
    #[serde(default)]
    pub tags: HashSet<String>,
    #[serde(default)]
    pub categories: HashSet<String>,
}

impl Metadata {
    /// Iterate all three typed buckets together, tagged with a stable name
    /// so callers can compare bucket-by-bucket (used by the contextual
    /// similarity kernel and the dedup metadata-agreement score).
    pub fn buckets(&self) -> [(&'static str, &MetadataBucket); 3] {
        [
            ("semantic", &self.semantic_metadata),
            ("episodic", &self.episodic_metadata),
            ("procedural", &self.procedural_metadata),
        ]
    }

    /// Fraction of keys (across all three buckets) present in both `self`
    /// and `other` whose values also agree. Returns 0 if neither side has
    /// any typed metadata.
    pub fn agreement_ratio(&self, other: &Metadata) -> f64 {
        let mut shared = 0usize;
        let mut agree = 0usize;
        for ((_, a), (_, b)) in self.buckets().iter().zip(other.buckets().iter()) {
            for (k, v) in a.iter() {
                if let Some(ov) = b.get(k) {
                    shared += 1;
                    if ov == v {
                        agree += 1;
                    }
                }
            }
        }
        if shared == 0 {
            0.0
        } else {
            agree as f64 / shared as f64
        }
    }

    /// Total number of metadata entries across typed buckets and tags,
    /// used by smart-merge primary selection's metadata-richness term.
    pub fn entry_count(&self) -> usize {
        self.semantic_metadata.len()
            + self.episodic_metadata.len()
            + self.procedural_metadata.len()
            + self.tags.len()
            + self.categories.len()
    }
}

/// A stored memory record (spec.md §3, "Memory (input record)").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    pub content: String,
    /// `None` when no embedding could be produced for this memory.
    pub embedding: Option<Vec<f32>>,
    pub memory_type: MemoryType,
    pub importance_score: f64,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u64,
    pub metadata: Metadata,
}

impl Memory {
    /// Validates the embedding, if present, against the configured
    /// dimension. Called at the store boundary per spec.md §3's invariant
    /// that implementations "refuse mismatched vectors."
    pub fn embedding_matches_dimension(&self, expected_dim: usize) -> bool {
        self.embedding
            .as_ref()
            .is_none_or(|v| v.len() == expected_dim)
    }
}

/// A single access/retrieval event, consumed by the aging and importance
/// engines (spec.md §3, "Access event").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessEvent {
    pub timestamp: DateTime<Utc>,
    pub access_type: String,
    pub success_rate: f64,
    pub retrieval_time_ms: Option<u64>,
    pub context_similarity: Option<f64>,
}

impl AccessEvent {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            access_type: "recall".to_string(),
            success_rate: 1.0,
            retrieval_time_ms: None,
            context_similarity: None,
        }
    }
}

/// Clamp a score into `[0, 1]`, the invariant every engine output must
/// satisfy (spec.md §3, §8 property 1).
#[inline]
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_agreement_empty_is_zero() {
        let a = Metadata::default();
        let b = Metadata::default();
        assert_eq!(a.agreement_ratio(&b), 0.0);
    }

    #[test]
    fn metadata_agreement_partial() {
        let mut a = Metadata::default();
        a.semantic_metadata
            .insert("topic".into(), MetadataValue::String("rust".into()));
        a.semantic_metadata
            .insert("lang".into(), MetadataValue::String("en".into()));
        let mut b = Metadata::default();
        b.semantic_metadata
            .insert("topic".into(), MetadataValue::String("rust".into()));
        b.semantic_metadata
            .insert("lang".into(), MetadataValue::String("fr".into()));
        // two shared keys, one agrees
        assert!((a.agreement_ratio(&b) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn embedding_dimension_check() {
        let mut m = Memory {
            id: "1".into(),
            content: "x".into(),
            embedding: Some(vec![0.0; 10]),
            memory_type: MemoryType::Semantic,
            importance_score: 0.5,
            created_at: Utc::now(),
            last_accessed_at: Utc::now(),
            access_count: 0,
            metadata: Metadata::default(),
        };
        assert!(!m.embedding_matches_dimension(1536));
        m.embedding = None;
        assert!(m.embedding_matches_dimension(1536));
    }
}
