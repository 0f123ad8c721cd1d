//! # Memnexus Core
//!
//! The adaptive memory core for a second-brain memory system: cognitive
//! decay, multi-factor importance scoring, pairwise relationship analysis,
//! and batched duplicate detection/merging.
//!
//! The crate owns none of the storage, embedding, or transport layers —
//! those are the caller's problem, reached through the [`store`] module's
//! two narrow traits, [`store::MemoryStore`] and [`store::EmbeddingProvider`].
//! Everything here is pure computation over the types in [`types`]: given a
//! `Memory` (and, where relevant, its access history or a candidate pool),
//! each engine derives a score or grouping and hands it back for the caller
//! to persist.
//!
//! ## The four engines
//!
//! - [`aging`] — models cognitive decay (Ebbinghaus, power law, exponential,
//!   spacing effect, interference, consolidation) and predicts the next
//!   optimal review.
//! - [`importance`] — fuses frequency, recency, search relevance, content
//!   quality, and type weight into a single importance score with decay.
//! - [`relationship`] — scores a target memory against a candidate pool
//!   across six similarity axes and buckets the result by strength.
//! - [`dedup`] — detects duplicate groups by exact/fuzzy/semantic methods,
//!   consolidates across methods, and merges groups per a configurable
//!   strategy.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use memnexus_core::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let aging = AgingEngine::new(AgingConfig::default());
//! let result = aging.calculate(&memory, &access_history, None, chrono::Utc::now());
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

pub mod aging;
pub mod config;
pub mod dedup;
pub mod error;
pub mod importance;
pub mod relationship;
pub mod similarity;
pub mod store;
pub mod types;

pub use aging::{AgingEngine, AgingResult, MemoryStrength};
pub use config::{
    AgingConfig, AgingModel, DeduplicationConfig, DetectionMethod, ImportanceConfig,
    MergeStrategy, QualityIndicators, RelationshipConfig, RelationshipWeights,
};
pub use dedup::{
    CancellationToken, DeduplicationOrchestrator, DeduplicationStats, DuplicateGroup,
    MemoryMerger, MergeOperation, MergeOutcome, ProgressSnapshot,
};
pub use error::{CoreError, EmbeddingError, Result, StoreError};
pub use importance::{AccessPattern, ImportanceEngine, ImportanceScore};
pub use relationship::{
    Relationship, RelationshipAnalyzer, RelationshipInsights, RelationshipStrength,
    RelationshipType,
};
pub use store::{EmbeddingProvider, MemoryFilter, MemoryPage, MemoryStore};
pub use types::{AccessEvent, Memory, Metadata, MetadataValue, MemoryType, EMBEDDING_DIMENSIONS};

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::{
        AccessEvent, AccessPattern, AgingConfig, AgingEngine, AgingModel, AgingResult,
        CancellationToken, CoreError, DeduplicationConfig, DeduplicationOrchestrator,
        DeduplicationStats, DetectionMethod, DuplicateGroup, EmbeddingProvider, ImportanceConfig,
        ImportanceEngine, ImportanceScore, Memory, MemoryFilter, MemoryMerger, MemoryStore,
        MemoryStrength, MemoryType, MergeOperation, MergeOutcome, MergeStrategy, Metadata,
        Relationship, RelationshipAnalyzer, RelationshipConfig, RelationshipInsights,
        RelationshipStrength, RelationshipType, Result,
    };

    #[cfg(any(test, feature = "test-support"))]
    pub use crate::store::test_support::{FakeEmbeddingProvider, InMemoryStore};
}
