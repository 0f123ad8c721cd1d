//! Per-engine configuration (spec.md §6, "Configuration options recognized
//! by the core"). Plain `serde`-serializable structs constructed per run and
//! passed by value — no global mutable state (spec.md §5, §9).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which cognitive decay model the aging engine should use. `Auto` defers
/// to the model-selection rules in spec.md §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgingModel {
    #[default]
    Auto,
    Ebbinghaus,
    PowerLaw,
    Exponential,
    SpacingEffect,
    Interference,
    Consolidation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgingConfig {
    pub default_model: AgingModel,
    pub half_life_days: f64,
    pub decay_rate: f64,
    pub spacing_intervals_days: Vec<f64>,
    pub interference_factor: f64,
    pub consolidation_period_days: f64,
    /// Window used by the temporal-proximity kernel (spec.md §4.1).
    pub temporal_window_hours: f64,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            default_model: AgingModel::Auto,
            half_life_days: 7.0,
            decay_rate: 0.5,
            spacing_intervals_days: vec![1.0, 3.0, 7.0, 14.0, 30.0, 90.0],
            interference_factor: 0.3,
            consolidation_period_days: 14.0,
            temporal_window_hours: 24.0,
        }
    }
}

impl AgingConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.half_life_days <= 0.0 || !self.half_life_days.is_finite() {
            return Err(CoreError::InvalidInput(
                "half_life_days must be positive and finite".into(),
            ));
        }
        if self.spacing_intervals_days.is_empty() {
            return Err(CoreError::InvalidInput(
                "spacing_intervals_days must not be empty".into(),
            ));
        }
        if self.spacing_intervals_days.iter().any(|d| *d <= 0.0) {
            return Err(CoreError::InvalidInput(
                "spacing_intervals_days entries must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityIndicators {
    pub min_length: usize,
    /// Extra length threshold that awards a second length bonus.
    pub rich_length: usize,
}

impl Default for QualityIndicators {
    fn default() -> Self {
        Self {
            min_length: 50,
            rich_length: 150,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportanceConfig {
    pub frequency_weight: f64,
    pub recency_weight: f64,
    pub search_relevance_weight: f64,
    pub content_quality_weight: f64,
    pub half_life_days: f64,
    pub min_importance: f64,
    pub high_frequency_threshold: u64,
    pub recent_access_days: i64,
    pub quality_indicators: QualityIndicators,
}

impl Default for ImportanceConfig {
    fn default() -> Self {
        Self {
            frequency_weight: 0.30,
            recency_weight: 0.25,
            search_relevance_weight: 0.20,
            content_quality_weight: 0.15,
            half_life_days: 7.0,
            min_importance: 0.1,
            high_frequency_threshold: 10,
            recent_access_days: 7,
            quality_indicators: QualityIndicators::default(),
        }
    }
}

impl ImportanceConfig {
    /// Weights must sum to 1.0 within tolerance (spec.md §6).
    pub fn validate(&self) -> Result<(), CoreError> {
        let sum = self.frequency_weight
            + self.recency_weight
            + self.search_relevance_weight
            + self.content_quality_weight;
        if (sum - 1.0).abs() > 0.01 {
            return Err(CoreError::InvalidInput(format!(
                "importance weights must sum to 1.0 +/- 0.01, got {sum}"
            )));
        }
        if self.min_importance < 0.0 || self.min_importance > 1.0 {
            return Err(CoreError::InvalidInput(
                "min_importance must be in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipWeights {
    pub semantic_similarity: f64,
    pub temporal_proximity: f64,
    pub content_overlap: f64,
    pub conceptual_hierarchy: f64,
    pub causal_relationship: f64,
    pub contextual_association: f64,
}

impl Default for RelationshipWeights {
    fn default() -> Self {
        Self {
            semantic_similarity: 0.40,
            temporal_proximity: 0.20,
            content_overlap: 0.20,
            conceptual_hierarchy: 0.10,
            causal_relationship: 0.05,
            contextual_association: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipConfig {
    pub similarity_threshold: f64,
    pub temporal_window_hours: f64,
    pub weights: RelationshipWeights,
    pub max_connections: usize,
    pub max_candidates: usize,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.3,
            temporal_window_hours: 24.0,
            weights: RelationshipWeights::default(),
            max_connections: 10,
            max_candidates: 50,
        }
    }
}

impl RelationshipConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(CoreError::InvalidInput(
                "similarity_threshold must be in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Exact,
    Fuzzy,
    Semantic,
    /// Shorthand meaning "run exact, fuzzy, and semantic, then consolidate."
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    KeepOldest,
    KeepNewest,
    KeepHighestImportance,
    SmartMerge,
}

impl MergeStrategy {
    /// The snake_case label this strategy is recorded under at the store
    /// boundary, matching the `#[serde(rename_all = "snake_case")]` above.
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStrategy::KeepOldest => "keep_oldest",
            MergeStrategy::KeepNewest => "keep_newest",
            MergeStrategy::KeepHighestImportance => "keep_highest_importance",
            MergeStrategy::SmartMerge => "smart_merge",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeduplicationConfig {
    pub detection_methods: Vec<DetectionMethod>,
    pub similarity_threshold: f64,
    pub confidence_threshold: f64,
    pub merge_strategy: MergeStrategy,
    pub auto_merge: bool,
    pub batch_size: usize,
    pub max_concurrent_batches: usize,
    pub exact_weight: f64,
    pub fuzzy_weight: f64,
    pub semantic_weight: f64,
    /// Internal composite weights used by the fuzzy and semantic
    /// detectors when combining content/metadata/structural similarity
    /// (spec.md §4.5: "The composite uses the configured weights").
    pub content_weight: f64,
    pub metadata_weight: f64,
    pub structural_weight: f64,
    /// Threshold the fuzzy detector applies to its own composite
    /// (spec.md §4.5, "fuzzy_threshold").
    pub fuzzy_threshold: f64,
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            detection_methods: vec![DetectionMethod::Hybrid],
            similarity_threshold: 0.85,
            confidence_threshold: 0.7,
            merge_strategy: MergeStrategy::SmartMerge,
            auto_merge: false,
            batch_size: 100,
            max_concurrent_batches: 3,
            exact_weight: 0.4,
            fuzzy_weight: 0.3,
            semantic_weight: 0.3,
            content_weight: 0.6,
            metadata_weight: 0.3,
            structural_weight: 0.1,
            fuzzy_threshold: 0.85,
        }
    }
}

impl DeduplicationConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.detection_methods.is_empty() {
            return Err(CoreError::InvalidInput(
                "detection_methods must not be empty".into(),
            ));
        }
        let weight_sum = self.exact_weight + self.fuzzy_weight + self.semantic_weight;
        if (weight_sum - 1.0).abs() > 0.01 {
            return Err(CoreError::InvalidInput(format!(
                "detection weights must sum to 1.0 +/- 0.01, got {weight_sum}"
            )));
        }
        let composite_sum = self.content_weight + self.metadata_weight + self.structural_weight;
        if (composite_sum - 1.0).abs() > 0.01 {
            return Err(CoreError::InvalidInput(format!(
                "content/metadata/structural weights must sum to 1.0 +/- 0.01, got {composite_sum}"
            )));
        }
        if self.batch_size == 0 {
            return Err(CoreError::InvalidInput("batch_size must be positive".into()));
        }
        if self.max_concurrent_batches == 0 {
            return Err(CoreError::InvalidInput(
                "max_concurrent_batches must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Documented per-memory cost model (spec.md §5), with up to 20%
    /// efficiency gain scaling linearly with `batch_size / 50`.
    pub fn estimate_processing_time_ms(&self, n: usize) -> f64 {
        let base_per_memory_ms = |method: DetectionMethod| -> f64 {
            match method {
                DetectionMethod::Exact => 1.0,
                DetectionMethod::Fuzzy => 10.0,
                DetectionMethod::Semantic => 50.0,
                DetectionMethod::Hybrid => 60.0,
            }
        };
        let efficiency = (self.batch_size as f64 / 50.0).min(1.0) * 0.20;
        let discount = 1.0 - efficiency;
        self.detection_methods
            .iter()
            .map(|m| base_per_memory_ms(*m) * n as f64 * discount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_importance_weights_sum_to_one() {
        ImportanceConfig::default().validate().unwrap();
    }

    #[test]
    fn default_dedup_weights_sum_to_one() {
        DeduplicationConfig::default().validate().unwrap();
    }

    #[test]
    fn bad_importance_weights_rejected() {
        let mut cfg = ImportanceConfig::default();
        cfg.frequency_weight = 0.9;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn estimate_processing_time_monotone_in_n() {
        let cfg = DeduplicationConfig::default();
        let small = cfg.estimate_processing_time_ms(10);
        let big = cfg.estimate_processing_time_ms(100);
        assert!(big > small);
    }

    #[test]
    fn larger_batch_size_is_cheaper_per_item() {
        let mut cfg = DeduplicationConfig::default();
        cfg.batch_size = 1;
        let slow = cfg.estimate_processing_time_ms(100);
        cfg.batch_size = 50;
        let fast = cfg.estimate_processing_time_ms(100);
        assert!(fast < slow);
    }
}
