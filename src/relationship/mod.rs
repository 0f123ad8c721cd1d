//! Relationship Analyzer (spec.md §4.4): pairwise similarity across six
//! axes combined into a weighted composite with a strength category.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::RelationshipConfig;
use crate::similarity;
use crate::types::Memory;

/// One of the six similarity axes (spec.md §4.1/§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    SemanticSimilarity,
    TemporalProximity,
    ContentOverlap,
    ConceptualHierarchy,
    CausalRelationship,
    ContextualAssociation,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 6] = [
        RelationshipType::SemanticSimilarity,
        RelationshipType::TemporalProximity,
        RelationshipType::ContentOverlap,
        RelationshipType::ConceptualHierarchy,
        RelationshipType::CausalRelationship,
        RelationshipType::ContextualAssociation,
    ];

    fn weight(self, weights: &crate::config::RelationshipWeights) -> f64 {
        match self {
            RelationshipType::SemanticSimilarity => weights.semantic_similarity,
            RelationshipType::TemporalProximity => weights.temporal_proximity,
            RelationshipType::ContentOverlap => weights.content_overlap,
            RelationshipType::ConceptualHierarchy => weights.conceptual_hierarchy,
            RelationshipType::CausalRelationship => weights.causal_relationship,
            RelationshipType::ContextualAssociation => weights.contextual_association,
        }
    }
}

/// Strength bucket assigned to a composite score (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStrength {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl RelationshipStrength {
    fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            RelationshipStrength::VeryStrong
        } else if score >= 0.6 {
            RelationshipStrength::Strong
        } else if score >= 0.4 {
            RelationshipStrength::Moderate
        } else if score >= 0.2 {
            RelationshipStrength::Weak
        } else {
            RelationshipStrength::VeryWeak
        }
    }
}

/// A scored relationship between a target memory and a candidate
/// (spec.md §3, "Relationship").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub target_id: String,
    pub related_id: String,
    pub relationship_scores: HashMap<RelationshipType, f64>,
    pub composite_score: f64,
    pub primary_relationship_type: RelationshipType,
    pub strength: RelationshipStrength,
}

/// Aggregate counts over a batch of relationships (spec.md §4.4,
/// "Insights").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipInsights {
    pub total: usize,
    pub by_type: HashMap<RelationshipType, usize>,
    pub by_strength: HashMap<RelationshipStrength, usize>,
    pub top_composite: f64,
}

#[derive(Debug, Clone, Default)]
pub struct RelationshipAnalyzer {
    config: RelationshipConfig,
}

impl RelationshipAnalyzer {
    pub fn new(config: RelationshipConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RelationshipConfig {
        &self.config
    }

    /// Select up to `max_candidates` memories (excluding the target),
    /// requiring a non-null embedding, ordered by (importance desc,
    /// created_at desc) (spec.md §4.4, "Candidate set").
    pub fn select_candidates<'a>(&self, target: &Memory, pool: &'a [Memory]) -> Vec<&'a Memory> {
        let mut candidates: Vec<&Memory> = pool
            .iter()
            .filter(|m| m.id != target.id && m.embedding.is_some())
            .collect();
        candidates.sort_by(|a, b| {
            b.importance_score
                .partial_cmp(&a.importance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        candidates.truncate(self.config.max_candidates);
        candidates
    }

    fn axis_score(&self, target: &Memory, candidate: &Memory, axis: RelationshipType) -> Option<f64> {
        match axis {
            RelationshipType::SemanticSimilarity => {
                match (&target.embedding, &candidate.embedding) {
                    (Some(a), Some(b)) => Some(similarity::cosine_similarity(a, b)),
                    _ => None,
                }
            }
            RelationshipType::TemporalProximity => Some(similarity::temporal_proximity(
                Some(target.created_at),
                Some(candidate.created_at),
                self.config.temporal_window_hours,
            )),
            RelationshipType::ContentOverlap => {
                Some(similarity::content_overlap(&target.content, &candidate.content))
            }
            RelationshipType::ConceptualHierarchy => {
                Some(similarity::hierarchy_cue(&target.content, &candidate.content))
            }
            RelationshipType::CausalRelationship => Some(similarity::causal_cue(
                &target.content,
                &candidate.content,
                Some(target.created_at),
                Some(candidate.created_at),
            )),
            RelationshipType::ContextualAssociation => Some(similarity::contextual_association(
                &target.metadata,
                &candidate.metadata,
                target.memory_type,
                candidate.memory_type,
                Some(target.importance_score),
                Some(candidate.importance_score),
            )),
        }
    }

    /// Score one candidate against the target for the requested axes
    /// (spec.md §4.4, "Per-candidate calculation").
    fn score_pair(
        &self,
        target: &Memory,
        candidate: &Memory,
        requested: &[RelationshipType],
    ) -> Relationship {
        let mut scores = HashMap::new();
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;

        for &axis in requested {
            if let Some(score) = self.axis_score(target, candidate, axis) {
                let weight = axis.weight(&self.config.weights);
                weighted_sum += score * weight;
                weight_sum += weight;
                scores.insert(axis, score);
            }
        }

        let composite = if weight_sum > 0.0 {
            (weighted_sum / weight_sum).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let primary = scores
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(axis, _)| *axis)
            .unwrap_or(RelationshipType::SemanticSimilarity);

        Relationship {
            target_id: target.id.clone(),
            related_id: candidate.id.clone(),
            relationship_scores: scores,
            composite_score: composite,
            primary_relationship_type: primary,
            strength: RelationshipStrength::from_score(composite),
        }
    }

    /// Compute relationships from `target` to `pool`, filter below
    /// threshold, sort descending, truncate to `max_connections`
    /// (spec.md §4.4, "Filtering").
    pub fn analyze(
        &self,
        target: &Memory,
        pool: &[Memory],
        requested: &[RelationshipType],
    ) -> Vec<Relationship> {
        let candidates = self.select_candidates(target, pool);

        let mut relationships: Vec<Relationship> = candidates
            .into_iter()
            .map(|c| self.score_pair(target, c, requested))
            .filter(|r| r.composite_score >= self.config.similarity_threshold)
            .collect();

        relationships.sort_by(|a, b| {
            b.composite_score
                .partial_cmp(&a.composite_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        relationships.truncate(self.config.max_connections);

        tracing::debug!(
            target_id = %target.id,
            found = relationships.len(),
            "analyzed relationships"
        );

        relationships
    }

    /// Summarize a batch of relationships (spec.md §4.4, "Insights").
    pub fn summarize(&self, relationships: &[Relationship]) -> RelationshipInsights {
        let mut by_type: HashMap<RelationshipType, usize> = HashMap::new();
        let mut by_strength: HashMap<RelationshipStrength, usize> = HashMap::new();
        let mut top_composite = 0.0f64;

        for r in relationships {
            *by_type.entry(r.primary_relationship_type).or_insert(0) += 1;
            *by_strength.entry(r.strength).or_insert(0) += 1;
            top_composite = top_composite.max(r.composite_score);
        }

        RelationshipInsights {
            total: relationships.len(),
            by_type,
            by_strength,
            top_composite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Metadata, MemoryType};
    use chrono::Utc;

    fn memory(id: &str, content: &str, embedding: Option<Vec<f32>>, importance: f64) -> Memory {
        let now = Utc::now();
        Memory {
            id: id.to_string(),
            content: content.to_string(),
            embedding,
            memory_type: MemoryType::Semantic,
            importance_score: importance,
            created_at: now,
            last_accessed_at: now,
            access_count: 0,
            metadata: Metadata::default(),
        }
    }

    #[test]
    fn candidates_exclude_target_and_missing_embeddings() {
        let analyzer = RelationshipAnalyzer::default();
        let target = memory("t", "target content", Some(vec![1.0, 0.0]), 0.5);
        let pool = vec![
            memory("t", "target content", Some(vec![1.0, 0.0]), 0.5),
            memory("no-embed", "other", None, 0.5),
            memory("c1", "candidate", Some(vec![1.0, 0.0]), 0.8),
        ];
        let candidates = analyzer.select_candidates(&target, &pool);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "c1");
    }

    #[test]
    fn identical_embeddings_yield_high_semantic_similarity() {
        let analyzer = RelationshipAnalyzer::new(RelationshipConfig {
            similarity_threshold: 0.0,
            ..RelationshipConfig::default()
        });
        let target = memory("t", "the cat sat on the mat", Some(vec![1.0, 0.0, 0.0]), 0.5);
        let candidate = memory("c", "the cat sat on the mat", Some(vec![1.0, 0.0, 0.0]), 0.5);
        let results = analyzer.analyze(&target, &[candidate], &RelationshipType::ALL);
        assert_eq!(results.len(), 1);
        assert!(results[0].composite_score > 0.5);
    }

    #[test]
    fn below_threshold_relationships_are_dropped() {
        let analyzer = RelationshipAnalyzer::new(RelationshipConfig {
            similarity_threshold: 0.99,
            ..RelationshipConfig::default()
        });
        let target = memory("t", "alpha beta gamma", Some(vec![1.0, 0.0]), 0.5);
        let candidate = memory("c", "completely unrelated zebra content", Some(vec![0.0, 1.0]), 0.5);
        let results = analyzer.analyze(&target, &[candidate], &RelationshipType::ALL);
        assert!(results.is_empty());
    }

    #[test]
    fn summarize_counts_by_strength() {
        let analyzer = RelationshipAnalyzer::default();
        let relationships = vec![Relationship {
            target_id: "t".into(),
            related_id: "c".into(),
            relationship_scores: HashMap::new(),
            composite_score: 0.9,
            primary_relationship_type: RelationshipType::SemanticSimilarity,
            strength: RelationshipStrength::VeryStrong,
        }];
        let insights = analyzer.summarize(&relationships);
        assert_eq!(insights.total, 1);
        assert_eq!(insights.top_composite, 0.9);
        assert_eq!(insights.by_strength[&RelationshipStrength::VeryStrong], 1);
    }
}
