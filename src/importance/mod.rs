//! Importance Engine (spec.md §4.3): multi-factor scoring fusing access
//! patterns, recency, search-rank signal, content quality, and memory-type
//! weighting into a single score.

mod batch;
mod decay;
mod quality;

pub use batch::{select_batch_candidates, should_write_update};

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ImportanceConfig;
use crate::types::MemoryType;

use decay::DecayInputs;

/// Access/search signal fed into the importance calculation, normally
/// fetched from the store (spec.md §4.3, "Access pattern").
#[derive(Debug, Clone)]
pub struct AccessPattern {
    pub total_accesses: u64,
    pub recent_accesses: u64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub search_appearances: u64,
    pub avg_search_position: f64,
    pub user_interactions: HashMap<String, u64>,
}

impl Default for AccessPattern {
    fn default() -> Self {
        Self {
            total_accesses: 1,
            recent_accesses: 0,
            last_accessed: None,
            search_appearances: 0,
            avg_search_position: 10.0,
            user_interactions: HashMap::new(),
        }
    }
}

/// Output of a single importance calculation (spec.md §3, "ImportanceScore").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportanceScore {
    pub final_score: f64,
    pub frequency: f64,
    pub recency: f64,
    pub search_relevance: f64,
    pub content_quality: f64,
    pub type_weight: f64,
    pub decay_factor: f64,
    pub confidence: f64,
    pub explanation: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportanceEngine {
    config: ImportanceConfig,
}

impl ImportanceEngine {
    pub fn new(config: ImportanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImportanceConfig {
        &self.config
    }

    fn frequency_score(&self, pattern: &AccessPattern) -> f64 {
        let n = pattern.total_accesses;
        let threshold = self.config.high_frequency_threshold;
        if n <= 1 {
            0.1
        } else if n >= threshold {
            (0.8 + (n - threshold) as f64 * 0.01).min(1.0)
        } else {
            (0.1 + 0.7 * (n as f64).ln() / (threshold as f64).ln()).min(0.8)
        }
    }

    fn recency_score(&self, pattern: &AccessPattern, now: DateTime<Utc>) -> f64 {
        let Some(last_accessed) = pattern.last_accessed else {
            return 0.1;
        };
        let d = (now - last_accessed).num_days();
        if d <= 0 {
            1.0
        } else if d == 1 {
            0.9
        } else if d <= 7 {
            0.9 - (d - 1) as f64 * 0.1
        } else {
            (0.2 * (-0.1 * (d - 7) as f64).exp()).max(0.1)
        }
    }

    /// Bonus for content that bridges memory types (e.g. an "example" or
    /// "case study" tying a procedural memory back to semantic facts).
    /// The original engine wires this bonus into search relevance but its
    /// body always evaluates to a constant zero contribution; preserved
    /// here rather than reopened (SPEC_FULL.md §13.3).
    fn cross_type_bonus(&self, _content: &str) -> f64 {
        0.0
    }

    fn search_relevance_score(&self, pattern: &AccessPattern, content: &str) -> f64 {
        if pattern.search_appearances == 0 {
            return 0.3;
        }
        let frequency_component = (pattern.search_appearances as f64 / 20.0).min(1.0);
        let position_component = (1.0 - (pattern.avg_search_position - 1.0) / 9.0).max(0.1);
        let base = frequency_component * 0.6 + position_component * 0.4;
        (base + self.cross_type_bonus(content)).min(1.0)
    }

    fn confidence(&self, pattern: &AccessPattern) -> f64 {
        let mut confidence = 0.5;
        if pattern.total_accesses > 5 {
            confidence += 0.2;
        }
        if pattern.total_accesses > 15 {
            confidence += 0.1;
        }
        if pattern.search_appearances > 0 {
            confidence += 0.1;
        }
        if pattern.recent_accesses > 0 {
            confidence += 0.1;
        }
        confidence.min(1.0)
    }

    fn explain(
        &self,
        frequency: f64,
        recency: f64,
        search_relevance: f64,
        content_quality: f64,
        type_weight: f64,
        decay_factor: f64,
    ) -> String {
        let mut tags = Vec::new();

        if frequency > 0.7 {
            tags.push("frequently accessed");
        } else if frequency > 0.4 {
            tags.push("moderately accessed");
        } else {
            tags.push("rarely accessed");
        }

        if recency > 0.7 {
            tags.push("recently used");
        } else if recency < 0.3 {
            tags.push("not recently accessed");
        }

        if search_relevance > 0.6 {
            tags.push("high search relevance");
        }
        if content_quality > 0.7 {
            tags.push("high-quality content");
        }
        if type_weight > 1.0 {
            tags.push("procedural memory bonus");
        } else if type_weight < 1.0 {
            tags.push("episodic memory");
        }
        if decay_factor < 0.5 {
            tags.push("temporal decay applied");
        }

        if tags.is_empty() {
            "standard scoring".to_string()
        } else {
            tags.join(", ")
        }
    }

    /// Compute the full importance score for a memory (spec.md §4.3).
    pub fn calculate(
        &self,
        content: &str,
        memory_type: MemoryType,
        pattern: &AccessPattern,
        now: DateTime<Utc>,
    ) -> ImportanceScore {
        let frequency = self.frequency_score(pattern);
        let recency = self.recency_score(pattern, now);
        let search_relevance = self.search_relevance_score(pattern, content);
        let content_quality = quality::content_quality(content, &self.config.quality_indicators);
        let type_weight = memory_type.importance_weight();

        let idle_days = pattern
            .last_accessed
            .map(|t| (now - t).num_seconds().max(0) as f64 / 86400.0);
        let decay = decay::decay_factor(
            DecayInputs {
                idle_days,
                total_accesses: pattern.total_accesses,
                recent_accesses: pattern.recent_accesses,
                search_appearances: pattern.search_appearances,
                avg_search_position: pattern.avg_search_position,
            },
            &self.config,
        );

        let weighted = frequency * self.config.frequency_weight
            + recency * self.config.recency_weight
            + search_relevance * self.config.search_relevance_weight
            + content_quality * self.config.content_quality_weight;

        let final_score = (weighted * type_weight * decay).clamp(self.config.min_importance, 1.0);

        let confidence = self.confidence(pattern);
        let explanation = self.explain(frequency, recency, search_relevance, content_quality, type_weight, decay);

        tracing::debug!(final_score, confidence, "computed importance score");

        ImportanceScore {
            final_score,
            frequency,
            recency,
            search_relevance,
            content_quality,
            type_weight,
            decay_factor: decay,
            confidence,
            explanation,
        }
    }
}
