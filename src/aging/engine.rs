//! Aging engine: orchestrates model selection, per-model formulae, the
//! memory-type modifier, strength categorization, and next-review
//! prediction (spec.md §4.2).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{AgingConfig, AgingModel};
use crate::types::{AccessEvent, MemoryType};

use super::models::{self, ModelOutput};

/// Categorized memory strength (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryStrength {
    Weak,
    Moderate,
    Strong,
    Crystal,
}

impl MemoryStrength {
    fn from_score(strength: f64) -> Self {
        if strength >= 0.8 {
            MemoryStrength::Crystal
        } else if strength >= 0.6 {
            MemoryStrength::Strong
        } else if strength >= 0.3 {
            MemoryStrength::Moderate
        } else {
            MemoryStrength::Weak
        }
    }
}

/// Output of a single aging calculation (spec.md §3, "AgingResult").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingResult {
    pub current_strength: f64,
    pub decay_factor: f64,
    pub model_used: AgingModel,
    pub strength_category: MemoryStrength,
    pub predicted_half_life_days: f64,
    pub next_optimal_review: Option<DateTime<Utc>>,
    pub confidence: f64,
    pub explanation: String,
}

/// Stateless cognitive-decay calculator. Config is passed per call; no
/// mutable state is kept between memories (spec.md §3 invariant).
#[derive(Debug, Clone, Default)]
pub struct AgingEngine {
    config: AgingConfig,
}

impl AgingEngine {
    pub fn new(config: AgingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AgingConfig {
        &self.config
    }

    /// Select a model when the caller didn't pin one (spec.md §4.2,
    /// "Model selection").
    fn select_model(
        &self,
        memory_type: MemoryType,
        history: &[AccessEvent],
        content_complexity: f64,
    ) -> AgingModel {
        let n = history.len();
        if memory_type == MemoryType::Procedural && n > 10 {
            return AgingModel::SpacingEffect;
        }
        if content_complexity > 0.7 {
            return AgingModel::Consolidation;
        }
        if memory_type == MemoryType::Episodic && n > 5 {
            return AgingModel::Interference;
        }
        if memory_type == MemoryType::Semantic {
            return AgingModel::Ebbinghaus;
        }
        if n < 3 {
            return AgingModel::PowerLaw;
        }
        AgingModel::Ebbinghaus
    }

    /// Compute the full aging result for a memory (spec.md §4.2).
    #[allow(clippy::too_many_arguments)]
    pub fn calculate(
        &self,
        created_at: DateTime<Utc>,
        access_history: &[AccessEvent],
        memory_type: MemoryType,
        content_complexity: f64,
        model: Option<AgingModel>,
        now: DateTime<Utc>,
    ) -> AgingResult {
        let resolved_model = match model.unwrap_or(AgingModel::Auto) {
            AgingModel::Auto => self.select_model(memory_type, access_history, content_complexity),
            explicit => explicit,
        };

        let age_days = (now - created_at).num_seconds().max(0) as f64 / 86400.0;
        let last_access = access_history.last().map(|a| a.timestamp).unwrap_or(created_at);
        let idle_days = (now - last_access).num_seconds().max(0) as f64 / 86400.0;

        let output = match resolved_model {
            AgingModel::Ebbinghaus => models::ebbinghaus(idle_days, access_history, now, &self.config),
            AgingModel::PowerLaw => models::power_law(idle_days, access_history, &self.config),
            AgingModel::Exponential => models::exponential(idle_days, access_history, &self.config),
            AgingModel::SpacingEffect => models::spacing_effect(access_history, now, &self.config),
            AgingModel::Interference => {
                models::interference(age_days, access_history, now, content_complexity, &self.config)
            }
            AgingModel::Consolidation => {
                models::consolidation(age_days, idle_days, access_history, &self.config)
            }
            AgingModel::Auto => unreachable!("resolved above"),
        };

        let modified = self.apply_memory_type_modifier(output, memory_type);
        let strength_category = MemoryStrength::from_score(modified.strength);
        let next_review = self.predict_next_review(
            resolved_model,
            &modified,
            access_history,
            now,
        );

        tracing::debug!(
            model = ?resolved_model,
            strength = modified.strength,
            category = ?strength_category,
            "computed memory aging"
        );

        AgingResult {
            current_strength: modified.strength,
            decay_factor: modified.decay_factor.clamp(0.0, 1.0),
            model_used: resolved_model,
            strength_category,
            predicted_half_life_days: modified.half_life_days.max(0.0),
            next_optimal_review: next_review,
            confidence: modified.confidence.clamp(0.0, 1.0),
            explanation: self.explain(resolved_model, strength_category, modified.half_life_days, age_days),
        }
    }

    /// Memory-type modifier applied after the chosen model runs (spec.md
    /// §4.2, "Memory-type modifier").
    fn apply_memory_type_modifier(&self, mut output: ModelOutput, memory_type: MemoryType) -> ModelOutput {
        let (strength_delta, multiplier) = match memory_type {
            MemoryType::Procedural => (0.1, 0.8),
            MemoryType::Semantic => (0.0, 1.0),
            MemoryType::Episodic => (-0.05, 1.2),
        };
        output.strength = (output.strength + strength_delta).clamp(0.0, 1.0);
        output.decay_factor *= multiplier;
        output.half_life_days *= multiplier;
        output
    }

    /// Predict when the memory should next be reviewed (spec.md §4.2,
    /// "Next optimal review").
    fn predict_next_review(
        &self,
        model: AgingModel,
        output: &ModelOutput,
        history: &[AccessEvent],
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        if model == AgingModel::SpacingEffect {
            let level = history.len();
            if level < self.config.spacing_intervals_days.len() {
                let days = self.config.spacing_intervals_days[level];
                return Some(now + chrono::Duration::seconds((days * 86400.0) as i64));
            }
        }

        if output.strength <= 0.5 {
            return Some(now + chrono::Duration::days(1));
        }

        let k = if output.decay_factor > 0.0 && output.decay_factor < 1.0 {
            -output.decay_factor.ln()
        } else {
            0.1
        };

        if k <= 0.0 {
            return None;
        }

        let days_to_target = ((0.5 / output.strength).ln() / -k).clamp(1.0, 365.0);
        Some(now + chrono::Duration::seconds((days_to_target * 86400.0) as i64))
    }

    fn explain(&self, model: AgingModel, category: MemoryStrength, half_life_days: f64, age_days: f64) -> String {
        let model_label = match model {
            AgingModel::Auto => "auto",
            AgingModel::Ebbinghaus => "Ebbinghaus",
            AgingModel::PowerLaw => "power law",
            AgingModel::Exponential => "exponential",
            AgingModel::SpacingEffect => "spacing effect",
            AgingModel::Interference => "interference",
            AgingModel::Consolidation => "consolidation",
        };
        let strength_label = match category {
            MemoryStrength::Crystal => "crystallized memory with minimal decay",
            MemoryStrength::Strong => "strong memory with slow decay",
            MemoryStrength::Moderate => "moderate strength with standard decay",
            MemoryStrength::Weak => "weak memory requiring attention",
        };
        let horizon = if half_life_days > 60.0 {
            "long-term stability"
        } else if half_life_days > 20.0 {
            "medium-term retention"
        } else {
            "short-term retention"
        };

        if model == AgingModel::Consolidation {
            let phase = if age_days > self.config.consolidation_period_days {
                "consolidated"
            } else {
                "consolidating"
            };
            return format!("{model_label} aging model, {strength_label}, {horizon}, memory is {phase}");
        }

        format!("{model_label} aging model, {strength_label}, {horizon}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize, now: DateTime<Utc>) -> Vec<AccessEvent> {
        (0..n)
            .map(|i| AccessEvent::new(now - chrono::Duration::days(i as i64)))
            .collect()
    }

    #[test]
    fn auto_selects_ebbinghaus_for_semantic() {
        let engine = AgingEngine::default();
        let now = Utc::now();
        let result = engine.calculate(
            now - chrono::Duration::days(10),
            &history(2, now),
            MemoryType::Semantic,
            0.3,
            None,
            now,
        );
        assert_eq!(result.model_used, AgingModel::Ebbinghaus);
    }

    #[test]
    fn auto_selects_spacing_effect_for_frequent_procedural() {
        let engine = AgingEngine::default();
        let now = Utc::now();
        let result = engine.calculate(
            now - chrono::Duration::days(60),
            &history(12, now),
            MemoryType::Procedural,
            0.3,
            None,
            now,
        );
        assert_eq!(result.model_used, AgingModel::SpacingEffect);
    }

    #[test]
    fn auto_selects_consolidation_for_complex_content() {
        let engine = AgingEngine::default();
        let now = Utc::now();
        let result = engine.calculate(
            now - chrono::Duration::days(5),
            &history(1, now),
            MemoryType::Semantic,
            0.9,
            None,
            now,
        );
        assert_eq!(result.model_used, AgingModel::Consolidation);
    }

    #[test]
    fn explicit_model_overrides_selection() {
        let engine = AgingEngine::default();
        let now = Utc::now();
        let result = engine.calculate(
            now - chrono::Duration::days(5),
            &[],
            MemoryType::Semantic,
            0.3,
            Some(AgingModel::Interference),
            now,
        );
        assert_eq!(result.model_used, AgingModel::Interference);
    }

    #[test]
    fn scores_always_in_unit_interval() {
        let engine = AgingEngine::default();
        let now = Utc::now();
        for days in [0, 1, 30, 365, 1000] {
            let result = engine.calculate(
                now - chrono::Duration::days(days),
                &history(3, now),
                MemoryType::Episodic,
                0.5,
                None,
                now,
            );
            assert!((0.0..=1.0).contains(&result.current_strength));
            assert!((0.0..=1.0).contains(&result.decay_factor));
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }

    #[test]
    fn weak_memory_reviews_soon() {
        let engine = AgingEngine::default();
        let now = Utc::now();
        let result = engine.calculate(
            now - chrono::Duration::days(1000),
            &[],
            MemoryType::Episodic,
            0.1,
            Some(AgingModel::Exponential),
            now,
        );
        assert!(result.current_strength <= 0.5);
        assert_eq!(result.next_optimal_review, Some(now + chrono::Duration::days(1)));
    }
}
