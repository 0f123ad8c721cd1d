//! Multi-term temporal decay factor (spec.md §4.3, `decay_factor`):
//! Ebbinghaus + power-law retention blended with spacing, consolidation,
//! interference, and search-protection terms.

use crate::config::ImportanceConfig;

const CONSOLIDATION_PERIOD_DAYS: f64 = 7.0;
const SPACING_INTERVALS: [f64; 7] = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0];

/// Inputs the decay factor needs beyond `ImportanceConfig`. `idle_days` is
/// `None` when the memory has never been accessed (no `last_accessed`).
#[derive(Debug, Clone, Copy)]
pub struct DecayInputs {
    pub idle_days: Option<f64>,
    pub total_accesses: u64,
    pub recent_accesses: u64,
    pub search_appearances: u64,
    pub avg_search_position: f64,
}

/// A memory with no recorded access has no temporal decay to apply
/// (spec.md §4.3; matches `importance_engine.py`'s
/// `if not pattern.last_accessed: return 1.0` short-circuit ahead of any
/// term computation).
pub fn decay_factor(inputs: DecayInputs, cfg: &ImportanceConfig) -> f64 {
    let Some(idle_days) = inputs.idle_days else {
        return 1.0;
    };

    let n = inputs.total_accesses as f64;
    let idle = idle_days.max(0.0);

    let strength_factor = cfg.half_life_days * (1.0 + (1.0 + n).ln());
    let ebbinghaus = (-idle / strength_factor).exp();

    let decay_param = 0.1 * (1.0 - (n / 20.0).min(0.5));
    let power_law = (1.0 + idle).powf(-decay_param);

    let spacing_bonus = if inputs.recent_accesses > 0 {
        SPACING_INTERVALS
            .iter()
            .enumerate()
            .find(|(_, interval)| idle <= *interval * 1.5)
            .map(|(i, _)| ((i + 1) as f64 * 0.03).min(0.2))
            .unwrap_or(0.0)
    } else {
        0.0
    };

    let (fragility_penalty, stability_bonus) = if idle <= CONSOLIDATION_PERIOD_DAYS {
        let consolidation_factor = idle / CONSOLIDATION_PERIOD_DAYS;
        ((1.0 - consolidation_factor) * 0.15, 0.0)
    } else {
        (0.0, ((idle - CONSOLIDATION_PERIOD_DAYS) / 30.0 * 0.1).min(0.1))
    };

    let interference = if inputs.total_accesses > 15 {
        let density = n / idle.max(1.0);
        if density > 1.0 {
            ((density - 1.0) * 0.05).min(0.1)
        } else {
            0.0
        }
    } else {
        0.0
    };

    let recent_boost = if inputs.recent_accesses > 0 {
        let days_since_recent = idle.min(7.0);
        (inputs.recent_accesses as f64 * 0.08).min(0.3) * (-days_since_recent / 3.0).exp()
    } else {
        0.0
    };

    let frequency_protection = if inputs.total_accesses > 1 {
        ((1.0 + n).ln() / 21f64.ln() * 0.25).min(0.25)
    } else {
        0.0
    };

    let search_protection = if inputs.search_appearances > 0 {
        let avg_position_factor = (1.0 - (inputs.avg_search_position - 1.0) / 9.0).max(0.1);
        let search_frequency_factor = (inputs.search_appearances as f64 / 10.0).min(1.0);
        avg_position_factor * search_frequency_factor * 0.15
    } else {
        0.0
    };

    let primary = ebbinghaus * 0.4 + power_law * 0.3;
    let enhancement = spacing_bonus + recent_boost + frequency_protection + search_protection + stability_bonus;
    let penalty = fragility_penalty + interference;

    let combined = (primary + enhancement - penalty).clamp(0.05, 1.0);

    if combined >= 0.8 {
        combined * 0.95 + 0.05
    } else if combined >= 0.6 {
        combined * 0.9 + 0.1
    } else if combined >= 0.3 {
        combined
    } else {
        (combined * 1.1).max(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ImportanceConfig {
        ImportanceConfig::default()
    }

    #[test]
    fn never_accessed_memory_has_no_decay() {
        let inputs = DecayInputs {
            idle_days: None,
            total_accesses: 0,
            recent_accesses: 0,
            search_appearances: 0,
            avg_search_position: 10.0,
        };
        assert_eq!(decay_factor(inputs, &cfg()), 1.0);
    }

    #[test]
    fn in_bounds_for_fresh_memory() {
        let inputs = DecayInputs {
            idle_days: Some(0.0),
            total_accesses: 1,
            recent_accesses: 1,
            search_appearances: 0,
            avg_search_position: 10.0,
        };
        let d = decay_factor(inputs, &cfg());
        assert!((0.05..=1.0).contains(&d));
    }

    #[test]
    fn decays_further_out() {
        let near = decay_factor(
            DecayInputs {
                idle_days: Some(1.0),
                total_accesses: 3,
                recent_accesses: 1,
                search_appearances: 0,
                avg_search_position: 10.0,
            },
            &cfg(),
        );
        let far = decay_factor(
            DecayInputs {
                idle_days: Some(400.0),
                total_accesses: 3,
                recent_accesses: 0,
                search_appearances: 0,
                avg_search_position: 10.0,
            },
            &cfg(),
        );
        assert!(far <= near);
    }

    #[test]
    fn never_below_floor() {
        let d = decay_factor(
            DecayInputs {
                idle_days: Some(5000.0),
                total_accesses: 1,
                recent_accesses: 0,
                search_appearances: 0,
                avg_search_position: 10.0,
            },
            &cfg(),
        );
        assert!(d >= 0.05);
    }
}
