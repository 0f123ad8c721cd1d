//! Per-model aging formulae (spec.md §4.2).
//!
//! Each function takes the shared scalars (`age`, `idle`, access history)
//! plus the subset of [`AgingConfig`](crate::config::AgingConfig) it needs,
//! and returns a `(strength, decay_factor, half_life_days, confidence)`
//! tuple before memory-type modifiers or strength categorization are
//! applied — those live in [`super::engine`].

use crate::config::AgingConfig;
use crate::types::AccessEvent;

pub struct ModelOutput {
    pub strength: f64,
    pub decay_factor: f64,
    pub half_life_days: f64,
    pub confidence: f64,
}

fn recent_access_count(history: &[AccessEvent], now: chrono::DateTime<chrono::Utc>, days: i64) -> usize {
    history
        .iter()
        .filter(|a| (now - a.timestamp).num_days() <= days)
        .count()
}

pub fn ebbinghaus(
    idle_days: f64,
    history: &[AccessEvent],
    now: chrono::DateTime<chrono::Utc>,
    cfg: &AgingConfig,
) -> ModelOutput {
    let n = history.len();
    let strength_factor = cfg.half_life_days * (1.0 + (1.0 + n as f64).ln());
    let retention = (-idle_days / strength_factor).exp();

    let recent = recent_access_count(history, now, 7);
    let boost = (recent as f64 * 0.05).min(0.3);

    let strength = (retention + boost).clamp(0.0, 1.0);
    let decay_factor = (-idle_days / cfg.half_life_days).exp() + boost;
    let half_life_days = strength_factor * std::f64::consts::LN_2;
    let confidence = (0.5 + 0.05 * n as f64).min(1.0);

    ModelOutput {
        strength,
        decay_factor,
        half_life_days,
        confidence,
    }
}

pub fn power_law(idle_days: f64, history: &[AccessEvent], cfg: &AgingConfig) -> ModelOutput {
    let n = history.len();
    let decay_param = cfg.decay_rate * (1.0 - (n as f64 / 20.0).min(0.5));
    let retention = (1.0 + idle_days).powf(-decay_param);
    let frequency_protection = (n as f64 * 0.02).min(0.4);

    let strength = (retention + frequency_protection).clamp(0.0, 1.0);
    let half_life_days = 2f64.powf(1.0 / decay_param) - 1.0;
    let confidence = (0.6 + 0.03 * n as f64).min(1.0);

    ModelOutput {
        strength,
        decay_factor: retention,
        half_life_days,
        confidence,
    }
}

pub fn exponential(idle_days: f64, history: &[AccessEvent], cfg: &AgingConfig) -> ModelOutput {
    let decay_factor = (-idle_days / cfg.half_life_days).exp();
    let protection = (history.len() as f64 * 0.02).min(0.3);
    let strength = (decay_factor + protection).clamp(0.0, 1.0);
    let confidence = (0.5 + 0.05 * history.len() as f64).min(1.0);

    ModelOutput {
        strength,
        decay_factor,
        half_life_days: cfg.half_life_days,
        confidence,
    }
}

/// Current spacing level: the largest index `L` such that the cumulative
/// expected interval `sum(intervals[..=L])` (from the first access) was
/// met by the last access.
fn spacing_level(
    access_times: &[chrono::DateTime<chrono::Utc>],
    intervals: &[f64],
) -> usize {
    let first = access_times[0];
    let last = *access_times.last().unwrap();
    let mut level = 0usize;
    let mut cumulative = 0.0;
    for (i, interval) in intervals.iter().enumerate() {
        cumulative += interval;
        let expected = first + chrono::Duration::seconds((cumulative * 86400.0) as i64);
        if last >= expected {
            level = i + 1;
        } else {
            break;
        }
    }
    level
}

pub fn spacing_effect(
    history: &[AccessEvent],
    now: chrono::DateTime<chrono::Utc>,
    cfg: &AgingConfig,
) -> ModelOutput {
    if history.is_empty() {
        return exponential(0.0, history, cfg);
    }

    let mut access_times: Vec<_> = history.iter().map(|a| a.timestamp).collect();
    access_times.sort();
    let intervals = &cfg.spacing_intervals_days;

    let level = spacing_level(&access_times, intervals);
    let last_access = *access_times.last().unwrap();
    let idle_days = (now - last_access).num_seconds() as f64 / 86400.0;
    let capped_level = level.min(intervals.len() - 1);
    let next_interval = intervals[capped_level];

    let optimal_spacing_score = level as f64 / intervals.len() as f64;
    let base_strength = 0.8 + optimal_spacing_score * 0.2;

    let strength = if idle_days <= next_interval {
        base_strength
    } else {
        let overflow = idle_days - next_interval;
        base_strength * (-overflow / (next_interval * 2.0)).exp()
    };

    let half_life_days = next_interval * 1.5;
    let confidence = (0.7 + 0.03 * history.len() as f64).min(1.0);

    ModelOutput {
        strength: strength.clamp(0.0, 1.0),
        decay_factor: strength.clamp(0.0, 1.0),
        half_life_days,
        confidence,
    }
}

pub fn interference(
    age_days: f64,
    history: &[AccessEvent],
    now: chrono::DateTime<chrono::Utc>,
    content_complexity: f64,
    cfg: &AgingConfig,
) -> ModelOutput {
    let base = (-age_days / cfg.half_life_days).exp();

    let estimated_similar_accesses = history.len() as f64 * 0.3;
    let interference_decay = cfg.interference_factor * estimated_similar_accesses * (1.0 - content_complexity);

    let idle_days = match history.last() {
        Some(a) => (now - a.timestamp).num_seconds() as f64 / 86400.0,
        None => age_days,
    };
    let recency = (-idle_days / 7.0).exp() * 0.2;

    let strength = (base - interference_decay + recency).clamp(0.05, 1.0);
    let half_life_days = cfg.half_life_days / (1.0 + interference_decay);
    let confidence = (0.4 + 0.06 * history.len() as f64).min(1.0);

    ModelOutput {
        strength,
        decay_factor: base - interference_decay,
        half_life_days,
        confidence,
    }
}

pub fn consolidation(
    age_days: f64,
    idle_days: f64,
    history: &[AccessEvent],
    cfg: &AgingConfig,
) -> ModelOutput {
    let period = cfg.consolidation_period_days;
    let (base_strength, k) = if age_days <= period {
        let fraction = age_days / period;
        (0.3 + fraction * 0.4, cfg.decay_rate * (2.0 - fraction))
    } else {
        (0.7, cfg.decay_rate * 0.5)
    };

    let temporal_factor = (-idle_days * k / cfg.half_life_days).exp();
    let bonus = (history.len() as f64 * 0.03).min(0.3);
    let strength = (base_strength * temporal_factor + bonus).clamp(0.0, 1.0);

    let half_life_days = if age_days > period {
        cfg.half_life_days * 1.5
    } else {
        cfg.half_life_days * (age_days / period)
    };
    let confidence = (0.6 + 0.04 * history.len() as f64).min(1.0);

    ModelOutput {
        strength,
        decay_factor: temporal_factor,
        half_life_days,
        confidence,
    }
}
