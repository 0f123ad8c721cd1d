//! Temporal proximity kernel (spec.md §4.1).

use chrono::{DateTime, Utc};

/// `exp(-|delta_hours| / window)`, clamped to `[0, 1]`. Returns 0 if either
/// timestamp is absent; strictly decreasing in `|t1 - t2|` for fixed `t1`
/// (spec.md §8 property 5).
pub fn temporal_proximity(
    t1: Option<DateTime<Utc>>,
    t2: Option<DateTime<Utc>>,
    window_hours: f64,
) -> f64 {
    let (Some(t1), Some(t2)) = (t1, t2) else {
        tracing::debug!("temporal_proximity: missing timestamp");
        return 0.0;
    };
    if window_hours <= 0.0 {
        return 0.0;
    }
    let delta_hours = (t1 - t2).num_seconds().unsigned_abs() as f64 / 3600.0;
    (-delta_hours / window_hours).exp().clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn same_instant_is_one() {
        let t = Utc::now();
        assert!((temporal_proximity(Some(t), Some(t), 24.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_timestamp_is_zero() {
        assert_eq!(temporal_proximity(None, Some(Utc::now()), 24.0), 0.0);
    }

    #[test]
    fn monotonically_decreasing() {
        let t1 = Utc::now();
        let near = t1 + Duration::hours(1);
        let far = t1 + Duration::hours(10);
        let p_near = temporal_proximity(Some(t1), Some(near), 24.0);
        let p_far = temporal_proximity(Some(t1), Some(far), 24.0);
        assert!(p_near > p_far);
    }
}
