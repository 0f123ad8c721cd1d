//! Batch recalculation candidate selection (spec.md §4.3, "Batch
//! recalculation").

use chrono::{DateTime, Utc};

use crate::types::Memory;

const STALE_RECALC_WINDOW_DAYS: i64 = 30;
const STALE_UPDATE_THRESHOLD_DAYS: i64 = 7;

/// Filters and orders memories that are due for importance recalculation:
/// `access_count > 0` OR accessed within the last 30 days, ordered by
/// (access_count > 5 desc, staler-than-a-week desc, last_accessed desc).
pub fn select_batch_candidates<'a>(memories: &'a [Memory], now: DateTime<Utc>) -> Vec<&'a Memory> {
    let mut candidates: Vec<&Memory> = memories
        .iter()
        .filter(|m| {
            m.access_count > 0 || (now - m.last_accessed_at).num_days() <= STALE_RECALC_WINDOW_DAYS
        })
        .collect();

    candidates.sort_by(|a, b| {
        let a_frequent = a.access_count > 5;
        let b_frequent = b.access_count > 5;
        b_frequent
            .cmp(&a_frequent)
            .then_with(|| {
                let a_stale = (now - a.last_accessed_at).num_days() > STALE_UPDATE_THRESHOLD_DAYS;
                let b_stale = (now - b.last_accessed_at).num_days() > STALE_UPDATE_THRESHOLD_DAYS;
                b_stale.cmp(&a_stale)
            })
            .then_with(|| b.last_accessed_at.cmp(&a.last_accessed_at))
    });

    candidates
}

/// Only write a recalculated score back if it moved meaningfully
/// (spec.md §4.3: "An update is written only if `|new − old| > 0.05`").
pub fn should_write_update(old_score: f64, new_score: f64) -> bool {
    (new_score - old_score).abs() > 0.05
}
