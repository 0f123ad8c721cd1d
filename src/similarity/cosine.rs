//! Cosine similarity over fixed-length embedding vectors (spec.md §4.1).

/// Cosine similarity, clamped to `[0, 1]` — negative cosine is treated as
/// 0 (spec.md: "memories are assumed non-antonymous"). Returns 0 when the
/// vectors differ in length or either norm is zero.
pub fn cosine_similarity(u: &[f32], v: &[f32]) -> f64 {
    if u.len() != v.len() || u.is_empty() {
        tracing::debug!(len_u = u.len(), len_v = v.len(), "cosine: dimension mismatch");
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_u = 0.0_f64;
    let mut norm_v = 0.0_f64;
    for (a, b) in u.iter().zip(v.iter()) {
        let a = *a as f64;
        let b = *b as f64;
        dot += a * b;
        norm_u += a * a;
        norm_v += b * b;
    }

    if norm_u == 0.0 || norm_v == 0.0 {
        tracing::debug!("cosine: zero-norm vector");
        return 0.0;
    }

    let cos = dot / (norm_u.sqrt() * norm_v.sqrt());
    cos.max(0.0).min(1.0)
}
