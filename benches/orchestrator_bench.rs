//! Memnexus Core Benchmarks
//!
//! Benchmarks for the aging, importance, and deduplication hot paths using
//! Criterion. Run with: cargo bench -p memnexus-core

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use memnexus_core::prelude::*;
use memnexus_core::similarity::cosine_similarity;
use memnexus_core::types::{Metadata, MemoryType};

fn synthetic_memories(n: usize, duplicate_every: usize) -> Vec<Memory> {
    (0..n)
        .map(|i| {
            let now = Utc::now();
            let content = if duplicate_every > 0 && i % duplicate_every == 0 {
                "the quarterly planning document needs review before friday".to_string()
            } else {
                format!("unique memory content entry number {i} about various topics")
            };
            Memory {
                id: format!("mem-{i}"),
                content,
                embedding: None,
                memory_type: MemoryType::Semantic,
                importance_score: 0.5,
                created_at: now - chrono::Duration::days((i % 90) as i64),
                last_accessed_at: now,
                access_count: (i % 10) as u64,
                metadata: Metadata::default(),
            }
        })
        .collect()
}

fn bench_aging_calculate(c: &mut Criterion) {
    let engine = AgingEngine::default();
    let now = Utc::now();
    let created_at = now - chrono::Duration::days(45);
    let history: Vec<AccessEvent> = (0..5).map(|i| AccessEvent::new(now - chrono::Duration::days(i))).collect();

    c.bench_function("aging_calculate_auto", |b| {
        b.iter(|| {
            black_box(engine.calculate(created_at, &history, MemoryType::Semantic, 0.4, None, now));
        })
    });
}

fn bench_importance_calculate(c: &mut Criterion) {
    let engine = ImportanceEngine::default();
    let now = Utc::now();
    let pattern = AccessPattern {
        total_accesses: 12,
        recent_accesses: 3,
        last_accessed: Some(now),
        search_appearances: 4,
        avg_search_position: 2.5,
        ..Default::default()
    };

    c.bench_function("importance_calculate", |b| {
        b.iter(|| {
            black_box(engine.calculate(
                "a moderately detailed memory about project planning and architecture",
                MemoryType::Semantic,
                &pattern,
                now,
            ));
        })
    });
}

fn bench_cosine_similarity(c: &mut Criterion) {
    let a: Vec<f32> = (0..1536).map(|i| (i as f32).sin()).collect();
    let b: Vec<f32> = (0..1536).map(|i| (i as f32).cos()).collect();

    c.bench_function("cosine_similarity_1536d", |bencher| {
        bencher.iter(|| {
            black_box(cosine_similarity(&a, &b));
        })
    });
}

fn bench_detect_exact_100(c: &mut Criterion) {
    let memories = synthetic_memories(100, 10);

    c.bench_function("detect_exact_100", |b| {
        b.iter(|| {
            black_box(memnexus_core::dedup::detect_exact(&memories));
        })
    });
}

fn bench_detect_fuzzy_100(c: &mut Criterion) {
    let memories = synthetic_memories(100, 10);
    let cfg = DeduplicationConfig::default();

    c.bench_function("detect_fuzzy_100", |b| {
        b.iter(|| {
            black_box(memnexus_core::dedup::detect_fuzzy(&memories, &cfg));
        })
    });
}

fn bench_estimate_processing_time(c: &mut Criterion) {
    let cfg = DeduplicationConfig::default();

    c.bench_function("estimate_processing_time_10k", |b| {
        b.iter(|| {
            black_box(cfg.estimate_processing_time_ms(10_000));
        })
    });
}

criterion_group!(
    benches,
    bench_aging_calculate,
    bench_importance_calculate,
    bench_cosine_similarity,
    bench_detect_exact_100,
    bench_detect_fuzzy_100,
    bench_estimate_processing_time,
);
criterion_main!(benches);
