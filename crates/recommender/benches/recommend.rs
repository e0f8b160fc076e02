//! Benchmarks for the scoring path.
//!
//! Run with: cargo bench --package recommender

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use factor_model::{AlsConfig, AlsTrainer};
use recommender::{Recommender, build_snapshot};
use signal_store::{Interaction, SignalSet, SignalWeights};

fn synthetic_engine() -> Recommender {
    let mut rng = StdRng::seed_from_u64(99);
    let mut clicks = Vec::new();
    let mut orders = Vec::new();
    for user_id in 0..500i64 {
        for _ in 0..20 {
            let item_id = rng.gen_range(0..200i64);
            clicks.push(Interaction::new(user_id, item_id, rng.gen_range(1.0..5.0)));
            if rng.gen_bool(0.1) {
                orders.push(Interaction::new(user_id, item_id, 1.0));
            }
        }
    }
    let signals = SignalSet {
        clicks,
        orders,
        ratings: vec![],
    };

    let trainer = AlsTrainer::new(AlsConfig {
        factors: 32,
        iterations: 5,
        ..Default::default()
    });
    let snapshot = build_snapshot(&signals, &SignalWeights::default(), &trainer)
        .expect("Failed to build benchmark snapshot");
    Recommender::new(snapshot)
}

fn bench_recommend_known_user(c: &mut Criterion) {
    let engine = synthetic_engine();

    c.bench_function("recommend_known_user", |b| {
        b.iter(|| {
            let result = engine.recommend(black_box(1), black_box(10));
            black_box(result)
        })
    });
}

fn bench_recommend_cold_start(c: &mut Criterion) {
    let engine = synthetic_engine();

    c.bench_function("recommend_cold_start", |b| {
        b.iter(|| {
            let result = engine.recommend(black_box(-1), black_box(10));
            black_box(result)
        })
    });
}

criterion_group!(benches, bench_recommend_known_user, bench_recommend_cold_start);
criterion_main!(benches);
