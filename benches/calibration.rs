//! Benchmarks for the calibration fitting pipeline and curve application.
//!
//! Run with: `cargo bench --bench calibration`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use calibration_engine::{
    apply_calibration, build_curve, bucketize, pool_adjacent_violators, CalibrationData,
    TradeOutcome,
};

/// Generate synthetic outcomes with confidence loosely predictive of PnL.
fn generate_outcomes(count: usize, seed: u64) -> Vec<TradeOutcome> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let confidence: f64 = rng.gen();
            let edge = (confidence - 0.5) * 4.0;
            let noise = rng.gen_range(-5.0..5.0);
            TradeOutcome::new(confidence, edge + noise)
        })
        .collect()
}

/// Fit a curve from synthetic outcomes.
fn fit_curve(outcomes: &[TradeOutcome]) -> CalibrationData {
    let pooled = pool_adjacent_violators(bucketize(outcomes));
    CalibrationData::from_points("BENCH", build_curve(&pooled))
}

fn bench_fitting(c: &mut Criterion) {
    let mut group = c.benchmark_group("calibration_fit");

    for size in [100usize, 1_000, 10_000] {
        let outcomes = generate_outcomes(size, 42);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &outcomes, |b, outcomes| {
            b.iter(|| {
                let pooled = pool_adjacent_violators(bucketize(black_box(outcomes)));
                black_box(build_curve(&pooled))
            });
        });
    }

    group.finish();
}

fn bench_application(c: &mut Criterion) {
    let outcomes = generate_outcomes(1_000, 7);
    let curve = fit_curve(&outcomes);
    let scores: Vec<f64> = (0..1_000).map(|i| i as f64 / 1_000.0).collect();

    let mut group = c.benchmark_group("calibration_apply");
    group.throughput(Throughput::Elements(scores.len() as u64));
    group.bench_function("apply_1000_scores", |b| {
        b.iter(|| {
            for &score in &scores {
                black_box(apply_calibration(black_box(score), &curve));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_fitting, bench_application);
criterion_main!(benches);
