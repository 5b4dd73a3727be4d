//! Criterion benchmarks for ccm_core aggregators
//!
//! Run with: cargo bench -p ccm_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand_distr::LogNormal;

use ccm_core::histogram::{Histogram, HistogramOptions, ZeroFold, display_domain, filter_near_zeros};
use ccm_core::model::SparseSample;
use ccm_core::valuation::{
    RiskAversion, ValuationMetric, evaluate_batch, expected_value_99, risk_weighted_utility,
    weighted_linear_utility,
};

fn create_sample(seed: u64, dense_len: usize, num_zeros: usize) -> SparseSample {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = LogNormal::new(1.0, 2.0).unwrap();
    let values = (0..dense_len)
        .map(|i| {
            let v = dist.sample(&mut rng);
            if i % 10 == 0 { -v } else { v }
        })
        .collect();
    SparseSample::from_unsorted(values, num_zeros)
}

fn bench_aggregators(c: &mut Criterion) {
    let sample = create_sample(42, 50_000, 0);

    c.bench_function("ev99_50k", |b| b.iter(|| expected_value_99(black_box(&sample))));
    c.bench_function("reu_50k", |b| {
        b.iter(|| risk_weighted_utility(black_box(&sample), RiskAversion::Medium))
    });
    c.bench_function("wlu_50k", |b| {
        b.iter(|| weighted_linear_utility(black_box(&sample), RiskAversion::Medium))
    });
}

fn bench_sparse_vs_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_vs_dense");
    let sparse = create_sample(7, 5_000, 45_000);
    let dense = sparse.materialize();

    group.bench_function("reu_sparse", |b| {
        b.iter(|| risk_weighted_utility(black_box(&sparse), RiskAversion::High))
    });
    group.bench_function("reu_dense", |b| {
        b.iter(|| risk_weighted_utility(black_box(&dense), RiskAversion::High))
    });
    group.bench_function("median_sparse", |b| b.iter(|| black_box(&sparse).median()));

    group.finish();
}

fn bench_histogram(c: &mut Criterion) {
    let sample = create_sample(11, 50_000, 50_000);
    let fold = ZeroFold {
        num_zeros: sample.num_zeros,
        dense_len: sample.dense_len(),
    };

    c.bench_function("histogram_50k", |b| {
        b.iter(|| {
            let filtered = filter_near_zeros(black_box(&sample.samples));
            let domain = display_domain(&sample).unwrap();
            Histogram::build(&filtered, domain, &HistogramOptions::default(), Some(fold))
        })
    });
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_batch");
    let metrics = ValuationMetric::ALTERNATIVES;

    for count in [4, 16, 64].iter() {
        let samples: Vec<SparseSample> = (0..*count)
            .map(|seed| create_sample(seed, 10_000, 10_000))
            .collect();

        group.bench_with_input(BenchmarkId::new("samples", count), count, |b, _| {
            b.iter(|| evaluate_batch(black_box(&samples), black_box(&metrics)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_aggregators,
    bench_sparse_vs_dense,
    bench_histogram,
    bench_batch,
);
criterion_main!(benches);
