// Ranking benchmarks over random catalogs
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use tripsim_core::{Catalog, FeatureStore, RawRow};
use tripsim_similarity::{ts_ss, tsss_similarity, Ranker};

fn generate_catalog(size: usize, dim: usize) -> Catalog {
    let mut rng = StdRng::seed_from_u64(42);
    let rows = (0..size).map(|i| {
        let values: Vec<f64> = (0..dim).map(|_| rng.random_range(0.0..10.0)).collect();
        RawRow::dense(format!("item {}", i), &values)
    });
    FeatureStore::new().build(rows).unwrap()
}

fn benchmark_metrics(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let a: Vec<f64> = (0..32).map(|_| rng.random_range(-1.0..1.0)).collect();
    let b: Vec<f64> = (0..32).map(|_| rng.random_range(-1.0..1.0)).collect();

    c.bench_function("ts_ss_32", |bench| bench.iter(|| ts_ss(black_box(&a), black_box(&b))));
    c.bench_function("tsss_32", |bench| {
        bench.iter(|| tsss_similarity(black_box(&a), black_box(&b)))
    });
}

fn benchmark_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");

    for size in [1_000, 10_000].iter() {
        let catalog = generate_catalog(*size, 16);
        let ranker = Ranker::new(&catalog);
        let prefs = ["item 1", "item 2", "item 3"];

        group.bench_with_input(BenchmarkId::new("nearest", size), size, |b, _| {
            b.iter(|| ranker.nearest(black_box("item 0"), 10).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("vote", size), size, |b, _| {
            b.iter(|| ranker.vote(black_box(&prefs), 50).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("centroid", size), size, |b, _| {
            b.iter(|| ranker.centroid(black_box(&prefs), 50).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_metrics, benchmark_ranking);
criterion_main!(benches);
