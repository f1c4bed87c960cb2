use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use dimcluster::builder::{ClusterBuilder, DimensionClusterBuilder};
use dimcluster::core::EmbeddingSpace;
use dimcluster::extractor::{tolerance, widest_window, ClusterExtractor, SortedProjection};
use rand::prelude::*;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

fn synthetic_space(nitems: usize, nfeatures: usize, seed: u64) -> EmbeddingSpace {
    let mut rng = StdRng::seed_from_u64(seed);
    let labels: Vec<String> = (0..nitems).map(|i| format!("Q{}", i)).collect();
    let rows: Vec<Vec<f64>> = (0..nitems)
        .map(|_| (0..nfeatures).map(|_| rng.random_range(-0.5..1.5)).collect())
        .collect();
    EmbeddingSpace::new(labels, rows).expect("synthetic space")
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dimension_extraction");
    group.measurement_time(Duration::from_secs(10));

    for nitems in [10_000usize, 100_000, 1_000_000] {
        let space = synthetic_space(nitems, 1, 42);

        group.bench_function(BenchmarkId::new("window_scan", nitems), |b| {
            b.iter_batched(
                || SortedProjection::from_space(&space, 0).expect("finite"),
                |proj| {
                    let tol = tolerance(proj.values());
                    black_box(widest_window(proj.values(), tol));
                },
                BatchSize::LargeInput,
            )
        });

        let extractor = ClusterExtractor::for_space(&space);
        group.bench_function(BenchmarkId::new("extract", nitems), |b| {
            b.iter(|| black_box(extractor.extract(&space, 0).expect("finite")))
        });
    }
    group.finish();

    let mut group = c.benchmark_group("builder_run");
    group.sample_size(10);
    let space = Arc::new(synthetic_space(20_000, 128, 7));
    for workers in [1usize, 4, 8] {
        group.bench_function(BenchmarkId::new("workers", workers), |b| {
            let builder = DimensionClusterBuilder::new(Arc::clone(&space)).with_workers(workers);
            b.iter(|| black_box(builder.run().expect("run")))
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
