//! Benchmarks for KNN imputation and principal component fitting
//!
//! Run with: cargo bench --bench pipeline_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use loadrank::pipeline::{rank_features, FeatureMatrix, KnnImputer, Pca, StandardScaler};

/// Generate synthetic county-like data with a share of cells blanked out
fn generate_test_dataframe(n_rows: usize, n_features: usize, missing_rate: f64, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let columns: Vec<Column> = (0..n_features)
        .map(|i| {
            let values: Vec<Option<f64>> = (0..n_rows)
                .map(|_| {
                    if rng.gen::<f64>() < missing_rate {
                        None
                    } else {
                        Some(rng.gen::<f64>() * 100.0)
                    }
                })
                .collect();
            Column::new(format!("feature_{}", i).into(), values)
        })
        .collect();

    DataFrame::new(columns).expect("Failed to create DataFrame")
}

/// Imputation cost as the number of counties grows (32 features, 1% missing)
fn benchmark_imputation_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_imputation_by_rows");
    group.sample_size(10);

    for n_rows in [500, 1_000, 3_000] {
        let df = generate_test_dataframe(n_rows, 32, 0.01, 42);
        group.throughput(Throughput::Elements(n_rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &df, |b, df| {
            b.iter(|| KnnImputer::new(10).fit_transform(black_box(df)).unwrap())
        });
    }

    group.finish();
}

/// Scale + decompose + rank for varying feature counts
fn benchmark_decomposition_by_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("pca_by_features");
    group.sample_size(30);

    for n_features in [8, 32, 128] {
        let df = generate_test_dataframe(3_000, n_features, 0.0, 7);
        let matrix = FeatureMatrix::from_dataframe(&df).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(n_features),
            &matrix,
            |b, matrix| {
                b.iter(|| {
                    let (_, scaled) = StandardScaler::fit_transform(black_box(matrix)).unwrap();
                    let decomposition = Pca::fit(&scaled).unwrap();
                    rank_features(&decomposition, 18).unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_imputation_by_rows,
    benchmark_decomposition_by_features
);
criterion_main!(benches);
