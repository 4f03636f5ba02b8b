//! Unit tests for scaling and principal component decomposition

use loadrank::pipeline::{AnalysisError, FeatureMatrix, Pca, StandardScaler};

#[path = "common/mod.rs"]
mod common;

use common::*;

fn scaled(df: &polars::prelude::DataFrame) -> FeatureMatrix {
    let matrix = FeatureMatrix::from_dataframe(df).unwrap();
    StandardScaler::fit_transform(&matrix).unwrap().1
}

#[test]
fn test_small_dataset_yields_one_component_per_feature() {
    let df = create_small_numeric_dataframe();

    let decomposition = Pca::fit(&scaled(&df)).unwrap();

    assert_eq!(decomposition.n_components(), 3);
    assert_eq!(decomposition.n_features(), 3);
    let total: f64 = decomposition.explained_variance_ratio.iter().sum();
    assert!((total - 1.0).abs() < 1e-9, "ratios sum to {}", total);
}

#[test]
fn test_ratios_sum_to_one_and_are_ordered() {
    let df = create_random_dataframe(250, 8, 17);

    let decomposition = Pca::fit(&scaled(&df)).unwrap();

    let ratios = &decomposition.explained_variance_ratio;
    assert_eq!(ratios.len(), 8);
    assert!((ratios.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    for pair in ratios.windows(2) {
        assert!(pair[0] >= pair[1], "ratios not descending: {:?}", ratios);
    }
    assert!(ratios.iter().all(|r| *r >= 0.0));
}

#[test]
fn test_standardized_total_variance_equals_feature_count() {
    // Covariance of standardized data (divisor n-1) has trace p * n / (n-1)
    let df = create_random_dataframe(100, 5, 3);

    let decomposition = Pca::fit(&scaled(&df)).unwrap();

    let total: f64 = decomposition.explained_variance.iter().sum();
    let expected = 5.0 * 100.0 / 99.0;
    assert!((total - expected).abs() < 1e-8, "expected {}, got {}", expected, total);
}

#[test]
fn test_more_features_than_rows_keeps_every_component() {
    let df = create_random_dataframe(4, 6, 5);

    let decomposition = Pca::fit(&scaled(&df)).unwrap();

    assert_eq!(decomposition.n_components(), 6);
    let ratios = &decomposition.explained_variance_ratio;
    assert!((ratios.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    // Only n - 1 = 3 directions can carry variance
    assert!(decomposition.cumulative_variance(3) > 1.0 - 1e-9);
}

#[test]
fn test_feature_names_carried_through() {
    let df = create_small_numeric_dataframe();

    let decomposition = Pca::fit(&scaled(&df)).unwrap();

    assert_eq!(decomposition.feature_names, vec!["a", "b", "c"]);
}

#[test]
fn test_cumulative_variance_is_monotone() {
    let df = create_random_dataframe(60, 6, 8);
    let decomposition = Pca::fit(&scaled(&df)).unwrap();

    let mut previous = 0.0;
    for k in 1..=6 {
        let current = decomposition.cumulative_variance(k);
        assert!(current >= previous);
        previous = current;
    }
    assert!((decomposition.cumulative_variance(100) - 1.0).abs() < 1e-9);
}

#[test]
fn test_scaler_rejects_reordered_columns() {
    let df = create_small_numeric_dataframe();
    let matrix = FeatureMatrix::from_dataframe(&df).unwrap();
    let scaler = StandardScaler::fit(&matrix).unwrap();

    let mut reordered = matrix.clone();
    reordered.feature_names.swap(0, 1);

    assert!(matches!(
        scaler.transform(&reordered),
        Err(AnalysisError::FeatureMismatch { .. })
    ));
}
