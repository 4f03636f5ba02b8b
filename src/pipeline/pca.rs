//! Full-rank principal component decomposition
//!
//! Algorithm:
//! 1. Form the sample covariance C = Z^T Z / (n - 1) from the scaled matrix Z
//! 2. Eigendecompose C with faer's self-adjoint solver
//! 3. Order components by descending eigenvalue; ratios are eigenvalue / trace
//!
//! Every component is kept. Truncation happens in the ranker.

use faer::{Mat, Side};
use tracing::debug;

use super::error::{AnalysisError, AnalysisResult};
use super::scaler::FeatureMatrix;

/// Fitted decomposition with the feature names its loadings refer to.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Feature names, one per loading column
    pub feature_names: Vec<String>,
    /// Loadings: one row per component, one column per feature
    pub components: Mat<f64>,
    /// Variance captured by each component (covariance eigenvalues)
    pub explained_variance: Vec<f64>,
    /// Share of total variance per component; sums to 1
    pub explained_variance_ratio: Vec<f64>,
}

impl Decomposition {
    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.components.ncols()
    }

    /// Loading coefficient of `feature` on `component`.
    pub fn loading(&self, component: usize, feature: usize) -> f64 {
        self.components[(component, feature)]
    }

    /// Loading vector of one component.
    pub fn component(&self, component: usize) -> Vec<f64> {
        (0..self.n_features())
            .map(|f| self.loading(component, f))
            .collect()
    }

    /// Fraction of total variance explained by the first `k` components.
    pub fn cumulative_variance(&self, k: usize) -> f64 {
        self.explained_variance_ratio.iter().take(k).sum()
    }
}

/// Principal component analysis on a standardized feature matrix.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pca;

impl Pca {
    /// Fit as many components as there are features.
    pub fn fit(data: &FeatureMatrix) -> AnalysisResult<Decomposition> {
        let n_rows = data.nrows();
        let n_features = data.ncols();

        if n_rows < 2 {
            return Err(AnalysisError::EmptyDataset {
                stage: "principal component analysis",
                rows: n_rows,
            });
        }
        if n_features == 0 || data.feature_names.len() != n_features {
            return Err(AnalysisError::FeatureMismatch {
                expected: data.feature_names.len(),
                found: n_features,
            });
        }

        // Centre columns so unscaled input also yields a covariance
        let mut centred = data.values.clone();
        for col in 0..n_features {
            let mean = (0..n_rows).map(|r| centred[(r, col)]).sum::<f64>() / n_rows as f64;
            for row in 0..n_rows {
                centred[(row, col)] -= mean;
            }
        }

        let mut cov = centred.transpose() * &centred;
        let denom = (n_rows - 1) as f64;
        for i in 0..n_features {
            for j in 0..n_features {
                cov[(i, j)] /= denom;
            }
        }

        let eigen = cov.selfadjoint_eigendecomposition(Side::Lower);
        let eigenvalues = eigen.s().column_vector();
        let eigenvectors = eigen.u();

        let mut order: Vec<usize> = (0..n_features).collect();
        order.sort_by(|&a, &b| {
            eigenvalues
                .read(b)
                .partial_cmp(&eigenvalues.read(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut components = Mat::<f64>::zeros(n_features, n_features);
        let mut explained_variance = Vec::with_capacity(n_features);

        for (component, &idx) in order.iter().enumerate() {
            // Round-off can push null-space eigenvalues slightly below zero
            explained_variance.push(eigenvalues.read(idx).max(0.0));

            let vector: Vec<f64> = (0..n_features).map(|f| eigenvectors.read(f, idx)).collect();
            let sign = dominant_sign(&vector);
            for (feature, value) in vector.into_iter().enumerate() {
                components[(component, feature)] = sign * value;
            }
        }

        let total: f64 = explained_variance.iter().sum();
        if total <= f64::EPSILON {
            return Err(AnalysisError::ZeroVariance);
        }
        let explained_variance_ratio: Vec<f64> =
            explained_variance.iter().map(|v| v / total).collect();

        debug!(
            components = n_features,
            first_ratio = explained_variance_ratio.first().copied().unwrap_or(0.0),
            "decomposition fitted"
        );

        Ok(Decomposition {
            feature_names: data.feature_names.clone(),
            components,
            explained_variance,
            explained_variance_ratio,
        })
    }
}

/// +1 or -1 so that the largest-magnitude loading comes out positive.
fn dominant_sign(vector: &[f64]) -> f64 {
    let dominant = vector
        .iter()
        .copied()
        .fold(0.0f64, |best, v| if v.abs() > best.abs() { v } else { best });
    if dominant < 0.0 {
        -1.0
    } else {
        1.0
    }
}
