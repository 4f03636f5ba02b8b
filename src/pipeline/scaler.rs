//! Feature standardization

use faer::Mat;
use polars::prelude::*;
use serde::Serialize;

use super::error::{AnalysisError, AnalysisResult};
use super::outliers::column_moments;

/// Dense feature matrix with the column names it was built from.
///
/// Names travel with the data so that loadings computed downstream can be
/// attributed by name rather than by position.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub feature_names: Vec<String>,
    pub values: Mat<f64>,
}

impl FeatureMatrix {
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Build from a numeric DataFrame. Every cell must be present and finite.
    pub fn from_dataframe(df: &DataFrame) -> AnalysisResult<Self> {
        let n_rows = df.height();
        let n_cols = df.width();
        let mut values = Mat::<f64>::zeros(n_rows, n_cols);
        let mut feature_names = Vec::with_capacity(n_cols);

        for (col_idx, col) in df.get_columns().iter().enumerate() {
            let name = col.name().to_string();
            let cast = col.cast(&DataType::Float64)?;
            for (row_idx, value) in cast.f64()?.iter().enumerate() {
                match value {
                    Some(v) if v.is_finite() => values[(row_idx, col_idx)] = v,
                    _ => {
                        return Err(AnalysisError::InvalidConfig(format!(
                            "column '{}' has a missing or non-finite value at row {}; impute before scaling",
                            name, row_idx
                        )))
                    }
                }
            }
            feature_names.push(name);
        }

        Ok(Self {
            feature_names,
            values,
        })
    }
}

/// Zero-mean, unit-variance scaling using population statistics.
#[derive(Debug, Clone, Serialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl StandardScaler {
    /// Learn per-column mean and standard deviation. A zero deviation is
    /// replaced with 1 so constant columns scale to all zeros.
    pub fn fit(data: &FeatureMatrix) -> AnalysisResult<Self> {
        if data.nrows() == 0 {
            return Err(AnalysisError::EmptyDataset {
                stage: "scaling",
                rows: 0,
            });
        }

        let mut means = Vec::with_capacity(data.ncols());
        let mut scales = Vec::with_capacity(data.ncols());
        for col in 0..data.ncols() {
            let values: Vec<f64> = (0..data.nrows()).map(|row| data.values[(row, col)]).collect();
            let (mean, std) = column_moments(&values);
            means.push(mean);
            scales.push(if std > 0.0 { std } else { 1.0 });
        }

        Ok(Self {
            feature_names: data.feature_names.clone(),
            means,
            scales,
        })
    }

    pub fn transform(&self, data: &FeatureMatrix) -> AnalysisResult<FeatureMatrix> {
        if data.feature_names != self.feature_names {
            return Err(AnalysisError::FeatureMismatch {
                expected: self.feature_names.len(),
                found: data.ncols(),
            });
        }

        let mut values = Mat::<f64>::zeros(data.nrows(), data.ncols());
        for col in 0..data.ncols() {
            for row in 0..data.nrows() {
                values[(row, col)] = (data.values[(row, col)] - self.means[col]) / self.scales[col];
            }
        }

        Ok(FeatureMatrix {
            feature_names: data.feature_names.clone(),
            values,
        })
    }

    pub fn fit_transform(data: &FeatureMatrix) -> AnalysisResult<(Self, FeatureMatrix)> {
        let scaler = Self::fit(data)?;
        let scaled = scaler.transform(data)?;
        Ok((scaler, scaled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_columns_have_zero_mean_unit_variance() {
        let df = df! {
            "a" => [1.0f64, 2.0, 3.0, 4.0],
            "b" => [10.0f64, 30.0, 20.0, 40.0],
        }
        .unwrap();
        let data = FeatureMatrix::from_dataframe(&df).unwrap();
        let (_, scaled) = StandardScaler::fit_transform(&data).unwrap();

        for col in 0..scaled.ncols() {
            let values: Vec<f64> = (0..scaled.nrows()).map(|r| scaled.values[(r, col)]).collect();
            let (mean, std) = column_moments(&values);
            assert!(mean.abs() < 1e-12);
            assert!((std - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_column_scales_to_zero() {
        let df = df! { "k" => [5.0f64, 5.0, 5.0] }.unwrap();
        let data = FeatureMatrix::from_dataframe(&df).unwrap();
        let (scaler, scaled) = StandardScaler::fit_transform(&data).unwrap();
        assert_eq!(scaler.scales, vec![1.0]);
        assert!((0..3).all(|r| scaled.values[(r, 0)] == 0.0));
    }

    #[test]
    fn test_from_dataframe_rejects_nulls() {
        let df = df! { "a" => [Some(1.0f64), None] }.unwrap();
        assert!(FeatureMatrix::from_dataframe(&df).is_err());
    }
}
