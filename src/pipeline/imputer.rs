//! Distance-weighted k-nearest-neighbour imputation

use polars::prelude::*;
use rayon::prelude::*;
use tracing::debug;

use super::error::{AnalysisError, AnalysisResult};

/// Result of an imputation pass
#[derive(Debug, Clone)]
pub struct Imputation {
    /// Imputed table, same columns in the same order as the input
    pub data: DataFrame,
    /// Number of cells that were filled
    pub imputed_cells: usize,
}

/// Fills missing numeric cells from the `n_neighbors` closest donor rows,
/// weighting each donor by the inverse of its distance.
///
/// Distances use the NaN-aware Euclidean metric: only coordinates present in
/// both rows contribute, and the sum is scaled up by
/// `n_features / n_present` so rows with gaps are comparable to full rows.
#[derive(Debug, Clone)]
pub struct KnnImputer {
    n_neighbors: usize,
}

impl KnnImputer {
    pub fn new(n_neighbors: usize) -> Self {
        Self { n_neighbors }
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// Impute every null cell of a numeric DataFrame.
    ///
    /// Fails with `InsufficientNeighbors` when a missing cell has fewer than
    /// `n_neighbors` rows that both observe the column and share at least one
    /// observed coordinate with the receiving row. A row with every cell
    /// missing takes the column means instead.
    pub fn fit_transform(&self, df: &DataFrame) -> AnalysisResult<Imputation> {
        if self.n_neighbors == 0 {
            return Err(AnalysisError::InvalidConfig(
                "n_neighbors must be at least 1".to_string(),
            ));
        }
        if df.height() == 0 {
            return Err(AnalysisError::EmptyDataset {
                stage: "imputation",
                rows: 0,
            });
        }

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let matrix = to_row_matrix(df)?;

        let receivers: Vec<usize> = (0..matrix.len())
            .filter(|&row| matrix[row].iter().any(Option::is_none))
            .collect();

        if receivers.is_empty() {
            debug!("no missing values, imputation skipped");
            return Ok(Imputation {
                data: df.clone(),
                imputed_cells: 0,
            });
        }

        debug!(
            rows = receivers.len(),
            k = self.n_neighbors,
            "imputing rows with missing values"
        );

        let filled: Vec<Vec<(usize, f64)>> = receivers
            .par_iter()
            .map(|&row| self.impute_row(&matrix, row, &names))
            .collect::<AnalysisResult<_>>()?;

        let mut output = matrix;
        let mut imputed_cells = 0usize;
        for (&row, cells) in receivers.iter().zip(filled) {
            for (col, value) in cells {
                output[row][col] = Some(value);
                imputed_cells += 1;
            }
        }

        let columns: Vec<Column> = names
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let values: Vec<f64> = output
                    .iter()
                    .map(|row| row[col].unwrap_or(f64::NAN))
                    .collect();
                Column::new(name.as_str().into(), values)
            })
            .collect();

        Ok(Imputation {
            data: DataFrame::new(columns)?,
            imputed_cells,
        })
    }

    /// Compute replacement values for every missing cell of `target`.
    fn impute_row(
        &self,
        matrix: &[Vec<Option<f64>>],
        target: usize,
        names: &[String],
    ) -> AnalysisResult<Vec<(usize, f64)>> {
        let receiver = &matrix[target];

        if receiver.iter().all(Option::is_none) {
            return self.impute_unobserved_row(matrix, names);
        }

        // Distances are independent of which column is being filled, since
        // the receiver's own gaps are already excluded from the metric.
        let distances: Vec<Option<f64>> = matrix
            .iter()
            .enumerate()
            .map(|(idx, donor)| {
                if idx == target {
                    None
                } else {
                    nan_euclidean(receiver, donor)
                }
            })
            .collect();

        receiver
            .iter()
            .enumerate()
            .filter(|(_, value)| value.is_none())
            .map(|(col, _)| {
                let mut donors: Vec<(usize, f64)> = distances
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, d)| match (d, matrix[idx][col]) {
                        (Some(d), Some(_)) => Some((idx, *d)),
                        _ => None,
                    })
                    .collect();

                if donors.len() < self.n_neighbors {
                    return Err(AnalysisError::InsufficientNeighbors {
                        column: names[col].clone(),
                        available: donors.len(),
                        required: self.n_neighbors,
                    });
                }

                donors.sort_by(|a, b| {
                    a.1.partial_cmp(&b.1)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.0.cmp(&b.0))
                });
                donors.truncate(self.n_neighbors);

                let values: Vec<(f64, f64)> = donors
                    .iter()
                    .filter_map(|&(idx, d)| matrix[idx][col].map(|v| (v, d)))
                    .collect();

                Ok((col, inverse_distance_mean(&values)))
            })
            .collect()
    }

    /// A row with no observed cell has no distance to anyone, so every
    /// column falls back to the mean over all rows that observe it.
    fn impute_unobserved_row(
        &self,
        matrix: &[Vec<Option<f64>>],
        names: &[String],
    ) -> AnalysisResult<Vec<(usize, f64)>> {
        names
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let observed: Vec<f64> = matrix.iter().filter_map(|row| row[col]).collect();
                if observed.len() < self.n_neighbors {
                    return Err(AnalysisError::InsufficientNeighbors {
                        column: name.clone(),
                        available: observed.len(),
                        required: self.n_neighbors,
                    });
                }
                Ok((col, observed.iter().sum::<f64>() / observed.len() as f64))
            })
            .collect()
    }
}

impl Default for KnnImputer {
    fn default() -> Self {
        Self::new(super::config::DEFAULT_NEIGHBORS)
    }
}

/// NaN-aware Euclidean distance. `None` when the rows share no observed coordinate.
fn nan_euclidean(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let mut sum_sq = 0.0;
    let mut present = 0usize;

    for (x, y) in a.iter().zip(b.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            let diff = x - y;
            sum_sq += diff * diff;
            present += 1;
        }
    }

    if present == 0 {
        return None;
    }

    let scale = a.len() as f64 / present as f64;
    Some((scale * sum_sq).sqrt())
}

/// Weighted mean of `(value, distance)` pairs with weights `1 / distance`.
///
/// Exact matches (distance 0) take all of the weight, shared equally.
fn inverse_distance_mean(neighbours: &[(f64, f64)]) -> f64 {
    let exact: Vec<f64> = neighbours
        .iter()
        .filter(|(_, d)| *d == 0.0)
        .map(|(v, _)| *v)
        .collect();

    if !exact.is_empty() {
        return exact.iter().sum::<f64>() / exact.len() as f64;
    }

    let (weighted_sum, weight_sum) = neighbours
        .iter()
        .fold((0.0, 0.0), |(ws, w), (v, d)| (ws + v / d, w + 1.0 / d));

    weighted_sum / weight_sum
}

fn to_row_matrix(df: &DataFrame) -> AnalysisResult<Vec<Vec<Option<f64>>>> {
    let n_rows = df.height();
    let n_cols = df.width();
    let mut matrix = vec![vec![None; n_cols]; n_rows];

    for (col_idx, col) in df.get_columns().iter().enumerate() {
        let cast = col.cast(&DataType::Float64)?;
        for (row, value) in matrix.iter_mut().zip(cast.f64()?.iter()) {
            row[col_idx] = value.filter(|v| v.is_finite());
        }
    }

    Ok(matrix)
}
