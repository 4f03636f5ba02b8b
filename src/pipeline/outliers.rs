//! Extreme-row filtering by standardized score

use polars::prelude::*;
use tracing::debug;

use super::error::AnalysisResult;

/// Per-column population mean and standard deviation (ddof = 0).
pub(crate) fn column_moments(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Compute the z-score of every cell, column by column.
///
/// Returns one vector per column in DataFrame order. A constant column
/// scores 0 for every row.
pub fn zscores(df: &DataFrame) -> AnalysisResult<Vec<Vec<f64>>> {
    df.get_columns()
        .iter()
        .map(|col| -> AnalysisResult<Vec<f64>> {
            let cast = col.cast(&DataType::Float64)?;
            let values: Vec<f64> = cast.f64()?.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
            let (mean, std) = column_moments(&values);
            Ok(values
                .iter()
                .map(|v| if std > 0.0 { (v - mean) / std } else { 0.0 })
                .collect())
        })
        .collect()
}

/// Find rows where **every** column has `|z| >= threshold`.
///
/// The all-columns rule only removes pathological records; a row that is
/// extreme in a single feature is kept.
pub fn find_outlier_rows(df: &DataFrame, threshold: f64) -> AnalysisResult<Vec<usize>> {
    if df.height() == 0 || df.width() == 0 {
        return Ok(Vec::new());
    }

    let scores = zscores(df)?;
    let rows: Vec<usize> = (0..df.height())
        .filter(|&row| scores.iter().all(|col| col[row].abs() >= threshold))
        .collect();

    debug!(outliers = rows.len(), threshold, "outlier scan complete");
    Ok(rows)
}

/// Remove `rows` from a DataFrame.
///
/// Apply the same row list to the numeric table and the record table so
/// they stay aligned.
pub fn drop_rows(df: &DataFrame, rows: &[usize]) -> AnalysisResult<DataFrame> {
    if rows.is_empty() {
        return Ok(df.clone());
    }

    let mut keep = vec![true; df.height()];
    for &row in rows {
        if row < keep.len() {
            keep[row] = false;
        }
    }
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(df.filter(&mask)?)
}
