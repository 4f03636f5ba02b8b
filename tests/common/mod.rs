//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusqlite::{params_from_iter, types::Value, Connection};
use std::path::PathBuf;
use tempfile::TempDir;

pub const METRICS_TABLE: &str = "metrics_without_percentiles";

/// Column names of the synthetic county table, identifier first
pub const COUNTY_COLUMNS: [&str; 5] = [
    "county",
    "population",
    "median_income",
    "unemployment_rate",
    "broadband_share",
];

/// Generate `rows` synthetic counties.
///
/// - `population` and `median_income` are strongly correlated
/// - `unemployment_rate` is negatively correlated with `median_income`
/// - `broadband_share` is independent noise
pub fn county_rows(rows: usize, seed: u64) -> Vec<Vec<Value>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..rows)
        .map(|i| {
            let base: f64 = rng.gen::<f64>() * 10.0;
            vec![
                Value::Text(format!("County {}", i)),
                Value::Integer((10_000.0 + base * 5_000.0 + rng.gen::<f64>() * 500.0) as i64),
                Value::Real(30_000.0 + base * 4_000.0 + rng.gen::<f64>() * 1_000.0),
                Value::Real(12.0 - base + rng.gen::<f64>()),
                Value::Real(rng.gen::<f64>()),
            ]
        })
        .collect()
}

/// Write a SQLite database with one table holding `rows`.
pub fn create_sqlite_db(
    table: &str,
    columns: &[&str],
    rows: &[Vec<Value>],
) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("counties.db");

    let conn = Connection::open(&db_path).unwrap();
    let column_defs: Vec<String> = columns.iter().map(|c| format!("\"{}\"", c)).collect();
    conn.execute(
        &format!("CREATE TABLE \"{}\" ({})", table, column_defs.join(", ")),
        [],
    )
    .unwrap();

    let placeholders = vec!["?"; columns.len()].join(", ");
    let insert = format!("INSERT INTO \"{}\" VALUES ({})", table, placeholders);
    for row in rows {
        conn.execute(&insert, params_from_iter(row.iter())).unwrap();
    }
    conn.close().unwrap();

    (temp_dir, db_path)
}

/// SQLite fixture of the synthetic county table
pub fn create_county_db(rows: usize, seed: u64) -> (TempDir, PathBuf) {
    create_sqlite_db(METRICS_TABLE, &COUNTY_COLUMNS, &county_rows(rows, seed))
}

/// Same as `create_county_db` but with a few cells set to NULL
pub fn create_county_db_with_gaps(rows: usize, seed: u64) -> (TempDir, PathBuf) {
    let mut data = county_rows(rows, seed);
    data[1][2] = Value::Null;
    data[5][3] = Value::Null;
    data[9][1] = Value::Null;
    data[9][4] = Value::Null;
    create_sqlite_db(METRICS_TABLE, &COUNTY_COLUMNS, &data)
}

/// Small numeric DataFrame with no missing values and no extreme rows
pub fn create_small_numeric_dataframe() -> DataFrame {
    df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "b" => [2.0f64, 1.0, 4.0, 3.0, 6.0],
        "c" => [9.0f64, 7.0, 8.0, 5.0, 6.0],
    }
    .unwrap()
}

/// Random numeric DataFrame with `rows` x `cols` uniform features
pub fn create_random_dataframe(rows: usize, cols: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let columns: Vec<Column> = (0..cols)
        .map(|i| {
            let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>() * 100.0).collect();
            Column::new(format!("feature_{}", i).into(), values)
        })
        .collect();
    DataFrame::new(columns).unwrap()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Column names of a DataFrame as owned strings
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}
