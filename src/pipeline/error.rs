//! Error types for the analysis pipeline.
//!
//! Every stage returns `AnalysisError` so callers (and tests) can tell a
//! database failure apart from an imputation that ran out of donors.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that can occur while loading, cleaning, or decomposing a dataset.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The input file extension is not one of the supported formats.
    #[error("Unsupported file format: '{0}'. Supported formats: db, sqlite, sqlite3, csv, parquet")]
    UnsupportedFormat(String),

    /// The requested table or view does not exist in the database.
    #[error("Table '{table}' not found. Available tables: {available:?}")]
    TableNotFound {
        table: String,
        available: Vec<String>,
    },

    /// Connection or query failure against the SQLite file.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// DataFrame construction or column access failed.
    #[error("DataFrame error: {0}")]
    Polars(#[from] PolarsError),

    /// The dataset has no rows (or too few to compute statistics).
    #[error("Dataset is empty or has too few rows ({rows}) for {stage}")]
    EmptyDataset { stage: &'static str, rows: usize },

    /// No numeric columns remain after excluding identifiers.
    #[error("No numeric feature columns found in dataset")]
    NoNumericFeatures,

    /// A missing cell has fewer usable donor rows than neighbours requested.
    #[error(
        "Cannot impute column '{column}': only {available} usable neighbour row(s), {required} required"
    )]
    InsufficientNeighbors {
        column: String,
        available: usize,
        required: usize,
    },

    /// Every feature is constant, so there is no variance to decompose.
    #[error("Total variance is zero - every feature is constant")]
    ZeroVariance,

    /// A matrix and its feature name list disagree.
    #[error("Feature mismatch: expected {expected} feature(s), found {found}")]
    FeatureMismatch { expected: usize, found: usize },

    /// A parameter is outside its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
