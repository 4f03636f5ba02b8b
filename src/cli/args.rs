//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{
    AnalysisConfig, DEFAULT_COMPONENTS, DEFAULT_NEIGHBORS, DEFAULT_TABLE, DEFAULT_Z_THRESHOLD,
};

/// loadrank - Rank features by variance-weighted principal component loadings
#[derive(Parser, Debug)]
#[command(name = "loadrank")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (SQLite database, CSV, or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Table or view to read from a SQLite input. Ignored for CSV/Parquet.
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Number of nearest neighbours used to impute each missing value
    #[arg(short = 'k', long, default_value_t = DEFAULT_NEIGHBORS, value_parser = validate_positive_count)]
    pub neighbors: usize,

    /// Drop a row only when every feature's absolute z-score reaches this value
    #[arg(short = 'z', long, default_value_t = DEFAULT_Z_THRESHOLD, value_parser = validate_z_threshold)]
    pub z_threshold: f64,

    /// Number of leading principal components used for the ranking
    #[arg(short = 'c', long, default_value_t = DEFAULT_COMPONENTS, value_parser = validate_positive_count)]
    pub components: usize,

    /// Numeric columns to treat as identifiers (comma-separated), e.g. FIPS codes
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Write the ranking to a file (CSV or Parquet, determined by extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export the full analysis (parameters, variance ratios, ranking) as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Number of ranked features to display (0 shows all)
    #[arg(long, default_value = "0")]
    pub top: usize,

    /// Enable debug diagnostics on stderr (overridden by RUST_LOG)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Cli {
    /// Collect the analysis parameters into a pipeline config.
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            table: self.table.clone(),
            neighbors: self.neighbors,
            z_threshold: self.z_threshold,
            components: self.components,
            exclude_columns: self.exclude.clone(),
        }
    }
}

/// Validator for neighbour and component counts
fn validate_positive_count(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value == 0 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for z_threshold parameter
fn validate_z_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !value.is_finite() || value <= 0.0 {
        Err(format!(
            "z_threshold must be a positive finite number, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
