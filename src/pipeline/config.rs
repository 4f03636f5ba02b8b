//! Analysis parameters
//!
//! All dataset-specific constants live here so they can be tuned per run
//! instead of being buried in the stage implementations.

use serde::Serialize;

use super::error::{AnalysisError, AnalysisResult};

/// Default table (or view) queried from the SQLite file.
pub const DEFAULT_TABLE: &str = "metrics_without_percentiles";

/// Default number of donor rows used by the KNN imputer.
pub const DEFAULT_NEIGHBORS: usize = 10;

/// Default absolute z-score every column of a row must reach for the row to be dropped.
pub const DEFAULT_Z_THRESHOLD: f64 = 50.0;

/// Default number of leading components used for ranking.
///
/// 18 components explain roughly 99% of the variance of the county metrics
/// table; other datasets will want a different cutoff.
pub const DEFAULT_COMPONENTS: usize = 18;

/// Parameters for a full load → impute → filter → scale → decompose → rank run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisConfig {
    pub table: String,
    pub neighbors: usize,
    pub z_threshold: f64,
    pub components: usize,
    pub exclude_columns: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            neighbors: DEFAULT_NEIGHBORS,
            z_threshold: DEFAULT_Z_THRESHOLD,
            components: DEFAULT_COMPONENTS,
            exclude_columns: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// Reject parameter combinations no stage can work with.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.table.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "table name must not be empty".to_string(),
            ));
        }
        if self.neighbors == 0 {
            return Err(AnalysisError::InvalidConfig(
                "neighbors must be at least 1".to_string(),
            ));
        }
        if !self.z_threshold.is_finite() || self.z_threshold <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "z_threshold must be a positive finite number, got {}",
                self.z_threshold
            )));
        }
        if self.components == 0 {
            return Err(AnalysisError::InvalidConfig(
                "components must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
