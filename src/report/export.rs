//! JSON export of a full analysis run

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{AnalysisConfig, Decomposition, FeatureImportance};
use crate::report::AnalysisSummary;

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// loadrank version
    pub loadrank_version: String,
    /// Input file path
    pub input_file: String,
    /// Parameters the run used
    pub parameters: AnalysisConfig,
}

/// One principal component's share of the variance
#[derive(Serialize)]
pub struct ComponentVariance {
    pub component: usize,
    pub explained_variance: f64,
    pub explained_variance_ratio: f64,
    pub cumulative_ratio: f64,
}

/// Complete analysis export
#[derive(Serialize)]
pub struct AnalysisExport<'a> {
    pub metadata: RunMetadata,
    pub summary: &'a AnalysisSummary,
    pub components: Vec<ComponentVariance>,
    pub ranking: &'a [FeatureImportance],
}

impl<'a> AnalysisExport<'a> {
    pub fn new(
        input_file: &Path,
        config: &AnalysisConfig,
        summary: &'a AnalysisSummary,
        decomposition: &Decomposition,
        ranking: &'a [FeatureImportance],
    ) -> Self {
        let mut cumulative = 0.0;
        let components = decomposition
            .explained_variance
            .iter()
            .zip(decomposition.explained_variance_ratio.iter())
            .enumerate()
            .map(|(idx, (&variance, &ratio))| {
                cumulative += ratio;
                ComponentVariance {
                    component: idx + 1,
                    explained_variance: variance,
                    explained_variance_ratio: ratio,
                    cumulative_ratio: cumulative,
                }
            })
            .collect();

        Self {
            metadata: RunMetadata {
                timestamp: Utc::now().to_rfc3339(),
                loadrank_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: input_file.display().to_string(),
                parameters: config.clone(),
            },
            summary,
            components,
            ranking,
        }
    }
}

/// Write the analysis export as pretty-printed JSON
pub fn export_analysis_json(export: &AnalysisExport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(export)
        .context("Failed to serialize analysis to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write analysis JSON: {}", output_path.display()))?;

    Ok(())
}
