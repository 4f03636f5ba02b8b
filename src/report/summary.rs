//! Analysis summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use serde::Serialize;

/// Summary of one analysis run
#[derive(Debug, Default, Clone, Serialize)]
pub struct AnalysisSummary {
    pub rows_loaded: usize,
    pub numeric_features: usize,
    pub identifier_columns: Vec<String>,
    pub imputed_cells: usize,
    pub outlier_rows: Vec<usize>,
    pub rows_analyzed: usize,
    pub components_fitted: usize,
    pub components_ranked: usize,
    pub cumulative_variance: f64,
    #[serde(skip)]
    pub step_times: Vec<(&'static str, Duration)>,
}

impl AnalysisSummary {
    pub fn new(rows_loaded: usize) -> Self {
        Self {
            rows_loaded,
            rows_analyzed: rows_loaded,
            ..Default::default()
        }
    }

    pub fn set_features(&mut self, numeric_features: usize, identifier_columns: Vec<String>) {
        self.numeric_features = numeric_features;
        self.identifier_columns = identifier_columns;
    }

    pub fn set_imputed(&mut self, cells: usize) {
        self.imputed_cells = cells;
    }

    pub fn add_outlier_drops(&mut self, rows: Vec<usize>) {
        self.rows_analyzed = self.rows_loaded.saturating_sub(rows.len());
        self.outlier_rows = rows;
    }

    pub fn set_components(&mut self, fitted: usize, ranked: usize, cumulative_variance: f64) {
        self.components_fitted = fitted;
        self.components_ranked = ranked;
        self.cumulative_variance = cumulative_variance;
    }

    pub fn record_step(&mut self, step: &'static str, elapsed: Duration) {
        self.step_times.push((step, elapsed));
    }

    pub fn total_time(&self) -> Duration {
        self.step_times.iter().map(|(_, d)| *d).sum()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("ANALYSIS SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Rows Loaded"), Cell::new(self.rows_loaded)]);
        table.add_row(vec![
            Cell::new("🔢 Numeric Features"),
            Cell::new(self.numeric_features),
        ]);
        table.add_row(vec![
            Cell::new("🏷️  Identifier Columns"),
            Cell::new(self.identifier_columns.len()),
        ]);
        table.add_row(vec![
            Cell::new("🩹 Imputed Cells"),
            Cell::new(self.imputed_cells).fg(if self.imputed_cells == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Outlier Rows Dropped"),
            Cell::new(self.outlier_rows.len()).fg(if self.outlier_rows.is_empty() {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("✅ Rows Analyzed"),
            Cell::new(self.rows_analyzed)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("🧮 Components (ranked / fitted)"),
            Cell::new(format!(
                "{} / {}",
                self.components_ranked, self.components_fitted
            )),
        ]);

        let variance_pct = self.cumulative_variance * 100.0;
        let color = if variance_pct >= 95.0 {
            Color::Green
        } else if variance_pct >= 80.0 {
            Color::Yellow
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new("📈 Variance Explained"),
            Cell::new(format!("{:.2}%", variance_pct))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("⏱️  Total Time"),
            Cell::new(format!("{:.2?}", self.total_time())),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.identifier_columns.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Excluded Identifier Columns").yellow(),
                style(format!("({})", self.identifier_columns.len())).dim()
            );
            for column in &self.identifier_columns {
                println!("        {} {}", style("•").dim(), column);
            }
        }
    }
}
