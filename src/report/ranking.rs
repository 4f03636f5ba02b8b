//! Feature ranking display and file output

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use polars::prelude::*;

use crate::pipeline::FeatureImportance;

/// Print the ranking as a table. `top == 0` prints every feature.
pub fn display_ranking(ranking: &[FeatureImportance], top: usize) {
    let shown = if top == 0 {
        ranking.len()
    } else {
        top.min(ranking.len())
    };

    println!();
    println!(
        "    {} {}",
        style("🏆").cyan(),
        style("FEATURE IMPORTANCE").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let max_score = ranking.first().map(|r| r.score).unwrap_or(0.0);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Feature").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Relative").add_attribute(Attribute::Bold),
    ]);

    for (idx, entry) in ranking.iter().take(shown).enumerate() {
        let relative = if max_score > 0.0 {
            entry.score / max_score
        } else {
            0.0
        };
        let color = if relative >= 0.75 {
            Color::Green
        } else if relative >= 0.5 {
            Color::Yellow
        } else {
            Color::White
        };

        table.add_row(vec![
            Cell::new(idx + 1).set_alignment(CellAlignment::Right),
            Cell::new(&entry.feature),
            Cell::new(format!("{:.6}", entry.score)).fg(color),
            Cell::new(format!("{:.1}%", relative * 100.0)).set_alignment(CellAlignment::Right),
        ]);
    }

    for line in table.to_string().lines() {
        println!("    {}", line);
    }

    if shown < ranking.len() {
        println!(
            "      {}",
            style(format!("... {} more feature(s)", ranking.len() - shown)).dim()
        );
    }
}

/// Convert the ranking into a two-column DataFrame (`feature`, `score`).
pub fn ranking_to_dataframe(ranking: &[FeatureImportance]) -> Result<DataFrame> {
    let features: Vec<&str> = ranking.iter().map(|r| r.feature.as_str()).collect();
    let scores: Vec<f64> = ranking.iter().map(|r| r.score).collect();
    let ranks: Vec<u32> = (1..=ranking.len() as u32).collect();

    let df = DataFrame::new(vec![
        Column::new("rank".into(), ranks),
        Column::new("feature".into(), features),
        Column::new("score".into(), scores),
    ])?;
    Ok(df)
}

/// Save the ranking to file (CSV or Parquet based on extension)
pub fn save_ranking(ranking: &[FeatureImportance], path: &Path) -> Result<()> {
    let mut df = ranking_to_dataframe(ranking)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(&mut df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(&mut df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}
