//! Terminal styling utilities for step-by-step console output

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::AnalysisConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TABLE: Emoji<'_, '_> = Emoji("🗄️  ", "");
pub static NEIGHBORS: Emoji<'_, '_> = Emoji("🧩 ", "");
pub static FILTER: Emoji<'_, '_> = Emoji("🧹 ", "");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ╦  ╔═╗╔═╗╔╦╗╦═╗╔═╗╔╗╔╦╔═
    ║  ║ ║╠═╣ ║║╠╦╝╠═╣║║║╠╩╗
    ╩═╝╚═╝╩ ╩═╩╝╩╚═╩ ╩╝╚╝╩ ╩
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("λ").magenta().bold(),
        style("Feature importance from principal component loadings").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, config: &AnalysisConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Input:  {:<39}│",
        FOLDER,
        truncate_path(input, 38)
    );
    println!(
        "    │  {} Table:  {:<39}│",
        TABLE,
        truncate_string(&config.table, 38)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Neighbours (KNN):      {:<24}│",
        NEIGHBORS,
        style(config.neighbors).yellow()
    );
    println!(
        "    │  {} Outlier |z| threshold: {:<24}│",
        FILTER,
        style(format!("{:.1}", config.z_threshold)).yellow()
    );
    println!(
        "    │  {} Ranking components:    {:<24}│",
        CHART,
        style(config.components).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print the elapsed time of a step
pub fn print_step_time(elapsed: std::time::Duration) {
    println!("    {}", style(format!("⏱  {:.2?}", elapsed)).dim());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("loadrank analysis complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, threshold_info: Option<&str>) {
    if let Some(info) = threshold_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!(
            "      Found {} {}",
            style(count).yellow().bold(),
            description
        );
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_keeps_tail() {
        assert_eq!(truncate_string("short", 10), "short");
        let long = "/very/long/path/to/counties.db";
        let truncated = truncate_string(long, 12);
        assert_eq!(truncated.chars().count(), 12);
        assert!(truncated.ends_with("unties.db"));
        assert!(truncated.starts_with("..."));
    }
}
