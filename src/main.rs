//! loadrank: Feature Importance CLI Tool
//!
//! Loads a table, imputes missing values, removes extreme outlier rows,
//! standardizes and decomposes the features, then ranks them by their
//! variance-weighted principal component loadings.

mod cli;
mod pipeline;
mod report;
mod utils;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use cli::Cli;
use pipeline::{
    count_missing, drop_rows, find_outlier_rows, load_records, rank_features, split_numeric,
    FeatureMatrix, KnnImputer, Pca, StandardScaler,
};
use report::{display_ranking, export_analysis_json, save_ranking, AnalysisExport, AnalysisSummary};
use utils::{
    create_spinner, finish_with_error, finish_with_success, init_logging, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.analysis_config();
    config.validate()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.input, &config);

    // Step 1: Load the record table
    print_step_header(1, "Load Records");

    let step_start = Instant::now();
    let spinner = create_spinner("Reading table...");
    let records = load_records(&cli.input, &config.table)
        .inspect_err(|_| finish_with_error(&spinner, "Failed to load dataset"))
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    finish_with_success(&spinner, "Dataset loaded");

    let (rows, cols) = records.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);

    let mut summary = AnalysisSummary::new(rows);
    let load_elapsed = step_start.elapsed();
    summary.record_step("load", load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: KNN imputation on the numeric subset
    print_step_header(2, "Missing Value Imputation");

    let step_start = Instant::now();
    let (numeric, identifiers) = split_numeric(&records, &config.exclude_columns)?;
    if !identifiers.is_empty() {
        print_info(&format!(
            "Excluding {} identifier column(s) from numeric processing",
            identifiers.len()
        ));
    }
    summary.set_features(numeric.width(), identifiers);

    let missing = count_missing(&numeric);
    let imputed = if missing == 0 {
        print_info("No missing values found");
        numeric
    } else {
        print_count("missing cell(s)", missing, None);
        let spinner = create_spinner(&format!(
            "Imputing with {} nearest neighbours...",
            config.neighbors
        ));
        let imputation = KnnImputer::new(config.neighbors)
            .fit_transform(&numeric)
            .inspect_err(|_| finish_with_error(&spinner, "Imputation failed"))?;
        finish_with_success(&spinner, "Imputation complete");
        summary.set_imputed(imputation.imputed_cells);
        imputation.data
    };
    let impute_elapsed = step_start.elapsed();
    summary.record_step("impute", impute_elapsed);
    print_step_time(impute_elapsed);

    // Step 3: Outlier removal
    print_step_header(3, "Outlier Filter");

    let step_start = Instant::now();
    let spinner = create_spinner("Scoring rows...");
    let outliers = find_outlier_rows(&imputed, config.z_threshold)?;
    finish_with_success(&spinner, "Outlier scan complete");

    let (features, records) = if outliers.is_empty() {
        print_info("No rows exceed the z-score threshold in every feature");
        (imputed, records)
    } else {
        print_count(
            "outlier row(s)",
            outliers.len(),
            Some(&format!("(|z| >= {:.1} in every feature)", config.z_threshold)),
        );
        let features = drop_rows(&imputed, &outliers)?;
        let records = drop_rows(&records, &outliers)?;
        print_success("Dropped outlier rows");
        (features, records)
    };
    summary.add_outlier_drops(outliers);
    tracing::debug!(
        rows = records.height(),
        features = features.width(),
        "tables aligned after outlier filter"
    );
    let filter_elapsed = step_start.elapsed();
    summary.record_step("filter", filter_elapsed);
    print_step_time(filter_elapsed);

    // Step 4: Standardize and decompose
    print_step_header(4, "Principal Component Analysis");

    let step_start = Instant::now();
    let spinner = create_spinner("Fitting principal components...");
    let matrix = FeatureMatrix::from_dataframe(&features)?;
    let (_scaler, scaled) = StandardScaler::fit_transform(&matrix)?;
    let decomposition = Pca::fit(&scaled)
        .inspect_err(|_| finish_with_error(&spinner, "Decomposition failed"))?;
    finish_with_success(
        &spinner,
        &format!("Fitted {} components", decomposition.n_components()),
    );
    let pca_elapsed = step_start.elapsed();
    summary.record_step("decompose", pca_elapsed);
    print_step_time(pca_elapsed);

    // Step 5: Rank features
    print_step_header(5, "Rank Features");

    let step_start = Instant::now();
    let ranking = rank_features(&decomposition, config.components)?;
    let ranked = config.components.min(decomposition.n_components());
    let cumulative = decomposition.cumulative_variance(ranked);
    summary.set_components(decomposition.n_components(), ranked, cumulative);
    print_success(&format!(
        "Ranked {} features over {} component(s) ({:.2}% of variance)",
        ranking.len(),
        ranked,
        cumulative * 100.0
    ));

    if let Some(path) = &cli.output {
        save_ranking(&ranking, path)?;
        print_success(&format!("Saved ranking to {}", path.display()));
    }
    let rank_elapsed = step_start.elapsed();
    summary.record_step("rank", rank_elapsed);
    print_step_time(rank_elapsed);

    if let Some(path) = &cli.export_json {
        let export = AnalysisExport::new(&cli.input, &config, &summary, &decomposition, &ranking);
        export_analysis_json(&export, path)?;
        print_success(&format!("Exported analysis to {}", path.display()));
    }

    display_ranking(&ranking, cli.top);
    summary.display();
    print_completion();

    Ok(())
}
