use std::collections::HashSet;

use polars::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::analysis::agreement::{score_by_drug, scores_to_dataframe};
use crate::analysis::sensitivity::{add_label_columns, label_category_counts};
use crate::data_handling::summarized_pharmaco::{extract_observations, SummarizedPharmacoDataset};
use crate::helper_functions::{
    dataframe_to_csv, project_root, write_category_counts, write_scores_json,
};
use crate::models::{polars_err, Dataset};

mod analysis;
mod data_handling;
mod helper_functions;
mod models;

const DB_NAME: &str = "CCLE vs GDSC (summarized)";

fn main() -> PolarsResult<()> {
    // Setup logging and project configuration
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting the sensitivity agreement analyzer");

    let root = project_root();
    let dataset = SummarizedPharmacoDataset {
        path: root
            .join("data/summarized_pharmaco_data.csv")
            .to_string_lossy()
            .to_string(),
    };
    let output_dir = root.join("agreement_results");
    std::fs::create_dir_all(&output_dir).map_err(|e| polars_err(Box::new(e)))?;

    // Load the summarized table and pull it into typed records
    let df = dataset.load()?;
    let observations = extract_observations(&df)?;
    let n_cell_lines = observations
        .iter()
        .map(|o| o.cell_line.as_str())
        .collect::<HashSet<_>>()
        .len();
    let n_drugs = observations
        .iter()
        .map(|o| o.drug.as_str())
        .collect::<HashSet<_>>()
        .len();
    info!(
        "{}: {} observations, {} drugs, {} cell lines",
        DB_NAME,
        observations.len(),
        n_drugs,
        n_cell_lines
    );

    // Per-study sensitivity labels alongside the raw table
    let mut labeled = add_label_columns(df)?;
    dataframe_to_csv(&mut labeled, &output_dir.join("labeled_observations.csv"), true)?;

    let counts = label_category_counts(&observations);
    write_category_counts(&output_dir.join("label_category_counts.csv"), &counts)
        .map_err(|e| polars_err(e.into()))?;

    // Between-study agreement per drug
    let scores = score_by_drug(&observations);
    for score in &scores {
        info!("{:<16} mcc = {:+.3}", score.drug, score.mcc);
    }

    let mut score_df = scores_to_dataframe(&scores)?;
    dataframe_to_csv(&mut score_df, &output_dir.join("agreement_scores.csv"), true)?;
    write_scores_json(&output_dir.join("agreement_scores.json"), &scores)
        .map_err(|e| polars_err(e.into()))?;

    info!("Agreement results written to {}", output_dir.display());

    Ok(())
}
