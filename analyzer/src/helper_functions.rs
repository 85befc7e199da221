use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, PolarsResult, SerReader, SerWriter};
use tracing::info;

use crate::models::{polars_err, AgreementCategory, AgreementScore};

pub fn project_root() -> PathBuf {
    match env::var_os("PROJECT_ROOT") {
        Some(val) => PathBuf::from(val),
        None => {
            // Fall back to current directory if PROJECT_ROOT not set
            env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        }
    }
}

pub fn read_csv(file_path: &str) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(file_path)))?
        .finish()
}

pub fn dataframe_to_csv(df: &mut DataFrame, path: &Path, include_header: bool) -> PolarsResult<()> {
    let mut file = File::create(path).map_err(|e| polars_err(Box::new(e)))?;
    CsvWriter::new(&mut file)
        .include_header(include_header)
        .with_separator(b',')
        .finish(df)?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Machine-readable copy of the per-drug score table.
pub fn write_scores_json(path: &Path, scores: &[AgreementScore]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, scores)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Save label-pair category counts to a CSV file.
pub fn write_category_counts(
    path: &Path,
    counts: &[(AgreementCategory, usize)],
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(["category", "count"])?;
    for (category, count) in counts {
        wtr.write_record([category.as_str(), count.to_string().as_str()])?;
    }
    wtr.flush()?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let mut df = df![
            "drug" => &["17-AAG", "AZD0530"],
            "matthews_corr" => &[0.52, -0.08]
        ]
        .unwrap();
        dataframe_to_csv(&mut df, &path, true).unwrap();
        let loaded = read_csv(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.shape(), (2, 2));
    }

    #[test]
    fn score_csv_and_json_outputs_agree() {
        let scores = vec![
            AgreementScore {
                drug: "17-AAG".to_string(),
                mcc: 0.52,
            },
            AgreementScore {
                drug: "paclitaxel".to_string(),
                mcc: -0.08,
            },
        ];
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("agreement_scores.csv");
        let json_path = dir.path().join("agreement_scores.json");

        let mut df = crate::analysis::agreement::scores_to_dataframe(&scores).unwrap();
        dataframe_to_csv(&mut df, &csv_path, true).unwrap();
        write_scores_json(&json_path, &scores).unwrap();

        let from_json: Vec<AgreementScore> =
            serde_json::from_reader(File::open(&json_path).unwrap()).unwrap();
        let from_csv = read_csv(csv_path.to_str().unwrap()).unwrap();
        let drugs = from_csv.column("drug").unwrap().str().unwrap();
        let mccs = from_csv.column("matthews_corr").unwrap().f64().unwrap();

        assert_eq!(from_json.len(), from_csv.height());
        for (i, score) in from_json.iter().enumerate() {
            assert_eq!(drugs.get(i), Some(score.drug.as_str()));
            assert_eq!(mccs.get(i), Some(score.mcc));
        }
    }

    #[test]
    fn category_counts_csv_has_one_row_per_category() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.csv");
        let counts = AgreementCategory::ALL
            .iter()
            .map(|&c| (c, 3usize))
            .collect::<Vec<_>>();
        write_category_counts(&path, &counts).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 5); // header + 4 categories
    }
}
