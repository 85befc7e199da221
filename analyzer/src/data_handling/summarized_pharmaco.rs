use polars::prelude::*;
use tracing::{debug, error, info};

use crate::helper_functions::read_csv;
use crate::models::{Dataset, Observation};

pub const CELL_LINE: &str = "cellLine";
pub const DRUG: &str = "drug";
pub const IC50_CCLE: &str = "ic50_CCLE";
pub const IC50_GDSC: &str = "ic50_GDSC";
pub const AUC_CCLE: &str = "auc_CCLE";
pub const AUC_GDSC: &str = "auc_GDSC";

const NUMERIC_COLUMNS: [&str; 4] = [IC50_CCLE, IC50_GDSC, AUC_CCLE, AUC_GDSC];

/// The summarized CCLE/GDSC drug-response table: one row per (drug, cell line)
/// pair, with IC50 and AUC summaries from both studies.
pub struct SummarizedPharmacoDataset {
    pub path: String,
}

impl Dataset for SummarizedPharmacoDataset {
    fn load(&self) -> PolarsResult<DataFrame> {
        info!("Reading summarized pharmaco data from {}", &self.path);
        let mut df = match read_csv(&self.path) {
            Ok(df) => df,
            Err(e) => {
                error!("Failed to read summarized pharmaco CSV: {}", e);
                return Err(e);
            }
        };
        debug!("Loaded {} rows", df.shape().0);

        // The exported CSV sometimes carries quoted numerics
        for &col_name in &NUMERIC_COLUMNS {
            let s = df.column(col_name)?.cast(&DataType::Float64)?;
            df = df.with_column(s)?.clone();
        }

        debug!("df after reading = {:?}", df.head(Some(5)));
        Ok(df)
    }
}

/// Pull the loaded table into typed records, failing loudly on malformed rows
/// rather than masking them downstream.
pub fn extract_observations(df: &DataFrame) -> PolarsResult<Vec<Observation>> {
    let cell_lines = df.column(CELL_LINE)?.str()?;
    let drugs = df.column(DRUG)?.str()?;
    let ic50_ccle = df.column(IC50_CCLE)?.f64()?;
    let ic50_gdsc = df.column(IC50_GDSC)?.f64()?;
    let auc_ccle = df.column(AUC_CCLE)?.f64()?;
    let auc_gdsc = df.column(AUC_GDSC)?.f64()?;

    let mut observations = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let drug = require_name(drugs.get(i), DRUG, i)?;
        let cell_line = require_name(cell_lines.get(i), CELL_LINE, i)?;
        observations.push(Observation {
            drug: drug.to_string(),
            cell_line: cell_line.to_string(),
            ic50_ccle: require_finite(ic50_ccle.get(i), IC50_CCLE, i)?,
            ic50_gdsc: require_finite(ic50_gdsc.get(i), IC50_GDSC, i)?,
            auc_ccle: require_finite(auc_ccle.get(i), AUC_CCLE, i)?,
            auc_gdsc: require_finite(auc_gdsc.get(i), AUC_GDSC, i)?,
        });
    }
    Ok(observations)
}

fn require_name<'a>(value: Option<&'a str>, column: &str, row: usize) -> PolarsResult<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PolarsError::ComputeError(
            format!("row {}: missing {}", row, column).into(),
        )),
    }
}

fn require_finite(value: Option<f64>, column: &str, row: usize) -> PolarsResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(PolarsError::ComputeError(
            format!("row {}: non-finite {} value {}", row, column, v).into(),
        )),
        None => Err(PolarsError::ComputeError(
            format!("row {}: missing {} value", row, column).into(),
        )),
    }
}
