use polars::prelude::*;

use crate::data_handling::summarized_pharmaco::{AUC_CCLE, AUC_GDSC, DRUG};
use crate::models::{AgreementCategory, Observation, SensitivityLabel};

pub const DEFAULT_AUC_CUTOFF: f64 = 0.1;
pub const PACLITAXEL_AUC_CUTOFF: f64 = 0.4;

pub const LABEL_CCLE: &str = "sensitivity_CCLE";
pub const LABEL_GDSC: &str = "sensitivity_GDSC";

/// Per-drug AUC cutoff. Total function of the drug name: everything gets the
/// default except paclitaxel, whose response profile sits well above it.
pub fn auc_cutoff(drug: &str) -> f64 {
    if drug.eq_ignore_ascii_case("paclitaxel") {
        PACLITAXEL_AUC_CUTOFF
    } else {
        DEFAULT_AUC_CUTOFF
    }
}

/// An AUC exactly at the cutoff counts as Sensitive.
pub fn classify_auc(auc: f64, cutoff: f64) -> SensitivityLabel {
    if auc < cutoff {
        SensitivityLabel::Resistant
    } else {
        SensitivityLabel::Sensitive
    }
}

/// Both studies' labels for one observation, using that observation's own
/// drug cutoff.
pub fn label_observation(obs: &Observation) -> (SensitivityLabel, SensitivityLabel) {
    let cutoff = auc_cutoff(&obs.drug);
    (
        classify_auc(obs.auc_ccle, cutoff),
        classify_auc(obs.auc_gdsc, cutoff),
    )
}

/// Append per-study sensitivity label columns to the summarized table.
pub fn add_label_columns(mut df: DataFrame) -> PolarsResult<DataFrame> {
    let (ccle_labels, gdsc_labels) = {
        let drugs = df.column(DRUG)?.str()?;
        let auc_ccle = df.column(AUC_CCLE)?.f64()?;
        let auc_gdsc = df.column(AUC_GDSC)?.f64()?;

        let mut ccle = Vec::with_capacity(df.height());
        let mut gdsc = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let drug = drugs.get(i).filter(|d| !d.is_empty()).ok_or_else(|| {
                PolarsError::ComputeError(format!("row {}: missing drug", i).into())
            })?;
            let cutoff = auc_cutoff(drug);
            ccle.push(auc_ccle.get(i).map(|v| classify_auc(v, cutoff).as_str()));
            gdsc.push(auc_gdsc.get(i).map(|v| classify_auc(v, cutoff).as_str()));
        }
        (ccle, gdsc)
    };

    df.with_column(Series::new(PlSmallStr::from(LABEL_CCLE), ccle_labels))?;
    df.with_column(Series::new(PlSmallStr::from(LABEL_GDSC), gdsc_labels))?;
    Ok(df)
}

/// Count observations per combined label pair, for the reporting layer.
pub fn label_category_counts(observations: &[Observation]) -> Vec<(AgreementCategory, usize)> {
    let mut counts = [0usize; 4];
    for obs in observations {
        let (ccle, gdsc) = label_observation(obs);
        counts[AgreementCategory::from_labels(ccle, gdsc) as usize] += 1;
    }
    AgreementCategory::ALL
        .iter()
        .map(|&c| (c, counts[c as usize]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use SensitivityLabel::{Resistant, Sensitive};

    fn obs(drug: &str, auc_ccle: f64, auc_gdsc: f64) -> Observation {
        Observation {
            drug: drug.to_string(),
            cell_line: "22RV1".to_string(),
            ic50_ccle: 1.0,
            ic50_gdsc: 1.0,
            auc_ccle,
            auc_gdsc,
        }
    }

    #[test]
    fn paclitaxel_gets_raised_cutoff() {
        assert_eq!(auc_cutoff("paclitaxel"), 0.4);
        assert_eq!(auc_cutoff("Paclitaxel"), 0.4);
        assert_eq!(auc_cutoff("17-AAG"), 0.1);
        assert_eq!(auc_cutoff("lapatinib"), 0.1);
    }

    #[test]
    fn auc_at_cutoff_is_sensitive() {
        assert_eq!(classify_auc(0.1, 0.1), Sensitive);
        assert_eq!(classify_auc(0.0999, 0.1), Resistant);
        assert_eq!(classify_auc(0.4, 0.4), Sensitive);
    }

    #[test]
    fn observation_labels_use_own_drug_cutoff() {
        // 0.2 clears the default cutoff but not paclitaxel's
        let (c, g) = label_observation(&obs("paclitaxel", 0.2, 0.5));
        assert_eq!((c, g), (Resistant, Sensitive));
        let (c, g) = label_observation(&obs("17-AAG", 0.2, 0.05));
        assert_eq!((c, g), (Sensitive, Resistant));
    }

    #[test]
    fn label_columns_match_cutoff_rule() {
        let df = df![
            DRUG => &["17-AAG", "paclitaxel"],
            AUC_CCLE => &[0.1, 0.2],
            AUC_GDSC => &[0.05, 0.4]
        ]
        .unwrap();
        let labeled = add_label_columns(df).unwrap();
        let ccle = labeled.column(LABEL_CCLE).unwrap().str().unwrap();
        let gdsc = labeled.column(LABEL_GDSC).unwrap().str().unwrap();
        assert_eq!(ccle.get(0), Some("Sensitive"));
        assert_eq!(gdsc.get(0), Some("Resistant"));
        assert_eq!(ccle.get(1), Some("Resistant"));
        assert_eq!(gdsc.get(1), Some("Sensitive"));
    }

    #[test]
    fn label_columns_reject_missing_drug() {
        let df = df![
            DRUG => &[Some("17-AAG"), None],
            AUC_CCLE => &[0.1, 0.2],
            AUC_GDSC => &[0.05, 0.4]
        ]
        .unwrap();
        let err = add_label_columns(df).unwrap_err();
        assert!(err.to_string().contains("missing drug"));
    }

    #[test]
    fn category_counts_cover_every_observation() {
        let observations = vec![
            obs("17-AAG", 0.5, 0.5),
            obs("17-AAG", 0.05, 0.05),
            obs("17-AAG", 0.5, 0.05),
        ];
        let counts = label_category_counts(&observations);
        assert_eq!(counts.len(), 4);
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, observations.len());
        assert_eq!(counts[0], (AgreementCategory::BothSensitive, 1));
        assert_eq!(counts[2], (AgreementCategory::CcleOnlySensitive, 1));
    }
}
