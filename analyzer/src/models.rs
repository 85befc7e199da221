use std::error::Error;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Wrap a foreign error into a Polars `ComputeError` so loaders and writers
/// can stay inside `PolarsResult`.
pub fn polars_err(e: Box<dyn Error>) -> PolarsError {
    PolarsError::ComputeError(format!("{}", e).into())
}

/// A dataset that can be loaded wholesale into a DataFrame.
pub trait Dataset {
    fn load(&self) -> PolarsResult<DataFrame>;
}

/// Binary sensitivity call for one (drug, cell line, study) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitivityLabel {
    Resistant,
    Sensitive,
}

impl SensitivityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensitivityLabel::Resistant => "Resistant",
            SensitivityLabel::Sensitive => "Sensitive",
        }
    }
}

/// One summarized drug-response record: a (drug, cell line) pair measured in
/// both the CCLE and GDSC studies.
#[derive(Debug, Clone)]
pub struct Observation {
    pub drug: String,
    pub cell_line: String,
    pub ic50_ccle: f64,
    pub ic50_gdsc: f64,
    pub auc_ccle: f64,
    pub auc_gdsc: f64,
}

/// Between-study label agreement for one drug.
///
/// `mcc` is the Matthews correlation when the drug's confusion matrix has all
/// four marginals populated, and the raw unnormalized numerator otherwise
/// (see [`crate::analysis::agreement::matthews_corr`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgreementScore {
    pub drug: String,
    pub mcc: f64,
}

/// Combined per-study label pair. Reporting layer only; the agreement score
/// is computed from the raw label sequences, not from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgreementCategory {
    BothSensitive,
    BothResistant,
    CcleOnlySensitive,
    GdscOnlySensitive,
}

impl AgreementCategory {
    pub const ALL: [AgreementCategory; 4] = [
        AgreementCategory::BothSensitive,
        AgreementCategory::BothResistant,
        AgreementCategory::CcleOnlySensitive,
        AgreementCategory::GdscOnlySensitive,
    ];

    pub fn from_labels(ccle: SensitivityLabel, gdsc: SensitivityLabel) -> Self {
        use SensitivityLabel::{Resistant, Sensitive};
        match (ccle, gdsc) {
            (Sensitive, Sensitive) => AgreementCategory::BothSensitive,
            (Resistant, Resistant) => AgreementCategory::BothResistant,
            (Sensitive, Resistant) => AgreementCategory::CcleOnlySensitive,
            (Resistant, Sensitive) => AgreementCategory::GdscOnlySensitive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgreementCategory::BothSensitive => "Both Sensitive",
            AgreementCategory::BothResistant => "Both Resistant",
            AgreementCategory::CcleOnlySensitive => "CCLE Sensitive, GDSC Resistant",
            AgreementCategory::GdscOnlySensitive => "GDSC Sensitive, CCLE Resistant",
        }
    }
}
