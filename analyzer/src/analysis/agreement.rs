use std::collections::BTreeMap;

use log::debug;
use polars::prelude::*;

use crate::analysis::sensitivity::label_observation;
use crate::models::{AgreementScore, Observation, SensitivityLabel};

/// Matthews correlation between two label sequences for the same cell lines.
///
/// Counts the four label-pair cells (both Sensitive, both Resistant, and the
/// two mixed cells) and normalizes their determinant by the geometric mean of
/// the marginals. When any marginal is zero the raw numerator is returned
/// instead of dividing by zero; that value is on a count scale rather than in
/// [-1, 1]. Known wrinkle, kept as-is: the intent is only to never fail on a
/// one-category group.
pub fn matthews_corr(ccle: &[SensitivityLabel], gdsc: &[SensitivityLabel]) -> f64 {
    use SensitivityLabel::{Resistant, Sensitive};

    let mut bs = 0usize; // both Sensitive
    let mut br = 0usize; // both Resistant
    let mut sr = 0usize; // CCLE Sensitive, GDSC Resistant
    let mut rs = 0usize; // CCLE Resistant, GDSC Sensitive
    for (a, b) in ccle.iter().zip(gdsc.iter()) {
        match (a, b) {
            (Sensitive, Sensitive) => bs += 1,
            (Resistant, Resistant) => br += 1,
            (Sensitive, Resistant) => sr += 1,
            (Resistant, Sensitive) => rs += 1,
        }
    }

    let (bs, br, sr, rs) = (bs as f64, br as f64, sr as f64, rs as f64);
    let numerator = bs * br - sr * rs;
    let marginals = [bs + sr, bs + rs, br + sr, br + rs];
    if marginals.iter().any(|&m| m == 0.0) {
        return numerator;
    }
    numerator / marginals.iter().product::<f64>().sqrt()
}

/// Partition observations by drug. BTreeMap keeps the grouping deterministic;
/// consumers must not rely on the order anyway.
pub fn group_by_drug(observations: &[Observation]) -> BTreeMap<String, Vec<&Observation>> {
    let mut groups: BTreeMap<String, Vec<&Observation>> = BTreeMap::new();
    for obs in observations {
        groups.entry(obs.drug.clone()).or_default().push(obs);
    }
    groups
}

/// One agreement score per distinct drug in the input. Each observation is
/// labeled with its own drug's cutoff before the group is scored.
pub fn score_by_drug(observations: &[Observation]) -> Vec<AgreementScore> {
    let groups = group_by_drug(observations);
    let mut scores = Vec::with_capacity(groups.len());
    for (drug, group) in groups {
        let mut ccle = Vec::with_capacity(group.len());
        let mut gdsc = Vec::with_capacity(group.len());
        for obs in &group {
            let (a, b) = label_observation(obs);
            ccle.push(a);
            gdsc.push(b);
        }
        let mcc = matthews_corr(&ccle, &gdsc);
        debug!("{}: n = {}, mcc = {:.3}", drug, group.len(), mcc);
        scores.push(AgreementScore { drug, mcc });
    }
    scores
}

/// Score table for the reporting layer, one row per drug.
pub fn scores_to_dataframe(scores: &[AgreementScore]) -> PolarsResult<DataFrame> {
    let drugs = scores.iter().map(|s| s.drug.as_str()).collect::<Vec<_>>();
    let mccs = scores.iter().map(|s| s.mcc).collect::<Vec<_>>();
    DataFrame::new(vec![
        Column::from(Series::new(PlSmallStr::from("drug"), drugs)),
        Column::from(Series::new(PlSmallStr::from("matthews_corr"), mccs)),
    ])
}
