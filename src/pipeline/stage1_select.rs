use crate::input::AthleteTables;
use crate::model::metrics::{AthleteMetrics, MetricRecord};
use crate::model::profile::{BODY_WEIGHT_METRIC, KG_TO_LB, ScoringProfile};
use crate::model::table::{RawTrialTable, round_to};
use crate::model::test_type::{TestType, test_type_order};

const READ_DECIMALS: i32 = 5;

const CMJ_CONCENTRIC_IMPULSE: &str = "CONCENTRIC_IMPULSE_Trial_Ns";
const CMJ_ECCENTRIC_BRAKING_RFD: &str = "ECCENTRIC_BRAKING_RFD_Trial_N/s";
const CMJ_PEAK_CONCENTRIC_FORCE: &str = "PEAK_CONCENTRIC_FORCE_Trial_N";
const CMJ_RELATIVE_TAKEOFF_POWER: &str = "BODYMASS_RELATIVE_TAKEOFF_POWER_Trial_W/kg";
const CMJ_RSI_MODIFIED: &str = "RSI_MODIFIED_Trial_RSI_mod";
const CMJ_ECCENTRIC_BRAKING_IMPULSE: &str = "ECCENTRIC_BRAKING_IMPULSE_Trial_Ns";

const HJ_RSI: &str = "HOP_RSI_Trial_";
const HJ_OUTPUT: &str = "HJ_AVJ_RSI_Trial_";
const HJ_MIN_TRIALS: usize = 6;
const HJ_AVERAGED: usize = 5;

const IMTP_PEAK_FORCE: &str = "PEAK_VERTICAL_FORCE_Trial_N";
const IMTP_RELATIVE_FORCE: &str = "ISO_BM_REL_FORCE_PEAK_Trial_N/kg";

const PPU_PEAK_FORCE: &str = "PEAK_CONCENTRIC_FORCE_Trial_N";

// CMJ trial quality: each input is scaled onto a common range, then weighted.
const IMPULSE_SLOPE: f64 = 0.0159412;
const IMPULSE_OFFSET: f64 = 2.739286;
const IMPULSE_WEIGHT: f64 = 0.2;
const RFD_SLOPE: f64 = 0.0004317;
const RFD_OFFSET: f64 = 1.680167;
const RFD_WEIGHT: f64 = 0.1;
const FORCE_SLOPE: f64 = 0.0018574;
const FORCE_OFFSET: f64 = 2.995598;
const FORCE_WEIGHT: f64 = 0.2;
const POWER_SLOPE: f64 = 0.1045924;
const POWER_WEIGHT: f64 = 0.3;
const RSI_SLOPE: f64 = 7.5804694;
const RSI_WEIGHT: f64 = 0.1;
const ECC_IMPULSE_SLOPE: f64 = 0.049517;
const ECC_IMPULSE_WEIGHT: f64 = 0.1;

#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("{test_type}: trial table not loaded")]
    MissingTable { test_type: TestType },
    #[error("{test_type}: required metric {metric_id} not found")]
    MetricNotFound {
        test_type: TestType,
        metric_id: String,
    },
    #[error("{test_type}: metric {metric_id} has no numeric value in {trial}")]
    NonNumeric {
        test_type: TestType,
        metric_id: String,
        trial: String,
    },
    #[error("{test_type}: need at least {needed} trials, found {found}")]
    InsufficientTrials {
        test_type: TestType,
        needed: usize,
        found: usize,
    },
    #[error("{test_type}: trial table has no trials")]
    NoTrials { test_type: TestType },
}

/// Which trial stood for the test type in the athlete table.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialSelection {
    pub test_type: TestType,
    pub basis: String,
}

/// Metric records taken from one test type, plus how the trial was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedTrial {
    pub records: Vec<MetricRecord>,
    pub basis: String,
}

#[derive(Debug)]
pub struct Stage1Output {
    pub metrics: AthleteMetrics,
    pub selections: Vec<TrialSelection>,
}

pub fn run_stage1(
    tables: &AthleteTables,
    profile: &ScoringProfile,
) -> Result<Stage1Output, SelectError> {
    let mut records_all = Vec::new();
    let mut selections = Vec::with_capacity(test_type_order().len());

    for &test_type in test_type_order() {
        let table = tables
            .get(&test_type)
            .ok_or(SelectError::MissingTable { test_type })?;
        let SelectedTrial { records, basis } = match test_type {
            TestType::Cmj => select_best_cmj_trial(table)?,
            TestType::Hj => select_best_hj_trial(table)?,
            TestType::Imtp => select_best_imtp_trial(table)?,
            TestType::Ppu => select_best_ppu_trial(table)?,
        };
        tracing::info!(test_type = %test_type, basis = %basis, n_metrics = records.len(), "selected trial");
        records_all.extend(records);
        selections.push(TrialSelection { test_type, basis });
    }

    let mut metrics = AthleteMetrics::from_records(records_all);
    if profile.body_weight_kg_to_lb {
        if let Some(v) = metrics.get_mut(BODY_WEIGHT_METRIC) {
            *v *= KG_TO_LB;
        }
    }
    tracing::debug!(n_metrics = metrics.len(), "athlete metric table built");

    Ok(Stage1Output {
        metrics,
        selections,
    })
}

/// Weighted quality score of one CMJ trial. Higher is better.
pub fn cmj_trial_quality(
    concentric_impulse: f64,
    eccentric_braking_rfd: f64,
    peak_concentric_force: f64,
    relative_takeoff_power: f64,
    rsi_modified: f64,
    eccentric_braking_impulse: f64,
) -> f64 {
    IMPULSE_WEIGHT * (IMPULSE_SLOPE * concentric_impulse - IMPULSE_OFFSET)
        + RFD_WEIGHT * (RFD_SLOPE * eccentric_braking_rfd - RFD_OFFSET)
        + FORCE_WEIGHT * (FORCE_SLOPE * peak_concentric_force - FORCE_OFFSET)
        + POWER_WEIGHT * (POWER_SLOPE * relative_takeoff_power)
        + RSI_WEIGHT * (RSI_SLOPE * rsi_modified)
        + ECC_IMPULSE_WEIGHT * (ECC_IMPULSE_SLOPE * eccentric_braking_impulse)
}

pub fn select_best_cmj_trial(table: &RawTrialTable) -> Result<SelectedTrial, SelectError> {
    let test_type = TestType::Cmj;
    ensure_trials(table, test_type)?;

    let mut scores = Vec::with_capacity(table.n_trials());
    for col in 0..table.n_trials() {
        let read = |metric_id: &str| required_value(table, test_type, metric_id, col);
        let score = cmj_trial_quality(
            read(CMJ_CONCENTRIC_IMPULSE)?,
            read(CMJ_ECCENTRIC_BRAKING_RFD)?,
            read(CMJ_PEAK_CONCENTRIC_FORCE)?,
            read(CMJ_RELATIVE_TAKEOFF_POWER)?,
            read(CMJ_RSI_MODIFIED)?,
            read(CMJ_ECCENTRIC_BRAKING_IMPULSE)?,
        );
        scores.push(round_to(score, READ_DECIMALS));
    }
    tracing::debug!(?scores, "cmj trial quality scores");

    let best = argmax_first(&scores);
    Ok(SelectedTrial {
        records: emit_column(table, test_type, best),
        basis: table.trial_labels[best].clone(),
    })
}

pub fn select_best_hj_trial(table: &RawTrialTable) -> Result<SelectedTrial, SelectError> {
    let test_type = TestType::Hj;
    ensure_trials(table, test_type)?;
    if table.n_trials() < HJ_MIN_TRIALS {
        return Err(SelectError::InsufficientTrials {
            test_type,
            needed: HJ_MIN_TRIALS,
            found: table.n_trials(),
        });
    }

    let mut rsi = (0..table.n_trials())
        .map(|col| required_value(table, test_type, HJ_RSI, col))
        .collect::<Result<Vec<_>, _>>()?;
    rsi.sort_by(|a, b| b.total_cmp(a));

    // The single highest hop is treated as a possible misread and dropped.
    let kept = &rsi[1..=HJ_AVERAGED];
    let average = kept.iter().sum::<f64>() / HJ_AVERAGED as f64;

    Ok(SelectedTrial {
        records: vec![MetricRecord::new(HJ_OUTPUT, average)],
        basis: format!(
            "mean of hops 2-{} of {} by RSI",
            HJ_AVERAGED + 1,
            table.n_trials()
        ),
    })
}

pub fn select_best_imtp_trial(table: &RawTrialTable) -> Result<SelectedTrial, SelectError> {
    let test_type = TestType::Imtp;
    let (best, peak) = argmax_metric(table, test_type, IMTP_PEAK_FORCE)?;
    let relative = required_value(table, test_type, IMTP_RELATIVE_FORCE, best)?;
    Ok(SelectedTrial {
        records: vec![
            MetricRecord::new(test_type.tagged(IMTP_PEAK_FORCE), peak),
            MetricRecord::new(test_type.tagged(IMTP_RELATIVE_FORCE), relative),
        ],
        basis: table.trial_labels[best].clone(),
    })
}

pub fn select_best_ppu_trial(table: &RawTrialTable) -> Result<SelectedTrial, SelectError> {
    let test_type = TestType::Ppu;
    let (best, _) = argmax_metric(table, test_type, PPU_PEAK_FORCE)?;
    Ok(SelectedTrial {
        records: emit_column(table, test_type, best),
        basis: table.trial_labels[best].clone(),
    })
}

fn ensure_trials(table: &RawTrialTable, test_type: TestType) -> Result<(), SelectError> {
    if table.n_trials() == 0 {
        return Err(SelectError::NoTrials { test_type });
    }
    Ok(())
}

fn required_value(
    table: &RawTrialTable,
    test_type: TestType,
    metric_id: &str,
    col: usize,
) -> Result<f64, SelectError> {
    let row = table
        .row(metric_id)
        .ok_or_else(|| SelectError::MetricNotFound {
            test_type,
            metric_id: metric_id.to_string(),
        })?;
    row.values
        .get(col)
        .copied()
        .flatten()
        .map(|v| round_to(v, READ_DECIMALS))
        .ok_or_else(|| SelectError::NonNumeric {
            test_type,
            metric_id: metric_id.to_string(),
            trial: table
                .trial_labels
                .get(col)
                .cloned()
                .unwrap_or_else(|| format!("column {col}")),
        })
}

/// Column holding the largest value of `metric_id`, with that value.
fn argmax_metric(
    table: &RawTrialTable,
    test_type: TestType,
    metric_id: &str,
) -> Result<(usize, f64), SelectError> {
    ensure_trials(table, test_type)?;
    let values = (0..table.n_trials())
        .map(|col| required_value(table, test_type, metric_id, col))
        .collect::<Result<Vec<_>, _>>()?;
    let best = argmax_first(&values);
    Ok((best, values[best]))
}

/// Index of the first maximum. Ties resolve to the earliest column.
fn argmax_first(values: &[f64]) -> usize {
    let mut best = 0usize;
    for (idx, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = idx;
        }
    }
    best
}

fn emit_column(table: &RawTrialTable, test_type: TestType, col: usize) -> Vec<MetricRecord> {
    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        match row.values.get(col).copied().flatten() {
            Some(v) => out.push(MetricRecord::new(
                test_type.tagged(&row.metric_id),
                round_to(v, READ_DECIMALS),
            )),
            None => tracing::warn!(
                test_type = %test_type,
                metric_id = %row.metric_id,
                trial = %table.trial_labels[col],
                "selected trial has no value for metric; dropped"
            ),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_select.rs"]
mod tests;
