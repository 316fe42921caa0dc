use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::input::InputError;
use crate::input::cache::open_maybe_gz;
use crate::model::interest::{metrics_of_interest, unit_symbol};
use crate::model::table::{RawTrialTable, TrialRow, coerce_numeric};
use crate::model::test_type::TestType;

#[derive(Debug, Deserialize)]
struct TrialPayload {
    #[serde(default)]
    results: Vec<ResultPayload>,
}

#[derive(Debug, Deserialize)]
struct ResultPayload {
    #[serde(default)]
    value: Value,
    #[serde(default)]
    limb: Option<String>,
    #[serde(default)]
    definition: DefinitionPayload,
}

#[derive(Debug, Default, Deserialize)]
struct DefinitionPayload {
    #[serde(default)]
    result: String,
    #[serde(default)]
    unit: String,
}

pub fn load_trials_json(path: &Path, test_type: TestType) -> Result<RawTrialTable, InputError> {
    let reader = open_maybe_gz(path)?;
    parse_trials_payload(reader, test_type).map_err(|e| e.in_file(path))
}

/// Pivots the vendor's per-trial result list into one row per metric id and
/// one column per trial, keeping only the test type's metrics of interest.
pub fn parse_trials_payload<R: Read>(
    reader: R,
    test_type: TestType,
) -> Result<RawTrialTable, InputError> {
    let trials: Vec<TrialPayload> = serde_json::from_reader(reader)?;
    if trials.is_empty() {
        return Err(InputError::Parse("trials payload is empty".to_string()));
    }

    // metric_id -> trial number (1-based) -> value
    let mut cells: BTreeMap<String, BTreeMap<usize, Option<f64>>> = BTreeMap::new();
    let mut n_results = 0usize;
    for trial in &trials {
        for res in &trial.results {
            n_results += 1;
            let metric_id = format!(
                "{}_{}_{}",
                res.definition.result,
                res.limb.as_deref().unwrap_or("None"),
                unit_symbol(&res.definition.unit)
            );
            let per_metric = cells.entry(metric_id).or_default();
            let trial_no = per_metric.len() + 1;
            per_metric.insert(trial_no, json_number(&res.value));
        }
    }
    if n_results == 0 {
        return Err(InputError::Parse("trials payload has no results".to_string()));
    }

    let n_trials = cells.values().map(|m| m.len()).max().unwrap_or(0);
    let trial_labels = (1..=n_trials).map(|t| format!("trial {t}")).collect();

    let wanted = metrics_of_interest(test_type);
    let mut rows = Vec::new();
    for (metric_id, per_trial) in cells {
        if !wanted.contains(&metric_id.as_str()) {
            continue;
        }
        let values = (1..=n_trials)
            .map(|t| per_trial.get(&t).copied().flatten())
            .collect();
        rows.push(TrialRow { metric_id, values });
    }
    tracing::debug!(
        test_type = %test_type,
        n_trials,
        n_metrics = rows.len(),
        "pivoted vendor trials payload"
    );

    Ok(RawTrialTable::new(trial_labels, rows)?)
}

fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => coerce_numeric(s),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/vendor.rs"]
mod tests;
