use std::io::Read;
use std::path::Path;

use crate::input::InputError;
use crate::input::cache::open_maybe_gz;
use crate::model::table::{RawTrialTable, TrialRow, coerce_numeric};

const METRIC_ID_COLUMN: &str = "metric_id";
const TRIAL_COLUMN_PREFIX: &str = "trial";

pub fn load_trial_csv(path: &Path) -> Result<RawTrialTable, InputError> {
    let reader = open_maybe_gz(path)?;
    parse_trial_csv(reader).map_err(|e| e.in_file(path))
}

/// Parses a pivoted trial export: a `metric_id` column plus `trial N`
/// columns. Any other column (such as a leading unnamed index) is ignored.
pub fn parse_trial_csv<R: Read>(reader: R) -> Result<RawTrialTable, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let metric_col = headers
        .iter()
        .position(|h| h == METRIC_ID_COLUMN)
        .ok_or_else(|| InputError::Parse("trial table has no metric_id column".to_string()))?;

    let mut trial_cols = Vec::new();
    let mut trial_labels = Vec::new();
    for (idx, name) in headers.iter().enumerate() {
        if name.starts_with(TRIAL_COLUMN_PREFIX) {
            trial_cols.push(idx);
            trial_labels.push(name.to_string());
        }
    }
    if trial_cols.is_empty() {
        return Err(InputError::Parse(
            "trial table has no trial columns".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let metric_id = record.get(metric_col).unwrap_or("").to_string();
        if metric_id.is_empty() {
            tracing::debug!(line = line + 2, "skipping trial row without metric_id");
            continue;
        }
        let values = trial_cols
            .iter()
            .map(|&c| record.get(c).and_then(coerce_numeric))
            .collect();
        rows.push(TrialRow { metric_id, values });
    }

    Ok(RawTrialTable::new(trial_labels, rows)?)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/trials.rs"]
mod tests;
