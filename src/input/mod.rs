use std::collections::BTreeMap;
use std::path::Path;

pub mod cache;
pub mod reference;
pub mod sessions;
pub mod trials;
pub mod vendor;

use cache::{find_with_extensions, logical_extension, open_maybe_gz};
use reference::{load_reference_csv, prepare_reference};
use trials::load_trial_csv;
use vendor::load_trials_json;

use crate::model::profile::{AgeBand, WeightSpec};
use crate::model::table::{RawTrialTable, ReferenceSet, TableError};
use crate::model::test_type::{TestType, test_type_order};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid trial table: {0}")]
    Table(#[from] TableError),
    #[error("{path}: {source}")]
    InFile {
        path: String,
        #[source]
        source: Box<InputError>,
    },
}

impl InputError {
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            InputError::MissingInput(_) | InputError::InFile { .. } => self,
            other => InputError::InFile {
                path: path.display().to_string(),
                source: Box::new(other),
            },
        }
    }
}

pub type AthleteTables = BTreeMap<TestType, RawTrialTable>;

/// Reads `<CODE>.json` (vendor trials payload) or `<CODE>.csv` (pivoted
/// export), optionally gzip-compressed, from the athlete directory.
pub fn load_trial_table(dir: &Path, test_type: TestType) -> Result<RawTrialTable, InputError> {
    let path = find_with_extensions(dir, test_type.code(), &["json", "csv"]).ok_or_else(|| {
        InputError::MissingInput(format!(
            "no {} trial file (json or csv) in {}",
            test_type,
            dir.display()
        ))
    })?;
    tracing::info!(test_type = %test_type, path = %path.display(), "loading trial table");
    match logical_extension(&path).as_deref() {
        Some("json") => load_trials_json(&path, test_type),
        _ => load_trial_csv(&path),
    }
}

/// All four test types are required for a report.
pub fn load_athlete_tables(dir: &Path) -> Result<AthleteTables, InputError> {
    let mut out = AthleteTables::new();
    for &test_type in test_type_order() {
        out.insert(test_type, load_trial_table(dir, test_type)?);
    }
    Ok(out)
}

/// Loads whichever `<CODE>_ref.csv` exports exist. A missing export is not
/// an error here; the percentile and composite stages decide what that means.
pub fn load_reference_set(dir: &Path, band: Option<AgeBand>) -> Result<ReferenceSet, InputError> {
    let mut set = ReferenceSet::default();
    for &test_type in test_type_order() {
        let Some(path) = find_with_extensions(dir, &test_type.reference_stem(), &["csv"]) else {
            tracing::warn!(
                test_type = %test_type,
                dir = %dir.display(),
                "no reference export found"
            );
            continue;
        };
        let raw = load_reference_csv(&path)?;
        set.insert(test_type, prepare_reference(raw, test_type, band));
    }
    Ok(set)
}

pub fn load_weights(path: &Path) -> Result<WeightSpec, InputError> {
    let reader = open_maybe_gz(path)?;
    let spec: WeightSpec = serde_json::from_reader(reader).map_err(|e| {
        InputError::from(e).in_file(path)
    })?;
    if spec.weights.is_empty() {
        return Err(InputError::InvalidInput(format!(
            "{}: weight file lists no metrics",
            path.display()
        )));
    }
    if spec.total_weight() <= 0.0 {
        return Err(InputError::InvalidInput(format!(
            "{}: weights sum to zero",
            path.display()
        )));
    }
    for w in &spec.weights {
        if !w.weight.is_finite() || w.weight < 0.0 {
            return Err(InputError::InvalidInput(format!(
                "{}: weight for {} must be a non-negative number",
                path.display(),
                w.metric_id
            )));
        }
    }
    Ok(spec)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
