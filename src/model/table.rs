use std::collections::BTreeMap;

use crate::model::test_type::TestType;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error("metric {metric_id} has {found} trial values, expected {expected}")]
    RaggedRow {
        metric_id: String,
        found: usize,
        expected: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrialRow {
    pub metric_id: String,
    pub values: Vec<Option<f64>>,
}

/// One test type's measurements for one athlete: a row per metric, a column
/// per trial. Cells that failed numeric coercion are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTrialTable {
    pub trial_labels: Vec<String>,
    pub rows: Vec<TrialRow>,
}

impl RawTrialTable {
    pub fn new(trial_labels: Vec<String>, rows: Vec<TrialRow>) -> Result<Self, TableError> {
        if let Some(row) = rows.iter().find(|r| r.values.len() != trial_labels.len()) {
            return Err(TableError::RaggedRow {
                metric_id: row.metric_id.clone(),
                found: row.values.len(),
                expected: trial_labels.len(),
            });
        }
        Ok(Self { trial_labels, rows })
    }

    pub fn n_trials(&self) -> usize {
        self.trial_labels.len()
    }

    pub fn row(&self, metric_id: &str) -> Option<&TrialRow> {
        self.rows.iter().find(|r| r.metric_id == metric_id)
    }
}

/// Reference population export for one test type. Cells are kept as text and
/// coerced on read so a bad cell only affects the column it sits in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReferenceTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Numeric values of `name`, with missing and non-numeric cells dropped.
    /// An absent column yields an empty vector.
    pub fn numeric_column(&self, name: &str) -> Vec<f64> {
        let Some(col) = self.column_index(name) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|r| r.get(col).and_then(|s| coerce_numeric(s)))
            .collect()
    }
}

/// Reference tables keyed by test type. Shared read-only across scoring calls.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    tables: BTreeMap<TestType, ReferenceTable>,
}

impl ReferenceSet {
    pub fn insert(&mut self, test_type: TestType, table: ReferenceTable) {
        self.tables.insert(test_type, table);
    }

    pub fn get(&self, test_type: TestType) -> Option<&ReferenceTable> {
        self.tables.get(&test_type)
    }

    pub fn contains(&self, test_type: TestType) -> bool {
        self.tables.contains_key(&test_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TestType, &ReferenceTable)> {
        self.tables.iter().map(|(k, v)| (*k, v))
    }
}

pub fn coerce_numeric(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/table.rs"]
mod tests;
