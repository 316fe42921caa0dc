use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub metric_id: String,
    #[serde(rename = "Value")]
    pub value: f64,
}

impl MetricRecord {
    pub fn new(metric_id: impl Into<String>, value: f64) -> Self {
        Self {
            metric_id: metric_id.into(),
            value,
        }
    }
}

/// Per-athlete metric table after trial selection. Lookups are by id; the
/// order only matters for output files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteMetrics {
    pub records: Vec<MetricRecord>,
}

impl AthleteMetrics {
    pub fn from_records(records: Vec<MetricRecord>) -> Self {
        Self { records }
    }

    pub fn get(&self, metric_id: &str) -> Option<f64> {
        self.records
            .iter()
            .find(|r| r.metric_id == metric_id)
            .map(|r| r.value)
    }

    pub fn get_mut(&mut self, metric_id: &str) -> Option<&mut f64> {
        self.records
            .iter_mut()
            .find(|r| r.metric_id == metric_id)
            .map(|r| &mut r.value)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
