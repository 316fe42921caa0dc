pub mod json;
pub mod text;

use chrono::NaiveDate;

use crate::model::metrics::AthleteMetrics;
use crate::model::profile::AgeBand;
use crate::model::test_type::TestType;
use crate::pipeline::stage1_select::TrialSelection;
use crate::pipeline::stage2_percentile::RadarPoint;
use crate::pipeline::stage3_composite::{CompositeOutcome, CompositeScore};

pub const NOT_AVAILABLE: &str = "NA";

pub const COMPOSITE_DESCRIPTION: &str = "The composite score condenses several force-plate \
metrics into one number reflecting overall athleticism. It shows where the athlete ranks \
against the reference population for the selected age band and serves as a benchmark for \
tracking progress between testing sessions.";

#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub tool_name: String,
    pub tool_version: String,
    pub athlete_name: Option<String>,
    pub test_date: Option<NaiveDate>,
    pub age_band: Option<AgeBand>,
    pub metrics: &'a AthleteMetrics,
    pub selections: &'a [TrialSelection],
    pub radar: &'a [RadarPoint],
    pub composite: &'a CompositeOutcome,
    pub composite_label: String,
    pub reference_rows: Vec<(TestType, usize)>,
}

/// Text shown in the composite gauge.
pub fn composite_label(score: CompositeScore, legacy_na_at_45: bool) -> String {
    match score {
        CompositeScore::NotComputable => NOT_AVAILABLE.to_string(),
        CompositeScore::Value(v) if legacy_na_at_45 && v.round_ties_even() == 45.0 => {
            NOT_AVAILABLE.to_string()
        }
        CompositeScore::Value(v) => format!("{:.0}", v.round_ties_even()),
    }
}

pub fn format_test_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn format_optional(v: Option<f64>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
