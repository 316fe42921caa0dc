use crate::model::metrics::AthleteMetrics;
use crate::model::table::{ReferenceSet, round_to};
use crate::model::test_type::TestType;

/// Percent of `reference` at or below `value` (weak percentile-of-score).
///
/// `reference` must be non-empty; an empty slice yields NaN.
pub fn percentile_of_score(reference: &[f64], value: f64) -> f64 {
    let at_or_below = reference.iter().filter(|&&r| r <= value).count();
    100.0 * at_or_below as f64 / reference.len() as f64
}

#[derive(Debug, Clone, Copy)]
pub struct RadarAxisDef {
    pub label: &'static str,
    pub detail: &'static str,
    pub unit: &'static str,
    pub metric_id: &'static str,
    pub reference: TestType,
    pub column: &'static str,
}

const RADAR_AXES: &[RadarAxisDef] = &[
    RadarAxisDef {
        label: "Reactive Strength",
        detail: "HJ Reactive Strength Index",
        unit: "",
        metric_id: "HJ_AVJ_RSI_Trial_",
        reference: TestType::Hj,
        column: "hop_rsi_avg_best_5",
    },
    RadarAxisDef {
        label: "Lower Half Strength",
        detail: "IMTP Peak Vertical Force",
        unit: "N",
        metric_id: "IMTP_PEAK_VERTICAL_FORCE_Trial_N",
        reference: TestType::Imtp,
        column: "PEAK_VERTICAL_FORCE_Trial_N",
    },
    RadarAxisDef {
        label: "Upper Half Strength",
        detail: "PPU Peak Concentric Force",
        unit: "N",
        metric_id: "PPU_PEAK_CONCENTRIC_FORCE_Trial_N",
        reference: TestType::Ppu,
        column: "PEAK_CONCENTRIC_FORCE_Trial_N",
    },
    RadarAxisDef {
        label: "Peak Power",
        detail: "CMJ Peak Power",
        unit: "W",
        metric_id: "CMJ_PEAK_TAKEOFF_POWER_Trial_W",
        reference: TestType::Cmj,
        column: "PEAK_TAKEOFF_POWER_Trial_W",
    },
    RadarAxisDef {
        label: "Relative Power",
        detail: "CMJ Relative Peak Power",
        unit: "W/kg",
        metric_id: "CMJ_BODYMASS_RELATIVE_TAKEOFF_POWER_Trial_W/kg",
        reference: TestType::Cmj,
        column: "BODYMASS_RELATIVE_TAKEOFF_POWER_Trial_W_kg",
    },
];

pub fn radar_axes() -> &'static [RadarAxisDef] {
    RADAR_AXES
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarPoint {
    pub label: &'static str,
    pub detail: &'static str,
    pub unit: &'static str,
    pub metric_id: &'static str,
    /// Athlete value rounded to 2 decimals.
    pub value: Option<f64>,
    /// Percentile rounded to 2 decimals; `None` when it cannot be computed.
    pub percentile: Option<f64>,
    pub reference_n: usize,
}

#[derive(Debug)]
pub struct Stage2Output {
    pub radar: Vec<RadarPoint>,
}

pub fn run_stage2(athlete: &AthleteMetrics, references: &ReferenceSet) -> Stage2Output {
    let radar = radar_axes()
        .iter()
        .map(|axis| radar_point(axis, athlete, references))
        .collect();
    Stage2Output { radar }
}

fn radar_point(
    axis: &RadarAxisDef,
    athlete: &AthleteMetrics,
    references: &ReferenceSet,
) -> RadarPoint {
    let value = athlete.get(axis.metric_id).map(|v| round_to(v, 2));
    let reference = references
        .get(axis.reference)
        .map(|t| t.numeric_column(axis.column))
        .unwrap_or_default();

    let percentile = match value {
        Some(v) if !reference.is_empty() => Some(round_to(percentile_of_score(&reference, v), 2)),
        Some(_) => {
            tracing::warn!(
                axis = axis.label,
                reference = %axis.reference,
                column = axis.column,
                "no usable reference values; percentile unavailable"
            );
            None
        }
        None => {
            tracing::warn!(axis = axis.label, metric_id = axis.metric_id, "athlete metric missing");
            None
        }
    };

    RadarPoint {
        label: axis.label,
        detail: axis.detail,
        unit: axis.unit,
        metric_id: axis.metric_id,
        value,
        percentile,
        reference_n: reference.len(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_percentile.rs"]
mod tests;
