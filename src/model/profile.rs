use serde::{Deserialize, Serialize};

use crate::model::test_type::TestType;

/// One composite input: athlete metric, where its population lives, and how
/// much it counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub metric_id: String,
    pub reference: TestType,
    pub column: String,
    pub weight: f64,
}

/// Authored weights. They are not required to sum to 1; the composite
/// renormalizes over whichever entries the athlete actually has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSpec {
    pub weights: Vec<WeightEntry>,
}

impl WeightSpec {
    pub fn default_v1() -> Self {
        let entry = |metric_id: &str, reference: TestType, column: &str, weight: f64| WeightEntry {
            metric_id: metric_id.to_string(),
            reference,
            column: column.to_string(),
            weight,
        };
        Self {
            weights: vec![
                entry(
                    "CMJ_BODY_WEIGHT_LBS_Trial_lb",
                    TestType::Cmj,
                    "BODY_WEIGHT_LBS_Trial_lb",
                    0.10,
                ),
                entry(
                    "CMJ_PEAK_TAKEOFF_POWER_Trial_W",
                    TestType::Cmj,
                    "PEAK_TAKEOFF_POWER_Trial_W",
                    0.30,
                ),
                entry(
                    "CMJ_CONCENTRIC_IMPULSE_Trial_Ns",
                    TestType::Cmj,
                    "CONCENTRIC_IMPULSE_Trial_Ns",
                    0.15,
                ),
                entry(
                    "CMJ_ECCENTRIC_BRAKING_RFD_Trial_N/s",
                    TestType::Cmj,
                    "ECCENTRIC_BRAKING_RFD_Trial_N_s",
                    0.15,
                ),
                entry(
                    "PPU_PEAK_CONCENTRIC_FORCE_Trial_N",
                    TestType::Ppu,
                    "PEAK_CONCENTRIC_FORCE_Trial_N",
                    0.10,
                ),
                entry(
                    "IMTP_PEAK_VERTICAL_FORCE_Trial_N",
                    TestType::Imtp,
                    "PEAK_VERTICAL_FORCE_Trial_N",
                    0.10,
                ),
                entry(
                    "HJ_AVJ_RSI_Trial_",
                    TestType::Hj,
                    "hop_rsi_avg_best_5",
                    0.10,
                ),
            ],
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().map(|w| w.weight).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeMethod {
    ZScore,
}

impl CompositeMethod {
    pub fn name(self) -> &'static str {
        match self {
            CompositeMethod::ZScore => "zscore",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringProfile {
    pub weights: WeightSpec,
    pub method: CompositeMethod,
    /// Historical reports printed "NA" for any composite that rounded to 45.
    pub legacy_na_at_45: bool,
    /// The vendor reports CMJ body weight in kg under a `_lb` metric name.
    pub body_weight_kg_to_lb: bool,
}

pub const KG_TO_LB: f64 = 2.20462;
pub const BODY_WEIGHT_METRIC: &str = "CMJ_BODY_WEIGHT_LBS_Trial_lb";

impl ScoringProfile {
    pub fn default_v1() -> Self {
        Self {
            weights: WeightSpec::default_v1(),
            method: CompositeMethod::ZScore,
            legacy_na_at_45: true,
            body_weight_kg_to_lb: true,
        }
    }

    pub fn with_weights(mut self, weights: WeightSpec) -> Self {
        self.weights = weights;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBand {
    pub min_age: u32,
    pub max_age: u32,
}

impl AgeBand {
    pub fn new(min_age: u32, max_age: u32) -> Self {
        Self { min_age, max_age }
    }

    pub fn high_school() -> Self {
        Self::new(14, 18)
    }

    pub fn college() -> Self {
        Self::new(18, 22)
    }

    pub fn pro() -> Self {
        Self::new(21, 35)
    }

    pub fn contains(&self, age: f64) -> bool {
        age >= self.min_age as f64 && age <= self.max_age as f64
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/profile.rs"]
mod tests;
