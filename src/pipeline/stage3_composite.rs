use std::f64::consts::SQRT_2;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use statrs::function::erf::erfc;
use statrs::statistics::Statistics;

use crate::model::metrics::AthleteMetrics;
use crate::model::profile::{CompositeMethod, ScoringProfile, WeightSpec};
use crate::model::table::{ReferenceSet, round_to};
use crate::model::test_type::TestType;

pub const Z_CLIP: f64 = 3.0;

#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("unsupported composite method: {0}")]
    UnsupportedMethod(String),
}

impl FromStr for CompositeMethod {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zscore" | "z-score" => Ok(CompositeMethod::ZScore),
            other => Err(ScoreError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Headline composite. `NotComputable` is written as `-1` for renderers
/// that expect the numeric sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompositeScore {
    Value(f64),
    NotComputable,
}

impl CompositeScore {
    pub const SENTINEL: f64 = -1.0;

    pub fn as_f64(self) -> f64 {
        match self {
            CompositeScore::Value(v) => v,
            CompositeScore::NotComputable => Self::SENTINEL,
        }
    }
}

impl Serialize for CompositeScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionStatus {
    Applied,
    EmptyReference,
    ZeroVariance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricContribution {
    pub metric_id: String,
    pub reference: TestType,
    pub column: String,
    pub athlete_value: f64,
    pub weight: f64,
    pub normalized_weight: f64,
    pub reference_n: usize,
    pub reference_mean: Option<f64>,
    pub reference_std: Option<f64>,
    pub z: Option<f64>,
    pub status: ContributionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeOutcome {
    pub method: CompositeMethod,
    pub score: CompositeScore,
    pub composite_z: f64,
    /// Sum of normalized weights that actually contributed. Below 1 when a
    /// metric was skipped for an unusable reference column.
    pub applied_weight: f64,
    pub contributions: Vec<MetricContribution>,
}

impl CompositeOutcome {
    fn fixed(method: CompositeMethod, score: CompositeScore) -> Self {
        Self {
            method,
            score,
            composite_z: 0.0,
            applied_weight: 0.0,
            contributions: Vec::new(),
        }
    }
}

pub fn run_stage3(
    athlete: &AthleteMetrics,
    references: &ReferenceSet,
    profile: &ScoringProfile,
) -> CompositeOutcome {
    composite_score(athlete, &profile.weights, references, profile.method)
}

pub fn composite_score(
    athlete: &AthleteMetrics,
    weights: &WeightSpec,
    references: &ReferenceSet,
    method: CompositeMethod,
) -> CompositeOutcome {
    match method {
        CompositeMethod::ZScore => zscore_composite(athlete, weights, references),
    }
}

/// Standard normal CDF.
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

fn zscore_composite(
    athlete: &AthleteMetrics,
    weights: &WeightSpec,
    references: &ReferenceSet,
) -> CompositeOutcome {
    let method = CompositeMethod::ZScore;
    let used: Vec<_> = weights
        .weights
        .iter()
        .filter_map(|w| athlete.get(&w.metric_id).map(|v| (w, v)))
        .collect();
    if used.is_empty() {
        tracing::warn!("no weighted metrics present for athlete; composite is 0");
        return CompositeOutcome::fixed(method, CompositeScore::Value(0.0));
    }

    if let Some((w, _)) = used.iter().find(|(w, _)| !references.contains(w.reference)) {
        tracing::warn!(
            metric_id = %w.metric_id,
            reference = %w.reference,
            "reference table not loaded; composite not computable"
        );
        return CompositeOutcome::fixed(method, CompositeScore::NotComputable);
    }

    let total: f64 = used.iter().map(|(w, _)| w.weight).sum();

    let mut composite_z = 0.0;
    let mut applied_weight = 0.0;
    let mut contributions = Vec::with_capacity(used.len());
    for (w, athlete_value) in used {
        let normalized_weight = if total > 0.0 { w.weight / total } else { 0.0 };
        let reference = references
            .get(w.reference)
            .map(|t| t.numeric_column(&w.column))
            .unwrap_or_default();

        let mut contribution = MetricContribution {
            metric_id: w.metric_id.clone(),
            reference: w.reference,
            column: w.column.clone(),
            athlete_value,
            weight: w.weight,
            normalized_weight,
            reference_n: reference.len(),
            reference_mean: None,
            reference_std: None,
            z: None,
            status: ContributionStatus::EmptyReference,
        };

        if reference.is_empty() {
            tracing::warn!(metric_id = %w.metric_id, column = %w.column, "reference column empty; metric skipped");
            contributions.push(contribution);
            continue;
        }

        let mean = reference.iter().mean();
        let std = reference.iter().std_dev();
        contribution.reference_mean = Some(mean);
        if !std.is_finite() || std == 0.0 {
            tracing::warn!(metric_id = %w.metric_id, column = %w.column, "reference column has no spread; metric skipped");
            contribution.status = ContributionStatus::ZeroVariance;
            contributions.push(contribution);
            continue;
        }

        let z = ((athlete_value - mean) / std).clamp(-Z_CLIP, Z_CLIP);
        composite_z += z * normalized_weight;
        applied_weight += normalized_weight;

        contribution.reference_std = Some(std);
        contribution.z = Some(z);
        contribution.status = ContributionStatus::Applied;
        contributions.push(contribution);
    }

    if applied_weight < 1.0 - 1e-9 {
        tracing::warn!(
            applied_weight,
            "composite uses less than the full weight; skipped metrics are not redistributed"
        );
    }

    let score = round_to(standard_normal_cdf(composite_z) * 100.0, 2);
    tracing::info!(composite_z, score, "composite score");

    CompositeOutcome {
        method,
        score: CompositeScore::Value(score),
        composite_z,
        applied_weight,
        contributions,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_composite.rs"]
mod tests;
