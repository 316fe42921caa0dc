use super::*;
use crate::model::metrics::MetricRecord;
use crate::model::profile::WeightEntry;
use crate::model::table::ReferenceTable;

fn reference(column: &str, values: &[f64]) -> ReferenceTable {
    ReferenceTable {
        columns: vec![column.to_string()],
        rows: values.iter().map(|v| vec![v.to_string()]).collect(),
    }
}

fn weight(metric_id: &str, reference: TestType, column: &str, weight: f64) -> WeightEntry {
    WeightEntry {
        metric_id: metric_id.to_string(),
        reference,
        column: column.to_string(),
        weight,
    }
}

fn single(value: f64, reference_values: &[f64]) -> CompositeOutcome {
    let athlete = AthleteMetrics::from_records(vec![MetricRecord::new("M", value)]);
    let weights = WeightSpec {
        weights: vec![weight("M", TestType::Imtp, "C", 1.0)],
    };
    let mut refs = ReferenceSet::default();
    refs.insert(TestType::Imtp, reference("C", reference_values));
    composite_score(&athlete, &weights, &refs, CompositeMethod::ZScore)
}

#[test]
fn test_mean_athlete_scores_fifty() {
    let out = single(20.0, &[10.0, 20.0, 30.0]);
    assert_eq!(out.score, CompositeScore::Value(50.0));
    assert_eq!(out.composite_z, 0.0);
    assert_eq!(out.applied_weight, 1.0);
}

#[test]
fn test_one_sample_std_above_mean() {
    // mean 20, sample std 10
    let out = single(30.0, &[10.0, 20.0, 30.0]);
    assert_eq!(out.score, CompositeScore::Value(84.13));
    let c = &out.contributions[0];
    assert_eq!(c.reference_mean, Some(20.0));
    assert_eq!(c.reference_std, Some(10.0));
}

#[test]
fn test_z_is_clipped() {
    let far = single(1020.0, &[10.0, 20.0, 30.0]);
    let edge = single(50.0, &[10.0, 20.0, 30.0]);
    assert_eq!(far.score, edge.score);
    assert_eq!(far.contributions[0].z, Some(Z_CLIP));
    assert_eq!(far.score, CompositeScore::Value(99.87));

    let low = single(-1000.0, &[10.0, 20.0, 30.0]);
    assert_eq!(low.score, CompositeScore::Value(0.13));
}

#[test]
fn test_zero_variance_reference_is_skipped() {
    let athlete = AthleteMetrics::from_records(vec![
        MetricRecord::new("A", 30.0),
        MetricRecord::new("B", 5.0),
    ]);
    let weights = WeightSpec {
        weights: vec![
            weight("A", TestType::Cmj, "CA", 0.5),
            weight("B", TestType::Cmj, "CB", 0.5),
        ],
    };
    let mut refs = ReferenceSet::default();
    refs.insert(
        TestType::Cmj,
        ReferenceTable {
            columns: vec!["CA".to_string(), "CB".to_string()],
            rows: vec![
                vec!["10".to_string(), "5".to_string()],
                vec!["20".to_string(), "5".to_string()],
                vec!["30".to_string(), "5".to_string()],
            ],
        },
    );
    let out = composite_score(&athlete, &weights, &refs, CompositeMethod::ZScore);
    assert_eq!(out.applied_weight, 0.5);
    assert_eq!(out.contributions[1].status, ContributionStatus::ZeroVariance);
    assert_eq!(out.composite_z, 0.5);
    assert_eq!(out.score, CompositeScore::Value(69.15));
}

#[test]
fn test_single_row_reference_is_skipped() {
    let out = single(5.0, &[4.0]);
    assert_eq!(out.applied_weight, 0.0);
    assert_eq!(out.contributions[0].status, ContributionStatus::ZeroVariance);
    assert_eq!(out.score, CompositeScore::Value(50.0));
}

#[test]
fn test_empty_reference_column_is_skipped() {
    let out = single(5.0, &[]);
    assert_eq!(out.contributions[0].status, ContributionStatus::EmptyReference);
    assert_eq!(out.contributions[0].reference_n, 0);
    assert_eq!(out.score, CompositeScore::Value(50.0));
}

#[test]
fn test_no_weighted_metrics_scores_zero() {
    let athlete = AthleteMetrics::from_records(vec![MetricRecord::new("X", 1.0)]);
    let out = composite_score(
        &athlete,
        &WeightSpec::default_v1(),
        &ReferenceSet::default(),
        CompositeMethod::ZScore,
    );
    assert_eq!(out.score, CompositeScore::Value(0.0));
    assert!(out.contributions.is_empty());
}

#[test]
fn test_missing_reference_table_not_computable() {
    let athlete = AthleteMetrics::from_records(vec![MetricRecord::new("M", 1.0)]);
    let weights = WeightSpec {
        weights: vec![weight("M", TestType::Ppu, "C", 1.0)],
    };
    let out = composite_score(&athlete, &weights, &ReferenceSet::default(), CompositeMethod::ZScore);
    assert_eq!(out.score, CompositeScore::NotComputable);
    assert_eq!(out.score.as_f64(), -1.0);
    assert_eq!(serde_json::to_string(&out.score).unwrap(), "-1.0");
}

#[test]
fn test_weights_renormalized_over_present_metrics() {
    let athlete = AthleteMetrics::from_records(vec![MetricRecord::new("A", 30.0)]);
    let weights = WeightSpec {
        weights: vec![
            weight("A", TestType::Hj, "CA", 0.2),
            weight("B", TestType::Hj, "CB", 0.8),
        ],
    };
    let mut refs = ReferenceSet::default();
    refs.insert(TestType::Hj, reference("CA", &[10.0, 20.0, 30.0]));
    let out = composite_score(&athlete, &weights, &refs, CompositeMethod::ZScore);
    assert_eq!(out.contributions.len(), 1);
    assert_eq!(out.contributions[0].normalized_weight, 1.0);
    assert_eq!(out.score, CompositeScore::Value(84.13));
}

#[test]
fn test_method_parsing() {
    assert_eq!("zscore".parse::<CompositeMethod>().unwrap(), CompositeMethod::ZScore);
    assert_eq!(" Z-Score ".parse::<CompositeMethod>().unwrap(), CompositeMethod::ZScore);
    assert!(matches!(
        "foo".parse::<CompositeMethod>(),
        Err(ScoreError::UnsupportedMethod(m)) if m == "foo"
    ));
}

#[test]
fn test_standard_normal_cdf() {
    assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-15);
    assert!((standard_normal_cdf(1.96) - 0.9750021).abs() < 1e-6);
    assert!((standard_normal_cdf(-1.0) + standard_normal_cdf(1.0) - 1.0).abs() < 1e-12);
}
