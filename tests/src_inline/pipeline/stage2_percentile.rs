use super::*;
use crate::model::metrics::MetricRecord;
use crate::model::table::ReferenceTable;

fn column_table(column: &str, values: &[&str]) -> ReferenceTable {
    ReferenceTable {
        columns: vec![column.to_string()],
        rows: values.iter().map(|v| vec![v.to_string()]).collect(),
    }
}

#[test]
fn test_percentile_weak_definition() {
    let r = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(percentile_of_score(&r, 4.0), 100.0);
    assert_eq!(percentile_of_score(&r, 10.0), 100.0);
    assert_eq!(percentile_of_score(&r, 2.5), 50.0);
    assert_eq!(percentile_of_score(&r, 0.5), 0.0);
}

#[test]
fn test_percentile_counts_ties_at_or_below() {
    let r = [1.0, 1.0, 1.0, 5.0];
    assert_eq!(percentile_of_score(&r, 1.0), 75.0);
    assert!(percentile_of_score(&[], 1.0).is_nan());
}

#[test]
fn test_percentile_stays_in_range() {
    let r: Vec<f64> = (0..37).map(|i| (i as f64 * 1.7).sin()).collect();
    for i in -20..20 {
        let p = percentile_of_score(&r, i as f64 * 0.1);
        assert!((0.0..=100.0).contains(&p));
    }
}

#[test]
fn test_radar_has_five_axes_in_order() {
    let labels: Vec<_> = radar_axes().iter().map(|a| a.label).collect();
    assert_eq!(
        labels,
        vec![
            "Reactive Strength",
            "Lower Half Strength",
            "Upper Half Strength",
            "Peak Power",
            "Relative Power"
        ]
    );
}

#[test]
fn test_run_stage2_rounds_and_handles_gaps() {
    let athlete = AthleteMetrics::from_records(vec![
        MetricRecord::new("IMTP_PEAK_VERTICAL_FORCE_Trial_N", 3000.456),
        MetricRecord::new("PPU_PEAK_CONCENTRIC_FORCE_Trial_N", 1200.0),
        MetricRecord::new("HJ_AVJ_RSI_Trial_", 2.0),
    ]);
    let mut refs = ReferenceSet::default();
    refs.insert(
        TestType::Imtp,
        column_table("PEAK_VERTICAL_FORCE_Trial_N", &["2000", "3000", "4000"]),
    );
    refs.insert(TestType::Ppu, column_table("OTHER", &["1"]));

    let radar = run_stage2(&athlete, &refs).radar;
    assert_eq!(radar.len(), 5);

    let hj = &radar[0];
    assert_eq!(hj.value, Some(2.0));
    assert_eq!(hj.percentile, None);

    let imtp = &radar[1];
    assert_eq!(imtp.value, Some(3000.46));
    assert_eq!(imtp.percentile, Some(66.67));
    assert_eq!(imtp.reference_n, 3);

    let ppu = &radar[2];
    assert_eq!(ppu.percentile, None);
    assert_eq!(ppu.reference_n, 0);

    assert_eq!(radar[3].value, None);
}
