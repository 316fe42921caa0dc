use crate::pipeline::stage3_composite::{CompositeScore, ContributionStatus};
use crate::report::{
    COMPOSITE_DESCRIPTION, ReportContext, format_f64_6, format_optional, format_test_date,
};

pub fn render_report_text(ctx: &ReportContext<'_>) -> String {
    let mut out = String::new();

    out.push_str("Athlete Performance Report\n");
    out.push_str("==========================\n\n");

    if let Some(name) = &ctx.athlete_name {
        out.push_str(&format!("Athlete: {}\n", name));
    }
    match ctx.test_date {
        Some(date) => out.push_str(&format!(
            "Performance Assessment Overview - {}\n",
            format_test_date(date)
        )),
        None => out.push_str("Performance Assessment Overview\n"),
    }
    if let Some(band) = ctx.age_band {
        out.push_str(&format!(
            "Reference population: ages {}-{}\n",
            band.min_age, band.max_age
        ));
    }
    out.push('\n');

    out.push_str("1. Radar profile\n");
    for point in ctx.radar {
        out.push_str(&format!("{}:\n", point.label));
        let unit = if point.unit.is_empty() {
            String::new()
        } else {
            format!(" {}", point.unit)
        };
        let percentile = match point.percentile {
            Some(p) => format!("{}%", p),
            None => crate::report::NOT_AVAILABLE.to_string(),
        };
        out.push_str(&format!(
            "  {}: {}{} - {}\n",
            point.detail,
            format_optional(point.value),
            unit,
            percentile
        ));
    }
    out.push('\n');

    out.push_str("2. Composite score\n");
    match ctx.composite.score {
        CompositeScore::Value(v) => out.push_str(&format!("Composite Score: {}\n", v)),
        CompositeScore::NotComputable => {
            out.push_str("Composite Score: not computable\n");
        }
    }
    out.push_str(&format!("Gauge label: {}\n", ctx.composite_label));
    out.push_str(&format!(
        "Method: {}\nComposite z: {}\nApplied weight: {}\n",
        ctx.composite.method.name(),
        format_f64_6(ctx.composite.composite_z),
        format_f64_6(ctx.composite.applied_weight)
    ));
    for c in &ctx.composite.contributions {
        let detail = match (c.status, c.z) {
            (ContributionStatus::Applied, Some(z)) => format!("z={}", format_f64_6(z)),
            (ContributionStatus::ZeroVariance, _) => "skipped (no spread in reference)".to_string(),
            _ => "skipped (empty reference)".to_string(),
        };
        out.push_str(&format!(
            "  {} weight={} {}\n",
            c.metric_id,
            format_f64_6(c.normalized_weight),
            detail
        ));
    }
    out.push_str(COMPOSITE_DESCRIPTION);
    out.push_str("\n\n");

    out.push_str("3. Trial selection\n");
    for s in ctx.selections {
        out.push_str(&format!("{}: {}\n", s.test_type, s.basis));
    }
    if !ctx.reference_rows.is_empty() {
        let parts = ctx
            .reference_rows
            .iter()
            .map(|(t, n)| format!("{}={}", t, n))
            .collect::<Vec<_>>();
        out.push_str(&format!("Reference athletes: {}\n", parts.join(", ")));
    }

    out
}
