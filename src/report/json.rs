use serde::Serialize;

use crate::model::metrics::MetricRecord;
use crate::pipeline::stage3_composite::CompositeOutcome;
use crate::report::ReportContext;

#[derive(Debug, Serialize)]
struct SummaryJson<'a> {
    tool: ToolMeta<'a>,
    athlete: AthleteMeta<'a>,
    reference: ReferenceMeta,
    trial_selection: Vec<SelectionJson<'a>>,
    radar: Vec<RadarJson<'a>>,
    composite: CompositeJson<'a>,
    metrics: &'a [MetricRecord],
}

#[derive(Debug, Serialize)]
struct ToolMeta<'a> {
    name: &'a str,
    version: &'a str,
}

#[derive(Debug, Serialize)]
struct AthleteMeta<'a> {
    name: Option<&'a str>,
    test_date: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReferenceMeta {
    min_age: Option<u32>,
    max_age: Option<u32>,
    rows: Vec<ReferenceRows>,
}

#[derive(Debug, Serialize)]
struct ReferenceRows {
    test_type: String,
    n: usize,
}

#[derive(Debug, Serialize)]
struct SelectionJson<'a> {
    test_type: String,
    basis: &'a str,
}

#[derive(Debug, Serialize)]
struct RadarJson<'a> {
    label: &'a str,
    metric_id: &'a str,
    value: Option<f64>,
    percentile: Option<f64>,
    reference_n: usize,
}

#[derive(Debug, Serialize)]
struct CompositeJson<'a> {
    label: &'a str,
    #[serde(flatten)]
    outcome: &'a CompositeOutcome,
}

pub fn render_summary_json(ctx: &ReportContext<'_>) -> serde_json::Result<String> {
    let summary = SummaryJson {
        tool: ToolMeta {
            name: &ctx.tool_name,
            version: &ctx.tool_version,
        },
        athlete: AthleteMeta {
            name: ctx.athlete_name.as_deref(),
            test_date: ctx.test_date.map(|d| d.format("%Y-%m-%d").to_string()),
        },
        reference: ReferenceMeta {
            min_age: ctx.age_band.map(|b| b.min_age),
            max_age: ctx.age_band.map(|b| b.max_age),
            rows: ctx
                .reference_rows
                .iter()
                .map(|(t, n)| ReferenceRows {
                    test_type: t.to_string(),
                    n: *n,
                })
                .collect(),
        },
        trial_selection: ctx
            .selections
            .iter()
            .map(|s| SelectionJson {
                test_type: s.test_type.to_string(),
                basis: &s.basis,
            })
            .collect(),
        radar: ctx
            .radar
            .iter()
            .map(|p| RadarJson {
                label: p.label,
                metric_id: p.metric_id,
                value: p.value,
                percentile: p.percentile,
                reference_n: p.reference_n,
            })
            .collect(),
        composite: CompositeJson {
            label: &ctx.composite_label,
            outcome: ctx.composite,
        },
        metrics: &ctx.metrics.records,
    };
    serde_json::to_string_pretty(&summary)
}
