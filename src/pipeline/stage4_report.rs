use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::model::metrics::AthleteMetrics;
use crate::model::profile::{AgeBand, ScoringProfile};
use crate::model::table::ReferenceSet;
use crate::pipeline::stage1_select::TrialSelection;
use crate::pipeline::stage2_percentile::RadarPoint;
use crate::pipeline::stage3_composite::CompositeOutcome;
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{ReportContext, composite_label};

#[derive(Debug, Clone)]
pub struct Stage4Input<'a> {
    pub tool_name: String,
    pub tool_version: String,
    pub athlete_name: Option<String>,
    pub test_date: Option<NaiveDate>,
    pub age_band: Option<AgeBand>,
    pub profile: &'a ScoringProfile,
    pub references: &'a ReferenceSet,
    pub metrics: &'a AthleteMetrics,
    pub selections: &'a [TrialSelection],
    pub radar: &'a [RadarPoint],
    pub composite: &'a CompositeOutcome,
}

pub fn build_report_context<'a>(input: &Stage4Input<'a>) -> ReportContext<'a> {
    ReportContext {
        tool_name: input.tool_name.clone(),
        tool_version: input.tool_version.clone(),
        athlete_name: input.athlete_name.clone(),
        test_date: input.test_date,
        age_band: input.age_band,
        metrics: input.metrics,
        selections: input.selections,
        radar: input.radar,
        composite: input.composite,
        composite_label: composite_label(input.composite.score, input.profile.legacy_na_at_45),
        reference_rows: input
            .references
            .iter()
            .map(|(t, table)| (t, table.n_rows()))
            .collect(),
    }
}

const STAGING_SUFFIX: &str = ".partial";

/// Renders every output, stages each under a temporary name, and renames
/// them into place only once all of them were written. A failure removes
/// the staged files and leaves no report behind.
pub fn write_reports(input: &Stage4Input<'_>, out_dir: &Path) -> std::io::Result<()> {
    let ctx = build_report_context(input);
    let outputs = [
        ("summary.json", render_summary_json(&ctx)?),
        ("report.txt", render_report_text(&ctx)),
        ("athlete_metrics.tsv", render_metrics_tsv(input.metrics)),
    ];

    fs::create_dir_all(out_dir)?;
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(outputs.len());
    for (name, contents) in &outputs {
        let target = out_dir.join(name);
        let tmp = out_dir.join(format!("{name}{STAGING_SUFFIX}"));
        if let Err(err) = write_text(&tmp, contents) {
            let _ = fs::remove_file(&tmp);
            discard_staged(&staged);
            return Err(err);
        }
        staged.push((tmp, target));
    }
    for (tmp, target) in &staged {
        if let Err(err) = fs::rename(tmp, target) {
            discard_staged(&staged);
            return Err(err);
        }
    }

    tracing::info!(out_dir = %out_dir.display(), label = %ctx.composite_label, "reports written");
    Ok(())
}

fn render_metrics_tsv(metrics: &AthleteMetrics) -> String {
    let mut out = String::from("metric_id\tValue\n");
    for r in &metrics.records {
        out.push_str(&format!("{}\t{}\n", r.metric_id, r.value));
    }
    out
}

fn discard_staged(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_report.rs"]
mod tests;
