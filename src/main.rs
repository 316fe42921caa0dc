mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::input::sessions::{SessionIndex, load_tests_listing};
use crate::input::{InputError, load_athlete_tables, load_reference_set, load_weights};
use crate::model::profile::{AgeBand, CompositeMethod, ScoringProfile};
use crate::pipeline::stage1_select::{SelectError, run_stage1};
use crate::pipeline::stage2_percentile::run_stage2;
use crate::pipeline::stage3_composite::{ScoreError, run_stage3};
use crate::pipeline::stage4_report::{Stage4Input, write_reports};

#[derive(Debug, Parser)]
#[command(
    name = "nevald-report",
    version,
    about = "Force-plate percentile and composite athleticism scoring"
)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one athlete's testing session and write the report files
    Run(RunArgs),
    /// List testing days that include CMJ, HJ, IMTP and PPU
    Sessions(SessionsArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Directory with CMJ/HJ/IMTP/PPU trial files (.json payload or .csv export)
    #[arg(long)]
    athlete: PathBuf,
    /// Directory with CMJ_ref.csv, HJ_ref.csv, IMTP_ref.csv, PPU_ref.csv
    #[arg(long)]
    reference: PathBuf,
    #[arg(long)]
    out: PathBuf,
    #[arg(long)]
    name: Option<String>,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    test_date: Option<NaiveDate>,
    #[arg(long, value_enum, conflicts_with_all = ["min_age", "max_age"])]
    age_band: Option<AgeBandPreset>,
    #[arg(long, requires = "max_age")]
    min_age: Option<u32>,
    #[arg(long, requires = "min_age")]
    max_age: Option<u32>,
    /// JSON weight table replacing the built-in one
    #[arg(long)]
    weights: Option<PathBuf>,
    #[arg(long, default_value = "zscore")]
    method: String,
    /// Show composites that round to 45 as numbers instead of "NA"
    #[arg(long)]
    no_legacy_na: bool,
    /// Leave CMJ body weight in the unit the vendor reported
    #[arg(long)]
    keep_body_weight_unit: bool,
}

#[derive(Debug, Args)]
struct SessionsArgs {
    /// Vendor tests listing (JSON with a `tests` array)
    #[arg(long)]
    tests: PathBuf,
    /// Print the test ids recorded on this day
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgeBandPreset {
    Hs,
    College,
    Pro,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error("failed to write reports: {0}")]
    Output(#[from] std::io::Error),
    #[error("invalid arguments: {0}")]
    Args(String),
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let result = match &cli.command {
        Command::Run(args) => run(args),
        Command::Sessions(args) => sessions(args),
    };
    if let Err(err) = result {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &RunArgs) -> Result<(), RunError> {
    let profile = build_profile(args)?;
    let band = resolve_age_band(args)?;

    let tables = load_athlete_tables(&args.athlete)?;
    let references = load_reference_set(&args.reference, band)?;

    let stage1 = run_stage1(&tables, &profile)?;
    let stage2 = run_stage2(&stage1.metrics, &references);
    let composite = run_stage3(&stage1.metrics, &references, &profile);

    let input = Stage4Input {
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        athlete_name: args.name.clone(),
        test_date: args.test_date,
        age_band: band,
        profile: &profile,
        references: &references,
        metrics: &stage1.metrics,
        selections: &stage1.selections,
        radar: &stage2.radar,
        composite: &composite,
    };
    write_reports(&input, &args.out)?;
    Ok(())
}

fn sessions(args: &SessionsArgs) -> Result<(), RunError> {
    let entries = load_tests_listing(&args.tests)?;
    let index = SessionIndex::from_entries(&entries)?;
    if index.is_empty() {
        tracing::warn!("no testing day includes all of CMJ, HJ, IMTP and PPU");
        return Ok(());
    }
    match args.date {
        Some(date) => {
            let session = index.session_for(date).ok_or_else(|| {
                InputError::MissingInput(format!("no complete testing session on {date}"))
            })?;
            for (test_type, test_id) in session {
                println!("{}\t{}", test_type, test_id);
            }
        }
        None => {
            for date in index.dates_desc() {
                println!("{}", date.format("%Y-%m-%d"));
            }
        }
    }
    Ok(())
}

fn build_profile(args: &RunArgs) -> Result<ScoringProfile, RunError> {
    let method: CompositeMethod = args.method.parse()?;
    let mut profile = ScoringProfile::default_v1();
    if let Some(path) = &args.weights {
        profile = profile.with_weights(load_weights(path)?);
    }
    profile.method = method;
    profile.legacy_na_at_45 = !args.no_legacy_na;
    profile.body_weight_kg_to_lb = !args.keep_body_weight_unit;
    Ok(profile)
}

fn resolve_age_band(args: &RunArgs) -> Result<Option<AgeBand>, RunError> {
    if let Some(preset) = args.age_band {
        return Ok(Some(match preset {
            AgeBandPreset::Hs => AgeBand::high_school(),
            AgeBandPreset::College => AgeBand::college(),
            AgeBandPreset::Pro => AgeBand::pro(),
        }));
    }
    match (args.min_age, args.max_age) {
        (Some(min), Some(max)) if min > max => Err(RunError::Args(format!(
            "--min-age {min} is greater than --max-age {max}"
        ))),
        (Some(min), Some(max)) => Ok(Some(AgeBand::new(min, max))),
        _ => Ok(None),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
