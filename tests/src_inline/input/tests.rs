use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("nevald_report_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

fn write_gz(path: &Path, contents: &str) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

const HJ_CSV: &str = "metric_id,trial 1,trial 2\nHOP_RSI_Trial_,1.5,2.5\n";

#[test]
fn test_logical_extension_strips_gz() {
    assert_eq!(
        logical_extension(Path::new("a/CMJ.json.gz")).as_deref(),
        Some("json")
    );
    assert_eq!(logical_extension(Path::new("CMJ.CSV")).as_deref(), Some("csv"));
    assert_eq!(logical_extension(Path::new("CMJ")), None);
}

#[test]
fn test_find_with_extensions_prefers_order() {
    let dir = make_temp_dir();
    write_file(&dir.join("HJ.csv"), HJ_CSV);
    write_gz(&dir.join("HJ.json.gz"), "[]");
    let found = find_with_extensions(&dir, "HJ", &["json", "csv"]).unwrap();
    assert_eq!(found, dir.join("HJ.json.gz"));
    assert!(find_with_extensions(&dir, "PPU", &["json", "csv"]).is_none());
}

#[test]
fn test_load_trial_table_from_gz_csv() {
    let dir = make_temp_dir();
    write_gz(&dir.join("HJ.csv.gz"), HJ_CSV);
    let table = load_trial_table(&dir, TestType::Hj).unwrap();
    assert_eq!(table.n_trials(), 2);
    assert_eq!(
        table.row("HOP_RSI_Trial_").unwrap().values,
        vec![Some(1.5), Some(2.5)]
    );
}

#[test]
fn test_load_athlete_tables_requires_every_test() {
    let dir = make_temp_dir();
    write_file(&dir.join("HJ.csv"), HJ_CSV);
    let err = load_athlete_tables(&dir).unwrap_err();
    match err {
        InputError::MissingInput(msg) => assert!(msg.contains("CMJ")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parse_error_names_file() {
    let dir = make_temp_dir();
    write_file(&dir.join("IMTP.csv"), "name,trial 1\nx,1\n");
    let err = load_trial_table(&dir, TestType::Imtp).unwrap_err();
    assert!(matches!(err, InputError::InFile { .. }));
    assert!(err.to_string().contains("IMTP.csv"));
}

#[test]
fn test_load_reference_set_skips_missing_exports() {
    let dir = make_temp_dir();
    write_file(
        &dir.join("IMTP_ref.csv"),
        "athlete_name,age_at_test,PEAK_VERTICAL_FORCE_Trial_N\n\
         a,16,3000\n\
         a,17,3500\n\
         b,25,4000\n\
         c,15,2500\n",
    );
    let set = load_reference_set(&dir, Some(AgeBand::high_school())).unwrap();
    assert!(set.contains(TestType::Imtp));
    assert!(!set.contains(TestType::Cmj));
    let imtp = set.get(TestType::Imtp).unwrap();
    assert_eq!(
        imtp.numeric_column("PEAK_VERTICAL_FORCE_Trial_N"),
        vec![3500.0, 2500.0]
    );
}

#[test]
fn test_load_weights_validates_entries() {
    let dir = make_temp_dir();
    let ok = dir.join("weights.json");
    write_file(
        &ok,
        r#"{"weights":[{"metric_id":"IMTP_PEAK_VERTICAL_FORCE_Trial_N","reference":"IMTP","column":"PEAK_VERTICAL_FORCE_Trial_N","weight":2.0}]}"#,
    );
    let spec = load_weights(&ok).unwrap();
    assert_eq!(spec.weights.len(), 1);

    let empty = dir.join("empty.json");
    write_file(&empty, r#"{"weights":[]}"#);
    assert!(matches!(
        load_weights(&empty),
        Err(InputError::InvalidInput(_))
    ));

    let zero = dir.join("zero.json");
    write_file(
        &zero,
        r#"{"weights":[{"metric_id":"m","reference":"CMJ","column":"c","weight":0.0}]}"#,
    );
    assert!(matches!(
        load_weights(&zero),
        Err(InputError::InvalidInput(_))
    ));

    let negative = dir.join("negative.json");
    write_file(
        &negative,
        r#"{"weights":[{"metric_id":"m","reference":"CMJ","column":"c","weight":-1.0}]}"#,
    );
    assert!(matches!(
        load_weights(&negative),
        Err(InputError::InvalidInput(_))
    ));

    assert!(matches!(
        load_weights(&dir.join("absent.json")),
        Err(InputError::MissingInput(_))
    ));
}
