use super::*;

fn entry(id: &str, date: &str, test_type: &str) -> TestEntry {
    TestEntry {
        test_id: id.to_string(),
        modified_date_utc: date.to_string(),
        test_type: test_type.to_string(),
    }
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_only_complete_days_are_sessions() {
    let entries = vec![
        entry("c1", "2024-03-01T10:00:00Z", "CMJ"),
        entry("h1", "2024-03-01T10:05:00Z", "HJ"),
        entry("i1", "2024-03-01T10:10:00.123Z", "IMTP"),
        entry("p1", "2024-03-01T10:15:00", "PPU"),
        entry("c2", "2024-04-02T09:00:00Z", "CMJ"),
        entry("h2", "2024-04-02T09:05:00Z", "HJ"),
        entry("x1", "2024-04-02T09:06:00Z", "SLJ"),
    ];
    let index = SessionIndex::from_entries(&entries).unwrap();
    assert_eq!(index.dates_desc(), vec![day("2024-03-01")]);
    let session = index.session_for(day("2024-03-01")).unwrap();
    assert_eq!(session.get(&TestType::Imtp).map(String::as_str), Some("i1"));
    assert!(index.session_for(day("2024-04-02")).is_none());
}

#[test]
fn test_dates_newest_first_and_last_entry_wins() {
    let mut entries = Vec::new();
    for (date, suffix) in [("2023-01-05", "a"), ("2024-06-30", "b")] {
        for code in ["CMJ", "HJ", "IMTP", "PPU"] {
            entries.push(entry(&format!("{code}-{suffix}"), date, code));
        }
    }
    entries.push(entry("CMJ-retest", "2024-06-30", "cmj"));
    let index = SessionIndex::from_entries(&entries).unwrap();
    assert_eq!(index.dates_desc(), vec![day("2024-06-30"), day("2023-01-05")]);
    let latest = index.session_for(day("2024-06-30")).unwrap();
    assert_eq!(latest.get(&TestType::Cmj).map(String::as_str), Some("CMJ-retest"));
}

#[test]
fn test_bad_timestamp_is_parse_error() {
    let entries = vec![entry("c1", "yesterday", "CMJ")];
    assert!(matches!(
        SessionIndex::from_entries(&entries),
        Err(InputError::Parse(_))
    ));
}

#[test]
fn test_parse_tests_listing() {
    let json = r#"{"tests":[{"testId":"t1","modifiedDateUtc":"2024-01-01T00:00:00Z","testType":"PPU","extra":1}]}"#;
    let entries = parse_tests_listing(json.as_bytes()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].test_id, "t1");
    assert!(SessionIndex::from_entries(&entries).unwrap().is_empty());
}
