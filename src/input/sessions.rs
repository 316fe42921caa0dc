use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::input::InputError;
use crate::input::cache::open_maybe_gz;
use crate::model::test_type::{TestType, test_type_order};

#[derive(Debug, Deserialize)]
struct TestsListing {
    #[serde(default)]
    tests: Vec<TestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEntry {
    pub test_id: String,
    pub modified_date_utc: String,
    pub test_type: String,
}

/// Test ids per type for one testing day.
pub type Session = BTreeMap<TestType, String>;

/// Testing days on which every test type was recorded.
#[derive(Debug, Clone, Default)]
pub struct SessionIndex {
    sessions: BTreeMap<NaiveDate, Session>,
}

impl SessionIndex {
    pub fn from_entries(entries: &[TestEntry]) -> Result<Self, InputError> {
        let mut by_date: BTreeMap<NaiveDate, Session> = BTreeMap::new();
        for entry in entries {
            let Ok(test_type) = entry.test_type.parse::<TestType>() else {
                tracing::debug!(test_type = %entry.test_type, "ignoring unsupported test type");
                continue;
            };
            let date = parse_utc_date(&entry.modified_date_utc)?;
            by_date
                .entry(date)
                .or_default()
                .insert(test_type, entry.test_id.clone());
        }

        let total = by_date.len();
        by_date.retain(|_, s| test_type_order().iter().all(|t| s.contains_key(t)));
        if by_date.len() < total {
            tracing::info!(
                dropped = total - by_date.len(),
                "skipping test dates missing one of CMJ, HJ, IMTP, PPU"
            );
        }
        Ok(Self { sessions: by_date })
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Complete testing days, newest first.
    pub fn dates_desc(&self) -> Vec<NaiveDate> {
        self.sessions.keys().rev().copied().collect()
    }

    pub fn session_for(&self, date: NaiveDate) -> Option<&Session> {
        self.sessions.get(&date)
    }
}

pub fn load_tests_listing(path: &Path) -> Result<Vec<TestEntry>, InputError> {
    let reader = open_maybe_gz(path)?;
    parse_tests_listing(reader).map_err(|e| e.in_file(path))
}

pub fn parse_tests_listing<R: Read>(reader: R) -> Result<Vec<TestEntry>, InputError> {
    let listing: TestsListing = serde_json::from_reader(reader)?;
    Ok(listing.tests)
}

fn parse_utc_date(raw: &str) -> Result<NaiveDate, InputError> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc().date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| InputError::Parse(format!("invalid test timestamp: {raw}")))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/sessions.rs"]
mod tests;
