use std::cmp::Ordering;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::input::InputError;
use crate::input::cache::open_maybe_gz;
use crate::model::profile::AgeBand;
use crate::model::table::{ReferenceTable, coerce_numeric};
use crate::model::test_type::TestType;

const ATHLETE_COLUMN: &str = "athlete_name";
const AGE_COLUMN: &str = "age_at_test";

pub fn load_reference_csv(path: &Path) -> Result<ReferenceTable, InputError> {
    let reader = open_maybe_gz(path)?;
    parse_reference_csv(reader).map_err(|e| e.in_file(path))
}

pub fn parse_reference_csv<R: Read>(reader: R) -> Result<ReferenceTable, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if columns.is_empty() {
        return Err(InputError::Parse("reference table header is empty".to_string()));
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        row.resize(columns.len(), String::new());
        rows.push(row);
    }

    Ok(ReferenceTable { columns, rows })
}

/// Restricts a raw reference export to the age band and keeps one row per
/// reference athlete: the one ranking highest on the test type's ranking
/// column. Output rows are ordered by that ranking, descending.
pub fn prepare_reference(
    table: ReferenceTable,
    test_type: TestType,
    band: Option<AgeBand>,
) -> ReferenceTable {
    let n_raw = table.n_rows();
    let table = match band {
        Some(band) => filter_age_band(table, band, test_type),
        None => table,
    };
    let table = keep_best_per_athlete(table, test_type);
    tracing::info!(
        test_type = %test_type,
        rows_raw = n_raw,
        rows_kept = table.n_rows(),
        "prepared reference table"
    );
    table
}

fn filter_age_band(table: ReferenceTable, band: AgeBand, test_type: TestType) -> ReferenceTable {
    let Some(age_col) = table.column_index(AGE_COLUMN) else {
        tracing::warn!(
            test_type = %test_type,
            "reference table has no {AGE_COLUMN} column; age band not applied"
        );
        return table;
    };
    let ReferenceTable { columns, rows } = table;
    let rows = rows
        .into_iter()
        .filter(|r| {
            r.get(age_col)
                .and_then(|s| coerce_numeric(s))
                .is_some_and(|age| band.contains(age))
        })
        .collect();
    ReferenceTable { columns, rows }
}

fn keep_best_per_athlete(table: ReferenceTable, test_type: TestType) -> ReferenceTable {
    let rank_col = table.column_index(test_type.ranking_column());
    if rank_col.is_none() {
        tracing::warn!(
            test_type = %test_type,
            column = test_type.ranking_column(),
            "reference table has no ranking column; keeping first row per athlete"
        );
    }
    let athlete_col = table.column_index(ATHLETE_COLUMN);

    let ReferenceTable { columns, mut rows } = table;
    if let Some(col) = rank_col {
        // Stable sort, descending, with missing ranks last.
        rows.sort_by(|a, b| {
            let ra = a.get(col).and_then(|s| coerce_numeric(s));
            let rb = b.get(col).and_then(|s| coerce_numeric(s));
            match (ra, rb) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }

    let Some(athlete_col) = athlete_col else {
        tracing::warn!(
            test_type = %test_type,
            "reference table has no {ATHLETE_COLUMN} column; rows not deduplicated"
        );
        return ReferenceTable { columns, rows };
    };

    let mut seen = HashSet::new();
    rows.retain(|r| {
        let name = r.get(athlete_col).cloned().unwrap_or_default();
        seen.insert(name)
    });
    ReferenceTable { columns, rows }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/reference.rs"]
mod tests;
