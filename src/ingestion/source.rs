//! Format-independent reshaping of a wide count sheet into an [`EntityDataset`].
//!
//! Each input format implements [`TabularSource`], producing a [`RawTable`] of header names and
//! [`RawCell`]s. [`reshape`] then applies the shared rules:
//!
//! - rows where every cell is blank are skipped
//! - columns with an empty header are dropped
//! - `Date` and `Time` build the row timestamp and never become entities
//! - every other column is an entity receiving one observation per kept row

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{IngestionError, IngestionResult};
use crate::normalize::{
    self, CountPolicy, DATE_COLUMN, Fragment, TIME_COLUMN, count_from_float, parse_count_text,
};
use crate::types::{EntityDataset, Observation};

use super::observability::IngestionStats;

/// One cell as read from the source, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    /// Missing or empty cell.
    Empty,
    /// Text cell (every CSV cell, spreadsheet string cells).
    Text(String),
    /// Native spreadsheet integer.
    Int(i64),
    /// Native spreadsheet number.
    Number(f64),
    /// Native spreadsheet date/time.
    DateTime(NaiveDateTime),
    /// Native spreadsheet date without a time component.
    Date(NaiveDate),
    /// Native spreadsheet time without a date component.
    Time(NaiveTime),
}

impl RawCell {
    /// Returns `true` for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_owned(),
            Self::Int(i) => i.to_string(),
            Self::Number(f) => f.to_string(),
            Self::DateTime(dt) => dt.to_string(),
            Self::Date(d) => d.to_string(),
            Self::Time(t) => t.to_string(),
        }
    }
}

/// A data row together with its 1-based source row number.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub cells: Vec<RawCell>,
}

/// Header names plus data rows, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// A source of wide tabular count data.
pub trait TabularSource {
    /// How numeric count cells from this source are interpreted.
    fn count_policy(&self) -> CountPolicy;

    /// Read the header row and all data rows.
    fn read_table(&mut self) -> IngestionResult<RawTable>;
}

/// Read `source` and reshape it into an [`EntityDataset`].
pub fn ingest_source<S: TabularSource + ?Sized>(source: &mut S) -> IngestionResult<EntityDataset> {
    ingest_source_with_stats(source).map(|(ds, _)| ds)
}

pub(crate) fn ingest_source_with_stats<S: TabularSource + ?Sized>(
    source: &mut S,
) -> IngestionResult<(EntityDataset, IngestionStats)> {
    let table = source.read_table()?;
    reshape(table, source.count_policy())
}

static EMPTY_CELL: RawCell = RawCell::Empty;

struct Projection {
    date: Option<usize>,
    time: Option<usize>,
    entities: Vec<(String, usize)>,
}

fn project_headers(headers: &[String]) -> Projection {
    let mut date = None;
    let mut time = None;
    let mut entities: Vec<(String, usize)> = Vec::new();

    for (idx, raw) in headers.iter().enumerate() {
        let name = raw.trim_start_matches('\u{feff}').trim();
        match name {
            "" => continue,
            DATE_COLUMN => date = Some(idx),
            TIME_COLUMN => time = Some(idx),
            _ => match entities.iter_mut().find(|(existing, _)| existing == name) {
                // Right-most duplicate wins.
                Some(slot) => slot.1 = idx,
                None => entities.push((name.to_owned(), idx)),
            },
        }
    }

    Projection {
        date,
        time,
        entities,
    }
}

/// Reshape a [`RawTable`] into an [`EntityDataset`].
pub fn reshape(
    table: RawTable,
    policy: CountPolicy,
) -> IngestionResult<(EntityDataset, IngestionStats)> {
    if table.headers.is_empty() {
        tracing::warn!("source has no header row; nothing to ingest");
        return Ok((EntityDataset::new(), IngestionStats::default()));
    }

    let projection = project_headers(&table.headers);
    if projection.entities.is_empty() {
        tracing::warn!(headers = ?table.headers, "no location columns found in header row");
    }
    if projection.date.is_none() {
        tracing::warn!("no '{DATE_COLUMN}' column; timestamps will lack a date");
    }
    if projection.time.is_none() {
        tracing::warn!("no '{TIME_COLUMN}' column; timestamps will lack a time");
    }

    let mut dataset =
        EntityDataset::with_entities(projection.entities.iter().map(|(name, _)| name.as_str()));
    let mut stats = IngestionStats::default();

    for row in &table.rows {
        if row.cells.iter().all(RawCell::is_blank) {
            stats.skipped_blank_rows += 1;
            continue;
        }
        stats.rows += 1;

        let cell = |idx: Option<usize>| idx.and_then(|i| row.cells.get(i)).unwrap_or(&EMPTY_CELL);
        let date = date_fragment(cell(projection.date));
        let time = time_fragment(cell(projection.time));
        if !date.is_normalized() || !time.is_normalized() {
            tracing::debug!(
                row = row.line,
                date = date.as_str(),
                time = time.as_str(),
                "timestamp fragment passed through unparsed"
            );
        }
        let timestamp = normalize::combine_timestamp(&date, &time);

        for (name, idx) in &projection.entities {
            let count = cell_count(row.line, name, cell(Some(*idx)), policy)?;
            dataset.push(name, Observation::new(timestamp.clone(), count));
        }
    }

    stats.entities = dataset.entity_count();
    stats.observations = dataset.observation_count();
    Ok((dataset, stats))
}

fn date_fragment(cell: &RawCell) -> Fragment {
    match cell {
        RawCell::Text(s) => normalize::normalize_date_text(s),
        RawCell::DateTime(dt) => Fragment::Normalized(normalize::format_date(dt.date())),
        RawCell::Date(d) => Fragment::Normalized(normalize::format_date(*d)),
        other => Fragment::PassThrough(other.display()),
    }
}

fn time_fragment(cell: &RawCell) -> Fragment {
    match cell {
        RawCell::Text(s) => normalize::normalize_time_text(s),
        RawCell::DateTime(dt) => Fragment::Normalized(normalize::format_time(dt.time())),
        RawCell::Time(t) => Fragment::Normalized(normalize::format_time(*t)),
        other => Fragment::PassThrough(other.display()),
    }
}

fn cell_count(
    row: usize,
    column: &str,
    cell: &RawCell,
    policy: CountPolicy,
) -> IngestionResult<i64> {
    match cell {
        RawCell::Empty => parse_count_text(row, column, "", policy),
        RawCell::Text(s) => parse_count_text(row, column, s, policy),
        RawCell::Int(i) => Ok(*i),
        RawCell::Number(f) => count_from_float(row, column, *f, policy),
        other => Err(IngestionError::ParseError {
            row,
            column: column.to_owned(),
            raw: other.display(),
            message: "expected a number".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(line: usize, cells: &[&str]) -> RawRow {
        RawRow {
            line,
            cells: cells.iter().map(|c| RawCell::Text(c.to_string())).collect(),
        }
    }

    fn table(headers: &[&str], rows: Vec<RawRow>) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn reshapes_wide_rows_into_entities() {
        let t = table(
            &["Date", "Time", "GateA", "GateB"],
            vec![
                text_row(2, &["01/15/2024", "02:30 PM", "5", "7"]),
                text_row(3, &["01/15/2024", "03:00 PM", "", "-2"]),
            ],
        );
        let (ds, stats) = reshape(t, CountPolicy::Integer).unwrap();

        assert_eq!(ds.entity_names().collect::<Vec<_>>(), vec!["GateA", "GateB"]);
        assert_eq!(
            ds.get("GateA").unwrap(),
            &[
                Observation::new("2024-01-15 14:30", 5),
                Observation::new("2024-01-15 15:00", 0),
            ]
        );
        assert_eq!(ds.get("GateB").unwrap()[1].count, -2);
        assert_eq!(stats.rows, 2);
        assert_eq!(stats.observations, 4);
    }

    #[test]
    fn blank_rows_and_empty_headers_are_ignored() {
        let t = table(
            &["\u{feff}Date", "Time", "", "GateA"],
            vec![
                text_row(2, &["", " ", "", ""]),
                text_row(3, &["01/15/2024", "02:30 PM", "junk", "1"]),
            ],
        );
        let (ds, stats) = reshape(t, CountPolicy::Integer).unwrap();

        assert_eq!(ds.entity_names().collect::<Vec<_>>(), vec!["GateA"]);
        assert_eq!(ds.get("GateA").unwrap().len(), 1);
        assert_eq!(stats.skipped_blank_rows, 1);
    }

    #[test]
    fn short_rows_fill_missing_counts_with_zero() {
        let t = table(
            &["Date", "Time", "GateA", "GateB"],
            vec![text_row(2, &["01/15/2024", "02:30 PM", "4"])],
        );
        let (ds, _) = reshape(t, CountPolicy::Integer).unwrap();
        assert_eq!(ds.get("GateB").unwrap()[0], Observation::new("2024-01-15 14:30", 0));
    }

    #[test]
    fn unparsed_fragments_pass_through() {
        let t = table(
            &["Date", "Time", "GateA"],
            vec![text_row(2, &["15/01/2024", "14:30", "1"])],
        );
        let (ds, _) = reshape(t, CountPolicy::Integer).unwrap();
        assert_eq!(ds.get("GateA").unwrap()[0].timestamp, "15/01/2024 14:30");
    }

    #[test]
    fn native_cells_are_used_directly() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        let t = RawTable {
            headers: vec!["Date".into(), "Time".into(), "GateA".into()],
            rows: vec![RawRow {
                line: 2,
                cells: vec![
                    RawCell::Date(dt.date()),
                    RawCell::DateTime(dt),
                    RawCell::Number(3.0),
                ],
            }],
        };
        let (ds, _) = reshape(t, CountPolicy::FloatTolerant).unwrap();
        assert_eq!(ds.get("GateA").unwrap()[0], Observation::new("2024-01-15 09:05", 3));
    }

    #[test]
    fn duplicate_headers_use_rightmost_column() {
        let t = table(
            &["Date", "Time", "GateA", "GateA"],
            vec![text_row(2, &["01/15/2024", "02:30 PM", "1", "2"])],
        );
        let (ds, _) = reshape(t, CountPolicy::Integer).unwrap();
        assert_eq!(ds.entity_count(), 1);
        assert_eq!(ds.get("GateA").unwrap()[0].count, 2);
    }

    #[test]
    fn non_numeric_count_fails_the_run() {
        let t = table(
            &["Date", "Time", "GateA"],
            vec![text_row(7, &["01/15/2024", "02:30 PM", "closed"])],
        );
        let err = reshape(t, CountPolicy::Integer).unwrap_err();
        match err {
            IngestionError::ParseError { row, column, raw, .. } => {
                assert_eq!(row, 7);
                assert_eq!(column, "GateA");
                assert_eq!(raw, "closed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_header_row_yields_empty_dataset() {
        let (ds, stats) = reshape(RawTable::default(), CountPolicy::Integer).unwrap();
        assert!(ds.is_empty());
        assert_eq!(stats, IngestionStats::default());
    }

    #[test]
    fn header_only_source_keeps_empty_entities() {
        let t = table(&["Date", "Time", "GateA"], vec![]);
        let (ds, stats) = reshape(t, CountPolicy::Integer).unwrap();
        assert!(ds.contains("GateA"));
        assert_eq!(stats.observations, 0);
    }
}
