#![cfg(feature = "excel")]

//! Spreadsheet (Excel) ingestion.

use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{IngestionError, IngestionResult};
use crate::normalize::CountPolicy;
use crate::types::EntityDataset;

use super::source::{self, RawCell, RawRow, RawTable, TabularSource};

/// A [`TabularSource`] over one worksheet of a workbook.
///
/// The first row of the sheet holds headers; data begins on the second row. Native date/time
/// cells are kept as dates and times rather than re-parsed from text.
#[derive(Debug, Clone)]
pub struct SpreadsheetSource {
    path: PathBuf,
    sheet_name: Option<String>,
}

impl SpreadsheetSource {
    /// Read `sheet_name` if provided; otherwise the first sheet in the workbook.
    pub fn new(path: impl AsRef<Path>, sheet_name: Option<&str>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sheet_name: sheet_name.map(str::to_owned),
        }
    }
}

impl TabularSource for SpreadsheetSource {
    fn count_policy(&self) -> CountPolicy {
        CountPolicy::FloatTolerant
    }

    fn read_table(&mut self) -> IngestionResult<RawTable> {
        let mut workbook = open_workbook_auto(&self.path)?;

        let sheet = match &self.sheet_name {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| IngestionError::SchemaMismatch {
                    message: "workbook has no sheets".to_string(),
                })?,
        };

        let range = workbook.worksheet_range(&sheet)?;
        tracing::debug!(sheet = %sheet, rows = range.height(), "read worksheet");
        Ok(table_from_range(&range))
    }
}

fn table_from_range(range: &Range<Data>) -> RawTable {
    // Report 1-based row numbers (Excel-like), including any leading rows the range skipped.
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .map(|row| row.iter().map(cell_to_header_string).collect())
        .unwrap_or_default();

    let rows = rows_iter
        .enumerate()
        .map(|(idx0, row)| RawRow {
            line: first_row + idx0 + 2,
            cells: row.iter().map(convert_cell).collect(),
        })
        .collect();

    RawTable { headers, rows }
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> RawCell {
    match c {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Number(*f),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => RawCell::DateTime(ndt),
            None => RawCell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_cell(s),
        Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Text(format!("{e:?}")),
    }
}

/// Parse ISO 8601 cells (as written by ODS and some xlsx producers).
fn parse_iso_cell(s: &str) -> RawCell {
    let s = s.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return RawCell::DateTime(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return RawCell::Date(d);
    }
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M:%S%.f") {
        return RawCell::Time(t);
    }
    RawCell::Text(s.to_owned())
}

/// Ingest one worksheet of a workbook into an [`EntityDataset`].
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Uses the first row as the header row
/// - Counts accept integers and floats (`3.0` -> `3`); blank counts are stored as `0`
pub fn ingest_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
) -> IngestionResult<EntityDataset> {
    let mut src = SpreadsheetSource::new(path, sheet_name);
    source::ingest_source(&mut src)
}
