//! Delimited-text (CSV) ingestion.

use std::io::Read;
use std::path::Path;

use crate::error::IngestionResult;
use crate::normalize::CountPolicy;
use crate::types::EntityDataset;

use super::source::{self, RawCell, RawRow, RawTable, TabularSource};

/// A [`TabularSource`] over CSV data.
///
/// Rows may be shorter than the header; missing trailing cells read as empty.
pub struct DelimitedTextSource<R> {
    reader: csv::Reader<R>,
}

impl DelimitedTextSource<std::fs::File> {
    /// Open a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let reader = reader_builder().from_path(path)?;
        Ok(Self { reader })
    }
}

impl<R: Read> DelimitedTextSource<R> {
    /// Wrap any reader (e.g. an in-memory buffer).
    pub fn from_reader(rdr: R) -> Self {
        Self {
            reader: reader_builder().from_reader(rdr),
        }
    }
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true);
    builder
}

impl<R: Read> TabularSource for DelimitedTextSource<R> {
    fn count_policy(&self) -> CountPolicy {
        CountPolicy::Integer
    }

    fn read_table(&mut self) -> IngestionResult<RawTable> {
        let headers: Vec<String> = self.reader.headers()?.iter().map(str::to_owned).collect();

        let mut rows = Vec::new();
        for (row_idx0, result) in self.reader.records().enumerate() {
            let record = result?;
            // Prefer the reader's line number; +2 otherwise since the header is row 1.
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(row_idx0 + 2);
            let cells = record
                .iter()
                .map(|raw| RawCell::Text(raw.to_owned()))
                .collect();
            rows.push(RawRow { line, cells });
        }

        Ok(RawTable { headers, rows })
    }
}

/// Ingest a CSV file into an [`EntityDataset`].
///
/// Rules:
///
/// - The first row holds headers; `Date` and `Time` build the timestamp.
/// - Every other non-empty header is a location.
/// - Counts must be integers; blank counts are stored as `0`.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<EntityDataset> {
    let mut src = DelimitedTextSource::from_path(path)?;
    source::ingest_source(&mut src)
}

/// Ingest CSV data from an existing reader.
pub fn ingest_csv_from_reader<R: Read>(rdr: R) -> IngestionResult<EntityDataset> {
    let mut src = DelimitedTextSource::from_reader(rdr);
    source::ingest_source(&mut src)
}
