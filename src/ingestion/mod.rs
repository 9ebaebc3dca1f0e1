//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - reshapes the wide sheet into an in-memory [`crate::types::EntityDataset`]
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - `excel` (Cargo feature `excel`)
//!
//! Both formats implement [`TabularSource`] and share the reshaping rules in [`source`].

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod source;
pub mod unified;

pub use self::csv::DelimitedTextSource;
#[cfg(feature = "excel")]
pub use excel::SpreadsheetSource;
pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
pub use source::{RawCell, RawRow, RawTable, TabularSource, ingest_source};
pub use unified::{ExcelSheetSelection, IngestionFormat, IngestionOptions, ingest_from_path};
