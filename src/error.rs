use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared by CSV and (optional) Excel ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input cannot be interpreted: unknown format, or a workbook without sheets.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A count cell held something other than a number.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// Error type returned by the per-location CSV exporter.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Creating the output directory or a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a CSV record failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Error type for a full import -> validate -> export run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
