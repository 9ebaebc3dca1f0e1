//! Import -> validate -> export, end to end.

use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::export::{ExportOptions, export_dataset};
use crate::ingestion::{IngestionOptions, ingest_from_path};
use crate::processing::{ValidationReport, validate};

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub ingestion: IngestionOptions,
    pub export: ExportOptions,
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Locations found in the source.
    pub locations: usize,
    /// Observations across all locations.
    pub observations: usize,
    pub validation: ValidationReport,
    /// Files written, in location order.
    pub exported: Vec<PathBuf>,
}

/// Run the whole pipeline for `input`.
pub fn run(input: impl AsRef<Path>, config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
    let input = input.as_ref();
    let span = tracing::info_span!("pipeline", input = %input.display());
    let _enter = span.enter();

    let dataset = ingest_from_path(input, &config.ingestion)?;
    if dataset.is_empty() {
        tracing::warn!("no locations in source; nothing to export");
    }
    let (dataset, validation) = validate(dataset);
    let exported = export_dataset(&dataset, &config.export)?;

    let summary = RunSummary {
        locations: dataset.entity_count(),
        observations: dataset.observation_count(),
        validation,
        exported,
    };
    tracing::info!(
        locations = summary.locations,
        observations = summary.observations,
        repaired_timestamps = summary.validation.repaired_timestamps,
        clamped_counts = summary.validation.clamped_counts,
        "pipeline finished"
    );
    Ok(summary)
}
