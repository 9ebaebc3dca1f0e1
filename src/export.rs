//! Per-location CSV export.
//!
//! Every location in an [`EntityDataset`] is written to `<output_dir>/<sanitized name>.csv` with
//! the header `date,gate_start` and one `(timestamp, count)` row per observation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ExportResult;
use crate::types::{EntityDataset, Observation};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Options controlling export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Directory receiving one file per location. Created if absent.
    pub output_dir: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    date: &'a str,
    gate_start: i64,
}

impl<'a> From<&'a Observation> for ExportRow<'a> {
    fn from(obs: &'a Observation) -> Self {
        Self {
            date: &obs.timestamp,
            gate_start: obs.count,
        }
    }
}

/// File name for a location: spaces and `/` become `_`, extension `.csv`.
pub fn export_file_name(entity: &str) -> String {
    format!("{}.csv", entity.replace([' ', '/'], "_"))
}

/// Write one CSV file per location and return the written paths, in dataset order.
///
/// Prints `Exported <path>` to stdout after each file is flushed. The first failure aborts the
/// export; files written before it are left in place.
pub fn export_dataset(
    dataset: &EntityDataset,
    options: &ExportOptions,
) -> ExportResult<Vec<PathBuf>> {
    fs::create_dir_all(&options.output_dir)?;

    let mut written = Vec::with_capacity(dataset.entity_count());
    for (entity, observations) in dataset.iter() {
        let path = options.output_dir.join(export_file_name(entity));
        write_entity_file(&path, observations)?;
        tracing::info!(
            location = entity,
            path = %path.display(),
            rows = observations.len(),
            "exported location"
        );
        println!("Exported {}", path.display());
        written.push(path);
    }

    Ok(written)
}

fn write_entity_file(path: &Path, observations: &[Observation]) -> ExportResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    if observations.is_empty() {
        // `serialize` only emits the header alongside the first record.
        wtr.write_record(["date", "gate_start"])?;
    }
    for obs in observations {
        wtr.serialize(ExportRow::from(obs))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn tmp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("gate-count-export-{name}-{nanos}"))
    }

    #[test]
    fn file_names_replace_spaces_and_slashes() {
        assert_eq!(export_file_name("North Gate/Main"), "North_Gate_Main.csv");
        assert_eq!(export_file_name("GateA"), "GateA.csv");
    }

    #[test]
    fn writes_header_and_rows_in_order() {
        let dir = tmp_dir("rows");
        let mut ds = EntityDataset::new();
        ds.push("North Gate/Main", Observation::new("2024-01-15 14:30", 5));
        ds.push("North Gate/Main", Observation::new("2024-01-15 14:45", 0));
        ds.push("GateB", Observation::new("2024-01-15 14:30", 2));

        let opts = ExportOptions {
            output_dir: dir.clone(),
        };
        let paths = export_dataset(&ds, &opts).unwrap();

        assert_eq!(
            paths,
            vec![dir.join("North_Gate_Main.csv"), dir.join("GateB.csv")]
        );
        let body = fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(
            body.lines().collect::<Vec<_>>(),
            vec!["date,gate_start", "2024-01-15 14:30,5", "2024-01-15 14:45,0"]
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_location_still_gets_a_header() {
        let dir = tmp_dir("empty");
        let ds = EntityDataset::with_entities(["GateA"]);
        let opts = ExportOptions {
            output_dir: dir.clone(),
        };
        let paths = export_dataset(&ds, &opts).unwrap();
        let body = fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(body.lines().collect::<Vec<_>>(), vec!["date,gate_start"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unwritable_output_dir_is_an_error() {
        let dir = tmp_dir("blocked");
        fs::write(&dir, "not a directory").unwrap();
        let mut ds = EntityDataset::new();
        ds.push("GateA", Observation::new("2024-01-15 14:30", 1));

        let opts = ExportOptions {
            output_dir: dir.clone(),
        };
        assert!(export_dataset(&ds, &opts).is_err());

        let _ = fs::remove_file(&dir);
    }
}
