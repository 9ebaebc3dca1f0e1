//! `gate-count-processing` turns wide gate/location count sheets into one tidy CSV per location.
//!
//! A source sheet has one row per timestamp and one column per location, plus reserved `Date`
//! and `Time` columns:
//!
//! ```text
//! Date,Time,GateA,North Gate/Main
//! 01/15/2024,02:30 PM,5,12
//! ```
//!
//! The pipeline has three stages:
//!
//! 1. [`ingestion`]: read a `.csv` or `.xlsx` file and reshape it into a [`types::EntityDataset`]
//!    (location -> ordered `(timestamp, count)` observations), normalizing dates to `YYYY-MM-DD`
//!    and 12-hour times to 24-hour `HH:MM`.
//! 2. [`processing`]: repair timestamps that are still not canonical and clamp negative counts.
//! 3. [`export`]: write `data/<location>.csv` files with the header `date,gate_start`.
//!
//! [`pipeline::run`] chains all three.
//!
//! ## Quick example
//!
//! ```no_run
//! use gate_count_processing::pipeline::{PipelineConfig, run};
//!
//! # fn main() -> Result<(), gate_count_processing::PipelineError> {
//! let summary = run("gates.csv", &PipelineConfig::default())?;
//! println!("wrote {} files", summary.exported.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Stage by stage
//!
//! ```rust
//! use gate_count_processing::ingestion::csv::ingest_csv_from_reader;
//! use gate_count_processing::processing::validate;
//! use gate_count_processing::types::Observation;
//!
//! let input = "Date,Time,GateA\n01/15/2024,02:30 PM,5\n01/16/2024,09:00 AM,-3\n";
//! let ds = ingest_csv_from_reader(input.as_bytes()).unwrap();
//! let (ds, _report) = validate(ds);
//!
//! assert_eq!(
//!     ds.get("GateA").unwrap(),
//!     &[
//!         Observation::new("2024-01-15 14:30", 5),
//!         Observation::new("2024-01-16 09:00", 0),
//!     ]
//! );
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: unified ingestion entrypoint and format-specific sources
//! - [`normalize`]: date/time/count parsing shared by ingestion and validation
//! - [`processing`]: dataset repair
//! - [`export`]: per-location CSV output
//! - [`pipeline`]: end-to-end run
//! - [`types`]: observation and dataset types
//! - [`error`]: error types

pub mod error;
pub mod export;
pub mod ingestion;
pub mod normalize;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{ExportError, ExportResult, IngestionError, IngestionResult, PipelineError};
