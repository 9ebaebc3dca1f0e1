//! In-memory repair of ingested datasets.
//!
//! The processing layer operates on [`crate::types::EntityDataset`] values produced by ingestion.
//!
//! Currently implemented:
//!
//! - [`validate()`]: timestamp repair and negative-count clamping
//!
//! ## Example
//!
//! ```rust
//! use gate_count_processing::processing::validate;
//! use gate_count_processing::types::{EntityDataset, Observation};
//!
//! let mut ds = EntityDataset::new();
//! ds.push("GateA", Observation::new("15/01/2024 14:30", -3));
//!
//! let (ds, report) = validate(ds);
//! assert_eq!(ds.get("GateA").unwrap()[0], Observation::new("2024-01-15 14:30", 0));
//! assert_eq!(report.clamped_counts, 1);
//! ```

pub mod validate;

pub use validate::{ValidationReport, repair_timestamp, validate, validate_in_place};
