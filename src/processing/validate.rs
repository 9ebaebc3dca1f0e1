//! Best-effort repair of an [`EntityDataset`].
//!
//! - Timestamps that do not start with `YYYY-MM-DD` have their date part re-parsed against
//!   [`REPAIR_DATE_LAYOUTS`]; the time part is kept verbatim.
//! - Negative counts are clamped to `0`.
//!
//! Each observation is repaired independently and the pass never fails. Running it twice yields
//! the same dataset as running it once.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::{REPAIR_DATE_LAYOUTS, format_date, parse_date};
use crate::types::{EntityDataset, Observation};

static CANONICAL_DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("valid regex"));

/// Counters describing what [`validate`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Timestamps rewritten into canonical date form.
    pub repaired_timestamps: usize,
    /// Non-canonical timestamps no layout could repair (left unchanged).
    pub unrepaired_timestamps: usize,
    /// Negative counts raised to `0`.
    pub clamped_counts: usize,
}

/// Repair `dataset` in place and return it together with a [`ValidationReport`].
pub fn validate(mut dataset: EntityDataset) -> (EntityDataset, ValidationReport) {
    let report = validate_in_place(&mut dataset);
    (dataset, report)
}

/// Repair `dataset` in place.
pub fn validate_in_place(dataset: &mut EntityDataset) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (entity, observations) in dataset.iter_mut() {
        for obs in observations.iter_mut() {
            repair_observation(entity, obs, &mut report);
        }
    }

    tracing::debug!(
        repaired = report.repaired_timestamps,
        unrepaired = report.unrepaired_timestamps,
        clamped = report.clamped_counts,
        "validated dataset"
    );
    report
}

fn repair_observation(entity: &str, obs: &mut Observation, report: &mut ValidationReport) {
    if !CANONICAL_DATE_PREFIX.is_match(&obs.timestamp) {
        match repair_timestamp(&obs.timestamp) {
            Some(fixed) => {
                obs.timestamp = fixed;
                report.repaired_timestamps += 1;
            }
            None => {
                tracing::warn!(entity, timestamp = %obs.timestamp, "could not repair timestamp");
                report.unrepaired_timestamps += 1;
            }
        }
    }

    if obs.count < 0 {
        obs.count = 0;
        report.clamped_counts += 1;
    }
}

/// Rewrite the date part of a non-canonical timestamp.
///
/// Returns `None` when the timestamp has no space separating date and time, or when no layout
/// matches the date part.
pub fn repair_timestamp(timestamp: &str) -> Option<String> {
    let (date_part, time_part) = timestamp.split_once(' ')?;
    let date = parse_date(date_part, REPAIR_DATE_LAYOUTS)?;
    Some(format!("{} {time_part}", format_date(date)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: &[(&str, &str, i64)]) -> EntityDataset {
        let mut ds = EntityDataset::new();
        for (entity, ts, count) in rows {
            ds.push(entity, Observation::new(*ts, *count));
        }
        ds
    }

    #[test]
    fn day_first_dates_are_repaired() {
        assert_eq!(
            repair_timestamp("15/01/2024 14:30").as_deref(),
            Some("2024-01-15 14:30")
        );
        assert_eq!(
            repair_timestamp("2024/01/15 14:30").as_deref(),
            Some("2024-01-15 14:30")
        );
        assert_eq!(
            repair_timestamp("15/01/24 2:30 PM").as_deref(),
            Some("2024-01-15 2:30 PM")
        );
    }

    #[test]
    fn month_first_wins_when_ambiguous() {
        assert_eq!(
            repair_timestamp("03/04/2024 08:00").as_deref(),
            Some("2024-03-04 08:00")
        );
    }

    #[test]
    fn unrepairable_timestamps_are_left_alone() {
        assert_eq!(repair_timestamp("15/01/2024"), None);
        assert_eq!(repair_timestamp("Jan 15 14:30"), None);
        assert_eq!(repair_timestamp(" 14:30"), None);

        let (ds, report) = validate(dataset(&[("GateA", "Jan 15 14:30", 1)]));
        assert_eq!(ds.get("GateA").unwrap()[0].timestamp, "Jan 15 14:30");
        assert_eq!(report.unrepaired_timestamps, 1);
    }

    #[test]
    fn negative_counts_are_clamped() {
        let (ds, report) = validate(dataset(&[
            ("GateA", "2024-01-15 14:30", -3),
            ("GateA", "2024-01-15 14:45", 4),
        ]));
        let counts: Vec<i64> = ds.get("GateA").unwrap().iter().map(|o| o.count).collect();
        assert_eq!(counts, vec![0, 4]);
        assert_eq!(report.clamped_counts, 1);
        assert_eq!(report.repaired_timestamps, 0);
    }

    #[test]
    fn validation_is_idempotent() {
        let input = dataset(&[
            ("GateA", "15/01/2024 14:30", -1),
            ("GateA", "2024-01-15 15:00", 2),
            ("GateB", "not a date", 3),
            ("GateB", "1/2/99 9:00 AM", -8),
        ]);
        let (once, _) = validate(input);
        let (twice, second) = validate(once.clone());

        assert_eq!(once, twice);
        assert_eq!(second.repaired_timestamps, 0);
        assert_eq!(second.clamped_counts, 0);
        assert!(twice.iter().all(|(_, obs)| obs.iter().all(|o| o.count >= 0)));
    }
}
