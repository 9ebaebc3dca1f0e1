use std::sync::{Arc, Mutex};

use gate_count_processing::ingestion::{
    IngestionContext, IngestionFormat, IngestionObserver, IngestionOptions, IngestionSeverity,
    IngestionStats, ingest_from_path,
};
use gate_count_processing::IngestionError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<IngestionStats>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, _ctx: &IngestionContext, stats: IngestionStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(
        &self,
        _ctx: &IngestionContext,
        severity: IngestionSeverity,
        _error: &IngestionError,
    ) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(
        &self,
        _ctx: &IngestionContext,
        severity: IngestionSeverity,
        _error: &IngestionError,
    ) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn csv_options(obs: Arc<RecordingObserver>) -> IngestionOptions {
    IngestionOptions {
        format: Some(IngestionFormat::Csv),
        observer: Some(obs),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    }
}

#[test]
fn observer_receives_stats_on_success() {
    let obs = Arc::new(RecordingObserver::default());
    ingest_from_path("tests/fixtures/gates.csv", &csv_options(obs.clone())).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![IngestionStats {
            rows: 4,
            skipped_blank_rows: 1,
            entities: 2,
            observations: 8,
        }]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());

    // Missing file -> Io error -> Critical
    let missing = "tests/fixtures/does_not_exist.csv";
    let _ = ingest_from_path(missing, &csv_options(obs.clone())).unwrap_err();

    let failures = obs.failures.lock().unwrap().clone();
    let alerts = obs.alerts.lock().unwrap().clone();
    assert_eq!(failures, vec![IngestionSeverity::Critical]);
    assert_eq!(alerts, vec![IngestionSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_parse_error() {
    let obs = Arc::new(RecordingObserver::default());
    let path = std::env::temp_dir().join(format!("gate-count-bad-{}.csv", std::process::id()));
    std::fs::write(&path, "Date,Time,GateA\n01/15/2024,02:30 PM,closed\n").unwrap();

    let _ = ingest_from_path(&path, &csv_options(obs.clone())).unwrap_err();

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(failures, vec![IngestionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());

    let _ = std::fs::remove_file(&path);
}
