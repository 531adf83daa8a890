//! Integration tests for the mimic-core pipeline.
//!
//! These tests go from recording file text through the event log and the
//! extraction algorithms to a fitted timing model, using only the public API.

use mimic_core::recording::csv_format::{load_log, read_log, save_log, write_log};
use mimic_core::timing::extract::{extract_intervals, extract_press_durations, phase_buckets};
use mimic_core::timing::summary::SampleSummary;
use mimic_core::{EventKind, EventLog, EventLogWriter, FitOptions, RecordedEvent, TimingModel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
    }
}

/// Simulates a human alternating between two targets.
fn simulated_session(clicks: usize, seed: u64) -> EventLog {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut writer = EventLogWriter::new();
    let mut t = 0.25;
    for i in 0..clicks {
        let (x, y) = if i % 2 == 0 { (300, 400) } else { (900, 420) };
        writer
            .append(RecordedEvent::new(EventKind::Moved, x - 3, y + 1, t - 0.05))
            .unwrap();
        writer
            .append(RecordedEvent::new(EventKind::LeftPressed, x, y, t))
            .unwrap();
        let hold = 0.07 + rng.gen::<f64>() * 0.06;
        writer
            .append(RecordedEvent::new(EventKind::LeftReleased, x, y, t + hold))
            .unwrap();
        let base = if i % 2 == 0 { 0.6 } else { 1.5 };
        t += hold + base + rng.gen::<f64>() * 0.3;
    }
    writer.close()
}

#[test]
fn test_documented_scenario_pairs_and_phases() {
    let text = "event,x,y,time\n\
        \"LEFT_MOUSE_PRESSED\",10,10,0.0\n\
        \"LEFT_MOUSE_RELEASED\",10,10,0.1\n\
        \"MOVED\",40,10,0.3\n\
        \"LEFT_MOUSE_PRESSED\",40,10,0.5\n\
        \"LEFT_MOUSE_RELEASED\",40,10,0.7\n\
        \"LEFT_MOUSE_PRESSED\",10,10,1.1\n\
        \"LEFT_MOUSE_RELEASED\",10,10,1.25\n\
        \"LEFT_MOUSE_PRESSED\",40,10,1.6\n";

    let log = read_log(text.as_bytes()).expect("documented layout must parse");
    let durations = extract_press_durations(&log);
    let intervals = extract_intervals(&log);
    let buckets = phase_buckets(&intervals, 2);

    assert_close(&durations, &[0.10, 0.20, 0.15]);
    assert_close(&intervals, &[0.5, 0.6, 0.5]);
    assert_close(&buckets[0], &[0.5, 0.5]);
    assert_close(&buckets[1], &[0.6]);
}

#[test]
fn test_interval_count_is_presses_minus_one() {
    let log = simulated_session(25, 1);
    let presses = log.count(EventKind::LeftPressed);
    assert_eq!(extract_intervals(&log).len(), presses - 1);
    assert_eq!(extract_press_durations(&log).len(), presses);
    assert!(extract_press_durations(&log).iter().all(|d| *d >= 0.0));
}

#[test]
fn test_saved_session_builds_same_model_as_in_memory_log() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mouse-recording.csv");
    let log = simulated_session(40, 9);
    save_log(&path, &log).unwrap();

    // Act
    let loaded = load_log(&path).unwrap();
    let from_memory = TimingModel::build(&log, &FitOptions::default()).unwrap();
    let from_disk = TimingModel::build(&loaded, &FitOptions::default()).unwrap();

    // Assert
    assert_eq!(from_memory, from_disk);
}

#[test]
fn test_written_file_reads_back_identically() {
    let log = simulated_session(10, 4);
    let bytes = write_log(&log, Vec::new()).unwrap();
    let restored = read_log(bytes.as_slice()).unwrap();
    assert_eq!(restored.events(), log.events());
}

#[test]
fn test_model_separates_the_two_phases() {
    let log = simulated_session(60, 21);

    let model = TimingModel::build(&log, &FitOptions::default()).unwrap();

    let summaries: Vec<SampleSummary> = phase_buckets(&extract_intervals(&log), 2)
        .iter()
        .map(|b| SampleSummary::of(b).unwrap())
        .collect();
    for (params, summary) in model.interval_phases().iter().zip(&summaries) {
        assert!((params.mean() - summary.mean).abs() < 1e-9);
    }
    assert!(model.interval_phases()[1].mean() > model.interval_phases()[0].mean() + 0.5);
}
