//! Offline analysis of a recording: descriptive statistics plus the fitted
//! timing model, in one serialisable report.

use std::path::Path;

use mimic_core::recording::csv_format::load_log;
use mimic_core::timing::extract::{extract_intervals, extract_press_durations, phase_buckets};
use mimic_core::timing::summary::SampleSummary;
use mimic_core::{EventKind, EventLog, FitOptions, RecordingError, TimingError, TimingModel};
use serde::Serialize;
use thiserror::Error;

/// Error type for recording analysis.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Recording(#[from] RecordingError),
    #[error("cannot fit timing model: {0}")]
    Timing(#[from] TimingError),
}

/// Summary of one recording and the model fitted from it.
#[derive(Debug, Clone, Serialize)]
pub struct TimingReport {
    pub session: String,
    pub events: usize,
    pub left_clicks: usize,
    pub duration_seconds: f64,
    pub press_durations: Option<SampleSummary>,
    /// One entry per interval phase; `None` for an empty phase.
    pub interval_phases: Vec<Option<SampleSummary>>,
    pub model: TimingModel,
}

/// Loads the recording at `path` and analyses it.
///
/// # Errors
///
/// [`AnalyzeError::Recording`] if the file is missing or unreadable, and
/// [`AnalyzeError::Timing`] if any distribution cannot be fitted.
pub fn analyze_recording(
    path: impl AsRef<Path>,
    options: &FitOptions,
) -> Result<TimingReport, AnalyzeError> {
    let log = load_log(path)?;
    analyze_log(&log, options)
}

/// Summarises `log` and fits its timing model.
///
/// # Errors
///
/// [`AnalyzeError::Timing`] if any distribution cannot be fitted.
pub fn analyze_log(log: &EventLog, options: &FitOptions) -> Result<TimingReport, AnalyzeError> {
    let model = TimingModel::build(log, options)?;
    let durations = extract_press_durations(log);
    let intervals = extract_intervals(log);

    Ok(TimingReport {
        session: log.session_id().to_string(),
        events: log.len(),
        left_clicks: log.count(EventKind::LeftPressed),
        duration_seconds: log.duration_seconds(),
        press_durations: SampleSummary::of(&durations),
        interval_phases: phase_buckets(&intervals, options.phases)
            .iter()
            .map(|bucket| SampleSummary::of(bucket))
            .collect(),
        model,
    })
}
