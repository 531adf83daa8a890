//! The fitted timing model used at replay time.
//!
//! A [`TimingModel`] is built once from an [`EventLog`] and is read-only
//! afterwards.  Sampling takes the random source as an argument and touches
//! no shared state, so one model can be wrapped in an `Arc` and sampled from
//! any number of threads without locking.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::extract::{extract_intervals, extract_press_durations, phase_buckets};
use super::gamma::{fit, DistributionParams};
use super::{TimingError, DEFAULT_MIN_SAMPLES};
use crate::recording::log::EventLog;

/// Options controlling how a model is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Minimum number of samples per fitted distribution.
    pub min_samples: usize,
    /// Number of alternating interval phases (one per target in the cycle).
    pub phases: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            min_samples: DEFAULT_MIN_SAMPLES,
            phases: 2,
        }
    }
}

/// Press-duration and per-phase interval distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModel")]
pub struct TimingModel {
    press_duration: DistributionParams,
    interval_phases: Vec<DistributionParams>,
}

#[derive(Deserialize)]
struct RawModel {
    press_duration: DistributionParams,
    interval_phases: Vec<DistributionParams>,
}

impl TryFrom<RawModel> for TimingModel {
    type Error = TimingError;

    fn try_from(raw: RawModel) -> Result<Self, Self::Error> {
        TimingModel::new(raw.press_duration, raw.interval_phases)
    }
}

impl TimingModel {
    /// Assembles a model from already-fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::InvalidPhaseCount`] if `interval_phases` is empty.
    pub fn new(
        press_duration: DistributionParams,
        interval_phases: Vec<DistributionParams>,
    ) -> Result<Self, TimingError> {
        if interval_phases.is_empty() {
            return Err(TimingError::InvalidPhaseCount);
        }
        Ok(Self {
            press_duration,
            interval_phases,
        })
    }

    /// Extracts samples from `log` and fits every distribution.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::InvalidPhaseCount`] for `options.phases == 0`,
    /// otherwise the first fitting error encountered: press durations first,
    /// then phase buckets in order.
    pub fn build(log: &EventLog, options: &FitOptions) -> Result<Self, TimingError> {
        if options.phases == 0 {
            return Err(TimingError::InvalidPhaseCount);
        }

        let durations = extract_press_durations(log);
        let press_duration = fit(&durations, options.min_samples, "press duration")?;

        let intervals = extract_intervals(log);
        let interval_phases = phase_buckets(&intervals, options.phases)
            .iter()
            .enumerate()
            .map(|(phase, bucket)| {
                fit(bucket, options.min_samples, &format!("interval phase {phase}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            session = %log.session_id(),
            presses = durations.len(),
            intervals = intervals.len(),
            phases = options.phases,
            "timing model built"
        );

        Self::new(press_duration, interval_phases)
    }

    pub fn press_duration(&self) -> &DistributionParams {
        &self.press_duration
    }

    pub fn interval_phases(&self) -> &[DistributionParams] {
        &self.interval_phases
    }

    pub fn phase_count(&self) -> usize {
        self.interval_phases.len()
    }

    /// Samples a press hold time, clamped to `floor_seconds`.
    pub fn sample_press<R: Rng + ?Sized>(&self, floor_seconds: f64, rng: &mut R) -> Duration {
        to_duration(self.press_duration.sample(floor_seconds, rng))
    }

    /// Samples the idle interval following an action on `target_index`.
    ///
    /// The phase is `target_index mod phase_count`.
    pub fn sample_interval<R: Rng + ?Sized>(
        &self,
        target_index: usize,
        floor_seconds: f64,
        rng: &mut R,
    ) -> Duration {
        let params = &self.interval_phases[target_index % self.interval_phases.len()];
        to_duration(params.sample(floor_seconds, rng))
    }
}

fn to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::ZERO)
}
