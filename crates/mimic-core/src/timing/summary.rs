//! Descriptive statistics for a sample set.

use serde::{Deserialize, Serialize};

/// Count, mean, sample standard deviation, and range of a sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample (n - 1) standard deviation; zero for fewer than two samples.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SampleSummary {
    /// Summarises `samples`, or returns `None` when there are none.
    pub fn of(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let count = samples.len();
        let mean = samples.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let ss: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            count,
            mean,
            std_dev,
            min,
            max,
        })
    }
}
