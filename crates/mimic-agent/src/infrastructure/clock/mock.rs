//! Mock sleeper that records requested durations.

use std::sync::Mutex;
use std::time::Duration;

use crate::application::pacing::Sleeper;

/// Records every requested sleep.
///
/// By default no time passes.  [`MockSleeper::capped`] really sleeps, but for
/// at most the cap, so threaded tests keep a realistic interleaving without
/// waiting out sampled delays.
#[derive(Debug, Default)]
pub struct MockSleeper {
    slept: Mutex<Vec<Duration>>,
    cap: Option<Duration>,
}

impl MockSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sleeper that blocks for `min(requested, cap)`.
    pub fn capped(cap: Duration) -> Self {
        Self {
            slept: Mutex::new(Vec::new()),
            cap: Some(cap),
        }
    }

    /// Requested durations, in call order.
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Sum of all requested durations.
    pub fn total(&self) -> Duration {
        self.slept().iter().sum()
    }
}

impl Sleeper for MockSleeper {
    fn sleep(&self, duration: Duration) {
        if let Ok(mut slept) = self.slept.lock() {
            slept.push(duration);
        }
        if let Some(cap) = self.cap {
            std::thread::sleep(duration.min(cap));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_mock_sleeper_records_without_waiting() {
        // Arrange
        let sleeper = MockSleeper::new();
        let start = Instant::now();

        // Act
        sleeper.sleep(Duration::from_secs(60));
        sleeper.sleep(Duration::from_secs(30));

        // Assert
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(sleeper.slept().len(), 2);
        assert_eq!(sleeper.total(), Duration::from_secs(90));
    }

    #[test]
    fn test_capped_sleeper_waits_at_most_the_cap() {
        let sleeper = MockSleeper::capped(Duration::from_millis(5));
        let start = Instant::now();

        sleeper.sleep(Duration::from_secs(60));

        assert!(start.elapsed() >= Duration::from_millis(5));
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(sleeper.slept(), vec![Duration::from_secs(60)]);
    }
}
