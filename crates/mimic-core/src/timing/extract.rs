//! Sample extraction from an [`EventLog`].
//!
//! Only left-button events take part.  Moves and other buttons are ignored.
//!
//! Phase buckets are assigned purely by position: interval `k` goes to phase
//! `k mod n`.  This assumes the recording alternates cleanly between the
//! targets of the cycle; a skipped or extra click shifts every later label
//! and is not detected here.

use crate::recording::event::EventKind;
use crate::recording::log::EventLog;

/// Returns the hold time of every complete left press/release pair, in order.
///
/// A press seen while already pressed restarts the pending press (the later
/// timestamp wins).  A release with no pending press is ignored, as is a
/// trailing press that is never released.
pub fn extract_press_durations(log: &EventLog) -> Vec<f64> {
    let mut durations = Vec::new();
    let mut pending_press: Option<f64> = None;

    for event in log.events() {
        match event.kind {
            EventKind::LeftPressed => pending_press = Some(event.elapsed_seconds),
            EventKind::LeftReleased => {
                if let Some(pressed_at) = pending_press.take() {
                    durations.push(event.elapsed_seconds - pressed_at);
                }
            }
            _ => {}
        }
    }

    durations
}

/// Returns the time between each pair of successive left presses.
///
/// `k` presses yield `k - 1` intervals; fewer than two presses yield none.
pub fn extract_intervals(log: &EventLog) -> Vec<f64> {
    let presses: Vec<f64> = log
        .events()
        .iter()
        .filter(|e| e.kind == EventKind::LeftPressed)
        .map(|e| e.elapsed_seconds)
        .collect();

    presses.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Splits intervals into `phases` buckets by position (`index mod phases`).
///
/// Bucket sizes differ by at most one.  `phases == 0` yields no buckets.
pub fn phase_buckets(intervals: &[f64], phases: usize) -> Vec<Vec<f64>> {
    let mut buckets = vec![Vec::new(); phases];
    if phases == 0 {
        return buckets;
    }
    for (index, &value) in intervals.iter().enumerate() {
        buckets[index % phases].push(value);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::event::RecordedEvent;

    fn log_of(events: &[(EventKind, f64)]) -> EventLog {
        EventLog::from_events(
            events
                .iter()
                .map(|&(kind, t)| RecordedEvent::new(kind, 0, 0, t))
                .collect(),
        )
        .unwrap()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    fn four_press_log() -> EventLog {
        use EventKind::*;
        log_of(&[
            (LeftPressed, 0.0),
            (LeftReleased, 0.10),
            (Moved, 0.3),
            (LeftPressed, 0.5),
            (LeftReleased, 0.70),
            (LeftPressed, 1.1),
            (LeftReleased, 1.25),
            (LeftPressed, 1.6),
        ])
    }

    #[test]
    fn test_press_durations_pairs_presses_with_releases() {
        let durations = extract_press_durations(&four_press_log());
        assert_close(&durations, &[0.10, 0.20, 0.15]);
    }

    #[test]
    fn test_trailing_press_is_dropped() {
        let durations = extract_press_durations(&log_of(&[(EventKind::LeftPressed, 0.0)]));
        assert!(durations.is_empty());
    }

    #[test]
    fn test_repeated_press_restarts_pending_press() {
        use EventKind::*;
        let log = log_of(&[
            (LeftPressed, 0.0),
            (LeftPressed, 0.4),
            (LeftReleased, 0.5),
        ]);
        assert_close(&extract_press_durations(&log), &[0.1]);
    }

    #[test]
    fn test_release_without_press_and_other_buttons_are_ignored() {
        use EventKind::*;
        let log = log_of(&[
            (LeftReleased, 0.0),
            (RightPressed, 0.1),
            (RightReleased, 0.2),
            (MiddlePressed, 0.3),
            (LeftPressed, 0.4),
            (MiddleReleased, 0.5),
            (LeftReleased, 0.9),
        ]);
        assert_close(&extract_press_durations(&log), &[0.5]);
    }

    #[test]
    fn test_intervals_and_phase_buckets_for_four_presses() {
        // Arrange
        let log = four_press_log();

        // Act
        let intervals = extract_intervals(&log);
        let buckets = phase_buckets(&intervals, 2);

        // Assert
        assert_close(&intervals, &[0.5, 0.6, 0.5]);
        assert_close(&buckets[0], &[0.5, 0.5]);
        assert_close(&buckets[1], &[0.6]);
    }

    #[test]
    fn test_intervals_need_two_presses() {
        let log = log_of(&[(EventKind::LeftPressed, 1.0), (EventKind::LeftReleased, 1.1)]);
        assert!(extract_intervals(&log).is_empty());
        assert!(phase_buckets(&extract_intervals(&log), 2)
            .iter()
            .all(Vec::is_empty));
    }

    #[test]
    fn test_phase_bucket_sizes_differ_by_at_most_one() {
        let intervals: Vec<f64> = (0..17).map(|i| i as f64).collect();
        for phases in 1..6 {
            let buckets = phase_buckets(&intervals, phases);
            let sizes: Vec<usize> = buckets.iter().map(Vec::len).collect();
            let max = *sizes.iter().max().unwrap();
            let min = *sizes.iter().min().unwrap();
            assert!(max - min <= 1, "phases={phases} sizes={sizes:?}");
            assert_eq!(sizes.iter().sum::<usize>(), intervals.len());
        }
    }

    #[test]
    fn test_three_phase_buckets_use_index_mod_n() {
        let buckets = phase_buckets(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(buckets, vec![vec![1.0, 4.0], vec![2.0], vec![3.0]]);
    }
}
