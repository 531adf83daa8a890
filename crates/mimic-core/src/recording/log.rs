//! The event log for one recording session.
//!
//! A session goes through two phases, modelled as two types:
//!
//! - [`EventLogWriter`] – the open session.  Only the recorder holds it and
//!   the only mutation is [`EventLogWriter::append`].
//! - [`EventLog`] – the closed session returned by [`EventLogWriter::close`].
//!   It has no mutating methods, so it can be shared freely once built.
//!
//! Both enforce that `elapsed_seconds` never decreases.

use uuid::Uuid;

use super::event::{EventKind, RecordedEvent};
use super::RecordingError;

/// An open, append-only recording session.
#[derive(Debug)]
pub struct EventLogWriter {
    session_id: Uuid,
    events: Vec<RecordedEvent>,
}

impl EventLogWriter {
    /// Opens a new, empty session.
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            events: Vec::new(),
        }
    }

    /// Appends one event.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::NonMonotonic`] if the event's timestamp is
    /// earlier than the last appended event, or is not finite.
    pub fn append(&mut self, event: RecordedEvent) -> Result<(), RecordingError> {
        check_next(&self.events, &event)?;
        self.events.push(event);
        Ok(())
    }

    /// Timestamp of the most recently appended event, if any.
    pub fn last_elapsed(&self) -> Option<f64> {
        self.events.last().map(|e| e.elapsed_seconds)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Ends the session, freezing the log.
    pub fn close(self) -> EventLog {
        EventLog {
            session_id: self.session_id,
            events: self.events,
        }
    }
}

impl Default for EventLogWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// A closed, immutable recording session.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLog {
    session_id: Uuid,
    events: Vec<RecordedEvent>,
}

impl EventLog {
    /// Builds a closed log from events read back from storage.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::NonMonotonic`] if the timestamps decrease.
    pub fn from_events(events: Vec<RecordedEvent>) -> Result<Self, RecordingError> {
        let mut writer = EventLogWriter::new();
        writer.events.reserve(events.len());
        for event in events {
            writer.append(event)?;
        }
        Ok(writer.close())
    }

    /// Identifier assigned when the session was opened (or loaded).
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events of the given kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Seconds between the first and last event, or zero for an empty log.
    pub fn duration_seconds(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.elapsed_seconds - first.elapsed_seconds,
            _ => 0.0,
        }
    }
}

fn check_next(events: &[RecordedEvent], next: &RecordedEvent) -> Result<(), RecordingError> {
    let previous = events.last().map_or(0.0, |e| e.elapsed_seconds);
    if !next.elapsed_seconds.is_finite() || next.elapsed_seconds < previous {
        return Err(RecordingError::NonMonotonic {
            index: events.len(),
            previous,
            current: next.elapsed_seconds,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(kind: EventKind, t: f64) -> RecordedEvent {
        RecordedEvent::new(kind, 10, 20, t)
    }

    #[test]
    fn test_append_accepts_equal_and_increasing_timestamps() {
        // Arrange
        let mut writer = EventLogWriter::new();

        // Act
        writer.append(ev(EventKind::Moved, 0.1)).unwrap();
        writer.append(ev(EventKind::LeftPressed, 0.1)).unwrap();
        writer.append(ev(EventKind::LeftReleased, 0.25)).unwrap();

        // Assert
        assert_eq!(writer.len(), 3);
        assert_eq!(writer.last_elapsed(), Some(0.25));
    }

    #[test]
    fn test_append_rejects_decreasing_timestamp() {
        let mut writer = EventLogWriter::new();
        writer.append(ev(EventKind::Moved, 1.0)).unwrap();

        let result = writer.append(ev(EventKind::Moved, 0.5));

        assert!(matches!(
            result,
            Err(RecordingError::NonMonotonic { index: 1, .. })
        ));
        assert_eq!(writer.len(), 1);
    }

    #[test]
    fn test_append_rejects_negative_and_nan_timestamps() {
        let mut writer = EventLogWriter::new();
        assert!(writer.append(ev(EventKind::Moved, -0.1)).is_err());
        assert!(writer.append(ev(EventKind::Moved, f64::NAN)).is_err());
        assert!(writer.is_empty());
    }

    #[test]
    fn test_close_preserves_events_and_session_id() {
        let mut writer = EventLogWriter::new();
        let id = writer.session_id;
        writer.append(ev(EventKind::LeftPressed, 0.0)).unwrap();
        writer.append(ev(EventKind::LeftReleased, 0.2)).unwrap();

        let log = writer.close();

        assert_eq!(log.session_id(), id);
        assert_eq!(log.len(), 2);
        assert_eq!(log.count(EventKind::LeftPressed), 1);
        assert!((log.duration_seconds() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_from_events_validates_ordering() {
        let events = vec![ev(EventKind::Moved, 2.0), ev(EventKind::Moved, 1.0)];
        assert!(EventLog::from_events(events).is_err());
    }
}
