//! Recorded pointer event types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Physical pointer button reported by an event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

/// The kind of a recorded pointer event.
///
/// The file format names are the uppercase identifiers returned by
/// [`EventKind::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Moved,
    LeftPressed,
    LeftReleased,
    RightPressed,
    RightReleased,
    MiddlePressed,
    MiddleReleased,
}

impl EventKind {
    /// All kinds, in file-format declaration order.
    pub const ALL: [EventKind; 7] = [
        EventKind::Moved,
        EventKind::LeftPressed,
        EventKind::LeftReleased,
        EventKind::RightPressed,
        EventKind::RightReleased,
        EventKind::MiddlePressed,
        EventKind::MiddleReleased,
    ];

    /// Maps a button transition to an event kind.
    ///
    /// Any button other than left or right is recorded as a middle-button
    /// event, so X1/X2 presses show up as `MIDDLE_MOUSE_*` rows.
    pub fn from_button(button: PointerButton, pressed: bool) -> Self {
        match (button, pressed) {
            (PointerButton::Left, true) => EventKind::LeftPressed,
            (PointerButton::Left, false) => EventKind::LeftReleased,
            (PointerButton::Right, true) => EventKind::RightPressed,
            (PointerButton::Right, false) => EventKind::RightReleased,
            (_, true) => EventKind::MiddlePressed,
            (_, false) => EventKind::MiddleReleased,
        }
    }

    /// The identifier written to the `event` column.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Moved => "MOVED",
            EventKind::LeftPressed => "LEFT_MOUSE_PRESSED",
            EventKind::LeftReleased => "LEFT_MOUSE_RELEASED",
            EventKind::RightPressed => "RIGHT_MOUSE_PRESSED",
            EventKind::RightReleased => "RIGHT_MOUSE_RELEASED",
            EventKind::MiddlePressed => "MIDDLE_MOUSE_PRESSED",
            EventKind::MiddleReleased => "MIDDLE_MOUSE_RELEASED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when an `event` column holds an unknown identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event kind: {0:?}")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// One raw pointer event with its offset from the start of the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub kind: EventKind,
    /// Pointer X in screen coordinates at the time of the event.
    pub x: i32,
    /// Pointer Y in screen coordinates at the time of the event.
    pub y: i32,
    /// Seconds since the recording session started.
    pub elapsed_seconds: f64,
}

impl RecordedEvent {
    pub fn new(kind: EventKind, x: i32, y: i32, elapsed_seconds: f64) -> Self {
        Self {
            kind,
            x,
            y,
            elapsed_seconds,
        }
    }
}
