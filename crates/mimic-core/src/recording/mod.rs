//! Pointer recording: event types, the append-only event log, and the
//! delimited text file format.
//!
//! # Sub-modules
//!
//! - **`event`** – [`event::EventKind`] and [`event::RecordedEvent`], one
//!   row of a recording.
//! - **`log`** – [`log::EventLogWriter`] (open session, append-only) and
//!   [`log::EventLog`] (closed session, immutable).
//! - **`csv_format`** – Reading and writing the `event,x,y,time` file format.

use std::path::PathBuf;

use thiserror::Error;

pub mod csv_format;
pub mod event;
pub mod log;

/// Error type for recording, persistence, and log validation.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// The recording file does not exist.
    #[error("recording not found: {0}")]
    FileNotFound(PathBuf),

    /// The recording exists but a row or the header could not be interpreted.
    #[error("unreadable recording at line {line}: {reason}")]
    UnreadableLog { line: u64, reason: String },

    /// An event was appended with a timestamp earlier than its predecessor.
    #[error("event {index} at {current}s precedes previous event at {previous}s")]
    NonMonotonic {
        index: usize,
        previous: f64,
        current: f64,
    },

    /// A file system I/O error occurred.
    #[error("I/O error accessing recording at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited text writer failed.
    #[error("failed to write recording: {0}")]
    Csv(#[from] csv::Error),
}
