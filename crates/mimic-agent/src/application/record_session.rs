//! Recorder: turns a live pointer event stream into an [`EventLog`].
//!
//! Events are drained on a dedicated `mimic-recorder` thread.  Each one is
//! stamped with the seconds elapsed since the session started, appended to
//! the in-memory log, and, when an output path was given, written through to
//! the recording file immediately so a crash loses at most one row.
//!
//! Source timestamps are monotonic instants, but events can still arrive out
//! of order across hook threads.  An event observed before its predecessor is
//! stamped with the predecessor's elapsed time, keeping the log monotonic.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use mimic_core::recording::csv_format::CsvEventWriter;
use mimic_core::{EventKind, EventLog, EventLogWriter, RecordedEvent, RecordingError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::infrastructure::input_capture::{CaptureError, PointerEventSource, RawPointerEvent};

/// Error type for recording sessions.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("a recording session is already active")]
    AlreadyRecording,

    #[error("no recording session is active")]
    NotRecording,

    #[error("pointer capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("I/O error creating recording at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Recording(#[from] RecordingError),

    #[error("failed to spawn recorder thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("recorder thread panicked")]
    WorkerPanicked,
}

type LiveWriter = CsvEventWriter<BufWriter<File>>;

fn open_live(path: &Path) -> Result<LiveWriter, RecordError> {
    let file = File::create(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(CsvEventWriter::new(BufWriter::new(file))?)
}

struct ActiveSession {
    output: Option<PathBuf>,
    handle: JoinHandle<EventLog>,
}

/// Records pointer sessions from one event source.
pub struct Recorder {
    source: Arc<dyn PointerEventSource>,
    active: Option<ActiveSession>,
}

impl Recorder {
    pub fn new(source: Arc<dyn PointerEventSource>) -> Self {
        Self {
            source,
            active: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a session, writing rows live to `output` if given.
    ///
    /// An existing file at `output` is replaced.
    ///
    /// # Errors
    ///
    /// - [`RecordError::AlreadyRecording`] if a session is active.
    /// - [`RecordError::Capture`] if the event source cannot start.  The
    ///   output file is left untouched.
    /// - [`RecordError::Io`] / [`RecordError::Recording`] if the output file
    ///   cannot be created or its header written.  Capture is stopped again.
    pub fn start(&mut self, output: Option<&Path>) -> Result<(), RecordError> {
        if self.active.is_some() {
            return Err(RecordError::AlreadyRecording);
        }

        let receiver = self.source.start()?;
        let live = match output.map(open_live).transpose() {
            Ok(live) => live,
            Err(e) => {
                self.source.stop();
                return Err(e);
            }
        };

        let started = Instant::now();
        let handle = thread::Builder::new()
            .name("mimic-recorder".to_string())
            .spawn(move || drain(receiver, started, live))
            .map_err(|e| {
                self.source.stop();
                RecordError::Spawn(e)
            })?;

        info!(output = ?output, "recording started");
        self.active = Some(ActiveSession {
            output: output.map(Path::to_path_buf),
            handle,
        });
        Ok(())
    }

    /// Stops the session and returns the closed log.
    ///
    /// # Errors
    ///
    /// [`RecordError::NotRecording`] if no session is active, or
    /// [`RecordError::WorkerPanicked`] if the recorder thread panicked.
    pub fn stop(&mut self) -> Result<EventLog, RecordError> {
        let session = self.active.take().ok_or(RecordError::NotRecording)?;
        self.source.stop();
        let log = session
            .handle
            .join()
            .map_err(|_| RecordError::WorkerPanicked)?;
        info!(
            session = %log.session_id(),
            events = log.len(),
            output = ?session.output,
            "recording stopped"
        );
        Ok(log)
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if self.active.is_some() {
            if let Err(e) = self.stop() {
                warn!("recording ended with error during shutdown: {e}");
            }
        }
    }
}

/// Runs until the source closes the channel.
fn drain(
    receiver: Receiver<RawPointerEvent>,
    started: Instant,
    mut live: Option<LiveWriter>,
) -> EventLog {
    let mut log = EventLogWriter::new();

    for raw in receiver {
        let elapsed = raw.at().saturating_duration_since(started).as_secs_f64();
        let elapsed = log.last_elapsed().map_or(elapsed, |last| elapsed.max(last));
        let event = to_recorded(raw, elapsed);

        if let Err(e) = log.append(event) {
            warn!("dropping event: {e}");
            continue;
        }
        if let Some(writer) = live.as_mut() {
            if let Err(e) = writer.write_event(&event) {
                warn!("live recording write failed, continuing in memory only: {e}");
                live = None;
            }
        }
        debug!(kind = %event.kind, x = event.x, y = event.y, elapsed, "event");
    }

    if let Some(writer) = live {
        if let Err(e) = writer.into_inner() {
            warn!("failed to flush recording: {e}");
        }
    }
    log.close()
}

fn to_recorded(raw: RawPointerEvent, elapsed: f64) -> RecordedEvent {
    match raw {
        RawPointerEvent::Move { x, y, .. } => RecordedEvent::new(EventKind::Moved, x, y, elapsed),
        RawPointerEvent::Button {
            button,
            pressed,
            x,
            y,
            ..
        } => RecordedEvent::new(EventKind::from_button(button, pressed), x, y, elapsed),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
