//! Delimited text persistence for event logs.
//!
//! One header row followed by one row per [`RecordedEvent`]:
//!
//! ```text
//! event,x,y,time
//! "LEFT_MOUSE_PRESSED",100,200,0.501234
//! "LEFT_MOUSE_RELEASED",100,200,0.641234
//! ```
//!
//! The `event` column is always quoted and the numeric columns never are.
//! `time` is written with the shortest representation that round-trips the
//! `f64` exactly.  The reader also accepts a quoted header row, which some
//! writers emit.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Trim, WriterBuilder};

use super::event::{EventKind, RecordedEvent};
use super::log::EventLog;
use super::RecordingError;

/// Column names, in order.
pub const HEADER: [&str; 4] = ["event", "x", "y", "time"];

/// Streams events to a writer one row at a time.
///
/// Each row is flushed as soon as it is written so that a live recording
/// file is always complete up to the last event.
pub struct CsvEventWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> CsvEventWriter<W> {
    /// Writes the header row and returns a writer positioned for data rows.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Csv`] if the header cannot be written.
    pub fn new(mut writer: W) -> Result<Self, RecordingError> {
        // Written raw: the non-numeric quote style would quote the header.
        writer
            .write_all(format!("{}\n", HEADER.join(",")).as_bytes())
            .map_err(csv::Error::from)?;
        let inner = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::NonNumeric)
            .from_writer(writer);
        Ok(Self { inner })
    }

    /// Writes and flushes one row.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Csv`] on write or flush failure.
    pub fn write_event(&mut self, event: &RecordedEvent) -> Result<(), RecordingError> {
        self.inner.write_record([
            event.kind.name().to_string(),
            event.x.to_string(),
            event.y.to_string(),
            format_time(event.elapsed_seconds),
        ])?;
        self.inner.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Csv`] if the final flush fails.
    pub fn into_inner(self) -> Result<W, RecordingError> {
        self.inner
            .into_inner()
            .map_err(|e| RecordingError::Csv(csv::Error::from(e.into_error())))
    }
}

/// Writes a whole log, header included.
///
/// # Errors
///
/// Returns [`RecordingError::Csv`] on any write failure.
pub fn write_log<W: Write>(log: &EventLog, writer: W) -> Result<W, RecordingError> {
    let mut out = CsvEventWriter::new(writer)?;
    for event in log.events() {
        out.write_event(event)?;
    }
    out.into_inner()
}

/// Reads a whole log.
///
/// # Errors
///
/// Returns [`RecordingError::UnreadableLog`] for a missing or wrong header, a
/// malformed row, or an unknown event name, and
/// [`RecordingError::NonMonotonic`] if timestamps decrease.
pub fn read_log<R: Read>(reader: R) -> Result<EventLog, RecordingError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let header = rdr.headers().map_err(|e| unreadable(1, e))?.clone();
    if header.len() != HEADER.len() || header.iter().zip(HEADER).any(|(a, b)| a != b) {
        return Err(RecordingError::UnreadableLog {
            line: 1,
            reason: format!("expected header {:?}, found {:?}", HEADER.join(","), header),
        });
    }

    let mut events = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| {
            let line = e.position().map_or(0, |p| p.line());
            unreadable(line, e)
        })?;
        events.push(parse_row(&record)?);
    }

    EventLog::from_events(events)
}

/// Loads a log from `path`.
///
/// # Errors
///
/// Returns [`RecordingError::FileNotFound`] if the file does not exist,
/// [`RecordingError::Io`] for other file-system errors, and any error from
/// [`read_log`].
pub fn load_log(path: impl AsRef<Path>) -> Result<EventLog, RecordingError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            RecordingError::FileNotFound(path.to_path_buf())
        } else {
            RecordingError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    read_log(file)
}

/// Saves a log to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`RecordingError::Io`] if the file cannot be created and
/// [`RecordingError::Csv`] on write failure.
pub fn save_log(path: impl AsRef<Path>, log: &EventLog) -> Result<(), RecordingError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| RecordingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_log(log, BufWriter::new(file))?;
    Ok(())
}

fn parse_row(record: &StringRecord) -> Result<RecordedEvent, RecordingError> {
    let line = record.position().map_or(0, |p| p.line());
    if record.len() != HEADER.len() {
        return Err(RecordingError::UnreadableLog {
            line,
            reason: format!("expected {} fields, found {}", HEADER.len(), record.len()),
        });
    }

    let kind: EventKind = record[0].parse().map_err(|e| unreadable(line, e))?;
    let x: i32 = record[1].parse().map_err(|e| unreadable(line, e))?;
    let y: i32 = record[2].parse().map_err(|e| unreadable(line, e))?;
    let time: f64 = record[3].parse().map_err(|e| unreadable(line, e))?;

    Ok(RecordedEvent::new(kind, x, y, time))
}

fn format_time(seconds: f64) -> String {
    // `{:?}` keeps a trailing ".0" on integral values so the column always
    // reads back as a float.
    format!("{seconds:?}")
}

fn unreadable(line: u64, err: impl std::fmt::Display) -> RecordingError {
    RecordingError::UnreadableLog {
        line,
        reason: err.to_string(),
    }
}
