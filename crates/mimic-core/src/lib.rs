//! # mimic-core
//!
//! Shared library for Mimic containing the pointer recording format, the
//! timing extraction algorithms, and the fitted gamma timing model.
//!
//! It has zero dependencies on OS APIs, threads, or the perception and
//! injection primitives; those live in `mimic-agent`.
//!
//! # Architecture overview
//!
//! Mimic replays pointer clicks so that their timing is statistically
//! indistinguishable from a recorded human session.  The pipeline is:
//!
//! - **`recording`** – The append-only [`EventLog`] of raw pointer events
//!   with elapsed timestamps, and its delimited text file format.
//!
//! - **`timing`** – Extraction of press durations and inter-press intervals
//!   from a log, maximum-likelihood fitting of three-parameter gamma
//!   distributions, and sampling of new durations at replay time.
//!
//! - **`domain`** – Small value types shared with the agent, such as the
//!   screen [`Region`] reported by the perception gate.

pub mod domain;
pub mod recording;
pub mod timing;

pub use domain::region::Region;
pub use recording::event::{EventKind, PointerButton, RecordedEvent};
pub use recording::log::{EventLog, EventLogWriter};
pub use recording::RecordingError;
pub use timing::gamma::DistributionParams;
pub use timing::model::{FitOptions, TimingModel};
pub use timing::TimingError;
