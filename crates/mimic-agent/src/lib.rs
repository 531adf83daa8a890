//! mimic-agent library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does mimic-agent do?
//!
//! 1. Records a human operator's pointer events to an event log and a live
//!    recording file.
//! 2. Fits a timing model (press hold times and alternating idle intervals)
//!    from a recording, or loads a previously fitted one.
//! 3. Runs an automation script: a state machine that locates visual targets
//!    through the perception gate, clicks them with sampled hold times, idles
//!    for sampled intervals, pauses while the target application is not
//!    focused, and stops cleanly when asked.

/// Application layer: use cases and the traits they depend on.
pub mod application;

/// Infrastructure layer: event sources, injection and perception adapters,
/// storage, and the control surface.
pub mod infrastructure;
