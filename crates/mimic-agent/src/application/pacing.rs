//! Blocking waits.
//!
//! The automation worker sleeps for jittered backoff, sampled idle intervals,
//! press hold times, and focus polling.  All of those go through [`Sleeper`]
//! so tests can substitute a sleeper that only records the requested
//! durations.

use std::time::Duration;

/// Blocks the calling thread for a duration.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}
