//! Sleeping adapters.
//!
//! [`ThreadSleeper`] blocks the calling thread; tests use
//! [`mock::MockSleeper`] so that no wall-clock time passes.

use std::time::Duration;

use crate::application::pacing::Sleeper;

pub mod mock;

/// Blocks the current thread with [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
