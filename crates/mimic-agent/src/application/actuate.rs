//! Actuator: click policy on top of the pointer injection primitive.
//!
//! The injection primitive itself ([`PointerActuator`]) is external; each
//! platform provides an implementation in the infrastructure layer.  This
//! module owns only the policy: how long a click holds the button, taken from
//! the timing model's press-duration distribution.  It is the only runtime
//! consumer of that distribution.

use std::sync::Arc;
use std::time::Duration;

use mimic_core::{PointerButton, Region, TimingModel};
use rand::Rng;
use thiserror::Error;

use super::pacing::Sleeper;

/// Error type for pointer injection.
#[derive(Debug, Error)]
pub enum ActuationError {
    #[error("platform error: {0}")]
    Platform(String),
}

/// Platform-agnostic pointer injection primitive.
pub trait PointerActuator: Send + Sync {
    /// Presses `button` at the current cursor position.
    fn press(&self, button: PointerButton) -> Result<(), ActuationError>;

    /// Releases `button` at the current cursor position.
    fn release(&self, button: PointerButton) -> Result<(), ActuationError>;

    /// Moves the cursor to an absolute screen position.
    fn move_to(&self, x: i32, y: i32) -> Result<(), ActuationError>;
}

/// Performs humanised clicks.
pub struct Actuator {
    primitive: Arc<dyn PointerActuator>,
    model: Arc<TimingModel>,
    sleeper: Arc<dyn Sleeper>,
    floor_seconds: f64,
}

impl Actuator {
    /// Creates an actuator whose hold times are drawn from `model` and
    /// clamped to `floor_seconds`.
    pub fn new(
        primitive: Arc<dyn PointerActuator>,
        model: Arc<TimingModel>,
        sleeper: Arc<dyn Sleeper>,
        floor_seconds: f64,
    ) -> Self {
        Self {
            primitive,
            model,
            sleeper,
            floor_seconds,
        }
    }

    /// Presses the left button, holds it for a sampled duration, releases it.
    ///
    /// Returns the hold duration used.
    ///
    /// # Errors
    ///
    /// Returns [`ActuationError`] if the press or release injection fails.
    /// When the press fails no release is attempted.
    pub fn click<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Duration, ActuationError> {
        let hold = self.model.sample_press(self.floor_seconds, rng);
        self.primitive.press(PointerButton::Left)?;
        self.sleeper.sleep(hold);
        self.primitive.release(PointerButton::Left)?;
        tracing::trace!(hold_ms = hold.as_millis() as u64, "click");
        Ok(hold)
    }

    /// Moves the cursor to a uniformly random point inside `region`.
    ///
    /// An empty region, or one whose extent does not fit in screen
    /// coordinates, falls back to its top-left corner along that axis.
    /// Returns the point used.
    ///
    /// # Errors
    ///
    /// Returns [`ActuationError`] if the move injection fails.
    pub fn move_into<R: Rng + ?Sized>(
        &self,
        region: &Region,
        rng: &mut R,
    ) -> Result<(i32, i32), ActuationError> {
        let (x, y) = if region.is_empty() {
            (region.x, region.y)
        } else {
            (
                sample_span(region.x, region.right(), rng),
                sample_span(region.y, region.bottom(), rng),
            )
        };
        self.primitive.move_to(x, y)?;
        Ok((x, y))
    }
}

fn sample_span<R: Rng + ?Sized>(start: i32, end: i32, rng: &mut R) -> i32 {
    if end > start {
        rng.gen_range(start..end)
    } else {
        start
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
