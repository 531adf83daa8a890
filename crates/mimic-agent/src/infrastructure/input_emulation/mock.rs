//! Mock pointer actuator for unit testing and dry runs.
//!
//! Every injected press, release, and move is pushed into a `Mutex<Vec<...>>`
//! so test assertions can inspect exactly what was emitted and in what order.
//! The agent binary also uses it as its dry-run backend.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` (or build with [`MockPointerActuator::failing`])
//! to make every call return [`ActuationError::Platform`].

use std::sync::Mutex;

use mimic_core::PointerButton;

use crate::application::actuate::{ActuationError, PointerActuator};

/// A mock actuator that records all calls without touching the OS.
#[derive(Debug, Default)]
pub struct MockPointerActuator {
    /// Buttons passed to `press`.
    pub presses: Mutex<Vec<PointerButton>>,
    /// Buttons passed to `release`.
    pub releases: Mutex<Vec<PointerButton>>,
    /// Positions passed to `move_to`.
    pub moves: Mutex<Vec<(i32, i32)>>,
    /// When `true`, every method returns an error.
    pub should_fail: bool,
}

impl MockPointerActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An actuator whose every call fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Number of completed clicks (releases).
    pub fn click_count(&self) -> usize {
        self.releases.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn check(&self) -> Result<(), ActuationError> {
        if self.should_fail {
            Err(ActuationError::Platform("mock failure".into()))
        } else {
            Ok(())
        }
    }
}

impl PointerActuator for MockPointerActuator {
    fn press(&self, button: PointerButton) -> Result<(), ActuationError> {
        self.check()?;
        tracing::trace!(?button, "mock press");
        self.presses
            .lock()
            .map_err(|_| ActuationError::Platform("press log poisoned".into()))?
            .push(button);
        Ok(())
    }

    fn release(&self, button: PointerButton) -> Result<(), ActuationError> {
        self.check()?;
        tracing::trace!(?button, "mock release");
        self.releases
            .lock()
            .map_err(|_| ActuationError::Platform("release log poisoned".into()))?
            .push(button);
        Ok(())
    }

    fn move_to(&self, x: i32, y: i32) -> Result<(), ActuationError> {
        self.check()?;
        tracing::trace!(x, y, "mock move");
        self.moves
            .lock()
            .map_err(|_| ActuationError::Platform("move log poisoned".into()))?
            .push((x, y));
        Ok(())
    }
}
