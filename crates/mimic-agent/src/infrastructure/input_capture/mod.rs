//! Pointer event capture.
//!
//! The platform hook (global mouse listener) is external.  It delivers raw
//! events through an `mpsc` channel so the hook callback returns immediately
//! and all processing happens on the recorder thread.
//!
//! # Testability
//!
//! The [`PointerEventSource`] trait lets tests and dry runs inject synthetic
//! events through [`mock::MockPointerSource`].

use std::sync::mpsc;
use std::time::Instant;

use mimic_core::PointerButton;

pub mod mock;

/// A raw pointer event produced by an event source.
///
/// `at` is the monotonic instant the event was observed; the recorder turns
/// it into seconds elapsed since the session started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPointerEvent {
    /// The cursor moved to an absolute screen position.
    Move { x: i32, y: i32, at: Instant },
    /// A button changed state at an absolute screen position.
    Button {
        button: PointerButton,
        pressed: bool,
        x: i32,
        y: i32,
        at: Instant,
    },
}

impl RawPointerEvent {
    pub fn at(&self) -> Instant {
        match self {
            RawPointerEvent::Move { at, .. } | RawPointerEvent::Button { at, .. } => *at,
        }
    }
}

/// Error type for pointer capture.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to install pointer hook: {0}")]
    HookInstallFailed(String),
    #[error("capture source is already running")]
    AlreadyStarted,
}

/// Abstracts the global pointer listener.
pub trait PointerEventSource: Send + Sync {
    /// Starts listening and returns a receiver for captured events.
    ///
    /// The receiver disconnects once [`PointerEventSource::stop`] is called.
    fn start(&self) -> Result<mpsc::Receiver<RawPointerEvent>, CaptureError>;
    /// Stops listening and releases all OS resources.
    fn stop(&self);
}
