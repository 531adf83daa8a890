//! Mock pointer source for unit testing.
//!
//! Allows tests to inject synthetic [`RawPointerEvent`]s without a desktop
//! session or OS hooks.

use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::time::Instant;

use mimic_core::PointerButton;

use super::{CaptureError, PointerEventSource, RawPointerEvent};

/// A mock implementation of [`PointerEventSource`] that allows tests to
/// inject events.
#[derive(Debug, Clone, Default)]
pub struct MockPointerSource {
    sender: Arc<Mutex<Option<Sender<RawPointerEvent>>>>,
}

impl MockPointerSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects a synthetic event, as if captured from hardware.
    ///
    /// Returns `false` if the source is not started or the receiver is gone.
    pub fn inject_event(&self, event: RawPointerEvent) -> bool {
        match self.sender.lock() {
            Ok(guard) => guard
                .as_ref()
                .map(|sender| sender.send(event).is_ok())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Injects a press or release of `button` observed at `at`.
    pub fn inject_button(
        &self,
        button: PointerButton,
        pressed: bool,
        x: i32,
        y: i32,
        at: Instant,
    ) -> bool {
        self.inject_event(RawPointerEvent::Button {
            button,
            pressed,
            x,
            y,
            at,
        })
    }

    /// Returns `true` between `start()` and `stop()`.
    pub fn is_started(&self) -> bool {
        self.sender.lock().map(|g| g.is_some()).unwrap_or(false)
    }
}

impl PointerEventSource for MockPointerSource {
    fn start(&self) -> Result<mpsc::Receiver<RawPointerEvent>, CaptureError> {
        let mut guard = self
            .sender
            .lock()
            .map_err(|_| CaptureError::HookInstallFailed("sender lock poisoned".into()))?;
        if guard.is_some() {
            return Err(CaptureError::AlreadyStarted);
        }
        let (tx, rx) = mpsc::channel();
        *guard = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Dropping the sender closes the channel.
        if let Ok(mut guard) = self.sender.lock() {
            *guard = None;
        }
    }
}
