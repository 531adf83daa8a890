//! Command bridge: the control surface exposed to a front end.
//!
//! Every command delegates to the shared [`AgentState`] and returns a
//! [`CommandResult<T>`] instead of `Result<T, E>`, so every response has the
//! same JSON shape: `{ success: bool, data: T | null, error: string | null }`.
//!
//! Stopping a script or a recording joins a worker thread, so those commands
//! run on the blocking pool rather than on the async executor.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::application::controller::{ControlError, Controller};
use crate::application::record_session::Recorder;

// ── Shared agent state ────────────────────────────────────────────────────────

/// State shared between commands.
pub struct AgentState {
    pub recorder: Mutex<Recorder>,
    pub controller: Mutex<Controller>,
    /// Live recording file used by `start_recording`, if any.
    pub recording_output: Option<PathBuf>,
}

impl AgentState {
    pub fn new(
        recorder: Recorder,
        controller: Controller,
        recording_output: Option<PathBuf>,
    ) -> Arc<Self> {
        Arc::new(Self {
            recorder: Mutex::new(recorder),
            controller: Mutex::new(controller),
            recording_output,
        })
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// Summary of a finished recording.
#[derive(Debug, Clone, Serialize)]
pub struct RecordingDto {
    pub session_id: String,
    pub events: usize,
    pub duration_seconds: f64,
}

/// Snapshot of the agent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusDto {
    pub recording: bool,
    pub running: bool,
    pub script: Option<String>,
    pub action_count: u64,
}

/// Uniform response envelope for every command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Starts a recording session, writing to the configured output file.
pub async fn start_recording(state: Arc<AgentState>) -> CommandResult<()> {
    let mut recorder = state.recorder.lock().await;
    match recorder.start(state.recording_output.as_deref()) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Stops the recording session and summarises it.
pub async fn stop_recording(state: Arc<AgentState>) -> CommandResult<RecordingDto> {
    let stopped =
        tokio::task::spawn_blocking(move || state.recorder.blocking_lock().stop()).await;
    match stopped {
        Ok(Ok(log)) => CommandResult::ok(RecordingDto {
            session_id: log.session_id().to_string(),
            events: log.len(),
            duration_seconds: log.duration_seconds(),
        }),
        Ok(Err(e)) => CommandResult::err(e.to_string()),
        Err(e) => CommandResult::err(format!("stop task failed: {e}")),
    }
}

/// Starts the script called `name`.
pub async fn start_script(state: Arc<AgentState>, name: String) -> CommandResult<()> {
    let mut controller = state.controller.lock().await;
    match controller.start(&name) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Stops the running script and waits for its worker to exit.
pub async fn stop_script(state: Arc<AgentState>) -> CommandResult<()> {
    let stopped =
        tokio::task::spawn_blocking(move || state.controller.blocking_lock().stop()).await;
    match stopped {
        Ok(Ok(true)) => CommandResult::ok(()),
        Ok(Ok(false)) => CommandResult::err(ControlError::NotRunning.to_string()),
        Ok(Err(e)) => CommandResult::err(e.to_string()),
        Err(e) => CommandResult::err(format!("stop task failed: {e}")),
    }
}

/// Reports recording and automation flags plus the action count.
pub async fn get_status(state: Arc<AgentState>) -> CommandResult<StatusDto> {
    let recording = state.recorder.lock().await.is_recording();
    let status = state.controller.lock().await.status();
    CommandResult::ok(StatusDto {
        recording,
        running: status.running,
        script: status.script,
        action_count: status.actions,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
