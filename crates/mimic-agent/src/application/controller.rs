//! Controller: lifecycle of at most one running automation script.
//!
//! The script runs on a dedicated OS thread named `mimic-automation`, since
//! it does nothing but block on sleeps and perception calls.  The controller
//! and the worker share one [`RunState`]: the controller clears its flag to
//! request a stop, the worker checks it before every transition and clears it
//! itself on exit, however the exit happens.
//!
//! `stop` joins the worker, so once it returns no further clicks occur.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::automation::{
    AutomationDeps, AutomationError, AutomationScript, AutomationSettings, Target,
};

/// Shared between the controller and the worker.
#[derive(Debug, Default)]
pub struct RunState {
    running: AtomicBool,
    action_count: AtomicU64,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    /// Counts one completed click and returns the new total.
    pub fn record_action(&self) -> u64 {
        self.action_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn action_count(&self) -> u64 {
        self.action_count.load(Ordering::Relaxed)
    }
}

/// Clears the running flag when the worker exits, including by panic.
struct ClearOnExit(Arc<RunState>);

impl Drop for ClearOnExit {
    fn drop(&mut self) {
        self.0.set_running(false);
    }
}

/// Error type for controller operations.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("script {0:?} is already running")]
    AlreadyRunning(String),

    #[error("no script is running")]
    NotRunning,

    #[error("unknown script: {0}")]
    UnknownScript(String),

    #[error("automation worker panicked")]
    WorkerPanicked,

    #[error("failed to spawn automation worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("script failed: {0}")]
    ScriptFailed(#[from] AutomationError),
}

/// A script the controller knows how to build, by variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptDefinition {
    /// A perception-gated click cycle over `targets`.
    Automation { name: String, targets: Vec<Target> },
}

impl ScriptDefinition {
    pub fn name(&self) -> &str {
        match self {
            ScriptDefinition::Automation { name, .. } => name,
        }
    }

    fn build(
        &self,
        settings: &AutomationSettings,
        deps: &AutomationDeps,
        run_state: Arc<RunState>,
    ) -> Result<Script, AutomationError> {
        match self {
            ScriptDefinition::Automation { name, targets } => Ok(Script::Automation(
                AutomationScript::new(
                    name.clone(),
                    targets.clone(),
                    settings.clone(),
                    deps.clone(),
                    run_state,
                )?,
            )),
        }
    }
}

/// A runnable script instance, owned by the worker thread.
pub enum Script {
    Automation(AutomationScript),
}

impl Script {
    pub fn name(&self) -> &str {
        match self {
            Script::Automation(script) => script.name(),
        }
    }

    /// Runs until cancelled or failed.
    pub fn run(&mut self) -> Result<(), AutomationError> {
        match self {
            Script::Automation(script) => script.run(),
        }
    }
}

/// Snapshot returned by [`Controller::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerStatus {
    pub running: bool,
    /// Script of the current or most recent run.
    pub script: Option<String>,
    /// Clicks performed by the current or most recent run.
    pub actions: u64,
}

struct ActiveRun {
    name: String,
    run_state: Arc<RunState>,
    handle: JoinHandle<Result<(), AutomationError>>,
}

impl ActiveRun {
    fn join(self) -> Result<(), ControlError> {
        match self.handle.join() {
            Ok(result) => result.map_err(ControlError::from),
            Err(_) => Err(ControlError::WorkerPanicked),
        }
    }
}

/// Starts and stops automation scripts.
pub struct Controller {
    scripts: Vec<ScriptDefinition>,
    settings: AutomationSettings,
    deps: AutomationDeps,
    active: Option<ActiveRun>,
    last: Option<(String, Arc<RunState>)>,
}

impl Controller {
    pub fn new(
        scripts: Vec<ScriptDefinition>,
        settings: AutomationSettings,
        deps: AutomationDeps,
    ) -> Self {
        Self {
            scripts,
            settings,
            deps,
            active: None,
            last: None,
        }
    }

    /// Names of the scripts this controller can start.
    pub fn script_names(&self) -> Vec<&str> {
        self.scripts.iter().map(ScriptDefinition::name).collect()
    }

    /// `true` while a worker is running and has not been asked to stop.
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.run_state.is_running())
    }

    /// Starts the script called `name` on a new worker thread.
    ///
    /// A previous worker that already finished on its own is reaped first;
    /// its error, if any, is logged and discarded.
    ///
    /// # Errors
    ///
    /// - [`ControlError::AlreadyRunning`] if a script is running.
    /// - [`ControlError::UnknownScript`] if no script is called `name`.
    /// - [`ControlError::ScriptFailed`] if the script cannot be built.
    /// - [`ControlError::Spawn`] if the thread cannot be created.
    pub fn start(&mut self, name: &str) -> Result<(), ControlError> {
        if let Some(active) = &self.active {
            if active.run_state.is_running() {
                return Err(ControlError::AlreadyRunning(active.name.clone()));
            }
        }
        if let Some(finished) = self.active.take() {
            let previous = finished.name.clone();
            if let Err(e) = finished.join() {
                warn!(script = %previous, "previous run ended with error: {e}");
            }
        }

        let definition = self
            .scripts
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| ControlError::UnknownScript(name.to_string()))?;

        let run_state = Arc::new(RunState::new());
        let mut script = definition.build(&self.settings, &self.deps, Arc::clone(&run_state))?;
        let name = script.name().to_string();

        run_state.set_running(true);
        let guard = ClearOnExit(Arc::clone(&run_state));
        let handle = thread::Builder::new()
            .name("mimic-automation".to_string())
            .spawn(move || {
                let _guard = guard;
                script.run()
            })
            .map_err(|e| {
                run_state.set_running(false);
                ControlError::Spawn(e)
            })?;

        info!(script = %name, "automation worker started");
        self.last = Some((name.clone(), Arc::clone(&run_state)));
        self.active = Some(ActiveRun {
            name,
            run_state,
            handle,
        });
        Ok(())
    }

    /// Requests cancellation and waits for the worker to exit.
    ///
    /// Returns `true` if a running script was stopped, `false` if nothing was
    /// running.  Stop latency is bounded by the longest single unit of work.
    ///
    /// # Errors
    ///
    /// [`ControlError::ScriptFailed`] or [`ControlError::WorkerPanicked`] if
    /// the worker ended abnormally.
    pub fn stop(&mut self) -> Result<bool, ControlError> {
        let Some(active) = self.active.take() else {
            return Ok(false);
        };
        let was_running = active.run_state.is_running();
        active.run_state.set_running(false);
        let name = active.name.clone();
        let actions = active.run_state.action_count();
        active.join()?;
        info!(script = %name, actions, "automation worker stopped");
        Ok(was_running)
    }

    pub fn status(&self) -> ControllerStatus {
        match &self.last {
            Some((name, run_state)) => ControllerStatus {
                running: self.is_running(),
                script: Some(name.clone()),
                actions: run_state.action_count(),
            },
            None => ControllerStatus {
                running: false,
                script: None,
                actions: 0,
            },
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("automation worker ended with error during shutdown: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
