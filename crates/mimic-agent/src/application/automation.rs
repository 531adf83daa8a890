//! AutomationScript: the perception-gated click state machine.
//!
//! The script cycles over an ordered list of visual targets.  For each
//! target it runs three states:
//!
//! ```text
//! LocatingTarget(i) ──found──▶ Acting(i) ──click──▶ Idling(i) ──sleep──▶ LocatingTarget(i+1 mod n)
//!        │  ▲
//!        └──┘ not found after max attempts (retried on the next tick)
//! ```
//!
//! Before every transition the script checks two gates:
//!
//! - the shared [`RunState`] flag; once it is cleared the next state is
//!   `Stopped` no matter what was running, and no further side effects occur;
//! - the foreground focus of the target application; while it is lost the
//!   script sits in `Paused(LostFocus)`, polling on a fixed interval, and
//!   then resumes the state it held before pausing.  Cached regions are
//!   dropped on resume, and a pending click goes back to locating first.
//!
//! Cancellation is checked between units of work.  A single locate attempt,
//! jitter sleep, hold, or idle sleep is never interrupted, so stop latency is
//! bounded by the longest of those rather than being instantaneous.
//!
//! Perception misses are recoverable and never escape [`AutomationScript::run`].
//! Only [`AutomationError::InvalidState`] and injection failures do.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use mimic_core::{Region, TimingModel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::actuate::{ActuationError, Actuator, PointerActuator};
use super::controller::RunState;
use super::pacing::Sleeper;

/// Default number of locate calls per tick before giving up until the next tick.
pub const DEFAULT_MAX_LOCATE_ATTEMPTS: u32 = 5;
/// Default upper bound of the uniform jitter slept after a failed locate.
pub const DEFAULT_LOCATE_JITTER: Duration = Duration::from_secs(1);
/// Default interval between focus checks while paused.
pub const DEFAULT_FOCUS_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Error reported by a perception gate implementation.
#[derive(Debug, Error)]
pub enum PerceptionError {
    #[error("screen capture failed: {0}")]
    Capture(String),
}

/// External perception service: template search, focus, and cursor queries.
///
/// Every call may block and `locate` is expensive (hundreds of
/// milliseconds).  Implementations must tolerate repeated calls.
pub trait PerceptionGate: Send + Sync {
    /// Searches `search_region` for `template` at `confidence` or better.
    ///
    /// Returns the bounds of the match, or `None` if nothing matched.
    fn locate(
        &self,
        template: &str,
        search_region: &Region,
        confidence: f64,
    ) -> Result<Option<Region>, PerceptionError>;

    /// Returns `true` if the application identified by `process_label` has
    /// input focus.
    fn is_foreground_focused(&self, process_label: &str) -> bool;

    /// Current cursor position in screen coordinates.
    fn cursor_position(&self) -> (i32, i32);
}

/// One named visual target in the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    /// Opaque template handle understood by the perception gate.
    pub template: String,
    /// Minimum match confidence in `[0, 1]`.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Where to search for the template.
    pub region: Region,
}

fn default_confidence() -> f64 {
    0.8
}

/// Tunables for one script run.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationSettings {
    pub max_locate_attempts: u32,
    pub locate_jitter: Duration,
    pub focus_poll_interval: Duration,
    /// Identifies the target application to the focus gate.
    pub process_label: String,
    /// Lower clamp for sampled hold and idle durations, in seconds.
    pub floor_seconds: f64,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            max_locate_attempts: DEFAULT_MAX_LOCATE_ATTEMPTS,
            locate_jitter: DEFAULT_LOCATE_JITTER,
            focus_poll_interval: DEFAULT_FOCUS_POLL_INTERVAL,
            process_label: String::new(),
            floor_seconds: 0.0,
        }
    }
}

/// Why the script is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    LostFocus,
}

/// State of the automation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationState {
    LocatingTarget(usize),
    Acting(usize),
    Idling(usize),
    Paused(PauseReason),
    Stopped,
}

impl fmt::Display for AutomationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomationState::LocatingTarget(i) => write!(f, "locating target {i}"),
            AutomationState::Acting(i) => write!(f, "acting on target {i}"),
            AutomationState::Idling(i) => write!(f, "idling after target {i}"),
            AutomationState::Paused(PauseReason::LostFocus) => f.write_str("paused (lost focus)"),
            AutomationState::Stopped => f.write_str("stopped"),
        }
    }
}

/// Errors that terminate a run.
#[derive(Debug, Error)]
pub enum AutomationError {
    /// An internal invariant of the state machine was violated.
    #[error("invalid automation state: {0}")]
    InvalidState(String),

    /// A script needs at least one target.
    #[error("script {0:?} has no targets")]
    NoTargets(String),

    /// The pointer injection primitive failed.
    #[error("actuation failed: {0}")]
    Actuation(#[from] ActuationError),
}

/// External collaborators shared by every script run.
#[derive(Clone)]
pub struct AutomationDeps {
    pub model: Arc<TimingModel>,
    pub gate: Arc<dyn PerceptionGate>,
    pub primitive: Arc<dyn PointerActuator>,
    pub sleeper: Arc<dyn Sleeper>,
}

/// The automation state machine for one run.
pub struct AutomationScript {
    name: String,
    targets: Vec<Target>,
    settings: AutomationSettings,
    model: Arc<TimingModel>,
    gate: Arc<dyn PerceptionGate>,
    actuator: Actuator,
    sleeper: Arc<dyn Sleeper>,
    run_state: Arc<RunState>,
    rng: StdRng,
    cache: Vec<Option<Region>>,
    state: AutomationState,
    resume_to: Option<AutomationState>,
}

impl AutomationScript {
    /// Creates a script in the initial `LocatingTarget(0)` state.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::NoTargets`] if `targets` is empty.
    pub fn new(
        name: impl Into<String>,
        targets: Vec<Target>,
        settings: AutomationSettings,
        deps: AutomationDeps,
        run_state: Arc<RunState>,
    ) -> Result<Self, AutomationError> {
        let name = name.into();
        if targets.is_empty() {
            return Err(AutomationError::NoTargets(name));
        }
        let actuator = Actuator::new(
            deps.primitive,
            Arc::clone(&deps.model),
            Arc::clone(&deps.sleeper),
            settings.floor_seconds,
        );
        Ok(Self {
            name,
            cache: vec![None; targets.len()],
            targets,
            settings,
            model: deps.model,
            gate: deps.gate,
            actuator,
            sleeper: deps.sleeper,
            run_state,
            rng: StdRng::from_entropy(),
            state: AutomationState::LocatingTarget(0),
            resume_to: None,
        })
    }

    /// Replaces the entropy-seeded random source with a seeded one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> AutomationState {
        self.state
    }

    /// The cached bounds of target `index`, if it has been located.
    pub fn cached_region(&self, index: usize) -> Option<Region> {
        self.cache.get(index).copied().flatten()
    }

    /// Runs the state machine until it reaches `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::InvalidState`] or
    /// [`AutomationError::Actuation`]; the script is `Stopped` afterwards.
    pub fn run(&mut self) -> Result<(), AutomationError> {
        info!(script = %self.name, targets = self.targets.len(), "automation started");
        loop {
            match self.step() {
                Ok(AutomationState::Stopped) => break,
                Ok(_) => {}
                Err(e) => {
                    error!(script = %self.name, "automation terminated: {e}");
                    self.state = AutomationState::Stopped;
                    return Err(e);
                }
            }
        }
        info!(
            script = %self.name,
            actions = self.run_state.action_count(),
            "automation stopped"
        );
        Ok(())
    }

    /// Executes one unit of work and moves to the next state.
    ///
    /// # Errors
    ///
    /// See [`AutomationScript::run`].
    pub fn step(&mut self) -> Result<AutomationState, AutomationError> {
        let next = self.transition()?;
        if next != self.state {
            debug!(from = %self.state, to = %next, "transition");
        }
        self.state = next;
        Ok(next)
    }

    fn transition(&mut self) -> Result<AutomationState, AutomationError> {
        if self.state == AutomationState::Stopped {
            return Ok(AutomationState::Stopped);
        }
        if !self.run_state.is_running() {
            info!(script = %self.name, "cancellation observed");
            return Ok(AutomationState::Stopped);
        }

        match self.state {
            AutomationState::Paused(reason) => self.poll_focus(reason),
            active => {
                if !self.gate.is_foreground_focused(&self.settings.process_label) {
                    warn!(
                        process = %self.settings.process_label,
                        "target application lost focus; pausing"
                    );
                    self.resume_to = Some(active);
                    return Ok(AutomationState::Paused(PauseReason::LostFocus));
                }
                self.advance(active)
            }
        }
    }

    fn poll_focus(&mut self, reason: PauseReason) -> Result<AutomationState, AutomationError> {
        if !self.gate.is_foreground_focused(&self.settings.process_label) {
            self.sleeper.sleep(self.settings.focus_poll_interval);
            return Ok(AutomationState::Paused(reason));
        }

        let resume = self.resume_to.take().ok_or_else(|| {
            AutomationError::InvalidState("paused without a state to resume".to_string())
        })?;
        // The window may have moved while it was in the background.
        self.cache.iter_mut().for_each(|slot| *slot = None);
        // A pending click needs a fresh locate; the cursor may have moved.
        let resume = match resume {
            AutomationState::Acting(i) => AutomationState::LocatingTarget(i),
            other => other,
        };
        info!(resume = %resume, "focus regained; resuming");
        Ok(resume)
    }

    fn advance(&mut self, state: AutomationState) -> Result<AutomationState, AutomationError> {
        match state {
            AutomationState::LocatingTarget(i) => {
                self.check_index(i)?;
                self.locate(i)
            }
            AutomationState::Acting(i) => {
                self.check_index(i)?;
                self.actuator.click(&mut self.rng)?;
                let count = self.run_state.record_action();
                debug!(target_name = %self.targets[i].name, actions = count, "clicked");
                Ok(AutomationState::Idling(i))
            }
            AutomationState::Idling(i) => {
                self.check_index(i)?;
                let idle = self
                    .model
                    .sample_interval(i, self.settings.floor_seconds, &mut self.rng);
                self.sleeper.sleep(idle);
                Ok(AutomationState::LocatingTarget((i + 1) % self.targets.len()))
            }
            other => Err(AutomationError::InvalidState(format!(
                "cannot advance from {other}"
            ))),
        }
    }

    fn locate(&mut self, i: usize) -> Result<AutomationState, AutomationError> {
        let region = match self.cache[i] {
            Some(region) => region,
            None => match self.search(i) {
                Some(region) => {
                    self.cache[i] = Some(region);
                    region
                }
                None => return Ok(AutomationState::LocatingTarget(i)),
            },
        };

        let (x, y) = self.gate.cursor_position();
        if !region.contains(x, y) {
            self.actuator.move_into(&region, &mut self.rng)?;
        }
        Ok(AutomationState::Acting(i))
    }

    /// Calls the gate up to the attempt cap, sleeping a uniform jitter in
    /// `[0, locate_jitter)` after each miss.
    fn search(&mut self, i: usize) -> Option<Region> {
        let target = &self.targets[i];
        let attempts = self.settings.max_locate_attempts.max(1);

        for attempt in 1..=attempts {
            match self
                .gate
                .locate(&target.template, &target.region, target.confidence)
            {
                Ok(Some(found)) => {
                    debug!(target_name = %target.name, attempt, ?found, "target located");
                    return Some(found);
                }
                Ok(None) => debug!(target_name = %target.name, attempt, "target not found"),
                Err(e) => warn!(target_name = %target.name, attempt, "perception error: {e}"),
            }

            let jitter = self.settings.locate_jitter.mul_f64(self.rng.gen::<f64>());
            self.sleeper.sleep(jitter);
            if !self.run_state.is_running() {
                return None;
            }
        }

        warn!(
            target_name = %target.name,
            attempts,
            "perception timeout; retrying on next tick"
        );
        None
    }

    fn check_index(&self, i: usize) -> Result<(), AutomationError> {
        if i < self.targets.len() {
            Ok(())
        } else {
            Err(AutomationError::InvalidState(format!(
                "target index {i} out of range for {} targets",
                self.targets.len()
            )))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::mock::MockSleeper;
    use crate::infrastructure::input_emulation::mock::MockPointerActuator;
    use crate::infrastructure::perception::mock::ScriptedPerceptionGate;
    use mimic_core::DistributionParams;

    const FIRST: Region = Region {
        x: 100,
        y: 100,
        width: 40,
        height: 20,
    };
    const SECOND: Region = Region {
        x: 600,
        y: 300,
        width: 40,
        height: 20,
    };

    struct Harness {
        gate: Arc<ScriptedPerceptionGate>,
        actuator: Arc<MockPointerActuator>,
        sleeper: Arc<MockSleeper>,
        run_state: Arc<RunState>,
        script: AutomationScript,
    }

    /// Phase 0 idles for about one second, phase 1 for about two.
    fn model() -> Arc<TimingModel> {
        let press = DistributionParams::new(4.0, 0.05, 0.01).unwrap();
        let phase0 = DistributionParams::new(2.0, 1.0, 0.001).unwrap();
        let phase1 = DistributionParams::new(2.0, 2.0, 0.001).unwrap();
        Arc::new(TimingModel::new(press, vec![phase0, phase1]).unwrap())
    }

    fn targets() -> Vec<Target> {
        vec![
            Target {
                name: "first".to_string(),
                template: "first.png".to_string(),
                region: Region::new(0, 0, 1920, 1080),
                confidence: 0.8,
            },
            Target {
                name: "second".to_string(),
                template: "second.png".to_string(),
                region: Region::new(0, 0, 1920, 1080),
                confidence: 0.8,
            },
        ]
    }

    fn harness(gate: ScriptedPerceptionGate) -> Harness {
        let gate = Arc::new(gate);
        let actuator = Arc::new(MockPointerActuator::new());
        let sleeper = Arc::new(MockSleeper::new());
        let run_state = Arc::new(RunState::new());
        run_state.set_running(true);
        let deps = AutomationDeps {
            model: model(),
            gate: Arc::clone(&gate) as Arc<dyn PerceptionGate>,
            primitive: Arc::clone(&actuator) as Arc<dyn PointerActuator>,
            sleeper: Arc::clone(&sleeper) as Arc<dyn Sleeper>,
        };
        let settings = AutomationSettings {
            process_label: "target-app".to_string(),
            ..Default::default()
        };
        let script =
            AutomationScript::new("test", targets(), settings, deps, Arc::clone(&run_state))
                .unwrap()
                .with_seed(7);
        Harness {
            gate,
            actuator,
            sleeper,
            run_state,
            script,
        }
    }

    #[test]
    fn test_new_rejects_empty_target_list() {
        let h = harness(ScriptedPerceptionGate::always_found(FIRST));
        let deps = AutomationDeps {
            model: model(),
            gate: h.gate,
            primitive: h.actuator,
            sleeper: h.sleeper,
        };
        let result = AutomationScript::new(
            "empty",
            Vec::new(),
            AutomationSettings::default(),
            deps,
            h.run_state,
        );
        assert!(matches!(result, Err(AutomationError::NoTargets(name)) if name == "empty"));
    }

    #[test]
    fn test_initial_state_is_locating_first_target() {
        let h = harness(ScriptedPerceptionGate::always_found(FIRST));
        assert_eq!(h.script.state(), AutomationState::LocatingTarget(0));
    }

    #[test]
    fn test_five_misses_stay_in_locating_without_clicking() {
        // Arrange
        let mut h = harness(ScriptedPerceptionGate::never_found());

        // Act
        let next = h.script.step().unwrap();

        // Assert
        assert_eq!(next, AutomationState::LocatingTarget(0));
        assert_eq!(h.gate.locate_calls(), 5);
        assert_eq!(h.actuator.click_count(), 0);
        let sleeps = h.sleeper.slept();
        assert_eq!(sleeps.len(), 5);
        assert!(sleeps.iter().all(|d| *d < Duration::from_secs(1)));
    }

    #[test]
    fn test_locating_retries_on_the_next_tick() {
        let mut h = harness(ScriptedPerceptionGate::never_found());

        h.script.step().unwrap();
        h.script.step().unwrap();

        assert_eq!(h.gate.locate_calls(), 10);
        assert_eq!(h.script.state(), AutomationState::LocatingTarget(0));
    }

    #[test]
    fn test_success_on_third_attempt_acts_with_that_region() {
        // Arrange
        let gate = ScriptedPerceptionGate::always_found(SECOND);
        gate.push_locate(None);
        gate.push_locate(None);
        gate.push_locate(Some(FIRST));
        let mut h = harness(gate);
        h.gate.set_cursor(110, 105);

        // Act
        let next = h.script.step().unwrap();

        // Assert
        assert_eq!(next, AutomationState::Acting(0));
        assert_eq!(h.gate.locate_calls(), 3);
        assert_eq!(h.script.cached_region(0), Some(FIRST));
        assert_eq!(h.sleeper.slept().len(), 2);
        assert!(h.actuator.moves.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cursor_outside_region_is_moved_inside() {
        let mut h = harness(ScriptedPerceptionGate::always_found(FIRST));
        h.gate.set_cursor(0, 0);

        h.script.step().unwrap();

        let moves = h.actuator.moves.lock().unwrap();
        assert_eq!(moves.len(), 1);
        assert!(FIRST.contains(moves[0].0, moves[0].1));
    }

    #[test]
    fn test_full_cycle_alternates_targets_and_phases() {
        // Arrange
        let mut h = harness(ScriptedPerceptionGate::always_found(FIRST));
        h.gate.set_cursor(110, 105);

        // Act
        let states: Vec<AutomationState> = (0..6).map(|_| h.script.step().unwrap()).collect();

        // Assert
        assert_eq!(
            states,
            vec![
                AutomationState::Acting(0),
                AutomationState::Idling(0),
                AutomationState::LocatingTarget(1),
                AutomationState::Acting(1),
                AutomationState::Idling(1),
                AutomationState::LocatingTarget(0),
            ]
        );
        assert_eq!(h.actuator.click_count(), 2);
        assert_eq!(h.run_state.action_count(), 2);

        // Hold, idle (phase 0), hold, idle (phase 1).
        let sleeps = h.sleeper.slept();
        assert_eq!(sleeps.len(), 4);
        assert!(sleeps[1] >= Duration::from_secs(1) && sleeps[1] < Duration::from_millis(1100));
        assert!(sleeps[3] >= Duration::from_secs(2) && sleeps[3] < Duration::from_millis(2100));
    }

    #[test]
    fn test_cached_region_skips_search() {
        let mut h = harness(ScriptedPerceptionGate::always_found(FIRST));
        h.gate.set_cursor(110, 105);

        for _ in 0..12 {
            h.script.step().unwrap();
        }

        // Two targets, each searched exactly once.
        assert_eq!(h.gate.locate_calls(), 2);
        assert_eq!(h.actuator.click_count(), 4);
    }

    #[test]
    fn test_lost_focus_pauses_and_resumes_previous_state() {
        // Arrange
        let mut h = harness(ScriptedPerceptionGate::always_found(FIRST));
        h.gate.set_cursor(110, 105);
        assert_eq!(h.script.step().unwrap(), AutomationState::Acting(0));
        h.gate.set_focused(false);

        // Act / Assert: pause within one tick, no click.
        assert_eq!(
            h.script.step().unwrap(),
            AutomationState::Paused(PauseReason::LostFocus)
        );
        assert_eq!(h.actuator.click_count(), 0);

        // Still unfocused: poll on the fixed backoff.
        assert_eq!(
            h.script.step().unwrap(),
            AutomationState::Paused(PauseReason::LostFocus)
        );
        assert_eq!(h.sleeper.slept().last(), Some(&DEFAULT_FOCUS_POLL_INTERVAL));

        // Focus returns: drop cached regions and locate again before clicking.
        h.gate.set_focused(true);
        assert_eq!(h.script.step().unwrap(), AutomationState::LocatingTarget(0));
        assert_eq!(h.script.cached_region(0), None);
        assert_eq!(h.script.step().unwrap(), AutomationState::Acting(0));
        assert_eq!(h.script.step().unwrap(), AutomationState::Idling(0));
        assert_eq!(h.actuator.click_count(), 1);
        assert_eq!(h.gate.locate_calls(), 2);
    }

    #[test]
    fn test_cursor_moved_while_paused_is_brought_back_before_clicking() {
        // Arrange: ready to click with the cursor inside the target.
        let mut h = harness(ScriptedPerceptionGate::always_found(FIRST));
        h.gate.set_cursor(110, 105);
        assert_eq!(h.script.step().unwrap(), AutomationState::Acting(0));
        h.gate.set_focused(false);
        h.script.step().unwrap();

        // Act: the user moves the pointer away, then focus returns.
        h.gate.set_cursor(1500, 900);
        h.gate.set_focused(true);
        h.script.step().unwrap();
        h.script.step().unwrap();
        h.script.step().unwrap();

        // Assert: the pointer was moved back inside before the only click.
        assert_eq!(h.actuator.click_count(), 1);
        let moves = h.actuator.moves.lock().unwrap();
        assert_eq!(moves.len(), 1);
        assert!(FIRST.contains(moves[0].0, moves[0].1));
    }

    #[test]
    fn test_cancellation_stops_from_any_state_without_side_effects() {
        // Arrange
        let mut h = harness(ScriptedPerceptionGate::always_found(FIRST));
        h.gate.set_cursor(110, 105);
        h.script.step().unwrap();
        let sleeps_before = h.sleeper.slept().len();

        // Act
        h.run_state.set_running(false);
        let first = h.script.step().unwrap();
        let second = h.script.step().unwrap();

        // Assert
        assert_eq!(first, AutomationState::Stopped);
        assert_eq!(second, AutomationState::Stopped);
        assert_eq!(h.actuator.click_count(), 0);
        assert_eq!(h.sleeper.slept().len(), sleeps_before);
    }

    #[test]
    fn test_cancellation_while_paused_stops() {
        let mut h = harness(ScriptedPerceptionGate::always_found(FIRST));
        h.gate.set_focused(false);
        h.script.step().unwrap();

        h.run_state.set_running(false);

        assert_eq!(h.script.step().unwrap(), AutomationState::Stopped);
    }

    #[test]
    fn test_run_returns_once_cancelled() {
        let mut h = harness(ScriptedPerceptionGate::never_found());
        h.run_state.set_running(false);

        h.script.run().unwrap();

        assert_eq!(h.script.state(), AutomationState::Stopped);
        assert_eq!(h.gate.locate_calls(), 0);
    }

    #[test]
    fn test_out_of_range_target_is_invalid_state() {
        let mut h = harness(ScriptedPerceptionGate::always_found(FIRST));
        h.script.state = AutomationState::Idling(9);

        let result = h.script.run();

        assert!(matches!(result, Err(AutomationError::InvalidState(_))));
        assert_eq!(h.script.state(), AutomationState::Stopped);
    }

    #[test]
    fn test_pause_without_resume_state_is_invalid_state() {
        let mut h = harness(ScriptedPerceptionGate::always_found(FIRST));
        h.script.state = AutomationState::Paused(PauseReason::LostFocus);

        assert!(matches!(
            h.script.step(),
            Err(AutomationError::InvalidState(_))
        ));
    }

    #[test]
    fn test_actuation_failure_terminates_run() {
        let gate = Arc::new(ScriptedPerceptionGate::always_found(FIRST));
        gate.set_cursor(110, 105);
        let run_state = Arc::new(RunState::new());
        run_state.set_running(true);
        let deps = AutomationDeps {
            model: model(),
            gate: gate as Arc<dyn PerceptionGate>,
            primitive: Arc::new(MockPointerActuator::failing()),
            sleeper: Arc::new(MockSleeper::new()),
        };
        let mut script = AutomationScript::new(
            "failing",
            targets(),
            AutomationSettings::default(),
            deps,
            Arc::clone(&run_state),
        )
        .unwrap();

        let result = script.run();

        assert!(matches!(result, Err(AutomationError::Actuation(_))));
        assert_eq!(run_state.action_count(), 0);
    }

    #[test]
    fn test_perception_errors_count_as_misses() {
        let gate = ScriptedPerceptionGate::always_found(FIRST);
        gate.push_error("capture device busy");
        let mut h = harness(gate);
        h.gate.set_cursor(110, 105);

        assert_eq!(h.script.step().unwrap(), AutomationState::Acting(0));
        assert_eq!(h.gate.locate_calls(), 2);
    }
}
