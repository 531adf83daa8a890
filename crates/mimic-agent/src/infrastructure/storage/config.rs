//! TOML-based configuration for the agent.
//!
//! Reads `AgentConfig` from an explicit path or from the platform config file:
//! - Windows:  `%APPDATA%\Mimic\config.toml`
//! - Linux:    `~/.config/mimic/config.toml`
//! - macOS:    `~/Library/Application Support/Mimic/config.toml`
//!
//! Example:
//!
//! ```toml
//! [timing]
//! phases = 2
//!
//! [automation]
//! process_label = "target-app"
//!
//! [[scripts]]
//! name = "two-phase"
//! [[scripts.targets]]
//! name = "first"
//! template = "first.png"
//! region = { x = 0, y = 0, width = 1920, height = 1080 }
//! ```
//!
//! Every field has a serde default, so a missing file or a partial file both
//! load.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mimic_core::timing::DEFAULT_MIN_SAMPLES;
use mimic_core::FitOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::automation::{AutomationSettings, Target};
use crate::application::controller::ScriptDefinition;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    #[serde(default)]
    pub agent: AgentSection,
    #[serde(default)]
    pub recording: RecordingConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub automation: AutomationConfig,
    #[serde(default)]
    pub scripts: Vec<ScriptConfig>,
}

/// General agent settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSection {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Recorder settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordingConfig {
    /// Default live recording file.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

/// Model fitting and sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Number of alternating interval phases.
    #[serde(default = "default_phases")]
    pub phases: usize,
    /// Lower clamp for sampled durations, in seconds.
    #[serde(default)]
    pub floor_seconds: f64,
}

/// State machine tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutomationConfig {
    #[serde(default = "default_max_locate_attempts")]
    pub max_locate_attempts: u32,
    /// Upper bound of the jitter slept after a failed locate.
    #[serde(default = "default_locate_jitter_ms")]
    pub locate_jitter_ms: u64,
    /// Focus poll interval while paused.
    #[serde(default = "default_focus_poll_ms")]
    pub focus_poll_ms: u64,
    /// Identifies the target application to the focus gate.
    #[serde(default = "default_process_label")]
    pub process_label: String,
}

/// One configured script: a named, ordered list of targets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptConfig {
    pub name: String,
    #[serde(default)]
    pub targets: Vec<Target>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_output_path() -> PathBuf {
    PathBuf::from("mouse-recording.csv")
}
fn default_min_samples() -> usize {
    DEFAULT_MIN_SAMPLES
}
fn default_phases() -> usize {
    2
}
fn default_max_locate_attempts() -> u32 {
    5
}
fn default_locate_jitter_ms() -> u64 {
    1_000
}
fn default_focus_poll_ms() -> u64 {
    5_000
}
fn default_process_label() -> String {
    "target-app".to_string()
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_samples: default_min_samples(),
            phases: default_phases(),
            floor_seconds: 0.0,
        }
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            max_locate_attempts: default_max_locate_attempts(),
            locate_jitter_ms: default_locate_jitter_ms(),
            focus_poll_ms: default_focus_poll_ms(),
            process_label: default_process_label(),
        }
    }
}

// ── Conversions into application types ────────────────────────────────────────

impl TimingConfig {
    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            min_samples: self.min_samples,
            phases: self.phases,
        }
    }
}

impl AgentConfig {
    pub fn automation_settings(&self) -> AutomationSettings {
        AutomationSettings {
            max_locate_attempts: self.automation.max_locate_attempts,
            locate_jitter: Duration::from_millis(self.automation.locate_jitter_ms),
            focus_poll_interval: Duration::from_millis(self.automation.focus_poll_ms),
            process_label: self.automation.process_label.clone(),
            floor_seconds: self.timing.floor_seconds,
        }
    }

    pub fn script_definitions(&self) -> Vec<ScriptDefinition> {
        self.scripts
            .iter()
            .map(|s| ScriptDefinition::Automation {
                name: s.name.clone(),
                targets: s.targets.clone(),
            })
            .collect()
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the platform config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(platform_config_dir()
        .ok_or(ConfigError::NoPlatformConfigDir)?
        .join("config.toml"))
}

/// Loads the config from `path`, or from the platform config file when
/// `path` is `None`.
///
/// A missing file yields `AgentConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AgentConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            Ok(AgentConfig::default())
        }
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Persists `config` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &AgentConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config base directory including the `Mimic`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Mimic"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("mimic"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Mimic")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
