//! Mimic agent: entry point.
//!
//! # Usage
//!
//! ```text
//! mimic-agent [--config <PATH>] <COMMAND>
//!
//! Commands:
//!   record   [--output <CSV>]                         Record pointer events until Ctrl-C
//!   analyze  <CSV> [--save-model <JSON>] [--json]     Summarise a recording and fit its model
//!   run      <SCRIPT> (--recording <CSV> | --model <JSON>)
//!                                                     Run a configured script until Ctrl-C
//!   init-config [--force]                             Write the default configuration file
//! ```
//!
//! The binary wires the in-memory adapters for the external primitives (event
//! source, pointer injection, perception gate), so `record` captures nothing
//! and `run` is a dry run that logs what it would click.  Platform adapters
//! plug in through the same traits.

use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mimic_agent::application::analyze::{analyze_recording, TimingReport};
use mimic_agent::application::automation::AutomationDeps;
use mimic_agent::application::controller::Controller;
use mimic_agent::application::record_session::Recorder;
use mimic_agent::infrastructure::clock::ThreadSleeper;
use mimic_agent::infrastructure::input_capture::mock::MockPointerSource;
use mimic_agent::infrastructure::input_emulation::mock::MockPointerActuator;
use mimic_agent::infrastructure::perception::mock::ScriptedPerceptionGate;
use mimic_agent::infrastructure::storage::config::{
    config_file_path, load_config, save_config, AgentConfig,
};
use mimic_agent::infrastructure::storage::model_store::{load_model, save_model};
use mimic_agent::infrastructure::ui_bridge::{get_status, start_script, stop_script, AgentState};
use mimic_core::recording::csv_format::load_log;
use mimic_core::TimingModel;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Records pointer sessions, fits timing models, and replays clicks.
#[derive(Debug, Parser)]
#[command(name = "mimic-agent", version)]
struct Cli {
    /// Configuration file; defaults to the platform config directory.
    #[arg(long, global = true, env = "MIMIC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record pointer events until Ctrl-C.
    Record {
        /// Live recording file; defaults to `recording.output_path`.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Summarise a recording and fit its timing model.
    Analyze {
        recording: PathBuf,

        /// Write the fitted model as JSON.
        #[arg(long)]
        save_model: Option<PathBuf>,

        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run a configured script until Ctrl-C.
    Run {
        script: String,

        /// Fit the timing model from this recording.
        #[arg(long, conflicts_with = "model", required_unless_present = "model")]
        recording: Option<PathBuf>,

        /// Load a previously saved timing model.
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Write the default configuration to the config file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.agent.log_level)),
        )
        .init();

    match cli.command {
        Command::Record { output } => record(&config, output).await,
        Command::Analyze {
            recording,
            save_model,
            json,
        } => analyze(&config, &recording, save_model.as_deref(), json),
        Command::Run {
            script,
            recording,
            model,
        } => run(&config, script, recording, model).await,
        Command::InitConfig { force } => init_config(cli.config, force),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn record(config: &AgentConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| config.recording.output_path.clone());

    // A platform pointer listener replaces the mock source here.
    let mut recorder = Recorder::new(Arc::new(MockPointerSource::new()));
    recorder
        .start(Some(&output))
        .with_context(|| format!("failed to start recording to {}", output.display()))?;
    info!(output = %output.display(), "recording; press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    let log = tokio::task::spawn_blocking(move || recorder.stop())
        .await
        .context("recorder task failed")??;
    println!(
        "recorded {} events over {:.3}s to {}",
        log.len(),
        log.duration_seconds(),
        output.display()
    );
    Ok(())
}

fn analyze(
    config: &AgentConfig,
    recording: &Path,
    model_path: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let report = analyze_recording(recording, &config.timing.fit_options())
        .with_context(|| format!("failed to analyze {}", recording.display()))?;

    if let Some(path) = model_path {
        save_model(path, &report.model)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &TimingReport) {
    println!("session        {}", report.session);
    println!("events         {}", report.events);
    println!("left clicks    {}", report.left_clicks);
    println!("duration       {:.3}s", report.duration_seconds);

    if let Some(s) = &report.press_durations {
        println!(
            "press          n={} mean={:.4}s sd={:.4}s range=[{:.4}, {:.4}]",
            s.count, s.mean, s.std_dev, s.min, s.max
        );
    }
    let press = report.model.press_duration();
    println!(
        "  fitted       shape={:.4} location={:.4} scale={:.4}",
        press.shape(),
        press.location(),
        press.scale()
    );

    for (phase, (summary, params)) in report
        .interval_phases
        .iter()
        .zip(report.model.interval_phases())
        .enumerate()
    {
        if let Some(s) = summary {
            println!(
                "interval {phase}     n={} mean={:.4}s sd={:.4}s range=[{:.4}, {:.4}]",
                s.count, s.mean, s.std_dev, s.min, s.max
            );
        }
        println!(
            "  fitted       shape={:.4} location={:.4} scale={:.4}",
            params.shape(),
            params.location(),
            params.scale()
        );
    }
}

fn init_config(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path,
        None => config_file_path()?,
    };
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    save_config(&path, &AgentConfig::default())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("wrote default configuration to {}", path.display());
    Ok(())
}

async fn run(
    config: &AgentConfig,
    script: String,
    recording: Option<PathBuf>,
    model_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let model = match (recording, model_path) {
        (_, Some(path)) => load_model(&path)?,
        (Some(path), None) => {
            let log = load_log(&path)
                .with_context(|| format!("failed to load recording {}", path.display()))?;
            TimingModel::build(&log, &config.timing.fit_options())
                .context("failed to fit timing model")?
        }
        (None, None) => bail!("either --recording or --model is required"),
    };

    // Dry-run adapters; platform implementations replace these.
    let deps = AutomationDeps {
        model: Arc::new(model),
        gate: Arc::new(ScriptedPerceptionGate::finds_everywhere()),
        primitive: Arc::new(MockPointerActuator::new()),
        sleeper: Arc::new(ThreadSleeper),
    };
    let controller = Controller::new(
        config.script_definitions(),
        config.automation_settings(),
        deps,
    );
    let state = AgentState::new(
        Recorder::new(Arc::new(MockPointerSource::new())),
        controller,
        None,
    );

    let started = start_script(Arc::clone(&state), script.clone()).await;
    if !started.success {
        bail!(
            "failed to start {script}: {}",
            started.error.unwrap_or_default()
        );
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            interrupted_clone.store(true, Ordering::Relaxed);
        }
    });

    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    loop {
        ticker.tick().await;
        if interrupted.load(Ordering::Relaxed) {
            break;
        }
        let running = get_status(Arc::clone(&state))
            .await
            .data
            .is_some_and(|s| s.running);
        if !running {
            warn!(script = %script, "script ended on its own");
            break;
        }
    }

    let stopped = stop_script(Arc::clone(&state)).await;
    let actions = get_status(state)
        .await
        .data
        .map_or(0, |s| s.action_count);
    println!("{script}: {actions} actions");
    if !stopped.success {
        bail!(stopped.error.unwrap_or_default());
    }
    Ok(())
}
