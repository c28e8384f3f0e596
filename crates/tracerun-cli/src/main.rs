// crates/tracerun-cli/src/main.rs
// ============================================================================
// Module: Tracerun CLI Entry Point
// Description: Command-line front end for the differential-test harness.
// Purpose: Resolve configuration, drive a run, and map verdicts to exit codes.
// Dependencies: clap, serde, serde_json, thiserror, tracerun-core
// ============================================================================

//! ## Overview
//! The binary resolves harness configuration from flags and environment
//! variables, executes one full run through `tracerun-core`, streams progress
//! and failure diagnostics to stdout, and exits zero only when no true
//! failures exist. Fatal environment errors (version skew, unreachable
//! collector, unspawnable runtime) are reported on stderr with a non-zero
//! exit before or during the run.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::ArgAction;
use clap::Parser;
use serde::Serialize;
use thiserror::Error;
use tracerun_core::AgentContainer;
use tracerun_core::HarnessConfig;
use tracerun_core::RunObserver;
use tracerun_core::RunSummary;
use tracerun_core::TestResult;
use tracerun_core::runtime::collector::DEFAULT_BASE_URL;
use tracerun_core::runtime::coordinator;

// ============================================================================
// SECTION: Environment
// ============================================================================

/// Environment override for the runtime binary path.
const RUNTIME_BIN_ENV: &str = "TRACERUN_RUNTIME_BIN";

/// Legacy environment override for the runtime binary path.
const RUNTIME_BIN_ENV_LEGACY: &str = "NODE_BIN";

/// Environment override for the project root.
const PROJECT_ROOT_ENV: &str = "TRACERUN_PROJECT";

/// Legacy environment override for the project root.
const PROJECT_ROOT_ENV_LEGACY: &str = "NODE_PROJECT";

/// Environment override for the preload module.
const PRELOAD_ENV: &str = "TRACERUN_PRELOAD";

/// Default runtime binary when nothing else is configured.
const DEFAULT_RUNTIME_BIN: &str = "/usr/bin/node";

/// Default preload module, relative to the invocation directory.
const DEFAULT_PRELOAD: &str = "init.js";

/// Environment values captured once at startup.
///
/// Resolution stays a pure function of this snapshot plus the parsed flags,
/// so tests never mutate process environment.
#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    /// Runtime binary override, preferred name then legacy name.
    runtime_bin: Option<String>,
    /// Project root override, preferred name then legacy name.
    project_root: Option<String>,
    /// Preload module override.
    preload: Option<String>,
}

impl EnvOverrides {
    /// Captures the relevant environment variables.
    fn capture() -> Self {
        Self {
            runtime_bin: std::env::var(RUNTIME_BIN_ENV)
                .or_else(|_| std::env::var(RUNTIME_BIN_ENV_LEGACY))
                .ok(),
            project_root: std::env::var(PROJECT_ROOT_ENV)
                .or_else(|_| std::env::var(PROJECT_ROOT_ENV_LEGACY))
                .ok(),
            preload: std::env::var(PRELOAD_ENV).ok(),
        }
    }
}

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Differential-test harness for instrumented runtime builds.
#[derive(Parser, Debug)]
#[command(name = "tracerun", version, about)]
struct Cli {
    /// Runtime binary under test (falls back to TRACERUN_RUNTIME_BIN,
    /// NODE_BIN, then /usr/bin/node).
    #[arg(long, value_name = "PATH")]
    runtime_bin: Option<PathBuf>,
    /// Root of the runtime project checkout (falls back to TRACERUN_PROJECT
    /// or NODE_PROJECT; required).
    #[arg(long, value_name = "DIR")]
    project_root: Option<PathBuf>,
    /// Preload module installing the instrumentation hooks (falls back to
    /// TRACERUN_PRELOAD, then ./init.js).
    #[arg(long, value_name = "PATH")]
    preload: Option<PathBuf>,
    /// Collector base URL.
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    collector_url: String,
    /// Start the collector container before the run and stop it after.
    #[arg(long, action = ArgAction::SetTrue)]
    spawn_agent: bool,
    /// Per-test deadline in seconds; hung tests are killed and fail.
    #[arg(long, value_name = "SECONDS")]
    timeout_secs: Option<u64>,
    /// Write a machine-readable JSON report of the run to this path.
    #[arg(long, value_name = "PATH")]
    report_json: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes one harness run end to end.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env = EnvOverrides::capture();
    let config = resolve_config(&cli, &env)?;

    let mut observer = StdoutObserver;
    let (results, summary) = coordinator::execute(&config, &mut observer)
        .map_err(|err| CliError::new(err.to_string()))?;

    if let Some(path) = cli.report_json.as_deref() {
        let report = RunReport {
            summary,
            results,
        };
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|err| CliError::new(format!("failed to render report: {err}")))?;
        fs::write(path, rendered).map_err(|err| {
            CliError::new(format!("failed to write report to {}: {err}", path.display()))
        })?;
    }

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

// ============================================================================
// SECTION: Configuration Resolution
// ============================================================================

/// Resolves the harness configuration from flags and the env snapshot.
///
/// Precedence per input: explicit flag, then environment, then default.
/// The project root has no default and its absence is a startup error.
fn resolve_config(cli: &Cli, env: &EnvOverrides) -> CliResult<HarnessConfig> {
    let runtime_bin = cli
        .runtime_bin
        .clone()
        .or_else(|| env.runtime_bin.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RUNTIME_BIN));
    let project_root = cli
        .project_root
        .clone()
        .or_else(|| env.project_root.clone().map(PathBuf::from))
        .ok_or_else(|| {
            CliError::new(format!(
                "project root not set; pass --project-root or set {PROJECT_ROOT_ENV}"
            ))
        })?;
    let preload = cli
        .preload
        .clone()
        .or_else(|| env.preload.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PRELOAD));
    // Tests run with the project root as working directory, so a relative
    // preload path must be anchored to the invocation directory first.
    let preload = std::path::absolute(&preload).map_err(|err| {
        CliError::new(format!("failed to resolve preload path {}: {err}", preload.display()))
    })?;
    Ok(HarnessConfig {
        runtime_bin,
        project_root,
        preload,
        timeout: cli.timeout_secs.map(Duration::from_secs),
        collector_url: cli.collector_url.clone(),
        spawn_agent: cli.spawn_agent,
        agent: AgentContainer::default(),
    })
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Machine-readable run report written by `--report-json`.
#[derive(Debug, Serialize)]
struct RunReport {
    /// Aggregated counts across the run.
    summary: RunSummary,
    /// Every executed test with both outcomes and its verdict.
    results: Vec<TestResult>,
}

/// Observer mapping run progress onto stdout.
struct StdoutObserver;

impl RunObserver for StdoutObserver {
    fn info(&mut self, message: &str) {
        let _ = write_stdout_line(message);
    }

    fn failure(&mut self, result: &TestResult) {
        let _ = write_stdout_line(&result.case.path.display().to_string());
        let _ = write_stdout_block(&result.diagnostic());
        let _ = write_stdout_line("");
    }
}

/// Writes a message to stdout with a trailing newline.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a pre-rendered block to stdout without adding a newline.
fn write_stdout_block(block: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(block.as_bytes())
}

/// Writes a message to stderr with a trailing newline.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits a fatal error to stderr and maps it to a failing exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
