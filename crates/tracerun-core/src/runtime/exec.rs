// crates/tracerun-core/src/runtime/exec.rs
// ============================================================================
// Module: Tracerun Execution Driver
// Description: Runs one test as a subprocess and captures its raw outcome.
// Purpose: Observe the local channel of the differential comparison.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Each test launches as `<runtime> <flags…> --require <preload> <test>` with
//! the project root as working directory. Stdout is discarded; stderr is
//! captured verbatim for classification. A failing or crashing test is
//! recorded as data — the only fatal condition is a subprocess that cannot be
//! spawned at all, which means the environment is broken.
//!
//! The base protocol has no per-test timeout; a hung test would stall the
//! whole sequential run. The driver therefore enforces an optional bounded
//! deadline, killing the subprocess and recording the timeout as a failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Read;
use std::path::PathBuf;
use std::process::Child;
use std::process::ChildStderr;
use std::process::Command;
use std::process::Stdio;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use thiserror::Error;

use crate::core::catalog::TestCase;
use crate::core::verdict::RawOutcome;

// ============================================================================
// SECTION: Plan
// ============================================================================

/// Poll interval while waiting on a deadline-bounded subprocess.
const WAIT_POLL: Duration = Duration::from_millis(50);

/// Fixed launch parameters shared by every test of a run.
#[derive(Debug, Clone)]
pub struct ExecPlan {
    /// Runtime binary under test.
    pub runtime_bin: PathBuf,
    /// Project root, used as the working directory.
    pub project_root: PathBuf,
    /// Preload module installing the instrumentation hooks.
    pub preload: PathBuf,
    /// Optional per-test deadline; `None` restores the unbounded protocol.
    pub timeout: Option<Duration>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal execution-driver errors.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The runtime subprocess could not be spawned; aborts the whole run.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// Rendered command line that failed.
        command: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The subprocess spawned but its outcome could not be captured.
    #[error("failed to capture outcome of `{command}`: {reason}")]
    Capture {
        /// Rendered command line that failed.
        command: String,
        /// Human-readable capture failure description.
        reason: String,
    },
}

// ============================================================================
// SECTION: Driver
// ============================================================================

/// Runs one test synchronously and captures its raw outcome.
///
/// Must not be issued concurrently with another call for the same collector
/// correlation window; the coordinator guarantees strict sequencing.
///
/// # Errors
/// Returns [`ExecError`] when the subprocess cannot be spawned or its
/// stderr cannot be collected. Non-zero exits, crashes, and timeouts are
/// recorded in the returned [`RawOutcome`], not raised.
pub fn run_test(
    plan: &ExecPlan,
    case: &TestCase,
    flags: &[String],
) -> Result<RawOutcome, ExecError> {
    let command_line = render_command(plan, case, flags);
    let mut child = Command::new(&plan.runtime_bin)
        .args(flags)
        .arg("--require")
        .arg(&plan.preload)
        .arg(&case.path)
        .current_dir(&plan.project_root)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExecError::Spawn {
            command: command_line.join(" "),
            source,
        })?;

    let stderr_pipe = child.stderr.take().ok_or_else(|| ExecError::Capture {
        command: command_line.join(" "),
        reason: "stderr pipe missing".to_string(),
    })?;
    let reader = spawn_stderr_reader(stderr_pipe);

    let (status_code, timed_out) = wait_with_deadline(&mut child, plan.timeout)
        .map_err(|source| ExecError::Capture {
            command: command_line.join(" "),
            reason: source.to_string(),
        })?;

    let stderr = reader.join().map_err(|_| ExecError::Capture {
        command: command_line.join(" "),
        reason: "stderr reader thread panicked".to_string(),
    })?;

    Ok(RawOutcome {
        exit_code: status_code,
        stderr,
        command: command_line,
        timed_out,
    })
}

/// Drains the child's stderr on a dedicated thread.
///
/// Reading concurrently with the wait loop prevents a deadlock when the test
/// fills the pipe buffer before exiting.
fn spawn_stderr_reader(mut pipe: ChildStderr) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let _ = pipe.read_to_end(&mut bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

/// Waits for the child, killing it at the deadline when one is set.
///
/// Returns the exit code (`None` for signal death or a timeout kill) and
/// whether the deadline fired.
fn wait_with_deadline(
    child: &mut Child,
    timeout: Option<Duration>,
) -> io::Result<(Option<i32>, bool)> {
    let Some(limit) = timeout else {
        let status = child.wait()?;
        return Ok((status.code(), false));
    };
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status.code(), false));
        }
        if Instant::now() >= deadline {
            child.kill()?;
            let _ = child.wait()?;
            return Ok((None, true));
        }
        thread::sleep(WAIT_POLL);
    }
}

/// Renders the exact command line for diagnostics.
fn render_command(plan: &ExecPlan, case: &TestCase, flags: &[String]) -> Vec<String> {
    let mut command = Vec::with_capacity(flags.len() + 4);
    command.push(plan.runtime_bin.display().to_string());
    command.extend(flags.iter().cloned());
    command.push("--require".to_string());
    command.push(plan.preload.display().to_string());
    command.push(case.path.display().to_string());
    command
}
