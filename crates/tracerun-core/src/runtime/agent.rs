// crates/tracerun-core/src/runtime/agent.rs
// ============================================================================
// Module: Tracerun Agent Container
// Description: Lifecycle of the containerized collector service.
// Purpose: Start and stop the collector with single opaque subprocess calls.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The collector ships as a container image. The harness treats its lifecycle
//! as two opaque subprocess calls: one `docker run` before the suite and one
//! `docker stop` afterwards, with a fixed settle delay in between so the
//! collector is listening before the first start notification. Stop failures
//! are reported to the caller but must never override the run's verdict.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::process::Command;
use std::thread;
use std::time::Duration;

use thiserror::Error;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Container name used for start/stop pairing.
const CONTAINER_NAME: &str = "dd-test-agent";

/// Collector image published on the default registry.
const CONTAINER_IMAGE: &str = "kyleverhoog/dd-trace-test-agent:latest";

/// Port the collector listens on, published 1:1 on the host.
const CONTAINER_PORT: u16 = 8126;

/// Delay granted to the collector to come up before the first test.
const SETTLE_DELAY: Duration = Duration::from_secs(5);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Agent container lifecycle errors.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The container tool itself could not be invoked.
    #[error("failed to invoke `{command}`: {source}")]
    Invoke {
        /// Rendered command line that failed.
        command: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The container tool ran but reported failure.
    #[error("`{command}` failed: {stderr}")]
    Failed {
        /// Rendered command line that failed.
        command: String,
        /// Captured stderr of the container tool.
        stderr: String,
    },
}

// ============================================================================
// SECTION: Container
// ============================================================================

/// Handle on the collector container lifecycle.
#[derive(Debug, Clone)]
pub struct AgentContainer {
    /// Container name used for start/stop pairing.
    pub name: String,
    /// Collector image reference.
    pub image: String,
    /// Host/container port published for the collector.
    pub port: u16,
    /// Delay granted after start before tests begin.
    pub settle: Duration,
}

impl Default for AgentContainer {
    fn default() -> Self {
        Self {
            name: CONTAINER_NAME.to_string(),
            image: CONTAINER_IMAGE.to_string(),
            port: CONTAINER_PORT,
            settle: SETTLE_DELAY,
        }
    }
}

impl AgentContainer {
    /// Starts the collector container and waits for it to settle.
    ///
    /// # Errors
    /// Returns [`AgentError`] when `docker run` cannot be invoked or exits
    /// non-zero; the run aborts before any test in that case.
    pub fn start(&self) -> Result<(), AgentError> {
        let port_map = format!("{0}:{0}", self.port);
        run_docker(&[
            "run",
            "-d",
            "--rm",
            "--name",
            &self.name,
            "-p",
            &port_map,
            &self.image,
        ])?;
        thread::sleep(self.settle);
        Ok(())
    }

    /// Stops the collector container.
    ///
    /// # Errors
    /// Returns [`AgentError`] when `docker stop` cannot be invoked or exits
    /// non-zero. Callers log and swallow this; cleanup failure must not mask
    /// the substantive verdict.
    pub fn stop(&self) -> Result<(), AgentError> {
        run_docker(&["stop", &self.name])
    }
}

/// Runs one docker subcommand, treating non-zero exit as failure.
fn run_docker(args: &[&str]) -> Result<(), AgentError> {
    let rendered = format!("docker {}", args.join(" "));
    let output = Command::new("docker").args(args).output().map_err(|source| {
        AgentError::Invoke {
            command: rendered.clone(),
            source,
        }
    })?;
    if !output.status.success() {
        return Err(AgentError::Failed {
            command: rendered,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}
