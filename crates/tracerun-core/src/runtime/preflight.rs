// crates/tracerun-core/src/runtime/preflight.rs
// ============================================================================
// Module: Tracerun Version Preflight
// Description: Runtime/project version compatibility check.
// Purpose: Abort the run before any test when versions skew.
// Dependencies: crate::core::version, thiserror
// ============================================================================

//! ## Overview
//! The runtime binary reports its version via `-v`; the project checkout
//! identifies itself by its current branch name. Both must resolve to the
//! same major version, otherwise every subsequent verdict would compare a
//! binary against the wrong suite — the preflight fails the run before a
//! single test executes and no results are produced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::path::Path;
use std::process::Command;

use thiserror::Error;

use crate::core::version::RuntimeVersion;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Preflight errors. All fatal before any test executes.
#[derive(Debug, Error)]
pub enum PreflightError {
    /// A version-probe command could not be invoked.
    #[error("failed to invoke `{command}`: {source}")]
    Invoke {
        /// Rendered command line that failed.
        command: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A version-probe command ran but reported failure.
    #[error("`{command}` failed: {stderr}")]
    Failed {
        /// Rendered command line that failed.
        command: String,
        /// Captured stderr of the probe.
        stderr: String,
    },
    /// A probe's output did not match the version pattern.
    #[error("could not parse version from `{command}` output: {output:?}")]
    Unparseable {
        /// Rendered command line whose output failed to parse.
        command: String,
        /// The offending output, trimmed.
        output: String,
    },
    /// Runtime binary and project checkout disagree on the major version.
    #[error("runtime {runtime} does not match project checkout {project}")]
    MajorMismatch {
        /// Version reported by the runtime binary.
        runtime: String,
        /// Version identified by the project checkout.
        project: String,
    },
}

// ============================================================================
// SECTION: Probes
// ============================================================================

/// Reads the runtime binary's version via `<bin> -v`.
///
/// # Errors
/// Returns [`PreflightError`] when the probe fails or its output does not
/// match the version pattern.
pub fn runtime_version(runtime_bin: &Path) -> Result<RuntimeVersion, PreflightError> {
    let rendered = format!("{} -v", runtime_bin.display());
    let output = Command::new(runtime_bin).arg("-v").output().map_err(|source| {
        PreflightError::Invoke {
            command: rendered.clone(),
            source,
        }
    })?;
    parse_probe(rendered, &output)
}

/// Identifies the project checkout via its current branch name.
///
/// # Errors
/// Returns [`PreflightError`] when git fails or the branch name does not
/// match the version pattern.
pub fn project_version(project_root: &Path) -> Result<RuntimeVersion, PreflightError> {
    let rendered = format!("git branch --show-current (in {})", project_root.display());
    let output = Command::new("git")
        .args(["branch", "--show-current"])
        .current_dir(project_root)
        .output()
        .map_err(|source| PreflightError::Invoke {
            command: rendered.clone(),
            source,
        })?;
    parse_probe(rendered, &output)
}

/// Checks that runtime and project agree on the major version.
///
/// # Errors
/// Returns [`PreflightError::MajorMismatch`] on skew.
pub fn ensure_matching_major(
    runtime: &RuntimeVersion,
    project: &RuntimeVersion,
) -> Result<(), PreflightError> {
    if runtime.major == project.major {
        Ok(())
    } else {
        Err(PreflightError::MajorMismatch {
            runtime: runtime.raw.clone(),
            project: project.raw.clone(),
        })
    }
}

/// Runs both probes and enforces the compatibility invariant.
///
/// # Errors
/// Returns the first probe or mismatch error encountered.
pub fn check_versions(
    runtime_bin: &Path,
    project_root: &Path,
) -> Result<RuntimeVersion, PreflightError> {
    let runtime = runtime_version(runtime_bin)?;
    let project = project_version(project_root)?;
    ensure_matching_major(&runtime, &project)?;
    Ok(runtime)
}

/// Converts a probe's output into a parsed version.
fn parse_probe(
    command: String,
    output: &std::process::Output,
) -> Result<RuntimeVersion, PreflightError> {
    if !output.status.success() {
        return Err(PreflightError::Failed {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    RuntimeVersion::parse(&text).ok_or_else(|| PreflightError::Unparseable {
        command,
        output: text,
    })
}
