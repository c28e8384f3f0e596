// crates/tracerun-core/src/runtime/coordinator.rs
// ============================================================================
// Module: Tracerun Run Coordinator
// Description: Orchestration of discovery, execution, and aggregation.
// Purpose: Turn a project tree into a run verdict with one exit decision.
// Dependencies: crate::core, crate::interfaces, crate::runtime, thiserror
// ============================================================================

//! ## Overview
//! The coordinator owns the run protocol: version preflight, optional agent
//! container start, catalog discovery and grouping, strictly sequential
//! per-test execution (start notification, subprocess, authoritative check,
//! classification), aggregation, and a best-effort container stop that never
//! overrides the computed verdict. Progress and failure diagnostics are
//! routed through an observer so the binary owns the output streams.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::catalog;
use crate::core::catalog::CatalogError;
use crate::core::catalog::ModuleGroup;
use crate::core::directives;
use crate::core::suppression::SuppressionLists;
use crate::core::verdict::TestResult;
use crate::interfaces::Collector;
use crate::interfaces::CollectorError;
use crate::runtime::agent::AgentContainer;
use crate::runtime::agent::AgentError;
use crate::runtime::collector::HttpCollector;
use crate::runtime::exec;
use crate::runtime::exec::ExecError;
use crate::runtime::exec::ExecPlan;
use crate::runtime::preflight;
use crate::runtime::preflight::PreflightError;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Full configuration for one harness run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Runtime binary under test.
    pub runtime_bin: PathBuf,
    /// Root of the runtime project checkout.
    pub project_root: PathBuf,
    /// Preload module installing the instrumentation hooks.
    pub preload: PathBuf,
    /// Optional per-test deadline.
    pub timeout: Option<Duration>,
    /// Collector base URL.
    pub collector_url: String,
    /// Start (and later stop) the collector container ourselves.
    pub spawn_agent: bool,
    /// Container parameters used when `spawn_agent` is set.
    pub agent: AgentContainer,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal run errors; per-test failures are data, not errors.
#[derive(Debug, Error)]
pub enum RunError {
    /// Version preflight failed; no test executed.
    #[error(transparent)]
    Preflight(#[from] PreflightError),
    /// The collector container could not be started.
    #[error(transparent)]
    Agent(#[from] AgentError),
    /// Catalog discovery failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The collector became unreachable mid-run.
    #[error(transparent)]
    Collector(#[from] CollectorError),
    /// A test subprocess could not be spawned or captured.
    #[error(transparent)]
    Exec(#[from] ExecError),
    /// A test file's flag directives could not be read.
    #[error("failed to read directives from {path}: {source}")]
    Directives {
        /// Test file that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

// ============================================================================
// SECTION: Observation
// ============================================================================

/// Receives run progress; the binary maps this onto stdout.
pub trait RunObserver {
    /// Reports a one-line progress message.
    fn info(&mut self, message: &str);

    /// Reports one true failure with its diagnostic block.
    fn failure(&mut self, result: &TestResult);
}

/// Observer that discards everything; useful for library callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl RunObserver for NullObserver {
    fn info(&mut self, _message: &str) {}

    fn failure(&mut self, _result: &TestResult) {}
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Aggregated counts across the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total number of executed tests.
    pub total: usize,
    /// True failures: neither passing nor suppressed.
    pub failed: usize,
    /// Suppressed failures, reported but never fatal.
    pub ignored: usize,
}

impl RunSummary {
    /// Aggregates the counts of a result set.
    #[must_use]
    pub fn from_results(results: &[TestResult]) -> Self {
        Self {
            total: results.len(),
            failed: results.iter().filter(|result| result.is_true_failure()).count(),
            ignored: results.iter().filter(|result| result.is_ignored_failure()).count(),
        }
    }

    /// Exit policy: zero only when no true failures exist.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

// ============================================================================
// SECTION: Suite Execution
// ============================================================================

/// Runs the grouped catalog strictly sequentially against `collector`.
///
/// Per test, in order: start notification, subprocess execution, one
/// authoritative check, classification. Exactly one test is in flight per
/// collector correlation window; that is a correctness requirement, not a
/// performance trade-off.
///
/// # Errors
/// Returns [`RunError`] on environment failures (spawn, connectivity,
/// unreadable directives). Failing tests are data in the returned results.
pub fn run_suite(
    plan: &ExecPlan,
    collector: &dyn Collector,
    lists: &SuppressionLists,
    groups: &[ModuleGroup],
    observer: &mut dyn RunObserver,
) -> Result<Vec<TestResult>, RunError> {
    let mut results = Vec::new();
    for group in groups {
        observer.info(&format!(
            "Running {} tests for module \"{}\"",
            group.tests.len(),
            group.module
        ));
        let module_start = results.len();
        for case in &group.tests {
            let flags =
                directives::extract_flags(&case.path).map_err(|source| RunError::Directives {
                    path: case.path.clone(),
                    source,
                })?;
            collector.notify_start(&case.token)?;
            let raw = exec::run_test(plan, case, &flags)?;
            let outcome = collector.check_result(&case.token)?;
            results.push(TestResult::new(case.clone(), raw, outcome, lists));
        }
        report_module(&results[module_start..], observer);
    }
    Ok(results)
}

/// Emits the per-module summary and failure diagnostics.
fn report_module(results: &[TestResult], observer: &mut dyn RunObserver) {
    let failed: Vec<&TestResult> =
        results.iter().filter(|result| result.is_true_failure()).collect();
    let ignored = results.iter().filter(|result| result.is_ignored_failure()).count();
    observer.info(&format!(
        "Failed {}/{} tests, {}/{} ignored",
        failed.len(),
        results.len(),
        ignored,
        results.len()
    ));
    if !failed.is_empty() {
        observer.info("Failed tests:");
        for result in failed {
            observer.failure(result);
        }
    }
}

// ============================================================================
// SECTION: Full Run
// ============================================================================

/// Executes a complete run: preflight, lifecycle, suite, aggregation.
///
/// The agent container, when spawned, is always given a stop attempt on the
/// way out — success or failure — and a stop error is reported through the
/// observer but never escalated over the run's own outcome.
///
/// # Errors
/// Returns [`RunError`] on any fatal environment failure.
pub fn execute(
    config: &HarnessConfig,
    observer: &mut dyn RunObserver,
) -> Result<(Vec<TestResult>, RunSummary), RunError> {
    let runtime = preflight::check_versions(&config.runtime_bin, &config.project_root)?;
    observer.info(&format!("Running tests for runtime {}", runtime.raw));

    let agent_started = if config.spawn_agent {
        observer.info("Starting the collector container");
        config.agent.start()?;
        true
    } else {
        false
    };

    let outcome = run_discovered(config, observer);

    if agent_started {
        observer.info("Stopping the collector container");
        if let Err(err) = config.agent.stop() {
            observer.info(&format!("Failed to stop the collector container: {err}"));
        }
    }
    outcome
}

/// Discovers, groups, and runs the suite; split out so cleanup always runs.
fn run_discovered(
    config: &HarnessConfig,
    observer: &mut dyn RunObserver,
) -> Result<(Vec<TestResult>, RunSummary), RunError> {
    let lists = SuppressionLists::builtin();
    let groups = catalog::group_by_module(catalog::discover(&config.project_root, &lists)?);

    observer.info("Running following tests:");
    for group in &groups {
        observer.info(&format!("\t{} : {} tests", group.module, group.tests.len()));
    }

    let plan = ExecPlan {
        runtime_bin: config.runtime_bin.clone(),
        project_root: config.project_root.clone(),
        preload: config.preload.clone(),
        timeout: config.timeout,
    };
    let collector = HttpCollector::new(config.collector_url.clone())?;
    let results = run_suite(&plan, &collector, &lists, &groups, observer)?;
    let summary = RunSummary::from_results(&results);
    observer.info(&format!(
        "Run complete: {} failed, {} ignored, {} total",
        summary.failed, summary.ignored, summary.total
    ));
    Ok((results, summary))
}
