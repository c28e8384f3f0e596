// crates/tracerun-core/src/core/verdict.rs
// ============================================================================
// Module: Tracerun Verdict Classification
// Description: Reconciliation of local and collector outcomes into verdicts.
// Purpose: Produce one deterministic pass/fail/ignore verdict per test.
// Dependencies: crate::core::catalog, crate::core::suppression, serde
// ============================================================================

//! ## Overview
//! Classification reconciles two independent observation channels — the local
//! subprocess result and the collector's out-of-band telemetry check — with
//! the suppression lists. It is a pure function of those four inputs: the
//! same triple classifies identically every time, and every result lands in
//! exactly one of {pass, ignored failure, true failure}.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use serde::Deserialize;
use serde::Serialize;

use crate::core::catalog::TestCase;
use crate::core::suppression::SuppressionLists;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Raw subprocess outcome captured by the execution driver.
///
/// # Invariants
/// - Immutable after capture; owned by classification from then on.
/// - `exit_code` is `None` when the process died to a signal or was killed
///   by the per-test timeout; that is never a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOutcome {
    /// Process exit code, if the process exited normally.
    pub exit_code: Option<i32>,
    /// Captured standard-error text, verbatim.
    pub stderr: String,
    /// Exact command line used, for diagnostics.
    pub command: Vec<String>,
    /// True when the harness killed the process at the per-test deadline.
    pub timed_out: bool,
}

/// Collector response to the authoritative `check` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorOutcome {
    /// HTTP status of the check call; 200 means telemetry was found.
    pub status: u16,
    /// Raw response body text.
    pub body: String,
}

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Final classification for one test, computed once and never revised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// True when both observation channels are acceptable.
    pub is_pass: bool,
    /// True when a failure is suppressed rather than counted.
    pub is_ignore: bool,
}

/// Classifies one test from its outcomes and the suppression lists.
///
/// Pass requires a zero exit code and either collector confirmation
/// (status 200) or an excusable agent signal: the test is on the
/// agent-ignore list, or the collector reported an acceptable absence of
/// telemetry. Ignore is independent of pass and covers known-issue suites,
/// tolerated failures, and instrumentation header diffs in stderr.
#[must_use]
pub fn classify(
    case: &TestCase,
    raw: &RawOutcome,
    collector: &CollectorOutcome,
    lists: &SuppressionLists,
) -> Verdict {
    let agent_excusable =
        lists.is_agent_ignored(&case.path) || lists.is_excusable_absence(&collector.body);
    let is_pass = raw.exit_code == Some(0) && (collector.status == 200 || agent_excusable);
    let is_ignore = lists.is_known_issue(&case.path)
        || lists.is_unexpected_failure(&case.path)
        || lists.has_tracing_header(&raw.stderr);
    Verdict {
        is_pass,
        is_ignore,
    }
}

// ============================================================================
// SECTION: Test Result
// ============================================================================

/// A test case bundled with both outcomes and its computed verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// The discovered test case.
    pub case: TestCase,
    /// Local subprocess outcome.
    pub raw: RawOutcome,
    /// Collector check outcome.
    pub collector: CollectorOutcome,
    /// Verdict derived once from the fields above.
    pub verdict: Verdict,
}

impl TestResult {
    /// Builds a result, classifying exactly once.
    #[must_use]
    pub fn new(
        case: TestCase,
        raw: RawOutcome,
        collector: CollectorOutcome,
        lists: &SuppressionLists,
    ) -> Self {
        let verdict = classify(&case, &raw, &collector, lists);
        Self {
            case,
            raw,
            collector,
            verdict,
        }
    }

    /// True failure: neither passing nor suppressed. Flips the run exit code.
    #[must_use]
    pub const fn is_true_failure(&self) -> bool {
        !self.verdict.is_pass && !self.verdict.is_ignore
    }

    /// Suppressed failure: reported separately, never fatal to the run.
    #[must_use]
    pub const fn is_ignored_failure(&self) -> bool {
        !self.verdict.is_pass && self.verdict.is_ignore
    }

    /// Renders the human-readable diagnostic block for a failing test.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        let mut message = String::new();
        let _ = writeln!(message, "Test agent response code {}", self.collector.status);
        for line in self.collector.body.lines() {
            let _ = writeln!(message, "|    {line}");
        }
        match self.raw.exit_code {
            Some(code) => {
                let _ = writeln!(message, "Test output: exit code {code}");
            }
            None if self.raw.timed_out => {
                let _ = writeln!(message, "Test output: killed at the per-test deadline");
            }
            None => {
                let _ = writeln!(message, "Test output: terminated by signal");
            }
        }
        for line in self.raw.stderr.lines() {
            let _ = writeln!(message, "|    {line}");
        }
        message
    }
}
