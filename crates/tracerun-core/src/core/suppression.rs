// crates/tracerun-core/src/core/suppression.rs
// ============================================================================
// Module: Tracerun Suppression Lists
// Description: Static exception lists applied during verdict classification.
// Purpose: Reclassify known-bad signals deterministically instead of ad hoc.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The harness runs an unmodified third-party suite against an instrumented
//! runtime, so some failures are expected artifacts rather than defects. The
//! suppression lists capture every such exception as data: suites excluded
//! from discovery, files tolerated as failing, files whose collector signal is
//! untrustworthy, and stderr markers betraying instrumentation-injected
//! headers. They are loaded once at startup and passed by reference; nothing
//! mutates them during a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

// ============================================================================
// SECTION: Built-in List Data
// ============================================================================

/// Modules of the upstream suite that the instrumentation covers.
const MODULES: &[&str] = &["dns", "fs", "tcp", "http", "http2", "net"];

/// Suites the upstream CI skips by default; they require special setups.
const IGNORED_SUITES: &[&str] = &[
    "addons",
    "benchmark",
    "doctool",
    "embedding",
    "internet",
    "js-native-api",
    "node-api",
    "pummel",
    "tick-processor",
    "v8-updates",
];

/// Tests known to fail under instrumentation for tolerated reasons.
const UNEXPECTED_FAILURES: &[&str] = &[
    "test/parallel/test-dns-lookup-promises.js",
    "test/parallel/test-dns-lookup.js",
    "test/parallel/test-dns-lookupService.js",
    "test/async-hooks/test-http-agent-handle-reuse-parallel.js",
    "test/async-hooks/test-http-agent-handle-reuse-serial.js",
    "test/parallel/test-http-client-check-http-token.js",
    "test/parallel/test-http-invalid-urls.js",
    "test/parallel/test-http-max-headers-count.js",
    "test/parallel/test-http-parser-lazy-loaded.js",
    "test/sequential/test-http2-timeout-large-write-file.js",
    "test/parallel/test-net-connect-call-socket-connect.js",
    "test/parallel/test-http2-padding-aligned.js",
    "test/parallel/test-http-same-map.js",
    "test/parallel/test-http-deprecated-urls.js",
    "test/parallel/test-fs-access.js",
    "test/parallel/test-fs-chmod.js",
    "test/parallel/test-fs-chown-type-check.js",
    "test/parallel/test-fs-close-errors.js",
    "test/parallel/test-fs-copyfile.js",
    "test/parallel/test-fs-error-messages.js",
    "test/parallel/test-fs-fchmod.js",
    "test/parallel/test-fs-fchown.js",
    "test/parallel/test-fs-fsync.js",
    "test/parallel/test-fs-lchmod.js",
    "test/parallel/test-fs-lchown.js",
    "test/parallel/test-fs-make-callback.js",
    "test/parallel/test-fs-makeStatsCallback.js",
    "test/parallel/test-fs-open.js",
    "test/parallel/test-fs-opendir.js",
    "test/parallel/test-fs-read.js",
    "test/parallel/test-fs-realpath-native.js",
    "test/parallel/test-fs-realpath.js",
    "test/parallel/test-fs-stat.js",
    "test/parallel/test-fs-truncate.js",
];

/// Tests whose traces overflow the collector's call-stack tracking.
const AGENT_IGNORE: &[&str] = &[
    "test/parallel/test-http-pipeline-requests-connection-leak.js",
    "test/parallel/test-http2-forget-closed-streams.js",
];

/// Stderr substrings that betray instrumentation-injected request headers.
const TRACING_HEADERS: &[&str] =
    &["x-datadog-trace-id", "x-datadog-parent-id", "x-datadog-sampled"];

/// Collector body phrase marking an acceptable absence of telemetry.
const NO_TRACES_MARKER: &str = "No traces found for token";

/// Suite directory whose tests document known upstream issues.
const KNOWN_ISSUES_SUITE: &str = "known_issues";

// ============================================================================
// SECTION: Suppression Lists
// ============================================================================

/// Read-only exception lists consulted by discovery and classification.
///
/// # Invariants
/// - Paths in `unexpected_failures` and `agent_ignore` are project-relative.
/// - Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressionLists {
    /// Module allow-list applied during discovery.
    modules: Vec<String>,
    /// Suite directory names excluded from discovery entirely.
    ignored_suites: Vec<String>,
    /// Project-relative paths of tests tolerated as failing.
    unexpected_failures: Vec<String>,
    /// Project-relative paths whose collector signal is untrustworthy.
    agent_ignore: Vec<String>,
    /// Stderr marker substrings for instrumentation header diffs.
    tracing_headers: Vec<String>,
    /// Collector body phrase for an excusable telemetry absence.
    no_traces_marker: String,
    /// Suite name whose failures are always ignored.
    known_issues_suite: String,
}

impl SuppressionLists {
    /// Returns the built-in lists for the upstream suite under test.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            modules: to_owned(MODULES),
            ignored_suites: to_owned(IGNORED_SUITES),
            unexpected_failures: to_owned(UNEXPECTED_FAILURES),
            agent_ignore: to_owned(AGENT_IGNORE),
            tracing_headers: to_owned(TRACING_HEADERS),
            no_traces_marker: NO_TRACES_MARKER.to_string(),
            known_issues_suite: KNOWN_ISSUES_SUITE.to_string(),
        }
    }

    /// Returns true when `module` is under test.
    #[must_use]
    pub fn is_module_under_test(&self, module: &str) -> bool {
        self.modules.iter().any(|candidate| candidate == module)
    }

    /// Returns true when `suite` is excluded from discovery.
    #[must_use]
    pub fn is_ignored_suite(&self, suite: &str) -> bool {
        self.ignored_suites.iter().any(|candidate| candidate == suite)
    }

    /// Returns true when `path` is a tolerated failure.
    ///
    /// Matching is by project-relative suffix so callers can pass the
    /// absolute, resolved test path.
    #[must_use]
    pub fn is_unexpected_failure(&self, path: &Path) -> bool {
        self.unexpected_failures.iter().any(|candidate| path.ends_with(candidate))
    }

    /// Returns true when `path` has an untrustworthy collector signal.
    #[must_use]
    pub fn is_agent_ignored(&self, path: &Path) -> bool {
        self.agent_ignore.iter().any(|candidate| path.ends_with(candidate))
    }

    /// Returns true when `stderr` contains a tracing-header marker.
    #[must_use]
    pub fn has_tracing_header(&self, stderr: &str) -> bool {
        self.tracing_headers.iter().any(|header| stderr.contains(header.as_str()))
    }

    /// Returns true when `body` reports an excusable telemetry absence.
    #[must_use]
    pub fn is_excusable_absence(&self, body: &str) -> bool {
        body.contains(&self.no_traces_marker)
    }

    /// Returns true when `path` sits directly under the known-issues suite.
    #[must_use]
    pub fn is_known_issue(&self, path: &Path) -> bool {
        path.parent()
            .and_then(Path::file_name)
            .is_some_and(|name| name == self.known_issues_suite.as_str())
    }
}

/// Copies a static string slice into owned list entries.
fn to_owned(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|entry| (*entry).to_string()).collect()
}
