// crates/tracerun-core/tests/exec_driver.rs
// ============================================================================
// Module: Execution Driver Tests
// Description: Validate subprocess launch, capture, and deadline handling.
// Purpose: Ensure raw outcomes are recorded as data and spawns fail loudly.
// ============================================================================

//! Driver tests against stub runtime scripts; unix-only because the stubs
//! rely on shell shebangs and permission bits.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use tempfile::TempDir;
use tracerun_core::ExecError;
use tracerun_core::ExecPlan;
use tracerun_core::TestCase;
use tracerun_core::runtime::exec;

/// Writes an executable shell script.
fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Stub runtime that executes its last argument (the test file) via sh.
fn stub_runtime(dir: &Path) -> PathBuf {
    let path = dir.join("runtime-stub");
    write_script(&path, "for last; do :; done\nexec /bin/sh \"$last\"\n");
    path
}

/// Builds a plan rooted at `dir` with the stub runtime.
fn plan(dir: &Path, timeout: Option<Duration>) -> ExecPlan {
    ExecPlan {
        runtime_bin: stub_runtime(dir),
        project_root: dir.to_path_buf(),
        preload: dir.join("init.js"),
        timeout,
    }
}

/// Builds a test case for a script at `path`.
fn case_for(path: PathBuf) -> TestCase {
    TestCase::from_path(path).unwrap()
}

#[test]
fn captures_exit_code_and_stderr_verbatim() {
    let dir = TempDir::new().unwrap();
    let test = dir.path().join("test-http-fail.js");
    write_script(&test, "echo 'line one' >&2\necho 'line two' >&2\nexit 3\n");

    let outcome = exec::run_test(&plan(dir.path(), None), &case_for(test), &[]).unwrap();
    assert_eq!(outcome.exit_code, Some(3));
    assert_eq!(outcome.stderr, "line one\nline two\n");
    assert!(!outcome.timed_out);
}

#[test]
fn stdout_is_discarded() {
    let dir = TempDir::new().unwrap();
    let test = dir.path().join("test-http-noise.js");
    write_script(&test, "echo 'stdout noise'\necho 'stderr signal' >&2\nexit 0\n");

    let outcome = exec::run_test(&plan(dir.path(), None), &case_for(test), &[]).unwrap();
    assert_eq!(outcome.exit_code, Some(0));
    assert_eq!(outcome.stderr, "stderr signal\n");
}

#[test]
fn command_line_places_flags_before_the_preload() {
    let dir = TempDir::new().unwrap();
    let test = dir.path().join("test-net-flags.js");
    write_script(&test, "exit 0\n");

    let flags = vec!["--expose-internals".to_string()];
    let outcome = exec::run_test(&plan(dir.path(), None), &case_for(test.clone()), &flags)
        .unwrap();
    let require_at = outcome.command.iter().position(|arg| arg == "--require").unwrap();
    let flag_at = outcome.command.iter().position(|arg| arg == "--expose-internals").unwrap();
    assert!(flag_at < require_at);
    assert_eq!(outcome.command.last().map(String::as_str), test.to_str());
}

#[test]
fn hung_test_is_killed_at_the_deadline() {
    let dir = TempDir::new().unwrap();
    let test = dir.path().join("test-net-hang.js");
    // exec keeps a single process holding the stderr pipe, so the kill
    // closes it promptly.
    write_script(&test, "exec sleep 30\n");

    let started = Instant::now();
    let outcome = exec::run_test(
        &plan(dir.path(), Some(Duration::from_millis(300))),
        &case_for(test),
        &[],
    )
    .unwrap();
    assert!(outcome.timed_out);
    assert_eq!(outcome.exit_code, None);
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn unspawnable_runtime_is_fatal() {
    let dir = TempDir::new().unwrap();
    let test = dir.path().join("test-http-any.js");
    write_script(&test, "exit 0\n");

    let mut broken = plan(dir.path(), None);
    broken.runtime_bin = PathBuf::from("/nonexistent/runtime-bin");
    let err = exec::run_test(&broken, &case_for(test), &[]).unwrap_err();
    assert!(matches!(err, ExecError::Spawn { .. }));
}
