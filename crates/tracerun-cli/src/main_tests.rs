// crates/tracerun-cli/src/main_tests.rs
// ============================================================================
// Module: Tracerun CLI Unit Tests
// Description: Configuration resolution and report rendering tests.
// Purpose: Keep flag/env precedence and the report shape stable.
// ============================================================================

//! Unit tests for configuration resolution; no process environment is
//! mutated because resolution is pure over an [`EnvOverrides`] snapshot.

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

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::Cli;
use crate::EnvOverrides;
use crate::resolve_config;

/// Parses a CLI invocation from whitespace-separated arguments.
fn parse(args: &[&str]) -> Cli {
    let mut full = vec!["tracerun"];
    full.extend_from_slice(args);
    match Cli::try_parse_from(full) {
        Ok(cli) => cli,
        Err(err) => panic!("failed to parse test arguments: {err}"),
    }
}

#[test]
fn flag_beats_environment_for_runtime_bin() {
    let cli = parse(&["--project-root", "/proj", "--runtime-bin", "/opt/node"]);
    let env = EnvOverrides {
        runtime_bin: Some("/env/node".to_string()),
        project_root: None,
        preload: None,
    };
    let config = resolve_config(&cli, &env).unwrap();
    assert_eq!(config.runtime_bin, PathBuf::from("/opt/node"));
}

#[test]
fn environment_beats_default_for_runtime_bin() {
    let cli = parse(&["--project-root", "/proj"]);
    let env = EnvOverrides {
        runtime_bin: Some("/env/node".to_string()),
        project_root: None,
        preload: None,
    };
    let config = resolve_config(&cli, &env).unwrap();
    assert_eq!(config.runtime_bin, PathBuf::from("/env/node"));
}

#[test]
fn runtime_bin_defaults_when_unset() {
    let cli = parse(&["--project-root", "/proj"]);
    let config = resolve_config(&cli, &EnvOverrides::default()).unwrap();
    assert_eq!(config.runtime_bin, PathBuf::from("/usr/bin/node"));
}

#[test]
fn missing_project_root_is_a_startup_error() {
    let cli = parse(&[]);
    let err = resolve_config(&cli, &EnvOverrides::default()).unwrap_err();
    assert!(err.to_string().contains("project root not set"));
}

#[test]
fn project_root_resolves_from_environment() {
    let cli = parse(&[]);
    let env = EnvOverrides {
        runtime_bin: None,
        project_root: Some("/env/project".to_string()),
        preload: None,
    };
    let config = resolve_config(&cli, &env).unwrap();
    assert_eq!(config.project_root, PathBuf::from("/env/project"));
}

#[test]
fn preload_is_anchored_to_an_absolute_path() {
    let cli = parse(&["--project-root", "/proj"]);
    let config = resolve_config(&cli, &EnvOverrides::default()).unwrap();
    assert!(config.preload.is_absolute());
    assert!(config.preload.ends_with("init.js"));
}

#[test]
fn timeout_flag_maps_to_a_duration() {
    let cli = parse(&["--project-root", "/proj", "--timeout-secs", "90"]);
    let config = resolve_config(&cli, &EnvOverrides::default()).unwrap();
    assert_eq!(config.timeout, Some(Duration::from_secs(90)));
}

#[test]
fn timeout_is_unbounded_by_default() {
    let cli = parse(&["--project-root", "/proj"]);
    let config = resolve_config(&cli, &EnvOverrides::default()).unwrap();
    assert_eq!(config.timeout, None);
}

#[test]
fn collector_url_defaults_to_the_agent_port() {
    let cli = parse(&["--project-root", "/proj"]);
    let config = resolve_config(&cli, &EnvOverrides::default()).unwrap();
    assert_eq!(config.collector_url, "http://127.0.0.1:8126");
}
