// crates/tracerun-core/src/lib.rs
// ============================================================================
// Module: Tracerun Core Library
// Description: Differential-test harness core for instrumented runtime suites.
// Purpose: Correlate local test outcomes with external collector telemetry.
// Dependencies: reqwest, serde, thiserror
// ============================================================================

//! ## Overview
//! Tracerun drives an existing runtime test suite against an instrumented
//! build of that runtime. Each test executes as a subprocess while an external
//! trace collector observes the instrumentation out-of-band; the harness then
//! reconciles the two observation channels into a single pass/fail/ignore
//! verdict under deterministic suppression rules.
//!
//! The crate is split the same way the data flows: `core` holds the pure
//! domain (catalog, directives, suppression lists, verdict classification,
//! version parsing), `interfaces` defines the collector contract, and
//! `runtime` holds everything that touches the outside world (subprocess
//! execution, HTTP collector client, agent container, run coordination).

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use crate::core::catalog::CatalogError;
pub use crate::core::catalog::ModuleGroup;
pub use crate::core::catalog::TestCase;
pub use crate::core::catalog::discover;
pub use crate::core::catalog::group_by_module;
pub use crate::core::directives::extract_flags;
pub use crate::core::suppression::SuppressionLists;
pub use crate::core::verdict::CollectorOutcome;
pub use crate::core::verdict::RawOutcome;
pub use crate::core::verdict::TestResult;
pub use crate::core::verdict::Verdict;
pub use crate::core::verdict::classify;
pub use crate::core::version::RuntimeVersion;
pub use crate::interfaces::Collector;
pub use crate::interfaces::CollectorError;
pub use crate::runtime::agent::AgentContainer;
pub use crate::runtime::agent::AgentError;
pub use crate::runtime::collector::HttpCollector;
pub use crate::runtime::coordinator::HarnessConfig;
pub use crate::runtime::coordinator::NullObserver;
pub use crate::runtime::coordinator::RunError;
pub use crate::runtime::coordinator::RunObserver;
pub use crate::runtime::coordinator::RunSummary;
pub use crate::runtime::exec::ExecError;
pub use crate::runtime::exec::ExecPlan;
pub use crate::runtime::preflight::PreflightError;
