// crates/tracerun-core/src/runtime/mod.rs
// ============================================================================
// Module: Tracerun Runtime
// Description: Side-effecting half of the harness.
// Purpose: Subprocess execution, collector transport, and run coordination.
// Dependencies: crate submodules
// ============================================================================

//! ## Overview
//! Everything here performs blocking external calls: spawning the runtime
//! under test, talking HTTP to the collector, driving the agent container,
//! and sequencing a full run. The harness is deliberately single-threaded —
//! the collector is a shared resource addressed only by token, so exactly one
//! test may be in flight per correlation window.

pub mod agent;
pub mod collector;
pub mod coordinator;
pub mod exec;
pub mod preflight;
