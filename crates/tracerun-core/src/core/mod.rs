// crates/tracerun-core/src/core/mod.rs
// ============================================================================
// Module: Tracerun Domain Core
// Description: Pure domain types and logic for the differential-test harness.
// Purpose: Keep classification and discovery free of I/O side effects.
// Dependencies: crate submodules
// ============================================================================

//! ## Overview
//! Everything in this tree is deterministic given its inputs. Verdict
//! classification in particular is a pure function of four values (test case,
//! local outcome, collector outcome, suppression lists) so it can be exercised
//! without a live runtime or collector.

pub mod catalog;
pub mod directives;
pub mod suppression;
pub mod verdict;
pub mod version;
