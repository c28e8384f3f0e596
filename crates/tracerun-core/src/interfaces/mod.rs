// crates/tracerun-core/src/interfaces/mod.rs
// ============================================================================
// Module: Tracerun Interfaces
// Description: Transport-agnostic contract for the external trace collector.
// Purpose: Let the coordinator and classifier run against a fake collector.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The collector is an opaque external dependency with exactly two
//! operations per test, strictly ordered: a fire-and-forget start
//! notification and a single authoritative check. Implementations must treat
//! a non-200 check response as data, never as an error; only failing to reach
//! the collector at all is an error, because that indicates a broken
//! environment rather than a test failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::verdict::CollectorOutcome;

// ============================================================================
// SECTION: Collector Contract
// ============================================================================

/// Collector connectivity errors. Always fatal to the run.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// The collector endpoint could not be reached at all.
    #[error("collector unreachable at {endpoint}: {reason}")]
    Unreachable {
        /// Endpoint the harness tried to contact.
        endpoint: String,
        /// Human-readable connection failure description.
        reason: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build collector client: {reason}")]
    Client {
        /// Human-readable construction failure description.
        reason: String,
    },
}

/// External collector keyed by per-test correlation tokens.
pub trait Collector {
    /// Notifies the collector that recording for `token` begins.
    ///
    /// The collector closes the connection before replying, so its response
    /// is intentionally unobservable; implementations swallow anything short
    /// of a connection failure.
    ///
    /// # Errors
    /// Returns [`CollectorError`] when the collector cannot be reached.
    fn notify_start(&self, token: &str) -> Result<(), CollectorError>;

    /// Fetches the authoritative telemetry check for `token`.
    ///
    /// Issued once, after the test subprocess completes. No retry, no
    /// polling; status 200 means the expected telemetry was captured and any
    /// other status is a signal for classification.
    ///
    /// # Errors
    /// Returns [`CollectorError`] when the collector cannot be reached.
    fn check_result(&self, token: &str) -> Result<CollectorOutcome, CollectorError>;
}
