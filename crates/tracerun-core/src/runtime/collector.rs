// crates/tracerun-core/src/runtime/collector.rs
// ============================================================================
// Module: Tracerun HTTP Collector Client
// Description: Blocking HTTP implementation of the collector contract.
// Purpose: Correlate test executions with collector telemetry by token.
// Dependencies: crate::interfaces, reqwest
// ============================================================================

//! ## Overview
//! The collector exposes two endpoints on a local port:
//! `GET /test/start?token=<id>` and `GET /test/check?token=<id>`. The start
//! endpoint closes the connection before replying, so the client deliberately
//! discards everything but connection failures there. The check response is
//! returned as data — a non-200 status is a classification signal, never an
//! error. No call carries a timeout: the run is sequential and a hung
//! collector is an environment problem surfaced by the operator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::verdict::CollectorOutcome;
use crate::interfaces::Collector;
use crate::interfaces::CollectorError;

// ============================================================================
// SECTION: HTTP Client
// ============================================================================

/// Default collector endpoint, matching the agent container's published port.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8126";

/// Blocking HTTP collector client.
#[derive(Debug)]
pub struct HttpCollector {
    /// Base URL of the collector, without a trailing slash.
    base_url: String,
    /// Reused blocking HTTP client.
    client: reqwest::blocking::Client,
}

impl HttpCollector {
    /// Builds a client against `base_url`.
    ///
    /// # Errors
    /// Returns [`CollectorError::Client`] when the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, CollectorError> {
        let client = reqwest::blocking::Client::builder().build().map_err(|err| {
            CollectorError::Client {
                reason: err.to_string(),
            }
        })?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            base_url,
            client,
        })
    }

    /// Formats an endpoint URL for `token`.
    fn endpoint(&self, operation: &str, token: &str) -> String {
        format!("{}/test/{operation}?token={token}", self.base_url)
    }
}

impl Collector for HttpCollector {
    fn notify_start(&self, token: &str) -> Result<(), CollectorError> {
        let url = self.endpoint("start", token);
        match self.client.get(&url).send() {
            // The reply is unobservable by design; a closed connection after
            // the request is sent is the expected shape, not an error.
            Ok(_) => Ok(()),
            Err(err) if err.is_connect() => Err(CollectorError::Unreachable {
                endpoint: url,
                reason: err.to_string(),
            }),
            Err(_) => Ok(()),
        }
    }

    fn check_result(&self, token: &str) -> Result<CollectorOutcome, CollectorError> {
        let url = self.endpoint("check", token);
        let response = self.client.get(&url).send().map_err(|err| {
            CollectorError::Unreachable {
                endpoint: url.clone(),
                reason: err.to_string(),
            }
        })?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|err| CollectorError::Unreachable {
            endpoint: url,
            reason: err.to_string(),
        })?;
        Ok(CollectorOutcome {
            status,
            body,
        })
    }
}
