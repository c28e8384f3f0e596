// crates/tracerun-core/tests/collector_http.rs
// ============================================================================
// Module: Collector Client Tests
// Description: Validate the blocking HTTP collector client.
// Purpose: Ensure check responses are data and connect failures are fatal.
// ============================================================================

//! Collector client tests against a local `tiny_http` stub server.

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

use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

use tiny_http::Response;
use tiny_http::Server;
use tracerun_core::Collector;
use tracerun_core::CollectorError;
use tracerun_core::HttpCollector;

/// Spawns a stub collector answering start with 200 and check per `token`.
///
/// Check responses: known token -> 200 "ok"; anything else -> 404 with the
/// no-traces phrase.
fn spawn_stub(known_token: &str) -> String {
    let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
    let base_url = format!("http://{}", server.server_addr().to_ip().unwrap());
    let known = known_token.to_string();
    let handle = Arc::clone(&server);
    thread::spawn(move || {
        for request in handle.incoming_requests() {
            let url = request.url().to_string();
            let response = if url.starts_with("/test/start") {
                Response::from_string("").with_status_code(200)
            } else if url.contains(&format!("token={known}")) {
                Response::from_string("ok").with_status_code(200)
            } else {
                Response::from_string("No traces found for token unknown")
                    .with_status_code(404)
            };
            let _ = request.respond(response);
        }
    });
    base_url
}

/// Returns a loopback URL with no listener behind it.
fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[test]
fn start_notification_succeeds_and_ignores_the_reply() {
    let base_url = spawn_stub("test-http-a");
    let collector = HttpCollector::new(base_url).unwrap();
    collector.notify_start("test-http-a").unwrap();
}

#[test]
fn check_returns_status_and_body_as_data() {
    let base_url = spawn_stub("test-http-a");
    let collector = HttpCollector::new(base_url).unwrap();

    let found = collector.check_result("test-http-a").unwrap();
    assert_eq!(found.status, 200);
    assert_eq!(found.body, "ok");

    // A non-200 check is a classification signal, not an error.
    let missing = collector.check_result("test-net-b").unwrap();
    assert_eq!(missing.status, 404);
    assert!(missing.body.contains("No traces found for token"));
}

#[test]
fn unreachable_collector_is_fatal_on_start() {
    let collector = HttpCollector::new(dead_endpoint()).unwrap();
    let err = collector.notify_start("test-http-a").unwrap_err();
    assert!(matches!(err, CollectorError::Unreachable { .. }));
}

#[test]
fn unreachable_collector_is_fatal_on_check() {
    let collector = HttpCollector::new(dead_endpoint()).unwrap();
    let err = collector.check_result("test-http-a").unwrap_err();
    assert!(matches!(err, CollectorError::Unreachable { .. }));
}

#[test]
fn trailing_slashes_in_the_base_url_are_tolerated() {
    let base_url = format!("{}/", spawn_stub("test-http-a"));
    let collector = HttpCollector::new(base_url).unwrap();
    let outcome = collector.check_result("test-http-a").unwrap();
    assert_eq!(outcome.status, 200);
}
