// crates/tracerun-core/tests/proptest_properties.rs
// ============================================================================
// Module: Harness Property Tests
// Description: Property-based checks for classification and directives.
// Purpose: Hold totality, idempotence, and parser robustness under fuzzing.
// ============================================================================

//! Property tests over the pure halves of the harness.

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

use std::fs;
use std::path::PathBuf;

use proptest::prelude::*;
use tempfile::TempDir;
use tracerun_core::CollectorOutcome;
use tracerun_core::RawOutcome;
use tracerun_core::SuppressionLists;
use tracerun_core::TestCase;
use tracerun_core::classify;
use tracerun_core::extract_flags;

/// Strategy over plausible and implausible exit codes.
fn exit_codes() -> impl Strategy<Value = Option<i32>> {
    prop_oneof![Just(None), (-1i32..=255).prop_map(Some)]
}

/// Strategy over case paths, some of which hit the suppression lists.
fn case_paths() -> impl Strategy<Value = PathBuf> {
    prop_oneof![
        Just(PathBuf::from("/proj/test/parallel/test-http-anything.js")),
        Just(PathBuf::from("/proj/test/parallel/test-fs-access.js")),
        Just(PathBuf::from("/proj/test/known_issues/test-net-known.js")),
        Just(PathBuf::from(
            "/proj/test/parallel/test-http2-forget-closed-streams.js"
        )),
    ]
}

proptest! {
    #[test]
    fn classification_is_total_exclusive_and_idempotent(
        path in case_paths(),
        exit_code in exit_codes(),
        status in proptest::num::u16::ANY,
        body in ".{0,64}",
        stderr in ".{0,64}",
        timed_out in proptest::bool::ANY,
    ) {
        let lists = SuppressionLists::builtin();
        let case = TestCase::from_path(path).unwrap();
        let raw = RawOutcome {
            exit_code,
            stderr,
            command: Vec::new(),
            timed_out,
        };
        let collector = CollectorOutcome { status, body };

        let first = classify(&case, &raw, &collector, &lists);
        let second = classify(&case, &raw, &collector, &lists);
        prop_assert_eq!(first, second);

        let pass = first.is_pass;
        let ignored_failure = !first.is_pass && first.is_ignore;
        let true_failure = !first.is_pass && !first.is_ignore;
        prop_assert_eq!(
            usize::from(pass) + usize::from(ignored_failure) + usize::from(true_failure),
            1
        );

        // Agreement of both channels always passes.
        if exit_code == Some(0) && status == 200 {
            prop_assert!(first.is_pass);
        }
        // A non-zero exit never passes, whatever the collector says.
        if exit_code != Some(0) {
            prop_assert!(!first.is_pass);
        }
    }

    #[test]
    fn directive_extraction_never_fails_on_arbitrary_content(
        content in proptest::collection::vec(proptest::num::u8::ANY, 0..512),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test-http-fuzz.js");
        fs::write(&path, &content).unwrap();
        let flags = extract_flags(&path).unwrap();
        // Every extracted token is whitespace-free by construction.
        prop_assert!(flags.iter().all(|flag| !flag.chars().any(char::is_whitespace)));
    }

    #[test]
    fn directive_tokens_round_trip_in_order(
        groups in proptest::collection::vec(
            proptest::collection::vec("[a-z-]{1,8}", 1..4),
            0..4,
        ),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test-http-directives.js");
        let mut content = String::from("'use strict';\n");
        for group in &groups {
            content.push_str("// Flags: ");
            content.push_str(&group.join(" "));
            content.push('\n');
            content.push_str("const ignored = 0;\n");
        }
        fs::write(&path, &content).unwrap();

        let expected: Vec<String> = groups.into_iter().flatten().collect();
        prop_assert_eq!(extract_flags(&path).unwrap(), expected);
    }
}
