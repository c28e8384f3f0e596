// crates/tracerun-core/src/core/version.rs
// ============================================================================
// Module: Tracerun Version Identifiers
// Description: Parsing of runtime and project version strings.
// Purpose: Support the major-version compatibility preflight.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Both the runtime binary (`<bin> -v`) and the project checkout (branch
//! name) identify themselves as `v<major>` followed by up to two dot-separated
//! lowercase alphanumeric segments, e.g. `v20`, `v20.1`, `v20.11.x`. Only the
//! major component matters to the harness: a skew there would make every
//! verdict meaningless, so the run aborts before any test executes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Runtime Version
// ============================================================================

/// A parsed `v<major>[.seg[.seg]]` version identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeVersion {
    /// The full version string as reported.
    pub raw: String,
    /// The major version component.
    pub major: u32,
}

impl RuntimeVersion {
    /// Parses a version string, requiring a full match of the pattern.
    ///
    /// Accepted: a leading `v`, a decimal major, then at most two further
    /// `.`-separated segments of lowercase alphanumerics. Anything else,
    /// including trailing garbage, is rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix('v')?;
        let mut segments = rest.split('.');
        let major_text = segments.next()?;
        if major_text.is_empty() || !major_text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let major = major_text.parse().ok()?;
        let mut extra = 0;
        for segment in segments {
            extra += 1;
            if extra > 2 || segment.is_empty() || !is_lower_alphanumeric(segment) {
                return None;
            }
        }
        Some(Self {
            raw: raw.to_string(),
            major,
        })
    }
}

/// Returns true when every byte is a lowercase letter or digit.
fn is_lower_alphanumeric(segment: &str) -> bool {
    segment.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}
