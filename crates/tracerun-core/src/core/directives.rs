// crates/tracerun-core/src/core/directives.rs
// ============================================================================
// Module: Tracerun Flag Directives
// Description: Extraction of inline runtime-flag directives from test files.
// Purpose: Launch each test with the flags its author demanded.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Upstream tests declare required runtime flags in a leading comment of the
//! form `// Flags: --a --b`. Every matching line contributes its tokens in
//! file order; everything else contributes nothing. Arbitrary file content is
//! tolerated — a malformed or flag-less file simply yields an empty list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Keyword introducing a flag directive, case-sensitive.
const DIRECTIVE_KEYWORD: &str = "Flags:";

/// Extracts the ordered runtime flags declared in `path`.
///
/// Non-UTF-8 content is replaced lossily before scanning, so binary noise
/// cannot fail the extraction.
///
/// # Errors
/// Returns the underlying I/O error when the file cannot be read at all.
pub fn extract_flags(path: &Path) -> io::Result<Vec<String>> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let mut flags = Vec::new();
    for line in text.lines() {
        if let Some(tokens) = directive_tokens(line) {
            flags.extend(tokens.split_whitespace().map(str::to_string));
        }
    }
    Ok(flags)
}

/// Returns the token payload of a directive line, if `line` is one.
///
/// The comment marker must be followed by at least one whitespace character
/// before the keyword; `//Flags:` is not a directive.
fn directive_tokens(line: &str) -> Option<&str> {
    let after_marker = line.trim_start().strip_prefix("//")?;
    let spaced = after_marker.strip_prefix(|c: char| c.is_whitespace())?;
    spaced.trim_start().strip_prefix(DIRECTIVE_KEYWORD)
}
