// crates/tracerun-core/src/core/catalog.rs
// ============================================================================
// Module: Tracerun Test Catalog
// Description: Discovery and grouping of eligible upstream test files.
// Purpose: Produce a deterministic, filtered catalog of test cases.
// Dependencies: crate::core::suppression, serde, thiserror
// ============================================================================

//! ## Overview
//! The catalog builder walks the `test/` subtree of the runtime project and
//! selects files matching `test-*.js` whose directory carries the suite
//! marker (`testcfg.py`), is not an ignored suite, and whose module token is
//! under test. Filesystem traversal order is unspecified; a final sort by
//! (module, path) makes the output deterministic. An empty catalog is a valid
//! result, not an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::suppression::SuppressionLists;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Companion file marking a directory as a recognized test suite.
const SUITE_MARKER: &str = "testcfg.py";

/// Subtree of the project root holding the upstream suite.
const TEST_ROOT: &str = "test";

// ============================================================================
// SECTION: Test Case
// ============================================================================

/// One discovered test file, immutable once built.
///
/// # Invariants
/// - `path` is absolute and resolved.
/// - `module` is the second hyphen-delimited segment of the file stem.
/// - `token` is the file stem and is assumed unique across the catalog for
///   collector correlation; same-named files in different suites would
///   silently collide (known gap, inherited from the protocol).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestCase {
    /// Module the test exercises, derived from the file name.
    pub module: String,
    /// Absolute, resolved path of the test file.
    pub path: PathBuf,
    /// Correlation token shared with the collector (file stem).
    pub token: String,
}

impl TestCase {
    /// Derives a test case from a file path, or `None` when the stem does not
    /// carry a module segment (e.g. a bare `test.js`).
    #[must_use]
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?.to_string();
        let module = stem.split('-').nth(1)?.to_string();
        Some(Self {
            module,
            path,
            token: stem,
        })
    }
}

/// Ordered tests for one module, in catalog sort order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleGroup {
    /// Module name shared by every test in the group.
    pub module: String,
    /// Tests restricted to this module, in catalog order.
    pub tests: Vec<TestCase>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Catalog discovery errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A directory under the test subtree could not be read.
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        /// Directory that failed to enumerate.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A matched test file could not be resolved to an absolute path.
    #[error("failed to resolve test path {path}: {source}")]
    Resolve {
        /// Test file that failed to resolve.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

// ============================================================================
// SECTION: Discovery
// ============================================================================

/// Discovers the ordered set of eligible test cases under `project_root`.
///
/// # Errors
/// Returns [`CatalogError`] when a directory cannot be enumerated or a
/// matched file cannot be resolved. A missing `test/` subtree yields an
/// empty catalog.
pub fn discover(
    project_root: &Path,
    lists: &SuppressionLists,
) -> Result<Vec<TestCase>, CatalogError> {
    let test_root = project_root.join(TEST_ROOT);
    let mut catalog = Vec::new();
    if test_root.is_dir() {
        walk(&test_root, lists, &mut catalog)?;
    }
    catalog.sort_by(|a, b| (&a.module, &a.path).cmp(&(&b.module, &b.path)));
    Ok(catalog)
}

/// Groups a sorted catalog by module, preserving catalog order.
#[must_use]
pub fn group_by_module(catalog: Vec<TestCase>) -> Vec<ModuleGroup> {
    let mut groups: Vec<ModuleGroup> = Vec::new();
    for case in catalog {
        match groups.last_mut() {
            Some(group) if group.module == case.module => group.tests.push(case),
            _ => groups.push(ModuleGroup {
                module: case.module.clone(),
                tests: vec![case],
            }),
        }
    }
    groups
}

/// Recursively collects eligible tests below `dir`.
fn walk(
    dir: &Path,
    lists: &SuppressionLists,
    catalog: &mut Vec<TestCase>,
) -> Result<(), CatalogError> {
    let entries = fs::read_dir(dir).map_err(|source| CatalogError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let runnable_suite = is_runnable_suite(dir, lists);
    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, lists, catalog)?;
        } else if runnable_suite && is_candidate_file(&path) {
            let resolved = fs::canonicalize(&path).map_err(|source| CatalogError::Resolve {
                path: path.clone(),
                source,
            })?;
            if let Some(case) = TestCase::from_path(resolved)
                && lists.is_module_under_test(&case.module)
            {
                catalog.push(case);
            }
        }
    }
    Ok(())
}

/// Returns true when `dir` is a recognized, non-ignored suite.
fn is_runnable_suite(dir: &Path, lists: &SuppressionLists) -> bool {
    let marked = dir.join(SUITE_MARKER).is_file();
    let ignored = dir
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| lists.is_ignored_suite(name));
    marked && !ignored
}

/// Returns true when `path` matches the `test-*.js` naming convention.
fn is_candidate_file(path: &Path) -> bool {
    let named_like_test = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.starts_with("test-"));
    let js_extension = path.extension().is_some_and(|ext| ext == "js");
    named_like_test && js_extension
}
