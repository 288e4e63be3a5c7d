//! Shared test helpers

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Directory holding the sample logs.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Path of one fixture.
pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Contents of one fixture.
pub fn load_fixture(name: &str) -> String {
    fs::read_to_string(fixture(name)).expect("Failed to read fixture")
}

/// Copy a fixture into a fresh temp dir, returning both.
pub fn temp_fixture(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::copy(fixture(name), &path).expect("Failed to copy fixture");
    (dir, path)
}

/// `size` rows of `size` zeros in the log's bracketed form.
pub fn empty_board(size: usize) -> String {
    let row = format!("[{}]", vec!["0"; size].join(","));
    vec![row; size].join("\n")
}
