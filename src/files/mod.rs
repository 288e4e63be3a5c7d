//! Input file discovery.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension of game log files picked up from directories.
pub const LOG_EXTENSION: &str = "txt";

/// Expand command-line inputs into a list of log files.
///
/// Files are kept as given, in order. A directory contributes its `*.txt`
/// entries sorted by file name; subdirectories are not searched.
pub fn collect_log_files(inputs: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = log_files_in(input)?;
            tracing::debug!(dir = %input.display(), files = found.len(), "scanned directory");
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn log_files_in(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == LOG_EXTENSION) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
