//! Game record errors.

use std::path::PathBuf;

/// Errors that abort parsing of one game log file.
///
/// Line numbers refer to the original file, counting from 1.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Board row on line {line} has {found} cells, expected {expected}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line} is not a board row: {content:?}")]
    MalformedRow { line: usize, content: String },

    #[error("Line {line} is a board row past the last of {expected}")]
    ExtraRow { line: usize, expected: usize },

    #[error("Board starting on line {line} ends after {found} rows, expected {expected}")]
    TruncatedBoard {
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl RecordError {
    /// Whether this is a structural problem in the file content
    /// (as opposed to the file being unreadable).
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Self::Read { .. })
    }
}
