//! Report files.
//!
//! A report is truncated once when a run starts and then grows one titled
//! section per summarizer reply, so a crash mid-run leaves every finished
//! section on disk.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Appends titled sections to a report file.
#[derive(Debug)]
pub struct ReportWriter {
    path: PathBuf,
    sections: usize,
}

impl ReportWriter {
    /// Create (or truncate) the report at `path`, creating parent directories.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        File::create(&path)?;
        tracing::debug!(path = %path.display(), "report truncated");
        Ok(Self { path, sections: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of sections written so far.
    pub fn sections(&self) -> usize {
        self.sections
    }

    /// Append `"{title}:\n{body}\n\n"`.
    pub fn append_section(&mut self, title: &str, body: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        write!(file, "{title}:\n{body}\n\n")?;
        file.flush()?;
        self.sections += 1;
        Ok(())
    }
}
