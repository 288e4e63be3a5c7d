//! Split command handler

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use gmr::files::collect_log_files;
use gmr::record::LogFormat;
use gmr::{Config, GameLog};

/// Segment every game of `inputs` and write the two phase logs.
///
/// Files with format errors are reported and left out.
#[cfg(not(tarpaulin_include))]
pub fn handle(config: &Config, inputs: &[PathBuf], opening: &Path, rest: &Path) -> Result<()> {
    let files = collect_log_files(inputs).context("Failed to list input files")?;
    if files.is_empty() {
        bail!("No game logs found in the given paths");
    }

    let parser = config.parser();
    let mut games = Vec::new();
    for file in &files {
        match GameLog::parse(file, &parser) {
            Ok(log) => games.extend(log.games),
            Err(err) if err.is_format_error() => {
                eprintln!("Skipped {}: {}", file.display(), err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    let combined = GameLog::new(LogFormat::Multi, games);
    let (opening_log, rest_log) = config.segmenter().split_log(&combined);

    opening_log
        .write(opening)
        .with_context(|| format!("Failed to write {}", opening.display()))?;
    rest_log
        .write(rest)
        .with_context(|| format!("Failed to write {}", rest.display()))?;

    println!(
        "Split {} games at turn {}: {} and {}",
        combined.games.len(),
        config.segmenter().cutoff(),
        opening.display(),
        rest.display()
    );
    Ok(())
}
