//! Inspect command handler

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use humansize::{format_size, DECIMAL};
use serde_json::json;

use gmr::files::collect_log_files;
use gmr::record::LogFormat;
use gmr::{Config, GameLog};

/// Print the games found in each file, or all of them as JSON.
///
/// Keeps going past unparsable files and fails at the end if there were any.
#[cfg(not(tarpaulin_include))]
pub fn handle(config: &Config, inputs: &[PathBuf], as_json: bool) -> Result<()> {
    let files = collect_log_files(inputs).context("Failed to list input files")?;
    if files.is_empty() {
        bail!("No game logs found in the given paths");
    }

    let parser = config.parser();
    let mut entries = Vec::new();
    let mut failures = 0usize;

    for file in &files {
        let size = fs::metadata(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
            .len();

        let log = match GameLog::parse(file, &parser) {
            Ok(log) => log,
            Err(err) if err.is_format_error() => {
                failures += 1;
                if as_json {
                    entries.push(json!({
                        "file": file.display().to_string(),
                        "size": size,
                        "error": err.to_string(),
                    }));
                } else {
                    println!("{}: error: {}", file.display(), err);
                }
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if as_json {
            entries.push(json!({
                "file": file.display().to_string(),
                "size": size,
                "format": log.format,
                "games": log.games,
            }));
        } else {
            print_log(file, size, &log);
        }
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    }

    if failures > 0 {
        bail!("{} of {} files could not be parsed", failures, files.len());
    }
    Ok(())
}

fn print_log(file: &std::path::Path, size: u64, log: &GameLog) {
    let format = match log.format {
        LogFormat::Single => "single game",
        LogFormat::Multi => "multi game",
    };
    println!(
        "{} ({}, {}, {} games, {} without winner)",
        file.display(),
        format_size(size, DECIMAL),
        format,
        log.games.len(),
        log.missing_winner_count()
    );
    for (index, game) in log.games.iter().enumerate() {
        let winner = game
            .winner
            .map_or_else(|| "missing".to_string(), |w| format!("player {w}"));
        let stones = game.final_state().map_or(0, |state| state.stone_count());
        println!(
            "  {}: {} turns, winner {}, {} stones on the final board",
            game.display_name(index),
            game.len(),
            winner,
            stones
        );
    }
}
