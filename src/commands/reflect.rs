//! Reflect command handler

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use gmr::analyzer::backend::EchoBackend;
use gmr::analyzer::{create_backend, PhaseSources, Pipeline, ReportWriter};
use gmr::files::collect_log_files;
use gmr::Config;

use super::report_skipped;

/// Summarize per-phase strategies into the reflexion report.
///
/// `split` holds pre-split `(opening, rest)` logs; otherwise `inputs` are
/// segmented.
#[cfg(not(tarpaulin_include))]
pub fn handle(
    config: &Config,
    inputs: &[PathBuf],
    split: Option<(PathBuf, PathBuf)>,
    output: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let sources = match split {
        Some((opening, rest)) => PhaseSources::Split { opening, rest },
        None => {
            let files = collect_log_files(inputs).context("Failed to list input files")?;
            if files.is_empty() {
                bail!("No game logs found in the given paths");
            }
            PhaseSources::Segment(files)
        }
    };

    if dry_run {
        let pipeline = Pipeline::new(
            config.parser(),
            config.segmenter(),
            config.assembler(),
            &EchoBackend,
        );
        let jobs = pipeline.reflexion_jobs(&sources)?;
        for (phase, phase_jobs) in &jobs.phases {
            for job in phase_jobs {
                println!("=== {} [{}] ===\n{}\n", job.label, phase.id(), job.prompt);
            }
        }
        report_skipped(&jobs.skipped);
        return Ok(());
    }

    let backend = create_backend(&config.backend, config.prompt.language)?;
    let pipeline = Pipeline::new(
        config.parser(),
        config.segmenter(),
        config.assembler(),
        backend.as_ref(),
    );

    let path = output.unwrap_or_else(|| config.output.reflexion_file.clone());
    let mut report = ReportWriter::create(&path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    let summary = pipeline.reflect(&sources, &mut report)?;

    report_skipped(&summary.skipped);
    println!(
        "Wrote {} phase summaries from {} replies to {}",
        summary.sections,
        summary.replies,
        path.display()
    );
    Ok(())
}
