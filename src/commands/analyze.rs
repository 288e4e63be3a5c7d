//! Analyze command handler

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use gmr::analyzer::backend::EchoBackend;
use gmr::analyzer::{create_backend, Pipeline, ReportWriter};
use gmr::files::collect_log_files;
use gmr::Config;

use super::report_skipped;

/// Analyze every game of `inputs` and write the analysis report.
///
/// With `dry_run` the prompts are printed and nothing is sent or written.
#[cfg(not(tarpaulin_include))]
pub fn handle(
    config: &Config,
    inputs: &[PathBuf],
    output: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let files = collect_log_files(inputs).context("Failed to list input files")?;
    if files.is_empty() {
        bail!("No game logs found in the given paths");
    }

    if dry_run {
        let pipeline = Pipeline::new(
            config.parser(),
            config.segmenter(),
            config.assembler(),
            &EchoBackend,
        );
        let jobs = pipeline.analysis_jobs(&files)?;
        for job in &jobs.jobs {
            println!("=== {} ===\n{}\n", job.label, job.prompt);
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

    let path = output.unwrap_or_else(|| config.output.analysis_file.clone());
    let mut report = ReportWriter::create(&path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    let summary = pipeline.analyze_files(&files, &mut report)?;

    report_skipped(&summary.skipped);
    println!(
        "Wrote {} analyses to {} ({} skipped)",
        summary.sections,
        path.display(),
        summary.skipped.len()
    );
    Ok(())
}
