//! Summarize command handler

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use gmr::analyzer::backend::EchoBackend;
use gmr::analyzer::{create_backend, Pipeline};
use gmr::Config;

/// Print the winning strategies summarized from a reflexion report.
#[cfg(not(tarpaulin_include))]
pub fn handle(config: &Config, input: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let path = input.unwrap_or_else(|| config.output.reflexion_file.clone());
    let reflexion = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read reflexion report {}", path.display()))?;

    if dry_run {
        println!("{}", config.assembler().summary_prompt(&reflexion));
        return Ok(());
    }

    let backend = create_backend(&config.backend, config.prompt.language)?;
    let pipeline = Pipeline::new(
        config.parser(),
        config.segmenter(),
        config.assembler(),
        backend.as_ref(),
    );
    println!("{}", pipeline.summarize_strategies(&reflexion)?);
    Ok(())
}
