//! gmr - Gomoku match log reader
//!
//! Parses recorded Gomoku games and summarizes winning strategies.

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gmr::cli::{Cli, Commands, ConfigCommands};
use gmr::Config;

/// Commit the binary was built from; absent in release builds.
const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        git_sha = GIT_SHA.unwrap_or("release"),
        "starting"
    );

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };

    match cli.command {
        Commands::Analyze {
            inputs,
            parse,
            summarizer,
            plies_per_player,
            output,
            dry_run,
        } => {
            let mut config = Config::load_from(&config_path)?;
            commands::apply_parse_args(&mut config, &parse);
            commands::apply_summarizer_args(&mut config, &summarizer);
            commands::apply_plies_per_player(&mut config, plies_per_player);
            commands::analyze::handle(&config, &inputs, output, dry_run)
        }
        Commands::Reflect {
            inputs,
            opening,
            rest,
            parse,
            summarizer,
            plies_per_player,
            output,
            dry_run,
        } => {
            let mut config = Config::load_from(&config_path)?;
            commands::apply_parse_args(&mut config, &parse);
            commands::apply_summarizer_args(&mut config, &summarizer);
            commands::apply_plies_per_player(&mut config, plies_per_player);
            let split = opening.zip(rest);
            commands::reflect::handle(&config, &inputs, split, output, dry_run)
        }
        Commands::Summarize {
            input,
            summarizer,
            dry_run,
        } => {
            let mut config = Config::load_from(&config_path)?;
            commands::apply_summarizer_args(&mut config, &summarizer);
            commands::summarize::handle(&config, input, dry_run)
        }
        Commands::Split {
            inputs,
            parse,
            plies_per_player,
            opening,
            rest,
        } => {
            let mut config = Config::load_from(&config_path)?;
            commands::apply_parse_args(&mut config, &parse);
            commands::apply_plies_per_player(&mut config, plies_per_player);
            commands::split::handle(&config, &inputs, &opening, &rest)
        }
        Commands::Inspect {
            inputs,
            parse,
            json,
        } => {
            let mut config = Config::load_from(&config_path)?;
            commands::apply_parse_args(&mut config, &parse);
            commands::inspect::handle(&config, &inputs, json)
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(&config_path),
            ConfigCommands::Init { force } => commands::config::handle_init(&config_path, force),
        },
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise warnings, raised by `-v`/`-vv`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
