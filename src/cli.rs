//! Command-line interface definitions.
//!
//! Kept in the library so `xtask` can generate man pages from the same
//! definitions the binary parses.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::analyzer::{BackendKind, Language};
use crate::record::ParseMode;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("GMR_BUILD_DATE"),
    ")"
);

/// Gomoku match log reader and strategy analyzer.
#[derive(Debug, Parser)]
#[command(name = "gmr", version, long_version = LONG_VERSION)]
#[command(about = "Parse recorded Gomoku games and summarize winning strategies")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of $GMR_CONFIG or the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ask the summarizer for the key positions of every game
    ///
    /// Directories are expanded to their *.txt files, sorted by name.
    /// The report is truncated first and gets one section per game.
    Analyze {
        /// Game log files or directories
        #[arg(required = true, value_name = "PATH")]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        parse: ParseArgs,

        #[command(flatten)]
        summarizer: SummarizerArgs,

        /// Opening length used in the prompt's instructions
        #[arg(long, value_name = "N")]
        plies_per_player: Option<usize>,

        /// Report file [default: config output.analysis_file]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the prompts instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Summarize the winning strategies of each game phase
    ///
    /// Either segments whole-game logs, or reads logs that were split with
    /// `gmr split` (--opening and --rest).
    Reflect {
        /// Whole-game log files or directories
        #[arg(
            value_name = "PATH",
            required_unless_present = "opening",
            conflicts_with_all = ["opening", "rest"]
        )]
        inputs: Vec<PathBuf>,

        /// Pre-split opening log
        #[arg(long, value_name = "FILE", requires = "rest")]
        opening: Option<PathBuf>,

        /// Pre-split midgame-to-end log
        #[arg(long, value_name = "FILE", requires = "opening")]
        rest: Option<PathBuf>,

        #[command(flatten)]
        parse: ParseArgs,

        #[command(flatten)]
        summarizer: SummarizerArgs,

        /// Stones each player places in the opening
        #[arg(long, value_name = "N")]
        plies_per_player: Option<usize>,

        /// Report file [default: config output.reflexion_file]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the prompts instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Summarize the winning strategies collected by `gmr reflect`
    Summarize {
        /// Reflexion report [default: config output.reflexion_file]
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        #[command(flatten)]
        summarizer: SummarizerArgs,

        /// Print the prompt instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Split games into an opening log and a midgame-to-end log
    Split {
        /// Game log files or directories
        #[arg(required = true, value_name = "PATH")]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        parse: ParseArgs,

        /// Stones each player places in the opening
        #[arg(long, value_name = "N")]
        plies_per_player: Option<usize>,

        /// Output file for the openings
        #[arg(long, value_name = "FILE", default_value = "opening.txt")]
        opening: PathBuf,

        /// Output file for the midgame-to-end parts
        #[arg(long, value_name = "FILE", default_value = "midgame_to_end.txt")]
        rest: PathBuf,
    },

    /// Show what a log file contains
    Inspect {
        /// Game log files or directories
        #[arg(required = true, value_name = "PATH")]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        parse: ParseArgs,

        /// Print the parsed games as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },
}

/// Options controlling how logs are parsed.
#[derive(Debug, Clone, Default, Args)]
pub struct ParseArgs {
    /// Board side length [default: config board.size]
    #[arg(long, value_name = "N")]
    pub board_size: Option<usize>,

    /// How `game:` delimiters are treated [default: config analysis.mode]
    #[arg(long, value_enum)]
    pub mode: Option<ParseMode>,
}

/// Options selecting and configuring the summarizer.
#[derive(Debug, Clone, Default, Args)]
pub struct SummarizerArgs {
    /// Summarizer backend [default: config backend.kind]
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Prompt language [default: config prompt.language]
    #[arg(long, value_enum)]
    pub language: Option<Language>,

    /// Seconds to wait for each reply [default: config backend.timeout_secs]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}
