//! Subcommand handlers.

pub mod analyze;
pub mod completions;
pub mod config;
pub mod inspect;
pub mod reflect;
pub mod split;
pub mod summarize;

use gmr::analyzer::Skipped;
use gmr::cli::{ParseArgs, SummarizerArgs};
use gmr::Config;

/// Apply `--board-size` and `--mode` on top of the config file.
pub fn apply_parse_args(config: &mut Config, args: &ParseArgs) {
    if let Some(size) = args.board_size {
        config.board.size = size;
    }
    if let Some(mode) = args.mode {
        config.analysis.mode = mode;
    }
}

/// Apply `--backend`, `--language` and `--timeout` on top of the config file.
pub fn apply_summarizer_args(config: &mut Config, args: &SummarizerArgs) {
    if let Some(kind) = args.backend {
        config.backend.kind = kind;
    }
    if let Some(language) = args.language {
        config.prompt.language = language;
    }
    if let Some(secs) = args.timeout {
        config.backend.timeout_secs = secs;
    }
}

pub fn apply_plies_per_player(config: &mut Config, plies: Option<usize>) {
    if let Some(plies) = plies {
        config.analysis.opening_plies_per_player = plies;
    }
}

/// Tell the operator what was left out.
pub fn report_skipped(skipped: &[Skipped]) {
    for skip in skipped {
        eprintln!("Skipped {skip}");
    }
}
