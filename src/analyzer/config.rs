//! Configuration for the analysis workflows.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::phase::PhaseSegmenter;
use crate::record::ParseMode;

/// `[analysis]` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Stones each player places in the opening
    pub opening_plies_per_player: usize,
    /// How `game:` delimiters are treated
    pub mode: ParseMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            opening_plies_per_player: PhaseSegmenter::DEFAULT_PLIES_PER_PLAYER,
            mode: ParseMode::Auto,
        }
    }
}

impl AnalysisConfig {
    pub fn segmenter(&self) -> PhaseSegmenter {
        PhaseSegmenter::new(self.opening_plies_per_player)
    }
}

/// `[output]` section of the config file.
///
/// Relative paths resolve against the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report written by `gmr analyze`
    pub analysis_file: PathBuf,
    /// Report written by `gmr reflect` and read by `gmr summarize`
    pub reflexion_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            analysis_file: PathBuf::from("analysis.txt"),
            reflexion_file: PathBuf::from("reflexion.txt"),
        }
    }
}
