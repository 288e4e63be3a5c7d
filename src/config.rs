//! Configuration file.
//!
//! Lives at `$GMR_CONFIG` when set, otherwise at `<config dir>/gmr/config.toml`.
//! Every field has a default, so a missing file or a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analyzer::{
    AnalysisConfig, BackendConfig, OutputConfig, PhaseSegmenter, PromptAssembler, PromptConfig,
};
use crate::record::{GameParser, DEFAULT_BOARD_SIZE};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "GMR_CONFIG";

/// `[board]` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Side length of the recorded boards
    pub size: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
        }
    }
}

/// Effective configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub board: BoardConfig,
    pub analysis: AnalysisConfig,
    pub prompt: PromptConfig,
    pub backend: BackendConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Path of the config file.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join("gmr").join("config.toml"))
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn parser(&self) -> GameParser {
        GameParser::new(self.board.size).with_mode(self.analysis.mode)
    }

    pub fn segmenter(&self) -> PhaseSegmenter {
        self.analysis.segmenter()
    }

    pub fn assembler(&self) -> PromptAssembler {
        PromptAssembler::new(&self.prompt, self.board.size, self.segmenter())
    }
}
