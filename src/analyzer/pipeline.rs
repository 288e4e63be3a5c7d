//! Orchestration of parse, prompt, summarize and report.
//!
//! Files are parsed in parallel; everything after parsing runs sequentially in
//! input order. A file with a format error and a game without a winner are
//! skipped and reported. Read, backend and report errors end the run.

use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::backend::{BackendError, Summarizer};
use super::phase::{Phase, PhaseSegmenter, PhaseSlice};
use super::prompt::PromptAssembler;
use super::report::ReportWriter;
use crate::record::{Game, GameLog, GameParser, LogFormat, RecordError};

/// Errors that stop a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Summarizer failed for {label}: {source}")]
    Backend {
        label: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to write report: {0}")]
    Report(#[source] io::Error),
}

/// Why an input was left out of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The game has no `winner:` record
    MissingWinner,
    /// The file could not be parsed
    Format(String),
}

/// An input left out of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub label: String,
    pub reason: SkipReason,
}

impl std::fmt::Display for Skipped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            SkipReason::MissingWinner => write!(f, "{}: no winner recorded", self.label),
            SkipReason::Format(message) => write!(f, "{}: {}", self.label, message),
        }
    }
}

/// A prompt ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptJob {
    pub label: String,
    pub prompt: String,
}

/// Game-analysis prompts for a set of files.
#[derive(Debug, Default)]
pub struct AnalysisJobs {
    pub jobs: Vec<PromptJob>,
    pub skipped: Vec<Skipped>,
}

/// Reflexion prompts grouped by phase, opening first.
#[derive(Debug, Default)]
pub struct ReflexionJobs {
    pub phases: Vec<(Phase, Vec<PromptJob>)>,
    pub skipped: Vec<Skipped>,
}

/// Outcome of a run that wrote a report.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of summarizer calls made
    pub replies: usize,
    /// Sections appended to the report
    pub sections: usize,
    pub skipped: Vec<Skipped>,
}

/// Where phase games come from.
#[derive(Debug, Clone)]
pub enum PhaseSources {
    /// Logs already split into an opening log and a midgame-to-end log
    Split { opening: PathBuf, rest: PathBuf },
    /// Whole-game logs, segmented on the fly
    Segment(Vec<PathBuf>),
}

/// A successfully parsed file.
struct LoadedLog {
    name: String,
    log: GameLog,
}

impl LoadedLog {
    /// Single-game files are labelled by file name, games of multi-game files
    /// additionally by their number.
    fn game_label(&self, index: usize, game: &Game) -> String {
        match self.log.format {
            LogFormat::Single => self.name.clone(),
            LogFormat::Multi => format!("{} {}", self.name, game.display_name(index)),
        }
    }
}

/// Runs the analysis workflows against one summarizer.
pub struct Pipeline<'a> {
    parser: GameParser,
    segmenter: PhaseSegmenter,
    assembler: PromptAssembler,
    backend: &'a dyn Summarizer,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        parser: GameParser,
        segmenter: PhaseSegmenter,
        assembler: PromptAssembler,
        backend: &'a dyn Summarizer,
    ) -> Self {
        Self {
            parser,
            segmenter,
            assembler,
            backend,
        }
    }

    /// Build one full-game prompt per complete game of `paths`.
    pub fn analysis_jobs(&self, paths: &[PathBuf]) -> Result<AnalysisJobs, PipelineError> {
        let logs = self.load(paths)?;
        let mut skipped = Vec::new();
        let mut jobs = Vec::new();

        for (label, game) in complete_games(&logs, &mut skipped) {
            let prompt = self.assembler.game_prompt(&game.turns, game.winner, &label);
            jobs.push(PromptJob { label, prompt });
        }

        Ok(AnalysisJobs { jobs, skipped })
    }

    /// Analyze every complete game and append one section per game to `report`.
    pub fn analyze_files(
        &self,
        paths: &[PathBuf],
        report: &mut ReportWriter,
    ) -> Result<RunSummary, PipelineError> {
        let AnalysisJobs { jobs, skipped } = self.analysis_jobs(paths)?;
        let language = self.assembler.language();
        let mut summary = RunSummary {
            skipped,
            ..RunSummary::default()
        };

        for job in jobs {
            let reply = self.summarize(&job)?;
            summary.replies += 1;
            report
                .append_section(&language.analysis_heading(&job.label), &reply)
                .map_err(PipelineError::Report)?;
            summary.sections += 1;
        }

        info!(
            report = %report.path().display(),
            sections = summary.sections,
            skipped = summary.skipped.len(),
            "analysis finished"
        );
        Ok(summary)
    }

    /// Build the phase prompts for every complete game.
    ///
    /// Slices without turns are left out since they have nothing to reflect on.
    pub fn reflexion_jobs(&self, sources: &PhaseSources) -> Result<ReflexionJobs, PipelineError> {
        let mut opening_jobs = Vec::new();
        let mut rest_jobs = Vec::new();
        let mut skipped = Vec::new();

        match sources {
            PhaseSources::Split { opening, rest } => {
                let inputs = [
                    (Phase::Opening, opening, &mut opening_jobs),
                    (Phase::MidgameToEnd, rest, &mut rest_jobs),
                ];
                for (phase, path, jobs) in inputs {
                    let logs = self.load(std::slice::from_ref(path))?;
                    let played_before = match phase {
                        Phase::Opening => 0,
                        Phase::MidgameToEnd => self.segmenter.cutoff(),
                    };
                    for (label, game) in complete_games(&logs, &mut skipped) {
                        let slice = PhaseSlice::whole(game, phase).numbered_after(played_before);
                        jobs.extend(self.phase_job(label, &slice));
                    }
                }
            }
            PhaseSources::Segment(paths) => {
                let logs = self.load(paths)?;
                for (label, game) in complete_games(&logs, &mut skipped) {
                    let (opening, rest) = self.segmenter.split(game);
                    opening_jobs.extend(self.phase_job(label.clone(), &opening));
                    rest_jobs.extend(self.phase_job(label, &rest));
                }
            }
        }

        Ok(ReflexionJobs {
            phases: vec![
                (Phase::Opening, opening_jobs),
                (Phase::MidgameToEnd, rest_jobs),
            ],
            skipped,
        })
    }

    fn phase_job(&self, label: String, slice: &PhaseSlice<'_>) -> Option<PromptJob> {
        if slice.is_empty() {
            debug!(label = %label, phase = slice.phase().id(), "empty phase slice");
            return None;
        }
        Some(PromptJob {
            label,
            prompt: self.assembler.phase_prompt(slice),
        })
    }

    /// Summarize every phase prompt and append one section per phase to
    /// `report`, the replies joined by newlines.
    pub fn reflect(
        &self,
        sources: &PhaseSources,
        report: &mut ReportWriter,
    ) -> Result<RunSummary, PipelineError> {
        let ReflexionJobs { phases, skipped } = self.reflexion_jobs(sources)?;
        let language = self.assembler.language();
        let mut summary = RunSummary {
            skipped,
            ..RunSummary::default()
        };

        for (phase, jobs) in phases {
            let mut replies = Vec::with_capacity(jobs.len());
            for job in &jobs {
                replies.push(self.summarize(job)?);
            }
            summary.replies += replies.len();
            info!(phase = phase.id(), replies = replies.len(), "phase reflected");
            report
                .append_section(&language.reflexion_heading(phase), &replies.join("\n"))
                .map_err(PipelineError::Report)?;
            summary.sections += 1;
        }

        Ok(summary)
    }

    /// Ask for the winning strategies across a reflexion report's text.
    pub fn summarize_strategies(&self, reflexion: &str) -> Result<String, PipelineError> {
        let job = PromptJob {
            label: "strategy summary".to_string(),
            prompt: self.assembler.summary_prompt(reflexion),
        };
        self.summarize(&job)
    }

    fn summarize(&self, job: &PromptJob) -> Result<String, PipelineError> {
        debug!(label = %job.label, backend = self.backend.name(), "summarizing");
        self.backend
            .summarize(&job.prompt)
            .map_err(|source| PipelineError::Backend {
                label: job.label.clone(),
                source,
            })
    }

    /// Parse `paths` in parallel, one entry per path in input order.
    ///
    /// Format errors skip the file; read errors end the run.
    fn load(&self, paths: &[PathBuf]) -> Result<Vec<Result<LoadedLog, Skipped>>, PipelineError> {
        let parser = &self.parser;
        let results: Vec<(String, Result<GameLog, RecordError>)> = paths
            .par_iter()
            .map(|path| (file_label(path), GameLog::parse(path, parser)))
            .collect();

        let mut logs = Vec::with_capacity(results.len());
        for (name, result) in results {
            match result {
                Ok(log) => {
                    debug!(file = %name, games = log.games.len(), "parsed");
                    logs.push(Ok(LoadedLog { name, log }));
                }
                Err(err) if err.is_format_error() => {
                    warn!(file = %name, error = %err, "skipping unparsable file");
                    logs.push(Err(Skipped {
                        label: name,
                        reason: SkipReason::Format(err.to_string()),
                    }));
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(logs)
    }
}

/// Labelled games that have a winner.
///
/// Unparsable files and games without a winner are appended to `skipped` in
/// input order.
fn complete_games<'l>(
    logs: &'l [Result<LoadedLog, Skipped>],
    skipped: &mut Vec<Skipped>,
) -> Vec<(String, &'l Game)> {
    let mut games = Vec::new();
    for loaded in logs {
        let loaded = match loaded {
            Ok(loaded) => loaded,
            Err(skip) => {
                skipped.push(skip.clone());
                continue;
            }
        };
        for (index, game) in loaded.log.games.iter().enumerate() {
            let label = loaded.game_label(index, game);
            if game.is_complete() {
                games.push((label, game));
            } else {
                warn!(label = %label, "skipping game without winner");
                skipped.push(Skipped {
                    label,
                    reason: SkipReason::MissingWinner,
                });
            }
        }
    }
    games
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
