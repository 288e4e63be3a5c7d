//! Turning parsed games into strategy summaries.
//!
//! - [`phase`] - opening / midgame-to-end segmentation
//! - [`prompt`] - prompt templates and assembly
//! - [`backend`] - the [`Summarizer`] capability and its implementations
//! - [`report`] - report files
//! - [`pipeline`] - the analyze, reflect and summarize workflows
//!
//! Parsing and prompt assembly never touch the network; only a
//! [`Summarizer`] does.

pub mod backend;
mod config;
pub mod phase;
pub mod pipeline;
pub mod prompt;
pub mod report;

pub use backend::{create_backend, BackendConfig, BackendError, BackendKind, Summarizer};
pub use config::{AnalysisConfig, OutputConfig};
pub use phase::{Phase, PhaseSegmenter, PhaseSlice};
pub use pipeline::{Pipeline, PipelineError, PhaseSources, RunSummary, SkipReason, Skipped};
pub use prompt::{Language, PromptAssembler, PromptConfig};
pub use report::ReportWriter;
