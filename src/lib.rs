//! Gomoku match log reader.
//!
//! Parses the line-oriented logs written by Gomoku game recorders into
//! [`Game`]s, splits them into opening and midgame-to-end phases, and builds
//! the prompts a language model turns into strategy summaries.
//!
//! - [`record`] - log grammar, data model, parser and writer
//! - [`analyzer`] - phases, prompts, summarizer backends and workflows
//! - [`config`] - configuration file
//! - [`files`] - input discovery
//! - [`cli`] - command-line definitions

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod files;
pub mod record;

pub use analyzer::{Phase, PhaseSegmenter, Pipeline, PromptAssembler, Summarizer};
pub use config::Config;
pub use record::{BoardState, Game, GameLog, GameParser, Move, ParseMode, RecordError, Turn};
