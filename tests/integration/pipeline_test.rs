//! Integration tests for the analysis workflows

use std::fs;
use std::sync::Mutex;

use tempfile::TempDir;

use gmr::analyzer::backend::{BackendResult, EchoBackend};
use gmr::analyzer::{PhaseSources, Pipeline, ReportWriter, SkipReason, Summarizer};
use gmr::files::collect_log_files;
use gmr::Config;

use crate::helpers::{fixture, fixtures_dir};

/// Records prompts and replies with a fixed text.
#[derive(Default)]
struct RecordingBackend {
    prompts: Mutex<Vec<String>>,
}

impl Summarizer for RecordingBackend {
    fn summarize(&self, prompt: &str) -> BackendResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("Block open fours early.".to_string())
    }
}

fn pipeline<'a>(config: &Config, backend: &'a dyn Summarizer) -> Pipeline<'a> {
    Pipeline::new(
        config.parser(),
        config.segmenter(),
        config.assembler(),
        backend,
    )
}

#[test]
fn directory_analysis_skips_unfinished_game() {
    let config = Config::default();
    let files = collect_log_files(&[fixtures_dir().join("games")]).unwrap();
    assert_eq!(files.len(), 3);

    let dir = TempDir::new().unwrap();
    let backend = RecordingBackend::default();
    let mut report = ReportWriter::create(dir.path().join("analysis.txt")).unwrap();

    let summary = pipeline(&config, &backend)
        .analyze_files(&files, &mut report)
        .unwrap();

    assert_eq!(summary.sections, 2);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].label, "game_03.txt");
    assert_eq!(summary.skipped[0].reason, SkipReason::MissingWinner);

    let text = fs::read_to_string(report.path()).unwrap();
    assert_eq!(
        text,
        "Key position analysis for game_01.txt:\nBlock open fours early.\n\n\
         Key position analysis for game_02.txt:\nBlock open fours early.\n\n"
    );

    let prompts = backend.prompts.lock().unwrap();
    assert!(prompts[0].contains("game_01.txt"));
    assert!(prompts[0].contains("Turn 9: player 1 plays at (7, 7)."));
    assert!(prompts[1].contains("The winner of this game is player 2."));
}

#[test]
fn prompt_turns_appear_in_play_order() {
    let config = Config::default();
    let jobs = pipeline(&config, &EchoBackend)
        .analysis_jobs(&[fixture("single_game.txt")])
        .unwrap();

    let prompt = &jobs.jobs[0].prompt;
    let positions: Vec<usize> = (1..=9)
        .map(|n| prompt.find(&format!("Turn {n}: ")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(prompt.contains("first 10 turns"));
}

#[test]
fn bad_file_is_reported_not_fatal() {
    let config = Config::default();
    let jobs = pipeline(&config, &EchoBackend)
        .analysis_jobs(&[fixture("bad_row.txt"), fixture("single_game.txt")])
        .unwrap();

    assert_eq!(jobs.jobs.len(), 1);
    assert_eq!(jobs.skipped[0].label, "bad_row.txt");
    match &jobs.skipped[0].reason {
        SkipReason::Format(message) => assert!(message.contains("line 25")),
        other => panic!("unexpected reason: {other:?}"),
    }
}

#[test]
fn reflexion_over_multi_game_log() {
    let config = Config::default();
    let dir = TempDir::new().unwrap();
    let backend = RecordingBackend::default();
    let mut report = ReportWriter::create(dir.path().join("reflexion.txt")).unwrap();

    let summary = pipeline(&config, &backend)
        .reflect(
            &PhaseSources::Segment(vec![fixture("multi_game.txt")]),
            &mut report,
        )
        .unwrap();

    // Three openings; only game 3 lasts beyond the tenth turn.
    assert_eq!(summary.replies, 4);
    let text = fs::read_to_string(report.path()).unwrap();
    assert!(text.starts_with(
        "opening winning strategies:\nBlock open fours early.\nBlock open fours early.\nBlock open fours early.\n\n"
    ));
    assert!(text.ends_with("midgame-to-endgame winning strategies:\nBlock open fours early.\n\n"));

    let prompts = backend.prompts.lock().unwrap();
    assert!(prompts[3].contains("Turn 11: player 1 plays at (6, 10)."));
    assert!(!prompts[3].contains("Turn 10:"));
}

#[test]
fn summary_prompt_includes_reflexion_text() {
    let config = Config::default();
    let reflexion = "opening winning strategies:\nTake the center.\n\n";
    let prompt = config.assembler().summary_prompt(reflexion);

    assert!(prompt.starts_with("Here is the summary of past Gomoku game strategies:\n"));
    assert!(prompt.contains("Take the center."));
    assert!(prompt.ends_with("Please analyze and summarize the winning strategies."));

    let reply = pipeline(&config, &EchoBackend)
        .summarize_strategies(reflexion)
        .unwrap();
    assert!(reply.starts_with("[echo] Here is the summary of past Gomoku game strategies:"));
}
