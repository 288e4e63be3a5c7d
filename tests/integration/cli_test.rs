//! Integration tests for the gmr binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use gmr::{GameLog, GameParser};

use crate::helpers::{fixture, fixtures_dir};

/// gmr with its config file pointed into `home`.
///
/// stdin is a pipe, so confirmation prompts see a non-interactive session.
fn gmr(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gmr").expect("gmr binary not built");
    cmd.env("GMR_CONFIG", home.join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Help and usage
// ============================================================================

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    gmr(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("reflect"))
        .stdout(predicate::str::contains("summarize"));
}

#[test]
fn analyze_without_inputs_is_usage_error() {
    let home = TempDir::new().unwrap();
    gmr(home.path())
        .arg("analyze")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("required arguments"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    gmr(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_gmr"));
}

// ============================================================================
// inspect
// ============================================================================

#[test]
fn inspect_single_game() {
    let home = TempDir::new().unwrap();
    gmr(home.path())
        .arg("inspect")
        .arg(fixture("single_game.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("single game, 1 games, 0 without winner"))
        .stdout(predicate::str::contains(
            "game #1: 9 turns, winner player 1, 9 stones on the final board",
        ));
}

#[test]
fn inspect_reports_missing_winner() {
    let home = TempDir::new().unwrap();
    gmr(home.path())
        .arg("inspect")
        .arg(fixture("missing_winner.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 games, 1 without winner"))
        .stdout(predicate::str::contains("4 turns, winner missing"));
}

#[test]
fn inspect_bad_row_fails_after_listing() {
    let home = TempDir::new().unwrap();
    gmr(home.path())
        .arg("inspect")
        .arg(fixture("bad_row.txt"))
        .arg(fixture("single_game.txt"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("line 25 has 14 cells, expected 15"))
        .stdout(predicate::str::contains("game #1: 9 turns"))
        .stderr(predicate::str::contains("1 of 2 files could not be parsed"));
}

#[test]
fn inspect_json_lists_games() {
    let home = TempDir::new().unwrap();
    let output = gmr(home.path())
        .args(["inspect", "--json"])
        .arg(fixture("multi_game.txt"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let file = &parsed[0];
    assert_eq!(file["format"], "multi");
    assert_eq!(file["games"].as_array().unwrap().len(), 3);
    assert_eq!(file["games"][1]["number"], 2);
    assert_eq!(file["games"][1]["winner"], 2);
    assert_eq!(file["games"][0]["turns"][0]["move"]["x"], 7);
    assert_eq!(file["games"][0]["turns"][0]["state"][7][3], 1);
}

#[test]
fn board_size_flag_changes_row_check() {
    let home = TempDir::new().unwrap();
    gmr(home.path())
        .args(["inspect", "--board-size", "9"])
        .arg(fixture("single_game.txt"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("has 15 cells, expected 9"));
}

// ============================================================================
// split
// ============================================================================

#[test]
fn split_writes_both_phase_logs() {
    let home = TempDir::new().unwrap();
    let opening = home.path().join("opening.txt");
    let rest = home.path().join("rest.txt");

    gmr(home.path())
        .arg("split")
        .arg(fixture("multi_game.txt"))
        .arg("--opening")
        .arg(&opening)
        .arg("--rest")
        .arg(&rest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Split 3 games at turn 10"));

    let parser = GameParser::default();
    let opening_log = GameLog::parse(&opening, &parser).unwrap();
    let rest_log = GameLog::parse(&rest, &parser).unwrap();
    let opening_lengths: Vec<_> = opening_log.games.iter().map(|g| g.len()).collect();
    let rest_lengths: Vec<_> = rest_log.games.iter().map(|g| g.len()).collect();
    assert_eq!(opening_lengths, [9, 10, 10]);
    assert_eq!(rest_lengths, [0, 0, 1]);
    assert_eq!(rest_log.games[1].winner, Some(2));
}

// ============================================================================
// analyze / reflect / summarize
// ============================================================================

#[test]
fn analyze_directory_with_echo_backend() {
    let home = TempDir::new().unwrap();
    let report = home.path().join("analysis.txt");

    gmr(home.path())
        .args(["analyze", "--backend", "echo", "--output"])
        .arg(&report)
        .arg(fixtures_dir().join("games"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 analyses"))
        .stderr(predicate::str::contains(
            "Skipped game_03.txt: no winner recorded",
        ));

    let text = fs::read_to_string(&report).unwrap();
    assert!(text.starts_with(
        "Key position analysis for game_01.txt:\n[echo] The following is the record of one Gomoku game from game_01.txt."
    ));
    assert!(text.contains("Key position analysis for game_02.txt:\n"));
    assert!(!text.contains("game_03.txt"));
}

#[test]
fn analyze_dry_run_prints_prompts() {
    let home = TempDir::new().unwrap();
    gmr(home.path())
        .args(["analyze", "--dry-run"])
        .arg(fixture("single_game.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("=== single_game.txt ==="))
        .stdout(predicate::str::contains("Turn 1: player 1 plays at (7, 3). Board:"));
    assert!(!home.path().join("analysis.txt").exists());
}

#[test]
fn analyze_in_chinese() {
    let home = TempDir::new().unwrap();
    gmr(home.path())
        .args(["analyze", "--dry-run", "--language", "zh"])
        .arg(fixture("single_game.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("第1回合"));
}

#[test]
fn chat_backend_needs_api_key() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("config.toml"),
        "[backend.chat]\napi_key_env = \"GMR_TEST_UNSET_KEY\"\n",
    )
    .unwrap();

    gmr(home.path())
        .env_remove("GMR_TEST_UNSET_KEY")
        .args(["analyze", "--backend", "chat", "--output"])
        .arg(home.path().join("analysis.txt"))
        .arg(fixture("single_game.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GMR_TEST_UNSET_KEY"));
}

#[test]
fn reflect_then_summarize() {
    let home = TempDir::new().unwrap();
    let report = home.path().join("reflexion.txt");

    gmr(home.path())
        .args(["reflect", "--backend", "echo", "--output"])
        .arg(&report)
        .arg(fixture("multi_game.txt"))
        .assert()
        .success();

    let text = fs::read_to_string(&report).unwrap();
    assert!(text.starts_with("opening winning strategies:\n[echo] "));
    assert!(text.contains("\n\nmidgame-to-endgame winning strategies:\n[echo] "));

    gmr(home.path())
        .args(["summarize", "--dry-run"])
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Here is the summary of past Gomoku game strategies:\nopening winning strategies:",
        ));
}

#[test]
fn reflect_from_split_logs() {
    let home = TempDir::new().unwrap();
    let opening = home.path().join("opening.txt");
    let rest = home.path().join("rest.txt");
    gmr(home.path())
        .arg("split")
        .arg(fixture("multi_game.txt"))
        .arg("--opening")
        .arg(&opening)
        .arg("--rest")
        .arg(&rest)
        .assert()
        .success();

    gmr(home.path())
        .args(["reflect", "--dry-run", "--opening"])
        .arg(&opening)
        .arg("--rest")
        .arg(&rest)
        .assert()
        .success()
        .stdout(predicate::str::contains("=== opening.txt game 3 [opening] ==="))
        .stdout(predicate::str::contains("=== rest.txt game 3 [midgame-to-end] ==="))
        .stdout(predicate::str::contains("Turn 11: player 1 plays at (6, 10)."));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_show_prints_defaults() {
    let home = TempDir::new().unwrap();
    gmr(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[board]"))
        .stdout(predicate::str::contains("size = 15"))
        .stdout(predicate::str::contains("model = \"deepseek-chat\""));
}

#[test]
fn config_init_does_not_overwrite_without_force() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("config.toml");

    gmr(home.path()).args(["config", "init"]).assert().success();
    assert!(path.exists());

    fs::write(&path, "[board]\nsize = 9\n").unwrap();
    gmr(home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes made."));
    assert_eq!(fs::read_to_string(&path).unwrap(), "[board]\nsize = 9\n");

    gmr(home.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&path).unwrap().contains("size = 15"));
}

#[test]
fn config_file_board_size_is_used() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("config.toml"), "[board]\nsize = 9\n").unwrap();

    gmr(home.path())
        .arg("inspect")
        .arg(fixture("single_game.txt"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("expected 9"));
}
