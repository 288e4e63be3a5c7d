//! Integration tests for reading game logs

use gmr::record::{LogFormat, RecordError};
use gmr::{GameLog, GameParser, Move, ParseMode, PhaseSegmenter};

use crate::helpers::{empty_board, fixture, load_fixture, temp_fixture};

fn parser() -> GameParser {
    GameParser::default()
}

#[test]
fn one_turn_game_on_full_board() {
    let mut board = empty_board(15).lines().map(String::from).collect::<Vec<_>>();
    board[3] = "[0,0,0,1,0,0,0,0,0,0,0,0,0,0,0]".to_string();
    let input = format!("player:1\nx,y:(3,3)\nstate:\n{}\nwinner:1\n", board.join("\n"));

    let log = GameLog::parse_str(&input, &parser()).unwrap();

    assert_eq!(log.format, LogFormat::Single);
    assert_eq!(log.games.len(), 1);
    let game = &log.games[0];
    assert_eq!(game.turns.len(), 1);
    assert_eq!(game.turns[0].player, 1);
    assert_eq!(game.turns[0].mv, Move::new(3, 3));
    assert_eq!(game.turns[0].state.get(3, 3), Some(1));
    assert_eq!(game.winner, Some(1));
}

#[test]
fn single_game_fixture() {
    let log = GameLog::parse(fixture("single_game.txt"), &parser()).unwrap();

    assert_eq!(log.games.len(), 1);
    let game = &log.games[0];
    assert_eq!(game.len(), 9);
    assert_eq!(game.winner, Some(1));
    assert_eq!(game.turns[0].mv, Move::new(7, 3));
    assert_eq!(game.turns[8].mv, Move::new(7, 7));
    let players: Vec<i32> = game.turns.iter().map(|t| t.player).collect();
    assert_eq!(players, [1, 2, 1, 2, 1, 2, 1, 2, 1]);
    assert_eq!(game.final_state().unwrap().stone_count(), 9);
}

#[test]
fn missing_winner_parses_without_error() {
    let log = GameLog::parse(fixture("missing_winner.txt"), &parser()).unwrap();

    assert_eq!(log.games.len(), 1);
    assert_eq!(log.games[0].len(), 4);
    assert_eq!(log.games[0].winner, None);
    assert_eq!(log.missing_winner_count(), 1);
    assert_eq!(log.complete_games().count(), 0);
}

#[test]
fn short_row_aborts_the_file() {
    let err = GameLog::parse(fixture("bad_row.txt"), &parser()).unwrap_err();

    assert!(err.is_format_error());
    match err {
        RecordError::RowWidth {
            line,
            expected,
            found,
        } => {
            assert_eq!(line, 25);
            assert_eq!(expected, 15);
            assert_eq!(found, 14);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sixteen_row_board_aborts_the_file() {
    let err = GameLog::parse(fixture("extra_row.txt"), &parser()).unwrap_err();

    assert!(err.is_format_error());
    match err {
        RecordError::ExtraRow { line, expected } => {
            assert_eq!(line, 19);
            assert_eq!(expected, 15);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn multi_game_fixture_in_delimiter_order() {
    let log = GameLog::parse(fixture("multi_game.txt"), &parser()).unwrap();

    assert_eq!(log.format, LogFormat::Multi);
    let numbers: Vec<_> = log.games.iter().map(|g| g.number).collect();
    assert_eq!(numbers, [Some(1), Some(2), Some(3)]);
    let winners: Vec<_> = log.games.iter().map(|g| g.winner).collect();
    assert_eq!(winners, [Some(1), Some(2), Some(1)]);
    let lengths: Vec<_> = log.games.iter().map(|g| g.len()).collect();
    assert_eq!(lengths, [9, 10, 11]);
}

#[test]
fn forcing_single_mode_reads_only_the_first_game() {
    let parser = GameParser::default().with_mode(ParseMode::Single);
    let log = GameLog::parse(fixture("multi_game.txt"), &parser).unwrap();

    assert_eq!(log.format, LogFormat::Single);
    assert_eq!(log.games.len(), 1);
    assert_eq!(log.games[0].len(), 9);
    assert_eq!(log.games[0].number, None);
}

#[test]
fn parsing_twice_gives_equal_games() {
    let content = load_fixture("multi_game.txt");
    let first = GameLog::parse_str(&content, &parser()).unwrap();
    let second = GameLog::parse_str(&content, &parser()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn file_and_string_parsing_agree() {
    let from_file = GameLog::parse(fixture("games/game_02.txt"), &parser()).unwrap();
    let from_str = GameLog::parse_str(&load_fixture("games/game_02.txt"), &parser()).unwrap();
    assert_eq!(from_file, from_str);
    assert_eq!(from_file.games[0].winner, Some(2));
}

#[test]
fn zero_turn_game_keeps_winner() {
    let log = GameLog::parse_str("\n\nwinner:2\n", &parser()).unwrap();
    assert_eq!(log.games.len(), 1);
    assert!(log.games[0].is_empty());
    assert_eq!(log.games[0].winner, Some(2));
}

#[test]
fn written_log_reparses_equal() {
    let (dir, path) = temp_fixture("multi_game.txt");
    let original = GameLog::parse(&path, &parser()).unwrap();

    let copy = dir.path().join("copy.txt");
    original.write(&copy).unwrap();

    assert_eq!(GameLog::parse(&copy, &parser()).unwrap(), original);
}

#[test]
fn split_logs_keep_every_turn() {
    let log = GameLog::parse(fixture("multi_game.txt"), &parser()).unwrap();
    let segmenter = PhaseSegmenter::default();

    let (opening, rest) = segmenter.split_log(&log);

    for ((game, head), tail) in log.games.iter().zip(&opening.games).zip(&rest.games) {
        assert_eq!(head.len() + tail.len(), game.len());
        assert_eq!(head.turns[..], game.turns[..head.len()]);
        assert_eq!(tail.winner, game.winner);
    }
    assert_eq!(rest.games[2].len(), 1);

    let reparsed = GameLog::parse_str(&rest.to_text(), &parser()).unwrap();
    assert_eq!(reparsed.games.len(), 3);
    assert_eq!(reparsed.games[2].turns, rest.games[2].turns);
}

#[test]
fn unreadable_file_is_a_read_error() {
    let err = GameLog::parse(fixture("does_not_exist.txt"), &parser()).unwrap_err();
    assert!(matches!(err, RecordError::Read { .. }));
    assert!(!err.is_format_error());
}
