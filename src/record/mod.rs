//! Gomoku match log reader and writer.
//!
//! A match log is line oriented:
//!
//! ```text
//! game:1              <- optional multi-game delimiter
//! player:1
//! x,y:(7,7)
//! state:
//! [0,0,...,0]         <- board_size rows of board_size cells
//! ...
//! winner:1
//! ```
//!
//! Blank lines are insignificant. [`filter_lines`] produces the dense line
//! sequence, [`GameParser`] turns it into [`Game`]s, and [`GameLog`] bundles
//! both with file I/O and writes games back out in the same grammar.

mod board;
mod error;
mod line;
mod parser;

use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::Serialize;

pub use board::{parse_row, render_row, BoardState, Cell, EMPTY};
pub use error::RecordError;
pub use line::Record;
pub use parser::{GameParser, ParseMode};

/// Board side length used when nothing else is configured.
pub const DEFAULT_BOARD_SIZE: usize = 15;

/// A non-empty, trimmed line together with its 1-based line number in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

impl Line {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Trim every line and drop the empty ones, keeping source order.
pub fn filter_lines(content: &str) -> Vec<Line> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let text = raw.trim();
            (!text.is_empty()).then(|| Line::new(i + 1, text))
        })
        .collect()
}

/// Read and filter lines from a reader.
///
/// Fails with `InvalidData` when the input is not UTF-8.
pub fn read_lines<R: BufRead>(reader: R) -> std::io::Result<Vec<Line>> {
    let mut lines = Vec::new();
    for (i, raw) in reader.lines().enumerate() {
        let raw = raw?;
        let text = raw.trim();
        if !text.is_empty() {
            lines.push(Line::new(i + 1, text));
        }
    }
    Ok(lines)
}

/// Coordinates of the intersection just played.
///
/// Values are taken from the log as-is; no range check is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub x: i32,
    pub y: i32,
}

impl Move {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One ply: who moved, where, and the board afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub player: i32,
    #[serde(rename = "move")]
    pub mv: Move,
    pub state: BoardState,
}

impl Turn {
    pub fn new(player: i32, mv: Move, state: BoardState) -> Self {
        Self { player, mv, state }
    }
}

/// A recorded game in play order.
///
/// `winner` is `None` when the log ended without a `winner:` record. The
/// format has no draw representation, so such a game is incomplete data
/// rather than a draw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Game {
    /// Number from the `game:` delimiter, multi-game logs only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    pub turns: Vec<Turn>,
    pub winner: Option<i32>,
}

impl Game {
    pub fn new(turns: Vec<Turn>, winner: Option<i32>) -> Self {
        Self {
            number: None,
            turns,
            winner,
        }
    }

    /// Whether a winner was recorded.
    pub fn is_complete(&self) -> bool {
        self.winner.is_some()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Board after the last recorded turn.
    pub fn final_state(&self) -> Option<&BoardState> {
        self.turns.last().map(|t| &t.state)
    }

    /// Display name: `game <n>` when numbered, otherwise `game #<index>`.
    pub fn display_name(&self, index: usize) -> String {
        match self.number {
            Some(n) => format!("game {n}"),
            None => format!("game #{}", index + 1),
        }
    }
}

/// Layout of a log file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One game, no `game:` delimiters
    Single,
    /// Any number of games, each introduced by `game:<n>`
    Multi,
}

/// Parsed content of one log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameLog {
    pub format: LogFormat,
    pub games: Vec<Game>,
}

impl GameLog {
    pub fn new(format: LogFormat, games: Vec<Game>) -> Self {
        Self { format, games }
    }

    /// Parse a log file from a path
    pub fn parse<P: AsRef<Path>>(path: P, parser: &GameParser) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let read_err = |source| RecordError::Read {
            path: path.to_path_buf(),
            source,
        };
        let file = fs::File::open(path).map_err(read_err)?;
        let lines = read_lines(BufReader::new(file)).map_err(read_err)?;

        tracing::debug!(path = %path.display(), lines = lines.len(), "parsing game log");
        parser.parse_log(&lines)
    }

    /// Parse from a string
    pub fn parse_str(content: &str, parser: &GameParser) -> Result<Self, RecordError> {
        parser.parse_log(&filter_lines(content))
    }

    /// Games with a recorded winner.
    pub fn complete_games(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(|g| g.is_complete())
    }

    /// Number of games without a winner record.
    pub fn missing_winner_count(&self) -> usize {
        self.games.iter().filter(|g| !g.is_complete()).count()
    }

    /// Write the log to a path
    pub fn write<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut file = fs::File::create(path)?;
        self.write_to(&mut file)
    }

    /// Write the log in the same grammar the parser reads.
    ///
    /// In [`LogFormat::Single`] only the first game is written. Games without
    /// a number get their 1-based position as delimiter in multi format.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let games = match self.format {
            LogFormat::Single => &self.games[..self.games.len().min(1)],
            LogFormat::Multi => &self.games[..],
        };

        for (i, game) in games.iter().enumerate() {
            if self.format == LogFormat::Multi {
                let number = game.number.unwrap_or(i as i32 + 1);
                write_record(writer, Record::Game(number))?;
            }
            for turn in &game.turns {
                write_record(writer, Record::Player(turn.player))?;
                write_record(writer, Record::Move(turn.mv))?;
                write_record(writer, Record::StateHeader)?;
                for row in turn.state.to_row_lines() {
                    writeln!(writer, "{row}")?;
                }
            }
            if let Some(winner) = game.winner {
                write_record(writer, Record::Winner(winner))?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Render the log to a string
    pub fn to_text(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail and the content is built from Strings.
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

fn write_record<W: Write>(writer: &mut W, record: Record) -> std::io::Result<()> {
    match record.to_line() {
        Some(line) => writeln!(writer, "{line}"),
        None => Ok(()),
    }
}
