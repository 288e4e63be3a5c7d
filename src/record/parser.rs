//! Game record parser.
//!
//! A cursor walks the filtered line sequence while an explicit state machine
//! decides what each line means:
//!
//! ```text
//! AwaitGameDelimiter --game:--> AwaitPlayer            (multi-game only)
//! AwaitPlayer --player:--> AwaitMove --x,y:--> AwaitStateHeader
//!     --state:--> AwaitStateRows --board_size rows--> BoardComplete (turn emitted)
//! BoardComplete --anything but a board row--> AwaitPlayer
//! AwaitPlayer --winner:--> game sealed
//! ```
//!
//! Unknown lines where a `player:` record is expected are skipped. A missing
//! move or `state:` line abandons the partial turn and the offending line is
//! examined again as a potential `player:` record. Problems inside a board
//! block, including a row past the last one, are fatal for the whole file.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::board::{parse_row, BoardState, Cell};
use super::{Game, GameLog, Line, LogFormat, Move, Record, RecordError, Turn};

/// How `game:` delimiters are treated.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Multi-game when any `game:` delimiter is present, single-game otherwise
    #[default]
    Auto,
    /// Exactly one game; `game:` lines are ignored
    Single,
    /// Games are introduced by `game:` delimiters
    Multi,
}

/// Parses filtered log lines into games.
///
/// Holds configuration only, so repeated calls on the same input yield equal
/// results.
#[derive(Debug, Clone)]
pub struct GameParser {
    board_size: usize,
    mode: ParseMode,
}

impl Default for GameParser {
    fn default() -> Self {
        Self::new(super::DEFAULT_BOARD_SIZE)
    }
}

impl GameParser {
    /// Create a parser for boards of `board_size` x `board_size` in auto mode.
    pub fn new(board_size: usize) -> Self {
        Self {
            board_size,
            mode: ParseMode::Auto,
        }
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// The layout that will be used for `lines` under the configured mode.
    pub fn resolve_format(&self, lines: &[Line]) -> LogFormat {
        match self.mode {
            ParseMode::Single => LogFormat::Single,
            ParseMode::Multi => LogFormat::Multi,
            ParseMode::Auto => {
                let delimited = lines
                    .iter()
                    .any(|l| matches!(Record::classify(&l.text), Record::Game(_)));
                if delimited {
                    LogFormat::Multi
                } else {
                    LogFormat::Single
                }
            }
        }
    }

    /// Parse a whole file's lines according to the configured mode.
    pub fn parse_log(&self, lines: &[Line]) -> Result<GameLog, RecordError> {
        let format = self.resolve_format(lines);
        let games = match format {
            LogFormat::Single => vec![self.parse_single(lines)?],
            LogFormat::Multi => self.parse_multi(lines)?,
        };
        Ok(GameLog::new(format, games))
    }

    /// Scan one game, stopping at the first `winner:` record.
    ///
    /// Always yields a game; it has no winner when the input ran out first.
    pub fn parse_single(&self, lines: &[Line]) -> Result<Game, RecordError> {
        let games = Machine::new(self.board_size, false).run(lines)?;
        Ok(games.into_iter().next().unwrap_or_default())
    }

    /// Scan every game introduced by a `game:` delimiter, in delimiter order.
    pub fn parse_multi(&self, lines: &[Line]) -> Result<Vec<Game>, RecordError> {
        Machine::new(self.board_size, true).run(lines)
    }
}

#[derive(Debug)]
enum State {
    AwaitGameDelimiter,
    AwaitPlayer,
    AwaitMove {
        player: i32,
    },
    AwaitStateHeader {
        player: i32,
        mv: Move,
    },
    AwaitStateRows {
        player: i32,
        mv: Move,
        header_line: usize,
        rows: Vec<Vec<Cell>>,
    },
    /// A board was just read; one more row means the block is too long.
    BoardComplete,
}

/// What the cursor does after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Move on to the next line
    Consume,
    /// Feed the same line to the new state
    Reexamine,
    /// Line consumed, stop scanning
    Finish,
}

/// Per-call parser state. Dropped when the call returns.
struct Machine {
    board_size: usize,
    delimited: bool,
    current: Option<Game>,
    games: Vec<Game>,
    skipped: usize,
    outside_game: usize,
}

impl Machine {
    fn new(board_size: usize, delimited: bool) -> Self {
        Self {
            board_size,
            delimited,
            current: (!delimited).then(Game::default),
            games: Vec::new(),
            skipped: 0,
            outside_game: 0,
        }
    }

    fn initial_state(&self) -> State {
        if self.delimited {
            State::AwaitGameDelimiter
        } else {
            State::AwaitPlayer
        }
    }

    fn run(mut self, lines: &[Line]) -> Result<Vec<Game>, RecordError> {
        let mut state = self.initial_state();
        let mut pos = 0;

        while let Some(line) = lines.get(pos) {
            let (next, flow) = self.step(state, line)?;
            state = next;
            match flow {
                Flow::Consume => pos += 1,
                Flow::Reexamine => {}
                Flow::Finish => {
                    pos += 1;
                    if pos < lines.len() {
                        debug!(ignored = lines.len() - pos, "lines after winner ignored");
                    }
                    return Ok(self.games);
                }
            }
        }

        self.finish(state)
    }

    fn step(&mut self, state: State, line: &Line) -> Result<(State, Flow), RecordError> {
        let record = || Record::classify(&line.text);

        Ok(match state {
            State::AwaitGameDelimiter => match record() {
                Record::Game(number) => {
                    self.open(number);
                    (State::AwaitPlayer, Flow::Consume)
                }
                _ => {
                    trace!(line = line.number, "outside of any game, dropped");
                    self.outside_game += 1;
                    (State::AwaitGameDelimiter, Flow::Consume)
                }
            },

            State::AwaitPlayer => match record() {
                Record::Player(player) => (State::AwaitMove { player }, Flow::Consume),
                Record::Winner(winner) => {
                    self.seal(Some(winner));
                    if self.delimited {
                        (State::AwaitGameDelimiter, Flow::Consume)
                    } else {
                        (State::AwaitPlayer, Flow::Finish)
                    }
                }
                Record::Game(number) if self.delimited => {
                    self.seal(None);
                    self.open(number);
                    (State::AwaitPlayer, Flow::Consume)
                }
                _ => {
                    trace!(line = line.number, text = %line.text, "skipping unrecognized line");
                    self.skipped += 1;
                    (State::AwaitPlayer, Flow::Consume)
                }
            },

            State::AwaitMove { player } => match record() {
                Record::Move(mv) => (State::AwaitStateHeader { player, mv }, Flow::Consume),
                // Not consumed: `player:1` then `winner:1` still seals the game.
                _ => {
                    debug!(line = line.number, "expected move line, abandoning turn");
                    (State::AwaitPlayer, Flow::Reexamine)
                }
            },

            State::AwaitStateHeader { player, mv } => match record() {
                Record::StateHeader if self.board_size == 0 => {
                    self.push_turn(player, mv, Vec::new());
                    (State::BoardComplete, Flow::Consume)
                }
                Record::StateHeader => (
                    State::AwaitStateRows {
                        player,
                        mv,
                        header_line: line.number,
                        rows: Vec::with_capacity(self.board_size),
                    },
                    Flow::Consume,
                ),
                _ => {
                    debug!(line = line.number, "expected state line, abandoning turn");
                    (State::AwaitPlayer, Flow::Reexamine)
                }
            },

            State::AwaitStateRows {
                player,
                mv,
                header_line,
                mut rows,
            } => {
                let row = parse_row(&line.text).ok_or_else(|| RecordError::MalformedRow {
                    line: line.number,
                    content: line.text.clone(),
                })?;
                if row.len() != self.board_size {
                    return Err(RecordError::RowWidth {
                        line: line.number,
                        expected: self.board_size,
                        found: row.len(),
                    });
                }
                rows.push(row);

                if rows.len() == self.board_size {
                    self.push_turn(player, mv, rows);
                    (State::BoardComplete, Flow::Consume)
                } else {
                    (
                        State::AwaitStateRows {
                            player,
                            mv,
                            header_line,
                            rows,
                        },
                        Flow::Consume,
                    )
                }
            }

            State::BoardComplete => {
                if parse_row(&line.text).is_some() {
                    return Err(RecordError::ExtraRow {
                        line: line.number,
                        expected: self.board_size,
                    });
                }
                (State::AwaitPlayer, Flow::Reexamine)
            }
        })
    }

    fn finish(mut self, state: State) -> Result<Vec<Game>, RecordError> {
        match state {
            State::AwaitStateRows {
                header_line, rows, ..
            } => {
                return Err(RecordError::TruncatedBoard {
                    line: header_line,
                    expected: self.board_size,
                    found: rows.len(),
                });
            }
            State::AwaitMove { .. } | State::AwaitStateHeader { .. } => {
                debug!("input ended inside a turn, partial turn abandoned");
            }
            State::AwaitPlayer | State::AwaitGameDelimiter | State::BoardComplete => {}
        }

        if self.current.is_some() {
            self.seal(None);
        } else if self.outside_game > 0 && !self.games.is_empty() {
            debug!(
                dropped = self.outside_game,
                "lines after the last winner dropped"
            );
        }
        if self.skipped > 0 {
            debug!(skipped = self.skipped, "unrecognized lines skipped");
        }

        Ok(self.games)
    }

    fn open(&mut self, number: i32) {
        self.outside_game = 0;
        self.current = Some(Game {
            number: Some(number),
            ..Game::default()
        });
    }

    fn seal(&mut self, winner: Option<i32>) {
        if let Some(mut game) = self.current.take() {
            if winner.is_none() {
                debug!(number = ?game.number, turns = game.turns.len(), "game has no winner record");
            }
            game.winner = winner;
            self.games.push(game);
        }
    }

    fn push_turn(&mut self, player: i32, mv: Move, rows: Vec<Vec<Cell>>) {
        if let Some(game) = self.current.as_mut() {
            game.turns
                .push(Turn::new(player, mv, BoardState::from_checked_rows(rows)));
        }
    }
}
