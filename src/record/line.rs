//! Single-line grammar of the game log format.
//!
//! Every non-empty line is classified on its own; whether a record is
//! acceptable at a given point is decided by the parser's state machine.
//! Board rows are context dependent and handled in [`super::board`].

use super::Move;

const GAME_PREFIX: &str = "game:";
const PLAYER_PREFIX: &str = "player:";
const MOVE_PREFIX: &str = "x,y:";
const STATE_PREFIX: &str = "state:";
const WINNER_PREFIX: &str = "winner:";

/// A recognized line of a game log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// `game:<int>` - multi-game delimiter
    Game(i32),
    /// `player:<int>`
    Player(i32),
    /// `x,y:(<int>,<int>)`
    Move(Move),
    /// `state:` - followed by `board_size` board rows
    StateHeader,
    /// `winner:<int>`
    Winner(i32),
    /// Anything else, including known prefixes with unparseable payloads
    Unknown,
}

impl Record {
    /// Classify a trimmed, non-empty line.
    pub fn classify(line: &str) -> Self {
        if let Some(rest) = line.strip_prefix(GAME_PREFIX) {
            parse_int(rest).map_or(Record::Unknown, Record::Game)
        } else if let Some(rest) = line.strip_prefix(PLAYER_PREFIX) {
            parse_int(rest).map_or(Record::Unknown, Record::Player)
        } else if let Some(rest) = line.strip_prefix(MOVE_PREFIX) {
            parse_move(rest).map_or(Record::Unknown, Record::Move)
        } else if line.starts_with(STATE_PREFIX) {
            Record::StateHeader
        } else if let Some(rest) = line.strip_prefix(WINNER_PREFIX) {
            parse_int(rest).map_or(Record::Unknown, Record::Winner)
        } else {
            Record::Unknown
        }
    }

    /// Render the record back into its line form.
    ///
    /// Returns `None` for [`Record::Unknown`], which has no canonical text.
    pub fn to_line(&self) -> Option<String> {
        match self {
            Record::Game(n) => Some(format!("{GAME_PREFIX}{n}")),
            Record::Player(p) => Some(format!("{PLAYER_PREFIX}{p}")),
            Record::Move(mv) => Some(format!("{MOVE_PREFIX}({},{})", mv.x, mv.y)),
            Record::StateHeader => Some(STATE_PREFIX.to_string()),
            Record::Winner(w) => Some(format!("{WINNER_PREFIX}{w}")),
            Record::Unknown => None,
        }
    }
}

fn parse_int(s: &str) -> Option<i32> {
    s.trim().parse().ok()
}

/// Parse the payload of a move line: `(x,y)`.
///
/// The parentheses are optional, matching what the recorders in the wild emit.
fn parse_move(s: &str) -> Option<Move> {
    let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
    let (x, y) = inner.split_once(',')?;
    Some(Move::new(parse_int(x)?, parse_int(y)?))
}
