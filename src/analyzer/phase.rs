//! Opening / midgame-to-end segmentation.
//!
//! A game is cut after the first `2k` turns, `k` being the number of plies
//! each player gets in the opening. Slices borrow the game's turns; nothing
//! is copied until a slice is turned into a standalone [`Game`].

use std::ops::Range;

use serde::Serialize;

use crate::record::{Game, GameLog, LogFormat, Turn};

/// Part of a game a slice covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Opening,
    MidgameToEnd,
}

impl Phase {
    /// Stable identifier, used for file names and logs.
    pub fn id(&self) -> &'static str {
        match self {
            Phase::Opening => "opening",
            Phase::MidgameToEnd => "midgame-to-end",
        }
    }
}

/// A borrowed run of consecutive turns from one game.
#[derive(Debug, Clone)]
pub struct PhaseSlice<'a> {
    phase: Phase,
    game: &'a Game,
    range: Range<usize>,
    played_before: usize,
}

impl<'a> PhaseSlice<'a> {
    /// A slice covering the whole game, for logs that were split beforehand.
    pub fn whole(game: &'a Game, phase: Phase) -> Self {
        Self {
            phase,
            game,
            range: 0..game.turns.len(),
            played_before: 0,
        }
    }

    /// Number the slice's turns as if `played` turns came before it.
    ///
    /// A midgame log written by `split` no longer holds the opening, so its
    /// first turn is turn `2k + 1` of the original game.
    pub fn numbered_after(mut self, played: usize) -> Self {
        self.played_before = played;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game(&self) -> &'a Game {
        self.game
    }

    pub fn turns(&self) -> &'a [Turn] {
        &self.game.turns[self.range.clone()]
    }

    /// Turns played before the slice's first turn in the original game.
    pub fn played_before(&self) -> usize {
        self.played_before
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Copy the slice into a standalone game keeping number and winner.
    pub fn to_game(&self) -> Game {
        Game {
            number: self.game.number,
            turns: self.turns().to_vec(),
            winner: self.game.winner,
        }
    }
}

/// Splits games at a fixed turn count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSegmenter {
    plies_per_player: usize,
}

impl Default for PhaseSegmenter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PLIES_PER_PLAYER)
    }
}

impl PhaseSegmenter {
    /// Five stones each, ten turns in total.
    pub const DEFAULT_PLIES_PER_PLAYER: usize = 5;

    pub fn new(plies_per_player: usize) -> Self {
        Self { plies_per_player }
    }

    pub fn plies_per_player(&self) -> usize {
        self.plies_per_player
    }

    /// Number of turns in the opening: `2k`.
    pub fn cutoff(&self) -> usize {
        self.plies_per_player.saturating_mul(2)
    }

    /// Split into `(opening, rest)`.
    ///
    /// `opening` is `turns[0..min(2k, t)]` and `rest` the remainder, so the two
    /// lengths always add up to the game's turn count.
    pub fn split<'a>(&self, game: &'a Game) -> (PhaseSlice<'a>, PhaseSlice<'a>) {
        (
            self.slice(game, Phase::Opening),
            self.slice(game, Phase::MidgameToEnd),
        )
    }

    pub fn slice<'a>(&self, game: &'a Game, phase: Phase) -> PhaseSlice<'a> {
        let total = game.turns.len();
        let cut = self.cutoff().min(total);
        let range = match phase {
            Phase::Opening => 0..cut,
            Phase::MidgameToEnd => cut..total,
        };
        PhaseSlice {
            phase,
            game,
            played_before: range.start,
            range,
        }
    }

    /// Split every game of a log into an opening log and a midgame-to-end log.
    ///
    /// Both results are multi-game logs; game numbers and winners carry over.
    pub fn split_log(&self, log: &GameLog) -> (GameLog, GameLog) {
        let mut opening = Vec::with_capacity(log.games.len());
        let mut rest = Vec::with_capacity(log.games.len());
        for game in &log.games {
            let (head, tail) = self.split(game);
            opening.push(head.to_game());
            rest.push(tail.to_game());
        }
        (
            GameLog::new(LogFormat::Multi, opening),
            GameLog::new(LogFormat::Multi, rest),
        )
    }
}
