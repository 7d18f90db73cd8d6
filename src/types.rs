use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::RuleError;

pub const BOARD_SIZE: usize = 9;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
pub const PIECES_PER_SIDE: u8 = BOARD_SIZE as u8;

/// One of the two sides. `First` starts on the bottom row and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    First,
    Second,
}

impl Player {
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Cell encoding used by the serialized board: 1 = first, 2 = second.
    #[inline]
    pub fn to_cell(self) -> u8 {
        match self {
            Player::First => 1,
            Player::Second => 2,
        }
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!((row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE);
        Self { row, col }
    }

    /// Validates raw coordinates coming from the caller.
    pub fn try_new(row: i32, col: i32) -> Result<Self, RuleError> {
        if Self::in_bounds(row, col) {
            Ok(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(RuleError::OutOfBounds { row, col })
        }
    }

    #[inline]
    pub fn in_bounds(row: i32, col: i32) -> bool {
        (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    /// Steps `(dr, dc)` away, or `None` when that leaves the board.
    #[inline]
    pub fn offset(self, dr: i32, dc: i32) -> Option<Self> {
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        Self::in_bounds(row, col).then(|| Self::new(row as u8, col as u8))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rule set deciding when the game ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WinCondition {
    /// Five captures, or a lead of three captures.
    #[default]
    Standard,
    /// Five captures only.
    FiveCaptures,
    /// Reduce the opponent to a single piece on the board.
    TotalCapture,
}

impl WinCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            WinCondition::Standard => "standard",
            WinCondition::FiveCaptures => "five_captures",
            WinCondition::TotalCapture => "total_capture",
        }
    }
}

impl FromStr for WinCondition {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(WinCondition::Standard),
            "five_captures" => Ok(WinCondition::FiveCaptures),
            "total_capture" => Ok(WinCondition::TotalCapture),
            other => Err(RuleError::UnknownWinCondition(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Playing,
    GameOver,
}

/// What happens if the selected piece slides to a destination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MoveDescriptor {
    /// Opponent pieces removed by the move, sorted.
    pub captures: Vec<Position>,
    /// Contract:
    /// - `true` when some opponent reply could capture the piece on its new square.
    /// - Advisory only; unsafe moves stay playable.
    pub is_unsafe: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LastMove {
    pub from: Position,
    pub to: Position,
}

/// Pieces each side has LOST so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CapturedCounts {
    pub first: u8,
    pub second: u8,
}

impl CapturedCounts {
    /// Pieces of `player` taken off the board.
    #[inline]
    pub fn lost(&self, player: Player) -> u8 {
        match player {
            Player::First => self.first,
            Player::Second => self.second,
        }
    }

    /// Opponent pieces `player` has taken.
    #[inline]
    pub fn taken_by(&self, player: Player) -> u8 {
        self.lost(player.opponent())
    }

    pub fn add_lost(&mut self, player: Player, count: u8) {
        match player {
            Player::First => self.first = self.first.saturating_add(count),
            Player::Second => self.second = self.second.saturating_add(count),
        }
    }

    /// Pieces lost by both sides, saturating at `u8::MAX`.
    #[inline]
    pub fn total(&self) -> u8 {
        self.first.saturating_add(self.second)
    }
}

/// One entry of the serialized `validMoves` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidMoveView {
    pub to: Position,
    pub captures: Vec<Position>,
    pub is_unsafe: bool,
}

/// Advisory highlight for a reachable destination. Colors are up to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HintCell {
    pub position: Position,
    pub is_unsafe: bool,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStateView {
    /// Row-major, 0 = empty, 1 = first player, 2 = second player.
    pub board: Vec<u8>,
    pub current_player: Player,
    pub status: GameStatus,
    pub winner: Option<Player>,
    pub selected_piece: Option<Position>,
    pub valid_moves: Vec<ValidMoveView>,
    pub potential_captures: Vec<Position>,
    pub captured_counts: CapturedCounts,
    pub win_condition: WinCondition,
    /// Contract:
    /// - Set only by the transition that applied a move.
    /// - Cleared by any selection change or by acknowledging the animation.
    pub last_move: Option<LastMove>,
    pub just_captured_pieces: Vec<Position>,
    pub hints: Vec<HintCell>,
}
