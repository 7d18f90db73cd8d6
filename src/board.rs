use once_cell::sync::Lazy;

use crate::types::{BOARD_SIZE, NUM_SQUARES, Player, Position};

/// Orthogonal steps: up, down, left, right.
pub const DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

static NEIGHBORS: Lazy<Vec<Vec<Position>>> = Lazy::new(|| {
    (0..NUM_SQUARES)
        .map(|idx| {
            let pos = Position::from_index(idx);
            DIRECTIONS
                .iter()
                .filter_map(|&(dr, dc)| pos.offset(dr, dc))
                .collect()
        })
        .collect()
});

/// Orthogonally adjacent squares of `pos` (2 in a corner, 3 on an edge, 4 inside).
#[inline]
pub fn neighbors(pos: Position) -> &'static [Position] {
    &NEIGHBORS[pos.index()]
}

/// 9x9 Hasami Shogi board. `Copy` so every transition works on its own snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Player>; NUM_SQUARES],
}

impl Board {
    /// Creates the starting layout:
    /// row 0 = second player, row 8 = first player.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for col in 0..BOARD_SIZE as u8 {
            board.set(Position::new(0, col), Some(Player::Second));
            board.set(Position::new(BOARD_SIZE as u8 - 1, col), Some(Player::First));
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            cells: [None; NUM_SQUARES],
        }
    }

    /// Builds a board holding exactly the listed pieces.
    pub fn from_pieces(pieces: &[(Position, Player)]) -> Self {
        let mut board = Self::empty();
        for &(pos, player) in pieces {
            board.set(pos, Some(player));
        }
        board
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<Player> {
        self.cells[pos.index()]
    }

    #[inline]
    pub fn set(&mut self, pos: Position, cell: Option<Player>) {
        self.cells[pos.index()] = cell;
    }

    #[inline]
    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Returns `(first_count, second_count)`.
    pub fn count(&self) -> (u8, u8) {
        self.cells
            .iter()
            .fold((0u8, 0u8), |(first, second), cell| match cell {
                Some(Player::First) => (first + 1, second),
                Some(Player::Second) => (first, second + 1),
                None => (first, second),
            })
    }

    pub fn positions_of(&self, player: Player) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, cell)| **cell == Some(player))
            .map(|(idx, _)| Position::from_index(idx))
    }

    pub fn is_initial_layout(&self) -> bool {
        *self == Self::new()
    }

    /// Squares the piece on `from` can slide to: straight lines in the four
    /// orthogonal directions, stopping before the first occupied square.
    pub fn destinations(&self, from: Position) -> Vec<Position> {
        let mut out = Vec::new();

        for (dr, dc) in DIRECTIONS {
            let mut next = from.offset(dr, dc);
            while let Some(pos) = next {
                if !self.is_empty_at(pos) {
                    break;
                }
                out.push(pos);
                next = pos.offset(dr, dc);
            }
        }

        out.sort_unstable();
        out
    }

    /// Returns true when `from -> to` is an unobstructed orthogonal slide onto an empty square.
    pub fn is_clear_slide(&self, from: Position, to: Position) -> bool {
        if from == to || (from.row != to.row && from.col != to.col) || !self.is_empty_at(to) {
            return false;
        }

        let dr = (to.row as i32 - from.row as i32).signum();
        let dc = (to.col as i32 - from.col as i32).signum();
        let mut next = from.offset(dr, dc);
        while let Some(pos) = next {
            if pos == to {
                return true;
            }
            if !self.is_empty_at(pos) {
                return false;
            }
            next = pos.offset(dr, dc);
        }

        false
    }

    /// Copy of the board with the piece on `from` relocated to `to`. Nothing is captured.
    pub fn with_move(&self, from: Position, to: Position) -> Self {
        let mut next = *self;
        next.set(to, self.get(from));
        next.set(from, None);
        next
    }

    pub fn remove_all(&mut self, positions: &[Position]) {
        for &pos in positions {
            self.set(pos, None);
        }
    }

    /// Converts board to `[u8; 81]` where 0=empty, 1=first, 2=second.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (cell, value) in self.cells.iter().zip(board.iter_mut()) {
            *value = cell.map_or(0, Player::to_cell);
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
