//! Capture detection on a board where the mover's piece has already landed.
//!
//! Three independent passes contribute to the captured set:
//! - sandwich: runs of opponent pieces flanked on a line through the landing square
//! - corner: an opponent corner piece whose two neighbors both belong to the mover
//! - group: any opponent group left without a liberty anywhere on the board
//!
//! All passes read the same post-move board, so the union is removed at once.

use std::collections::{BTreeSet, VecDeque};

use crate::board::{Board, DIRECTIONS, neighbors};
use crate::types::{BOARD_SIZE, NUM_SQUARES, Player, Position};

const LAST: u8 = BOARD_SIZE as u8 - 1;

/// Corner square and its only two orthogonal neighbors.
const CORNERS: [(Position, [Position; 2]); 4] = [
    (
        Position { row: 0, col: 0 },
        [Position { row: 0, col: 1 }, Position { row: 1, col: 0 }],
    ),
    (
        Position { row: 0, col: LAST },
        [
            Position { row: 0, col: LAST - 1 },
            Position { row: 1, col: LAST },
        ],
    ),
    (
        Position { row: LAST, col: 0 },
        [
            Position { row: LAST - 1, col: 0 },
            Position { row: LAST, col: 1 },
        ],
    ),
    (
        Position { row: LAST, col: LAST },
        [
            Position { row: LAST - 1, col: LAST },
            Position { row: LAST, col: LAST - 1 },
        ],
    ),
];

/// Result of playing a move on a scratch copy of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Board after relocation and removal of every captured piece.
    pub board: Board,
    /// Removed opponent pieces, sorted and deduplicated.
    pub captured: Vec<Position>,
}

/// Opponent runs flanked between the piece on `to` and another `mover` piece.
///
/// Scans each direction from `to`: a run of one or more opponent pieces is taken
/// only when the square right after it holds a `mover` piece. An empty square or
/// the board edge ends the scan without capture.
pub fn sandwich_captures(board: &Board, mover: Player, to: Position) -> Vec<Position> {
    let opponent = mover.opponent();
    let mut captured = Vec::new();

    for (dr, dc) in DIRECTIONS {
        let mut run = Vec::new();
        let mut next = to.offset(dr, dc);

        while let Some(pos) = next {
            match board.get(pos) {
                Some(owner) if owner == opponent => run.push(pos),
                Some(_) => {
                    captured.append(&mut run);
                    break;
                }
                None => break,
            }
            next = pos.offset(dr, dc);
        }
    }

    captured
}

/// Opponent corner pieces whose two neighbors are both held by `mover`.
///
/// Checked on every corner, not only near the piece that just moved.
pub fn corner_captures(board: &Board, mover: Player) -> Vec<Position> {
    let opponent = mover.opponent();

    CORNERS
        .iter()
        .filter(|(corner, adjacent)| {
            board.get(*corner) == Some(opponent)
                && adjacent.iter().all(|&pos| board.get(pos) == Some(mover))
        })
        .map(|&(corner, _)| corner)
        .collect()
}

/// Every opponent group (4-connected) with no adjacent empty square.
pub fn group_captures(board: &Board, mover: Player) -> Vec<Position> {
    let opponent = mover.opponent();
    let mut visited = [false; NUM_SQUARES];
    let mut captured = Vec::new();

    for start in board.positions_of(opponent) {
        if visited[start.index()] {
            continue;
        }

        let mut group = Vec::new();
        let mut has_liberty = false;
        let mut queue = VecDeque::from([start]);
        visited[start.index()] = true;

        // Walk the whole group even after a liberty shows up so that its
        // squares are marked visited and not rescanned from another start.
        while let Some(pos) = queue.pop_front() {
            group.push(pos);
            for &adjacent in neighbors(pos) {
                match board.get(adjacent) {
                    None => has_liberty = true,
                    Some(owner) if owner == opponent && !visited[adjacent.index()] => {
                        visited[adjacent.index()] = true;
                        queue.push_back(adjacent);
                    }
                    Some(_) => {}
                }
            }
        }

        if !has_liberty {
            captured.extend(group);
        }
    }

    captured
}

/// Union of the three capture passes for a `mover` piece that has landed on `to`.
pub fn detect_captures(board: &Board, mover: Player, to: Position) -> Vec<Position> {
    let unique: BTreeSet<Position> = sandwich_captures(board, mover, to)
        .into_iter()
        .chain(corner_captures(board, mover))
        .chain(group_captures(board, mover))
        .collect();

    unique.into_iter().collect()
}

/// Plays `from -> to` for `mover` on a copy of `board` and removes all captures at once.
///
/// Caller contract: the slide is legal (see [`Board::destinations`]).
pub fn simulate_move(board: &Board, mover: Player, from: Position, to: Position) -> MoveOutcome {
    debug_assert_eq!(board.get(from), Some(mover));

    let mut next = board.with_move(from, to);
    let captured = detect_captures(&next, mover, to);
    next.remove_all(&captured);

    MoveOutcome {
        board: next,
        captured,
    }
}
