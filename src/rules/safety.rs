use crate::board::Board;
use crate::types::{Player, Position};

use super::capture::{detect_captures, simulate_move};

/// Returns true when the opponent has an immediate reply that captures the
/// `owner` piece standing on `target` of `after`.
///
/// Every legal slide of every opponent piece is tried, so a piece standing
/// between two enemies only counts as exposed if one of them can actually
/// move to close the trap.
pub fn is_square_exposed(after: &Board, owner: Player, target: Position) -> bool {
    if after.get(target) != Some(owner) {
        return false;
    }

    let opponent = owner.opponent();
    after.positions_of(opponent).any(|origin| {
        after.destinations(origin).into_iter().any(|dest| {
            let reply = after.with_move(origin, dest);
            detect_captures(&reply, opponent, dest).contains(&target)
        })
    })
}

/// One-ply lookahead for `mover` playing `from -> to` on `board`.
///
/// Advisory only: an unsafe move is still legal.
pub fn is_move_unsafe(board: &Board, mover: Player, from: Position, to: Position) -> bool {
    if board.get(from) != Some(mover) || !board.is_clear_slide(from, to) {
        return false;
    }

    let outcome = simulate_move(board, mover, from, to);
    is_square_exposed(&outcome.board, mover, to)
}
