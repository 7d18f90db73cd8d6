use crate::board::Board;
use crate::types::{CapturedCounts, Player, WinCondition};

/// Captures needed to win under `Standard` and `FiveCaptures`.
pub const CAPTURE_TARGET: u8 = 5;
/// Capture lead that ends a `Standard` game early.
pub const CAPTURE_MARGIN: i16 = 3;
/// Under `TotalCapture`, a side with this many pieces or fewer has lost.
pub const TOTAL_CAPTURE_REMAINING: u8 = 1;

/// Decides whether the game is over and who won.
///
/// Checks run in a fixed order and the first hit wins, so the first player is
/// favored when both sides would satisfy a condition at once.
pub fn evaluate_winner(
    board: &Board,
    captured: CapturedCounts,
    condition: WinCondition,
) -> Option<Player> {
    match condition {
        WinCondition::Standard => {
            capture_target_winner(captured).or_else(|| capture_margin_winner(captured))
        }
        WinCondition::FiveCaptures => capture_target_winner(captured),
        WinCondition::TotalCapture => census_winner(board),
    }
}

fn capture_target_winner(captured: CapturedCounts) -> Option<Player> {
    [Player::First, Player::Second]
        .into_iter()
        .find(|&player| captured.taken_by(player) >= CAPTURE_TARGET)
}

fn capture_margin_winner(captured: CapturedCounts) -> Option<Player> {
    let first = captured.taken_by(Player::First) as i16;
    let second = captured.taken_by(Player::Second) as i16;

    if first - second >= CAPTURE_MARGIN {
        Some(Player::First)
    } else if second - first >= CAPTURE_MARGIN {
        Some(Player::Second)
    } else {
        None
    }
}

fn census_winner(board: &Board) -> Option<Player> {
    let (first, second) = board.count();

    if second <= TOTAL_CAPTURE_REMAINING {
        Some(Player::First)
    } else if first <= TOTAL_CAPTURE_REMAINING {
        Some(Player::Second)
    } else {
        None
    }
}
