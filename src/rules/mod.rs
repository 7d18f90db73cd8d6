//! Rule evaluation on board snapshots: captures, one-ply safety, and win conditions.

pub mod capture;
pub mod safety;
pub mod win;

pub use capture::{
    MoveOutcome, corner_captures, detect_captures, group_captures, sandwich_captures,
    simulate_move,
};
pub use safety::{is_move_unsafe, is_square_exposed};
pub use win::evaluate_winner;
