use thiserror::Error;

/// Input rejected at the boundary where untyped values enter the engine.
///
/// Game transitions themselves never fail; they degrade to no-ops instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("unknown win condition: {0}")]
    UnknownWinCondition(String),
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: i32, col: i32 },
}
