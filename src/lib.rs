use wasm_bindgen::prelude::*;

pub mod board;
pub mod error;
pub mod game;
pub mod rules;
pub mod types;

pub use board::Board;
pub use error::RuleError;
pub use game::{GameState, create_initial_state, handle_cell_click, set_win_condition};
pub use types::{
    BOARD_SIZE, CapturedCounts, GameStateView, GameStatus, LastMove, MoveDescriptor, Player,
    Position, WinCondition,
};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Browser handle around one game. Each call replaces the held state with the
/// result of a pure transition and returns the new view.
#[wasm_bindgen]
pub struct HasamiShogi {
    state: GameState,
}

#[wasm_bindgen]
impl HasamiShogi {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            state: create_initial_state(),
        }
    }

    pub fn click(&mut self, row: i32, col: i32) -> Result<JsValue, JsValue> {
        self.state = handle_cell_click(&self.state, row, col);
        self.state()
    }

    /// Accepts `"standard"`, `"five_captures"` or `"total_capture"`.
    pub fn set_win_condition(&mut self, name: &str) -> Result<JsValue, JsValue> {
        let condition: WinCondition = name
            .parse()
            .map_err(|err: RuleError| JsValue::from_str(&err.to_string()))?;
        self.state = set_win_condition(&self.state, condition);
        self.state()
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        self.state = create_initial_state();
        self.state()
    }

    pub fn acknowledge_animation(&mut self) -> Result<JsValue, JsValue> {
        self.state = self.state.acknowledge_animation();
        self.state()
    }

    pub fn is_game_started(&self) -> bool {
        !self.state.is_pristine()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state.to_view()).map_err(JsValue::from)
    }
}

impl Default for HasamiShogi {
    fn default() -> Self {
        Self::new()
    }
}
