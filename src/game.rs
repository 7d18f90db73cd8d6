use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, instrument};

use crate::board::Board;
use crate::rules::{evaluate_winner, is_square_exposed, simulate_move};
use crate::types::{
    CapturedCounts, GameStateView, GameStatus, HintCell, LastMove, MoveDescriptor, Player,
    Position, ValidMoveView, WinCondition,
};

/// Full state of one game. Every transition returns a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    status: GameStatus,
    winner: Option<Player>,
    selected_piece: Option<Position>,
    valid_moves: BTreeMap<Position, MoveDescriptor>,
    potential_captures: Vec<Position>,
    captured: CapturedCounts,
    win_condition: WinCondition,
    last_move: Option<LastMove>,
    just_captured: Vec<Position>,
}

impl GameState {
    /// Standard start: one full row per side, first player to move, `Standard` rules.
    pub fn new() -> Self {
        Self::from_position(Board::new(), Player::First)
    }

    /// Starts play from an arbitrary position, used to set up scenarios.
    ///
    /// The 18-piece conservation only holds for games begun with [`GameState::new`].
    pub fn from_position(board: Board, current_player: Player) -> Self {
        Self {
            board,
            current_player,
            status: GameStatus::Playing,
            winner: None,
            selected_piece: None,
            valid_moves: BTreeMap::new(),
            potential_captures: Vec::new(),
            captured: CapturedCounts::default(),
            win_condition: WinCondition::default(),
            last_move: None,
            just_captured: Vec::new(),
        }
    }

    /// Scenario setup: pieces already lost before `board` was reached.
    ///
    /// Taken as given. The caller keeps `captured` consistent with the pieces
    /// missing from the board.
    pub fn with_captured(mut self, captured: CapturedCounts) -> Self {
        self.captured = captured;
        self
    }

    /// Scenario setup: rule set for a position built with [`GameState::from_position`].
    pub fn with_win_condition(mut self, win_condition: WinCondition) -> Self {
        self.win_condition = win_condition;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn selected_piece(&self) -> Option<Position> {
        self.selected_piece
    }

    pub fn valid_moves(&self) -> &BTreeMap<Position, MoveDescriptor> {
        &self.valid_moves
    }

    pub fn potential_captures(&self) -> &[Position] {
        &self.potential_captures
    }

    pub fn captured(&self) -> CapturedCounts {
        self.captured
    }

    pub fn win_condition(&self) -> WinCondition {
        self.win_condition
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    pub fn just_captured(&self) -> &[Position] {
        &self.just_captured
    }

    /// True while no move has changed the starting layout and nothing was captured.
    pub fn is_pristine(&self) -> bool {
        self.board.is_initial_layout() && self.captured.total() == 0
    }

    /// Reachable destinations with their advisory safety flag, for hint overlays.
    pub fn hints(&self) -> Vec<HintCell> {
        self.valid_moves
            .iter()
            .map(|(&position, descriptor)| HintCell {
                position,
                is_unsafe: descriptor.is_unsafe,
            })
            .collect()
    }

    /// Drops the move/capture record once the UI has animated it.
    pub fn acknowledge_animation(&self) -> Self {
        Self {
            last_move: None,
            just_captured: Vec::new(),
            ..self.clone()
        }
    }

    pub fn to_view(&self) -> GameStateView {
        GameStateView {
            board: self.board.to_array().to_vec(),
            current_player: self.current_player,
            status: self.status,
            winner: self.winner,
            selected_piece: self.selected_piece,
            valid_moves: self
                .valid_moves
                .iter()
                .map(|(&to, descriptor)| ValidMoveView {
                    to,
                    captures: descriptor.captures.clone(),
                    is_unsafe: descriptor.is_unsafe,
                })
                .collect(),
            potential_captures: self.potential_captures.clone(),
            captured_counts: self.captured,
            win_condition: self.win_condition,
            last_move: self.last_move,
            just_captured_pieces: self.just_captured.clone(),
            hints: self.hints(),
        }
    }

    fn clear_selection(&self) -> Self {
        Self {
            selected_piece: None,
            valid_moves: BTreeMap::new(),
            potential_captures: Vec::new(),
            last_move: None,
            just_captured: Vec::new(),
            ..self.clone()
        }
    }

    fn select(&self, origin: Position) -> Self {
        let player = self.current_player;
        let mut valid_moves = BTreeMap::new();
        let mut highlights = BTreeSet::new();

        for to in self.board.destinations(origin) {
            let outcome = simulate_move(&self.board, player, origin, to);
            let is_unsafe = is_square_exposed(&outcome.board, player, to);
            if !is_unsafe {
                highlights.extend(outcome.captured.iter().copied());
            }
            valid_moves.insert(
                to,
                MoveDescriptor {
                    captures: outcome.captured,
                    is_unsafe,
                },
            );
        }

        debug!(
            %origin,
            destinations = valid_moves.len(),
            potential_captures = highlights.len(),
            "piece selected"
        );

        Self {
            selected_piece: Some(origin),
            valid_moves,
            potential_captures: highlights.into_iter().collect(),
            last_move: None,
            just_captured: Vec::new(),
            ..self.clone()
        }
    }

    fn apply_move(&self, from: Position, to: Position) -> Self {
        let player = self.current_player;
        let outcome = simulate_move(&self.board, player, from, to);

        let mut captured = self.captured;
        captured.add_lost(player.opponent(), outcome.captured.len() as u8);

        let winner = evaluate_winner(&outcome.board, captured, self.win_condition);
        let status = if winner.is_some() {
            GameStatus::GameOver
        } else {
            GameStatus::Playing
        };

        debug!(
            ?player,
            %from,
            %to,
            captured = outcome.captured.len(),
            "move applied"
        );
        if let Some(winner) = winner {
            debug!(?winner, condition = self.win_condition.as_str(), "game over");
        }

        Self {
            board: outcome.board,
            current_player: player.opponent(),
            status,
            winner,
            selected_piece: None,
            valid_moves: BTreeMap::new(),
            potential_captures: Vec::new(),
            captured,
            win_condition: self.win_condition,
            last_move: Some(LastMove { from, to }),
            just_captured: outcome.captured,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh game in the standard layout.
pub fn create_initial_state() -> GameState {
    GameState::new()
}

/// Single entry point of the selection/move state machine.
///
/// Never fails: clicks that mean nothing return the input unchanged or only
/// drop the current selection.
#[instrument(level = "debug", skip(state))]
pub fn handle_cell_click(state: &GameState, row: i32, col: i32) -> GameState {
    if state.status == GameStatus::GameOver {
        return state.clone();
    }

    let pos = match Position::try_new(row, col) {
        Ok(pos) => pos,
        Err(err) => {
            debug!(%err, "click ignored");
            return state.clone();
        }
    };

    let Some(selected) = state.selected_piece else {
        if state.board.get(pos) == Some(state.current_player) {
            return state.select(pos);
        }
        return state.clone();
    };

    if selected == pos {
        return state.clear_selection();
    }
    if state.board.get(pos) == Some(state.current_player) {
        return state.select(pos);
    }
    if state.valid_moves.contains_key(&pos) {
        return state.apply_move(selected, pos);
    }

    state.clear_selection()
}

/// Changes the rule set, only while the game is still untouched.
#[instrument(level = "debug", skip(state))]
pub fn set_win_condition(state: &GameState, win_condition: WinCondition) -> GameState {
    if !state.is_pristine() {
        debug!("win condition locked once play has started");
        return state.clone();
    }

    GameState {
        win_condition,
        ..GameState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Player = Player::First;
    const B: Player = Player::Second;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    fn click(state: &GameState, row: u8, col: u8) -> GameState {
        handle_cell_click(state, row as i32, col as i32)
    }

    #[test]
    fn initial_state_is_correct() {
        let state = create_initial_state();

        assert_eq!(state.current_player(), A);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.winner(), None);
        assert_eq!(state.selected_piece(), None);
        assert!(state.valid_moves().is_empty());
        assert_eq!(state.captured(), CapturedCounts::default());
        assert_eq!(state.win_condition(), WinCondition::Standard);
        assert!(state.is_pristine());
    }

    #[test]
    fn selecting_own_piece_lists_its_slides() {
        let state = click(&create_initial_state(), 8, 0);

        assert_eq!(state.selected_piece(), Some(pos(8, 0)));
        assert_eq!(state.valid_moves().len(), 7);
        assert!(state.valid_moves().contains_key(&pos(7, 0)));
        assert!(state.potential_captures().is_empty());
    }

    #[test]
    fn clicking_selected_piece_deselects() {
        let selected = click(&create_initial_state(), 8, 4);

        let state = click(&selected, 8, 4);

        assert_eq!(state.selected_piece(), None);
        assert!(state.valid_moves().is_empty());
        assert_eq!(state.board(), selected.board());
    }

    #[test]
    fn clicking_another_own_piece_moves_selection() {
        let selected = click(&create_initial_state(), 8, 4);

        let state = click(&selected, 8, 5);

        assert_eq!(state.selected_piece(), Some(pos(8, 5)));
        assert!(state.valid_moves().contains_key(&pos(4, 5)));
        assert!(!state.valid_moves().contains_key(&pos(4, 4)));
    }

    #[test]
    fn clicking_opponent_or_unreachable_cell_clears_selection() {
        let selected = click(&create_initial_state(), 8, 4);

        let on_opponent = click(&selected, 0, 4);
        let off_line = click(&selected, 5, 5);

        for state in [on_opponent, off_line] {
            assert_eq!(state.selected_piece(), None);
            assert!(state.valid_moves().is_empty());
            assert!(state.board().is_initial_layout());
            assert_eq!(state.current_player(), A);
        }
    }

    #[test]
    fn opponent_piece_cannot_be_selected() {
        let state = create_initial_state();

        assert_eq!(click(&state, 0, 0), state);
    }

    #[test]
    fn out_of_range_click_is_a_no_op() {
        let selected = click(&create_initial_state(), 8, 4);

        assert_eq!(handle_cell_click(&selected, -1, 4), selected);
        assert_eq!(handle_cell_click(&selected, 4, 9), selected);
    }

    #[test]
    fn move_relocates_piece_and_passes_turn() {
        let state = click(&create_initial_state(), 8, 4);

        let moved = click(&state, 5, 4);

        assert!(moved.board().is_empty_at(pos(8, 4)));
        assert_eq!(moved.board().get(pos(5, 4)), Some(A));
        assert_eq!(moved.current_player(), B);
        assert_eq!(moved.selected_piece(), None);
        assert!(moved.valid_moves().is_empty());
        assert_eq!(
            moved.last_move(),
            Some(LastMove {
                from: pos(8, 4),
                to: pos(5, 4)
            })
        );
        assert!(moved.just_captured().is_empty());
        assert!(!moved.is_pristine());
    }

    #[test]
    fn move_with_capture_updates_counts() {
        let board = Board::from_pieces(&[(pos(6, 2), A), (pos(6, 3), B), (pos(8, 4), A)]);
        let state = GameState::from_position(board, A);

        let moved = click(&click(&state, 8, 4), 6, 4);

        assert!(moved.board().is_empty_at(pos(6, 3)));
        assert_eq!(moved.captured().lost(B), 1);
        assert_eq!(moved.captured().lost(A), 0);
        assert_eq!(moved.just_captured(), &[pos(6, 3)]);
        assert_eq!(moved.current_player(), B);
    }

    #[test]
    fn unsafe_destination_is_flagged_but_playable() {
        let board = Board::from_pieces(&[(pos(8, 1), A), (pos(6, 2), B), (pos(7, 0), B)]);
        let state = click(&GameState::from_position(board, A), 8, 1);

        assert!(state.valid_moves()[&pos(7, 1)].is_unsafe);
        assert!(!state.valid_moves()[&pos(8, 0)].is_unsafe);

        let moved = click(&state, 7, 1);
        assert_eq!(moved.board().get(pos(7, 1)), Some(A));
        assert_eq!(moved.current_player(), B);
    }

    #[test]
    fn potential_captures_collect_safe_destinations() {
        let board = Board::from_pieces(&[
            (pos(8, 4), A),
            (pos(5, 4), A),
            (pos(6, 4), B),
            (pos(8, 1), A),
            (pos(8, 2), B),
        ]);

        let state = click(&GameState::from_position(board, A), 8, 4);

        assert_eq!(state.potential_captures(), &[pos(6, 4), pos(8, 2)]);
        assert_eq!(state.valid_moves()[&pos(7, 4)].captures, vec![pos(6, 4)]);
        assert_eq!(state.valid_moves()[&pos(8, 3)].captures, vec![pos(8, 2)]);
    }

    #[test]
    fn potential_captures_skip_unsafe_destinations() {
        // (7,4) takes (6,4) but then B slides (7,0) -> (7,3) against (7,5).
        let board = Board::from_pieces(&[
            (pos(8, 4), A),
            (pos(5, 4), A),
            (pos(6, 4), B),
            (pos(7, 5), B),
            (pos(7, 0), B),
        ]);

        let state = click(&GameState::from_position(board, A), 8, 4);
        let descriptor = &state.valid_moves()[&pos(7, 4)];

        assert_eq!(descriptor.captures, vec![pos(6, 4)]);
        assert!(descriptor.is_unsafe);
        assert!(state.potential_captures().is_empty());
    }

    #[test]
    fn selection_clears_animation_record() {
        let moved = click(&click(&create_initial_state(), 8, 4), 5, 4);
        assert!(moved.last_move().is_some());

        let reselected = click(&moved, 0, 0);

        assert_eq!(reselected.selected_piece(), Some(pos(0, 0)));
        assert_eq!(reselected.last_move(), None);
    }

    #[test]
    fn acknowledge_animation_only_drops_move_record() {
        let board = Board::from_pieces(&[(pos(6, 2), A), (pos(6, 3), B), (pos(8, 4), A)]);
        let moved = click(&click(&GameState::from_position(board, A), 8, 4), 6, 4);

        let acked = moved.acknowledge_animation();

        assert_eq!(acked.last_move(), None);
        assert!(acked.just_captured().is_empty());
        assert_eq!(acked.board(), moved.board());
        assert_eq!(acked.captured(), moved.captured());
        assert_eq!(acked.current_player(), moved.current_player());
    }

    #[test]
    fn winning_move_freezes_the_game() {
        let board = Board::from_pieces(&[
            (pos(6, 2), A),
            (pos(6, 3), B),
            (pos(8, 4), A),
            (pos(0, 0), B),
        ]);
        let state = GameState::from_position(board, A).with_captured(CapturedCounts {
            first: 0,
            second: 4,
        });

        let over = click(&click(&state, 8, 4), 6, 4);

        assert_eq!(over.status(), GameStatus::GameOver);
        assert_eq!(over.winner(), Some(A));
        assert_eq!(click(&over, 0, 0), over);
        assert_eq!(click(&over, 6, 4), over);
    }

    #[test]
    fn win_condition_changes_only_before_play() {
        let state = set_win_condition(&create_initial_state(), WinCondition::FiveCaptures);
        assert_eq!(state.win_condition(), WinCondition::FiveCaptures);

        let moved = click(&click(&state, 8, 0), 7, 0);
        let locked = set_win_condition(&moved, WinCondition::TotalCapture);

        assert_eq!(locked, moved);
    }

    #[test]
    fn win_condition_can_change_while_a_piece_is_selected() {
        let selected = click(&create_initial_state(), 8, 0);

        let state = set_win_condition(&selected, WinCondition::TotalCapture);

        assert_eq!(state.win_condition(), WinCondition::TotalCapture);
        assert_eq!(state.selected_piece(), None);
        assert!(state.is_pristine());
    }

    #[test]
    fn oversized_capture_counts_lock_win_condition() {
        let injected = GameState::from_position(Board::new(), A).with_captured(CapturedCounts {
            first: 200,
            second: 100,
        });

        assert!(!injected.is_pristine());
        assert_eq!(
            set_win_condition(&injected, WinCondition::TotalCapture),
            injected
        );
    }

    #[test]
    fn hints_mirror_valid_moves() {
        let board = Board::from_pieces(&[(pos(8, 1), A), (pos(6, 2), B), (pos(7, 0), B)]);
        let state = click(&GameState::from_position(board, A), 8, 1);

        let hints = state.hints();

        assert_eq!(hints.len(), state.valid_moves().len());
        assert!(
            hints
                .iter()
                .any(|hint| hint.position == pos(7, 1) && hint.is_unsafe)
        );
    }

    #[test]
    fn view_flattens_board_and_moves() {
        let state = click(&create_initial_state(), 8, 0);

        let view = state.to_view();

        assert_eq!(view.board.len(), 81);
        assert_eq!(view.board[0], 2);
        assert_eq!(view.board[80], 1);
        assert_eq!(view.selected_piece, Some(pos(8, 0)));
        assert_eq!(view.valid_moves.len(), 7);
        assert_eq!(view.hints.len(), 7);
        assert_eq!(view.win_condition, WinCondition::Standard);
    }
}
