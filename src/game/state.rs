//! The game state record.

use super::types::{Board, Player, Status};
use serde::{Deserialize, Serialize};

/// Complete state of one game session.
///
/// Owned and mutated exclusively by [`Game`](super::Game); every other
/// component reads it through the accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The board.
    board: Board,
    /// Seat that moves next.
    current_player: Player,
    /// Seat that opened the current game, retained for play-again
    /// semantics and the oracle's origin flag.
    started_by: Player,
    /// Whether the game has reached a terminal state.
    over: bool,
    /// Phase or result label.
    status: Status,
}

impl GameState {
    pub(super) fn new(starting: Player) -> Self {
        Self {
            board: Board::new(),
            current_player: starting,
            started_by: starting,
            over: false,
            status: Status::opening(starting),
        }
    }

    pub(super) fn from_position(board: Board, current: Player, started_by: Player) -> Self {
        Self {
            board,
            current_player: current,
            started_by,
            over: false,
            status: Status::turn_of(current),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the seat that moves next.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the seat that opened the current game.
    pub fn started_by(&self) -> Player {
        self.started_by
    }

    /// Whether the game has ended.
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Returns the phase or result label.
    pub fn status(&self) -> Status {
        self.status
    }

    pub(super) fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    pub(super) fn set_current_player(&mut self, player: Player) {
        self.current_player = player;
    }

    pub(super) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Commits the terminal sweep: swept board, result label, absorbing flag.
    pub(super) fn finish(&mut self, board: Board, status: Status) {
        self.board = board;
        self.status = status;
        self.over = true;
    }

    pub(super) fn reset_to(&mut self, starting: Player) {
        *self = Self::new(starting);
    }
}
