//! The rule engine: owns the game state and commits transitions.

use super::rules;
use super::state::GameState;
use super::types::{Board, Player, Status};
use crate::notify::{ChangeNotifier, Subscription};
use tracing::{debug, info, instrument};

/// The kalah state machine.
///
/// `Game` owns its [`GameState`] exclusively: every mutation flows through
/// [`make_move`](Game::make_move) or [`reset`](Game::reset), each committed
/// transition is published to subscribers exactly once, and illegal or
/// out-of-phase moves are ignored without mutation or publication. A move
/// is applied synchronously from the caller's perspective - sowing,
/// capture, and the termination sweep all land before anyone observes the
/// state - so listeners never see a partially-sown board.
#[derive(Debug)]
pub struct Game {
    state: GameState,
    notifier: ChangeNotifier,
}

impl Game {
    /// Creates a game with the canonical opening layout, user to move.
    pub fn new() -> Self {
        Self {
            state: GameState::new(Player::User),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Restores a game at an arbitrary live position.
    pub fn from_position(board: Board, current: Player, started_by: Player) -> Self {
        Self {
            state: GameState::from_position(board, current, started_by),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Read access to the current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Registers a change listener; fires after every committed mutation.
    pub fn subscribe(&mut self, listener: impl Fn() + Send + 'static) -> Subscription {
        self.notifier.subscribe(listener)
    }

    /// Detaches a previously registered listener.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.notifier.unsubscribe(subscription);
    }

    /// True iff `pit` is a non-empty pit on `player`'s own side.
    pub fn is_legal(&self, pit: usize, player: Player) -> bool {
        rules::is_legal(self.state.board(), pit, player)
    }

    /// All pits `player` may legally sow from, in ascending index order.
    pub fn legal_moves(&self, player: Player) -> Vec<usize> {
        rules::legal_moves(self.state.board(), player)
    }

    /// Applies the current player's move at `pit`.
    ///
    /// A terminal game or an illegal pit makes this a silent no-op: no
    /// mutation, no publication. Otherwise the stones are sown (skipping
    /// the opponent's store), a final stone in the mover's own store keeps
    /// the turn, the capture rule is applied, the termination sweep runs if
    /// a side has emptied, the turn passes unless it was kept, and the
    /// transition is published once.
    #[instrument(skip(self), fields(player = %self.state.current_player()))]
    pub fn make_move(&mut self, pit: usize) {
        let mover = self.state.current_player();
        if self.state.is_over() || !rules::is_legal(self.state.board(), pit, mover) {
            debug!(pit, "Ignoring illegal or out-of-phase move");
            return;
        }
        let stones_before = self.state.board().total();

        let sown = rules::sow(self.state.board(), pit, mover);
        let extra_turn = rules::earns_extra_turn(sown.last_slot, mover);
        let mut board = sown.board;
        let mut captured = false;
        if !extra_turn {
            if let Some(taken) = rules::capture(&board, sown.last_slot, mover) {
                board = taken;
                captured = true;
            }
        }
        self.state.set_board(board);

        if !self.settle() {
            let next = if extra_turn { mover } else { mover.opponent() };
            self.state.set_current_player(next);
            self.state.set_status(Status::turn_of(next));
        }

        debug_assert_eq!(self.state.board().total(), stones_before);
        info!(
            pit,
            last_slot = sown.last_slot,
            extra_turn,
            captured,
            over = self.state.is_over(),
            "Move committed"
        );
        self.notifier.notify();
    }

    /// Runs the termination sweep if a side has emptied its pits.
    ///
    /// Invoked by [`make_move`](Game::make_move) after every transition;
    /// public so a restored position can be settled directly. Returns true
    /// when the game is (or already was) over. Does not publish on its own.
    pub fn check_game_over(&mut self) -> bool {
        self.settle()
    }

    fn settle(&mut self) -> bool {
        if self.state.is_over() {
            return true;
        }
        if !rules::finished(self.state.board()) {
            return false;
        }
        let swept = rules::sweep(self.state.board());
        let status = Status::from_stores(swept.store(Player::User), swept.store(Player::Ai));
        info!(
            user_store = swept.store(Player::User),
            ai_store = swept.store(Player::Ai),
            %status,
            "Game over"
        );
        self.state.finish(swept, status);
        true
    }

    /// Reinitializes the game in place and publishes.
    #[instrument(skip(self))]
    pub fn reset(&mut self, starting: Player) {
        info!(starting = %starting, "Resetting game");
        self.state.reset_to(starting);
        self.notifier.notify();
    }

    /// Sets the status label and publishes.
    ///
    /// Used by the orchestrator for the thinking indicator; the board and
    /// turn are untouched.
    pub fn set_status(&mut self, status: Status) {
        self.state.set_status(status);
        self.notifier.notify();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
