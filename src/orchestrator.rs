//! Sequences the automated seat's turns around the external oracle.

use crate::game::{Board, Game, Player, Status, rules};
use crate::oracle::MoveOracle;
use rand::seq::IndexedRandom;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Offset from the oracle's local pit numbering (0-5) to the AI seat's
/// absolute board indices (7-12).
const AI_PIT_OFFSET: usize = 7;

/// Delays that pace the automated seat, so consecutive moves stay
/// temporally distinguishable for a watching human.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Pause before the oracle is consulted.
    pub thinking_delay: std::time::Duration,
    /// Pause between consecutive extra-turn moves.
    pub inter_move_delay: std::time::Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            thinking_delay: std::time::Duration::from_millis(1_000),
            inter_move_delay: std::time::Duration::from_millis(800),
        }
    }
}

/// Drives the AI seat without blocking the caller.
///
/// Each automated turn runs as a cancellable tokio task: thinking delay,
/// oracle query, legality-screened candidate selection, then the move -
/// chaining further moves while extra turns keep the seat. Oracle outages,
/// non-success responses, malformed bodies, and exhausted candidate lists
/// all fall back to a uniformly random legal move; nothing on this path is
/// surfaced as a failure.
///
/// Cloning shares the same session, like the engine behind it.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    game: Arc<Mutex<Game>>,
    oracle: Arc<dyn MoveOracle>,
    pacing: Pacing,
    pending: Mutex<Option<JoinHandle<()>>>,
    /// Bumped by every cancellation; a task only commits a move while its
    /// captured generation is still current, so work scheduled against a
    /// pre-reset board can never land on the new one.
    generation: AtomicU64,
}

impl Orchestrator {
    /// Creates an orchestrator over a shared game session.
    pub fn new(game: Arc<Mutex<Game>>, oracle: Arc<dyn MoveOracle>, pacing: Pacing) -> Self {
        Self {
            inner: Arc::new(Inner {
                game,
                oracle,
                pacing,
                pending: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Forwards the user's move and, if the turn passed to the AI seat,
    /// begins an automated turn. Out-of-turn input is ignored.
    #[instrument(skip(self))]
    pub fn handle_human_move(&self, pit: usize) {
        {
            let mut game = self.inner.game.lock().unwrap();
            let state = game.state();
            if state.current_player() != Player::User || state.is_over() {
                debug!(pit, "Ignoring input while it is not the user's turn");
                return;
            }
            game.make_move(pit);
        }
        self.begin_automated_turn();
    }

    /// Schedules an automated turn if the AI seat holds a live turn.
    ///
    /// Publishes the thinking indicator immediately; the oracle request
    /// itself fires after the thinking delay, on a task that
    /// [`cancel_pending`](Orchestrator::cancel_pending) can invalidate.
    #[instrument(skip(self))]
    pub fn begin_automated_turn(&self) {
        {
            let mut game = self.inner.game.lock().unwrap();
            let state = game.state();
            if state.current_player() != Player::Ai || state.is_over() {
                return;
            }
            game.set_status(Status::AiThinking);
        }

        let generation = self.inner.generation.load(Ordering::SeqCst);
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { inner.run_automated_turns(generation).await });

        if let Some(previous) = self.inner.pending.lock().unwrap().replace(handle) {
            previous.abort();
        }
    }

    /// Cancels any scheduled-but-unfired automated turn, so a stale task
    /// cannot apply a move against a board that has since been reset.
    #[instrument(skip(self))]
    pub fn cancel_pending(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.inner.pending.lock().unwrap().take() {
            debug!("Aborting pending automated turn");
            handle.abort();
        }
    }

    /// Starts a fresh game; the AI opens when `starting` is the AI seat.
    #[instrument(skip(self))]
    pub fn start_game(&self, starting: Player) {
        self.cancel_pending();
        self.inner.game.lock().unwrap().reset(starting);
        if starting == Player::Ai {
            self.begin_automated_turn();
        }
    }
}

impl Inner {
    /// Runs oracle-backed moves until the turn leaves the AI seat.
    async fn run_automated_turns(&self, generation: u64) {
        sleep(self.pacing.thinking_delay).await;
        loop {
            let Some((board, started_by)) = self.snapshot(generation) else {
                return;
            };
            let candidates = match self.oracle.best_moves(&board, started_by).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(error = %e, "Oracle unavailable, falling back to a random legal move");
                    Vec::new()
                }
            };
            if !self.apply_ai_move(generation, &candidates) {
                return;
            }
            sleep(self.pacing.inter_move_delay).await;
        }
    }

    /// Board snapshot for the oracle request, or `None` once the turn is
    /// stale, finished, or no longer the AI's.
    fn snapshot(&self, generation: u64) -> Option<(Board, Player)> {
        let game = self.game.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Stale automated turn discarded before the oracle call");
            return None;
        }
        let state = game.state();
        if state.is_over() || state.current_player() != Player::Ai {
            return None;
        }
        Some((state.board().clone(), state.started_by()))
    }

    /// Applies the first legal ranked candidate, or a random legal move
    /// when the list is exhausted. Returns true when the applied move kept
    /// the AI seat (extra turn) and the chain should continue.
    fn apply_ai_move(&self, generation: u64, candidates: &[usize]) -> bool {
        let mut game = self.game.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Stale automated turn discarded before applying a move");
            return false;
        }
        let state = game.state();
        if state.is_over() || state.current_player() != Player::Ai {
            return false;
        }

        // Candidates arrive in the oracle's local numbering; a value that
        // translates outside the AI's pit range fails the legality screen
        // and is skipped rather than applied.
        let ranked = candidates
            .iter()
            .map(|&candidate| candidate + AI_PIT_OFFSET)
            .find(|&pit| rules::is_legal(state.board(), pit, Player::Ai));

        let pit = match ranked {
            Some(pit) => pit,
            None => {
                let moves = rules::legal_moves(state.board(), Player::Ai);
                match moves.choose(&mut rand::rng()) {
                    Some(&pit) => {
                        debug!(pit, "Falling back to a random legal move");
                        pit
                    }
                    None => {
                        // Unreachable while the AI holds a live turn: an
                        // empty side would already have swept the game.
                        warn!("AI seat has no legal move, forfeiting the turn");
                        return false;
                    }
                }
            }
        };

        info!(pit, "Applying automated move");
        game.make_move(pit);

        let state = game.state();
        !state.is_over() && state.current_player() == Player::Ai
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("pacing", &self.inner.pacing)
            .finish()
    }
}
