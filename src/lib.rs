//! Kalah engine with an oracle-backed automated opponent.
//!
//! # Architecture
//!
//! - **Game**: the rule engine - a deterministic state machine enforcing
//!   move legality, sowing, capture, extra turns, and the termination sweep
//! - **ChangeNotifier**: a synchronous listener registry publishing every
//!   committed transition
//! - **Orchestrator**: sequences the automated seat - thinking delay,
//!   oracle query, legality-screened candidates, random legal fallback,
//!   extra-turn chaining, and reset-safe cancellation
//! - **HttpOracle**: client for the external move-recommendation service
//!
//! # Example
//!
//! ```
//! use kalah::{Game, Player};
//!
//! let mut game = Game::new();
//! // Pit 2 holds four stones and the last one lands in the user's store,
//! // which keeps the turn.
//! game.make_move(2);
//! assert_eq!(game.state().current_player(), Player::User);
//! assert_eq!(game.state().board().store(Player::User), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod game;
mod notify;
mod oracle;
mod orchestrator;
mod settings;

// Crate-level exports - Game types
pub use game::{
    AI_STORE, Board, Game, GameState, Player, SLOT_COUNT, STONE_COUNT, Status, USER_STORE,
};

// Crate-level exports - Notification channel
pub use notify::{ChangeNotifier, Listener, Subscription};

// Crate-level exports - Move oracle
pub use oracle::{HttpOracle, MoveOracle, OracleError};

// Crate-level exports - Turn orchestration
pub use orchestrator::{Orchestrator, Pacing};

// Crate-level exports - Settings
pub use settings::{ConfigError, Settings};
