//! Core domain types for kalah.

use serde::{Deserialize, Serialize};

/// Number of slots on the board: twelve pits plus two stores.
pub const SLOT_COUNT: usize = 14;

/// Total stones in play from the opening layout.
pub const STONE_COUNT: u32 = 48;

/// Index of the user's store.
pub const USER_STORE: usize = 6;

/// Index of the AI's store.
pub const AI_STORE: usize = 13;

/// A seat at the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Player {
    /// The human seat (pits 0-5, store 6).
    User,
    /// The automated seat (pits 7-12, store 13).
    Ai,
}

impl Player {
    /// Returns the opposing seat.
    pub fn opponent(self) -> Self {
        match self {
            Player::User => Player::Ai,
            Player::Ai => Player::User,
        }
    }

    /// Index of this seat's store.
    pub fn store(self) -> usize {
        match self {
            Player::User => USER_STORE,
            Player::Ai => AI_STORE,
        }
    }

    /// The pit indices this seat sows from.
    pub fn pits(self) -> std::ops::RangeInclusive<usize> {
        match self {
            Player::User => 0..=5,
            Player::Ai => 7..=12,
        }
    }

    /// Whether `slot` is one of this seat's own pits (stores excluded).
    pub fn owns_pit(self, slot: usize) -> bool {
        self.pits().contains(&slot)
    }
}

/// Phase and result labels shown to the user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
pub enum Status {
    /// Waiting for the user to pick a pit.
    #[strum(serialize = "Your Turn")]
    YourTurn,
    /// The AI opens the game.
    #[strum(serialize = "AI Starts")]
    AiStarts,
    /// The automated seat is computing its move.
    #[strum(serialize = "AI Thinking...")]
    AiThinking,
    /// The user banked more stones.
    #[strum(serialize = "You Win!")]
    YouWin,
    /// The AI banked more stones.
    #[strum(serialize = "AI Wins!")]
    AiWins,
    /// Both stores ended level.
    #[strum(serialize = "Tie Game!")]
    TieGame,
}

impl Status {
    /// Turn prompt for the seat about to move.
    pub fn turn_of(player: Player) -> Self {
        match player {
            Player::User => Status::YourTurn,
            Player::Ai => Status::AiThinking,
        }
    }

    /// Opening label for the seat that starts a fresh game.
    pub fn opening(player: Player) -> Self {
        match player {
            Player::User => Status::YourTurn,
            Player::Ai => Status::AiStarts,
        }
    }

    /// Result label from the two store totals.
    pub fn from_stores(user_store: u8, ai_store: u8) -> Self {
        if user_store > ai_store {
            Status::YouWin
        } else if ai_store > user_store {
            Status::AiWins
        } else {
            Status::TieGame
        }
    }
}

/// The 14-slot kalah board.
///
/// Slots 0-5 are the user's pits, 6 the user's store, 7-12 the AI's pits,
/// 13 the AI's store. Stones are only ever relocated, never created or
/// destroyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    slots: [u8; SLOT_COUNT],
}

impl Board {
    /// The canonical opening layout: four stones per pit, empty stores.
    pub const OPENING: [u8; SLOT_COUNT] = [4, 4, 4, 4, 4, 4, 0, 4, 4, 4, 4, 4, 4, 0];

    /// Creates a board with the opening layout.
    pub fn new() -> Self {
        Self {
            slots: Self::OPENING,
        }
    }

    /// Creates a board from explicit slot counts.
    pub fn from_slots(slots: [u8; SLOT_COUNT]) -> Self {
        Self { slots }
    }

    /// All fourteen slots in index order.
    pub fn slots(&self) -> &[u8; SLOT_COUNT] {
        &self.slots
    }

    /// Stones banked in `player`'s store.
    pub fn store(&self, player: Player) -> u8 {
        self.slots[player.store()]
    }

    /// Whether all six of `player`'s pits are empty.
    pub fn side_cleared(&self, player: Player) -> bool {
        player.pits().all(|pit| self.slots[pit] == 0)
    }

    /// Total stones on the board, pits and stores together.
    pub fn total(&self) -> u32 {
        self.slots.iter().map(|&stones| u32::from(stones)).sum()
    }

    /// Formats the board as a human-readable grid, AI side on top.
    pub fn display(&self) -> String {
        let s = &self.slots;
        let mut out = String::new();
        out.push_str("       ");
        for pit in (7..=12).rev() {
            out.push_str(&format!("[{:2}] ", s[pit]));
        }
        out.push('\n');
        out.push_str(&format!(" [{:2}]{:30}[{:2}]\n", s[AI_STORE], "", s[USER_STORE]));
        out.push_str("       ");
        for pit in 0..=5 {
            out.push_str(&format!("[{:2}] ", s[pit]));
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
