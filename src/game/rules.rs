//! Pure rule functions over board snapshots.
//!
//! Each function takes an immutable board and returns the outcome, so the
//! engine can compose a full transition and commit it atomically.

use super::types::{Board, Player, SLOT_COUNT};
use tracing::instrument;

/// True iff `pit` is a non-empty pit on `player`'s own side.
///
/// Stores and the opponent's pits are never legal sources, and an
/// out-of-range index is simply illegal rather than an error.
pub fn is_legal(board: &Board, pit: usize, player: Player) -> bool {
    player.owns_pit(pit) && board.slots()[pit] > 0
}

/// All pits `player` may legally sow from, in ascending index order.
///
/// The ordering is stable so random-fallback selection is reproducible
/// under a seeded generator.
#[instrument(skip(board))]
pub fn legal_moves(board: &Board, player: Player) -> Vec<usize> {
    player
        .pits()
        .filter(|&pit| is_legal(board, pit, player))
        .collect()
}

/// Index of the pit directly across the board.
pub fn opposite(pit: usize) -> usize {
    12 - pit
}

/// Outcome of sowing one pit: the new board and the slot the final stone
/// landed in.
#[derive(Debug, Clone)]
pub struct Sowing {
    /// Board after distribution.
    pub board: Board,
    /// Slot the last stone landed in.
    pub last_slot: usize,
}

/// Distributes the stones from `pit` counter-clockwise, one per slot,
/// skipping the opponent's store. The mover's own store is sown.
#[instrument(skip(board))]
pub fn sow(board: &Board, pit: usize, player: Player) -> Sowing {
    let mut slots = *board.slots();
    let stones = slots[pit];
    slots[pit] = 0;

    let skipped = player.opponent().store();
    let mut index = pit;
    for _ in 0..stones {
        index = (index + 1) % SLOT_COUNT;
        if index == skipped {
            index = (index + 1) % SLOT_COUNT;
        }
        slots[index] += 1;
    }

    Sowing {
        board: Board::from_slots(slots),
        last_slot: index,
    }
}

/// Whether the final stone landed in the mover's own store.
pub fn earns_extra_turn(last_slot: usize, player: Player) -> bool {
    last_slot == player.store()
}

/// Applies the capture rule after sowing.
///
/// Fires only when the last stone landed alone in one of the mover's own
/// pits (the pit was empty before the stone arrived) and the opposite pit
/// holds stones; both pits are then emptied into the mover's store.
/// Returns `None` when no capture occurs.
pub fn capture(board: &Board, last_slot: usize, player: Player) -> Option<Board> {
    if !player.owns_pit(last_slot) {
        return None;
    }
    let slots = board.slots();
    if slots[last_slot] != 1 {
        return None;
    }
    let across = opposite(last_slot);
    if slots[across] == 0 {
        return None;
    }

    let mut next = *slots;
    next[player.store()] += next[across] + 1;
    next[last_slot] = 0;
    next[across] = 0;
    Some(Board::from_slots(next))
}

/// Whether either side's six pits are all empty.
pub fn finished(board: &Board) -> bool {
    board.side_cleared(Player::User) || board.side_cleared(Player::Ai)
}

/// The termination sweep: each side's remaining pit stones move into that
/// side's own store and all twelve pits are zeroed. Unconditional on which
/// side ran out.
#[instrument(skip(board))]
pub fn sweep(board: &Board) -> Board {
    let mut slots = *board.slots();
    for player in [Player::User, Player::Ai] {
        let store = player.store();
        for pit in player.pits() {
            slots[store] += slots[pit];
            slots[pit] = 0;
        }
    }
    Board::from_slots(slots)
}
