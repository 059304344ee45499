//! Move admission ledger for dama-sync.
//!
//! The relay provides no delivery deduplication, so a `position` event
//! may arrive more than once. The ledger admits each distinct
//! (from, to, originator, move number) tuple at most once; replays are
//! rejected before they reach the board.
//!
//! It also tracks the highest committed move number, which is the
//! reconciliation key for `currentBoardStatus` snapshots: a snapshot is
//! only applied when its move number is strictly ahead of the ledger.

use std::collections::HashSet;

use game_types::{ClientId, Coord};

/// Identity of one committed move.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveKey {
    /// Square the piece moved from.
    pub from: Coord,
    /// Square the piece moved to.
    pub to: Coord,
    /// Which connection committed the move.
    pub originator: ClientId,
    /// The originator's move count at commit time.
    pub move_number: u64,
}

/// Tracks admitted moves and the committed move count.
#[derive(Debug, Clone, Default)]
pub struct MoveLedger {
    admitted: HashSet<MoveKey>,
    committed: u64,
}

impl MoveLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a move, returning `false` if this exact move was already
    /// applied (duplicate delivery must be a no-op).
    pub fn admit(&mut self, key: MoveKey) -> bool {
        let move_number = key.move_number;
        if !self.admitted.insert(key) {
            return false;
        }
        if move_number > self.committed {
            self.committed = move_number;
        }
        true
    }

    /// The number the next locally committed move should carry.
    pub fn next_move_number(&self) -> u64 {
        self.committed + 1
    }

    /// The highest committed move number seen so far.
    pub fn committed(&self) -> u64 {
        self.committed
    }

    /// Jump the committed count forward after applying a snapshot.
    /// Lower values are ignored; the ledger never moves backwards.
    pub fn fast_forward(&mut self, move_number: u64) {
        if move_number > self.committed {
            self.committed = move_number;
        }
    }
}
