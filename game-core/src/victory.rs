//! Game-over detection.

use game_types::Color;

use crate::rules::RulesEngine;

/// Watches piece counts after every committed move and declares a winner
/// at most once per session.
///
/// The terminal guard is monotonic: once a winner has been declared (or
/// the session learned of one remotely), repeated checks return nothing.
#[derive(Debug, Clone, Default)]
pub struct WinDetector {
    declared: bool,
}

impl WinDetector {
    /// Create a detector with no declaration yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Query remaining piece counts and return the winner the first time
    /// one color reaches zero pieces.
    pub fn check<E: RulesEngine + ?Sized>(&mut self, engine: &E) -> Option<Color> {
        if self.declared {
            return None;
        }
        for color in [Color::White, Color::Black] {
            if engine.pieces_of(color).is_empty() {
                self.declared = true;
                return Some(color.opposite());
            }
        }
        None
    }

    /// Record that the game ended through another path (remote `won`
    /// event or forfeit) so later checks stay silent.
    pub fn mark_declared(&mut self) {
        self.declared = true;
    }

    /// Whether a winner has been declared.
    pub fn is_declared(&self) -> bool {
        self.declared
    }
}
