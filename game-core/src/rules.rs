//! The rules-engine seam.
//!
//! The board and the movement rules of checkers are an external
//! collaborator. This trait names exactly the operations the
//! synchronization core consumes; nothing in this workspace computes
//! legality itself. The production implementation wraps the host
//! application's checkers library; [`crate::ScriptedBoard`] is the
//! in-tree double for tests.

use std::collections::BTreeMap;

use game_types::{BoardMatrix, Color, Coord, Piece};

/// Forced-capture moves for one color: origin square → capture
/// destinations reachable from it.
pub type CaptureMap = BTreeMap<Coord, Vec<Coord>>;

/// The board operations consumed by the synchronization core.
///
/// The board is a single exclusively-owned resource: only the session's
/// apply step mutates it, which keeps the protocol invariants enforceable
/// in one place.
pub trait RulesEngine {
    /// Set up the starting position.
    fn init(&mut self);

    /// Full board snapshot, row-major.
    fn board_matrix(&self) -> BoardMatrix;

    /// The piece on `coord`, if any.
    fn piece_at(&self, coord: &Coord) -> Option<Piece>;

    /// Legal destination squares for the piece on `coord`.
    fn available_destinations(&self, coord: &Coord) -> Vec<Coord>;

    /// All forced-capture moves currently available to `color`.
    ///
    /// An empty map means `color` has no capture available and may play
    /// any legal move.
    fn capture_moves(&self, color: Color) -> CaptureMap;

    /// Coordinates of enemy pieces on the path between two squares.
    /// These are the pieces a move from `from` to `to` captures.
    fn pieces_between(&self, from: &Coord, to: &Coord) -> Vec<Coord>;

    /// Relocate the piece on `from` to `to`.
    fn move_piece(&mut self, from: &Coord, to: &Coord);

    /// Remove the piece on `coord` from the board.
    fn remove_piece(&mut self, coord: &Coord);

    /// Crown the piece on `coord`. No-op if the square is empty or the
    /// piece is already a king.
    fn crown(&mut self, coord: &Coord);

    /// Coordinates of all pieces owned by `color`.
    fn pieces_of(&self, color: Color) -> Vec<Coord>;

    /// Replace the whole position from a snapshot matrix.
    fn restore(&mut self, matrix: &BoardMatrix);
}
