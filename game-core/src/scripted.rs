//! Scripted board - a [`RulesEngine`] double for tests.
//!
//! The production rules engine lives in the host application; protocol
//! tests don't want to depend on real movement rules. `ScriptedBoard`
//! holds real piece positions but answers legality and capture queries
//! from scripts set by the test, the same way `MockTransport` answers
//! channel traffic from queued responses.

use std::collections::BTreeMap;

use game_types::{BoardMatrix, Color, Coord, GameVariant, Piece, Square};

use crate::rules::{CaptureMap, RulesEngine};

/// In-memory board with scripted query answers.
#[derive(Debug, Clone)]
pub struct ScriptedBoard {
    variant: GameVariant,
    pieces: BTreeMap<Coord, Piece>,
    destinations: BTreeMap<Coord, Vec<Coord>>,
    captures: BTreeMap<Coord, Vec<Coord>>,
    between: BTreeMap<(Coord, Coord), Vec<Coord>>,
}

impl ScriptedBoard {
    /// Create an empty board for the given variant.
    pub fn new(variant: GameVariant) -> Self {
        Self {
            variant,
            pieces: BTreeMap::new(),
            destinations: BTreeMap::new(),
            captures: BTreeMap::new(),
            between: BTreeMap::new(),
        }
    }

    /// Put a piece on a square.
    pub fn place(&mut self, coord: Coord, piece: Piece) {
        self.pieces.insert(coord, piece);
    }

    /// Script the legal destinations for the piece on `from`.
    pub fn script_destinations(&mut self, from: Coord, destinations: Vec<Coord>) {
        self.destinations.insert(from, destinations);
    }

    /// Script a forced capture: the piece on `origin` can capture into
    /// each of `destinations`. The origin's color is read from the board.
    pub fn script_capture(&mut self, origin: Coord, destinations: Vec<Coord>) {
        self.captures.insert(origin, destinations);
    }

    /// Script which enemy pieces lie between two squares.
    pub fn script_between(&mut self, from: Coord, to: Coord, victims: Vec<Coord>) {
        self.between.insert((from, to), victims);
    }
}

impl RulesEngine for ScriptedBoard {
    // Tests place pieces explicitly; there is no canonical setup here.
    fn init(&mut self) {}

    fn board_matrix(&self) -> BoardMatrix {
        let size = self.variant.board_size();
        (0..size)
            .map(|row| {
                (0..size)
                    .map(|col| {
                        let coord = Coord::new(row, col);
                        Square {
                            item: self.pieces.get(&coord).copied(),
                            coord,
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn piece_at(&self, coord: &Coord) -> Option<Piece> {
        self.pieces.get(coord).copied()
    }

    fn available_destinations(&self, coord: &Coord) -> Vec<Coord> {
        self.destinations.get(coord).cloned().unwrap_or_default()
    }

    fn capture_moves(&self, color: Color) -> CaptureMap {
        self.captures
            .iter()
            .filter(|(origin, _)| {
                self.pieces
                    .get(origin)
                    .is_some_and(|piece| piece.color == color)
            })
            .map(|(origin, dests)| (origin.clone(), dests.clone()))
            .collect()
    }

    fn pieces_between(&self, from: &Coord, to: &Coord) -> Vec<Coord> {
        self.between
            .get(&(from.clone(), to.clone()))
            .cloned()
            .unwrap_or_default()
    }

    fn move_piece(&mut self, from: &Coord, to: &Coord) {
        if let Some(piece) = self.pieces.remove(from) {
            self.pieces.insert(to.clone(), piece);
        }
    }

    fn remove_piece(&mut self, coord: &Coord) {
        self.pieces.remove(coord);
    }

    fn crown(&mut self, coord: &Coord) {
        if let Some(piece) = self.pieces.get_mut(coord) {
            piece.king = true;
        }
    }

    fn pieces_of(&self, color: Color) -> Vec<Coord> {
        self.pieces
            .iter()
            .filter(|(_, piece)| piece.color == color)
            .map(|(coord, _)| coord.clone())
            .collect()
    }

    fn restore(&mut self, matrix: &BoardMatrix) {
        self.pieces.clear();
        for row in matrix {
            for square in row {
                if let Some(piece) = square.item {
                    self.pieces.insert(square.coord.clone(), piece);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_has_variant_dimensions() {
        let board = ScriptedBoard::new(GameVariant::Turkish);
        let matrix = board.board_matrix();
        assert_eq!(matrix.len(), 8);
        assert!(matrix.iter().all(|row| row.len() == 8));

        let board = ScriptedBoard::new(GameVariant::International);
        assert_eq!(board.board_matrix().len(), 10);
    }

    #[test]
    fn move_piece_relocates() {
        let mut board = ScriptedBoard::new(GameVariant::Turkish);
        board.place(Coord::new(2, 1), Piece::new(Color::Black));

        board.move_piece(&Coord::new(2, 1), &Coord::new(3, 1));

        assert!(board.piece_at(&Coord::new(2, 1)).is_none());
        assert_eq!(
            board.piece_at(&Coord::new(3, 1)),
            Some(Piece::new(Color::Black))
        );
    }

    #[test]
    fn move_from_empty_square_is_a_noop() {
        let mut board = ScriptedBoard::new(GameVariant::Turkish);
        board.move_piece(&Coord::new(2, 1), &Coord::new(3, 1));
        assert!(board.piece_at(&Coord::new(3, 1)).is_none());
    }

    #[test]
    fn capture_map_filters_by_color() {
        let mut board = ScriptedBoard::new(GameVariant::Turkish);
        board.place(Coord::new(2, 1), Piece::new(Color::Black));
        board.place(Coord::new(5, 1), Piece::new(Color::White));
        board.script_capture(Coord::new(2, 1), vec![Coord::new(4, 1)]);
        board.script_capture(Coord::new(5, 1), vec![Coord::new(3, 1)]);

        let black = board.capture_moves(Color::Black);
        assert_eq!(black.len(), 1);
        assert!(black.contains_key(&Coord::new(2, 1)));

        let white = board.capture_moves(Color::White);
        assert!(white.contains_key(&Coord::new(5, 1)));
    }

    #[test]
    fn restore_replaces_position() {
        let mut board = ScriptedBoard::new(GameVariant::Turkish);
        board.place(Coord::new(2, 1), Piece::new(Color::Black));

        let mut other = ScriptedBoard::new(GameVariant::Turkish);
        other.place(Coord::new(6, 6), Piece::new(Color::White));
        let snapshot = other.board_matrix();

        board.restore(&snapshot);

        assert!(board.piece_at(&Coord::new(2, 1)).is_none());
        assert_eq!(
            board.piece_at(&Coord::new(6, 6)),
            Some(Piece::new(Color::White))
        );
    }

    #[test]
    fn snapshot_roundtrips_through_matrix() {
        let mut board = ScriptedBoard::new(GameVariant::Turkish);
        board.place(Coord::new(2, 1), Piece::new(Color::Black));
        board.place(
            Coord::new(0, 0),
            Piece {
                color: Color::White,
                king: true,
            },
        );

        let mut restored = ScriptedBoard::new(GameVariant::Turkish);
        restored.restore(&board.board_matrix());

        assert_eq!(restored.board_matrix(), board.board_matrix());
    }
}
