//! King promotion policy.
//!
//! Promotion is a side effect of a committed move, never a turn
//! transition. Two rules apply:
//! - a piece landing on the promotion row of its direction of travel is
//!   crowned;
//! - a color reduced to its last remaining piece has that piece crowned
//!   unconditionally, regardless of position.

use game_types::{Color, Coord, GameVariant, ProtocolError};

use crate::rules::RulesEngine;

/// Crown the piece on `dest` if it sits on its color's promotion row.
///
/// Returns whether a crowning happened. Squares without a piece and
/// already-crowned kings are left alone.
pub fn crown_if_promoted<E: RulesEngine + ?Sized>(
    engine: &mut E,
    variant: GameVariant,
    dest: &Coord,
) -> Result<bool, ProtocolError> {
    let piece = match engine.piece_at(dest) {
        Some(piece) => piece,
        None => return Ok(false),
    };
    if piece.king {
        return Ok(false);
    }

    let (row, _) = dest.position()?;
    if row == variant.promotion_row(piece.color) {
        engine.crown(dest);
        return Ok(true);
    }
    Ok(false)
}

/// Crown the last remaining piece of any color reduced to one.
///
/// Checked after every committed move; `crown` is idempotent so calling
/// this repeatedly is harmless.
pub fn crown_last_pieces<E: RulesEngine + ?Sized>(engine: &mut E) {
    for color in [Color::White, Color::Black] {
        let coords = engine.pieces_of(color);
        if let [last] = coords.as_slice() {
            engine.crown(last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedBoard;
    use game_types::Piece;

    #[test]
    fn piece_on_promotion_row_is_crowned() {
        let mut board = ScriptedBoard::new(GameVariant::Turkish);
        board.place(Coord::new(7, 2), Piece::new(Color::Black));

        let crowned =
            crown_if_promoted(&mut board, GameVariant::Turkish, &Coord::new(7, 2)).unwrap();

        assert!(crowned);
        assert!(board.piece_at(&Coord::new(7, 2)).unwrap().king);
    }

    #[test]
    fn piece_off_promotion_row_is_not_crowned() {
        let mut board = ScriptedBoard::new(GameVariant::Turkish);
        board.place(Coord::new(4, 2), Piece::new(Color::Black));

        let crowned =
            crown_if_promoted(&mut board, GameVariant::Turkish, &Coord::new(4, 2)).unwrap();

        assert!(!crowned);
        assert!(!board.piece_at(&Coord::new(4, 2)).unwrap().king);
    }

    #[test]
    fn white_promotes_at_row_zero() {
        let mut board = ScriptedBoard::new(GameVariant::International);
        board.place(Coord::new(0, 4), Piece::new(Color::White));
        // Black on row 0 is on its own back rank, not a promotion
        board.place(Coord::new(0, 6), Piece::new(Color::Black));

        assert!(crown_if_promoted(&mut board, GameVariant::International, &Coord::new(0, 4))
            .unwrap());
        assert!(!crown_if_promoted(&mut board, GameVariant::International, &Coord::new(0, 6))
            .unwrap());
    }

    #[test]
    fn existing_king_is_left_alone() {
        let mut board = ScriptedBoard::new(GameVariant::Turkish);
        board.place(
            Coord::new(0, 1),
            Piece {
                color: Color::White,
                king: true,
            },
        );

        let crowned =
            crown_if_promoted(&mut board, GameVariant::Turkish, &Coord::new(0, 1)).unwrap();
        assert!(!crowned);
    }

    #[test]
    fn empty_square_is_a_noop() {
        let mut board = ScriptedBoard::new(GameVariant::Turkish);
        let crowned =
            crown_if_promoted(&mut board, GameVariant::Turkish, &Coord::new(0, 0)).unwrap();
        assert!(!crowned);
    }

    #[test]
    fn last_piece_is_crowned_anywhere() {
        let mut board = ScriptedBoard::new(GameVariant::Turkish);
        // White down to one piece mid-board, Black still has two
        board.place(Coord::new(4, 4), Piece::new(Color::White));
        board.place(Coord::new(1, 1), Piece::new(Color::Black));
        board.place(Coord::new(1, 3), Piece::new(Color::Black));

        crown_last_pieces(&mut board);

        assert!(board.piece_at(&Coord::new(4, 4)).unwrap().king);
        assert!(!board.piece_at(&Coord::new(1, 1)).unwrap().king);
        assert!(!board.piece_at(&Coord::new(1, 3)).unwrap().king);
    }

    #[test]
    fn crown_last_pieces_is_idempotent() {
        let mut board = ScriptedBoard::new(GameVariant::Turkish);
        board.place(Coord::new(4, 4), Piece::new(Color::White));

        crown_last_pieces(&mut board);
        crown_last_pieces(&mut board);

        assert!(board.piece_at(&Coord::new(4, 4)).unwrap().king);
        assert_eq!(board.pieces_of(Color::White).len(), 1);
    }
}
