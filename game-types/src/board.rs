//! Board vocabulary shared across the dama-sync crates.
//!
//! The board itself is owned by the rules engine; these types only name
//! what goes over the wire and what the protocol needs to reason about
//! turns and promotion.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ProtocolError;

/// One of the two player colors. The two peers in a room always hold
/// opposite values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// The white pieces. Promotes at row 0.
    White,
    /// The black pieces. Black always moves first.
    Black,
}

impl Color {
    /// The other color.
    pub fn opposite(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

/// The checkers variant played in a room. Fixed for the room's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    /// Turkish draughts on an 8x8 board.
    Turkish,
    /// International draughts on a 10x10 board.
    International,
}

impl GameVariant {
    /// Board dimension (rows == columns).
    pub fn board_size(&self) -> u8 {
        match self {
            Self::Turkish => 8,
            Self::International => 10,
        }
    }

    /// The row at which a piece of `color` is crowned.
    ///
    /// White travels toward row 0, Black toward the far edge.
    pub fn promotion_row(&self, color: Color) -> u8 {
        match color {
            Color::White => 0,
            Color::Black => self.board_size() - 1,
        }
    }
}

/// An addressable square, written as `"row:col"` on the wire.
///
/// The rules engine owns the coordinate space; the protocol treats the
/// value as opaque except when it needs the row for promotion checks.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coord(String);

impl Coord {
    /// Build a coordinate from a grid position.
    pub fn new(row: u8, col: u8) -> Self {
        Self(format!("{row}:{col}"))
    }

    /// Parse back into `(row, col)`.
    pub fn position(&self) -> Result<(u8, u8), ProtocolError> {
        let (row, col) = self
            .0
            .split_once(':')
            .ok_or_else(|| ProtocolError::InvalidCoord(self.0.clone()))?;
        let row = row
            .parse()
            .map_err(|_| ProtocolError::InvalidCoord(self.0.clone()))?;
        let col = col
            .parse()
            .map_err(|_| ProtocolError::InvalidCoord(self.0.clone()))?;
        Ok((row, col))
    }

    /// The coordinate as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({})", self.0)
    }
}

impl From<&str> for Coord {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One piece as seen by the protocol: owning color and king flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Owning color.
    pub color: Color,
    /// Whether the piece has been crowned.
    pub king: bool,
}

impl Piece {
    /// A fresh, uncrowned piece.
    pub fn new(color: Color) -> Self {
        Self { color, king: false }
    }
}

/// One square of the board snapshot sent in `currentBoardStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    /// The square's coordinate.
    pub coord: Coord,
    /// The piece occupying the square, if any.
    pub item: Option<Piece>,
}

/// Full board snapshot, row-major.
pub type BoardMatrix = Vec<Vec<Square>>;
