//! # dama-types
//!
//! Wire format types for the dama-sync realtime checkers protocol.
//!
//! This crate provides the foundational types used across all dama-sync crates:
//! - [`ClientId`], [`RoomId`] - Identity types for the realtime channel
//! - [`Color`], [`GameVariant`], [`Coord`] - Board vocabulary
//! - [`RoomEvent`] - The five channel events and their wire-name dispatch
//! - [`ProtocolError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod board;
mod error;
mod events;
mod ids;

pub use board::{BoardMatrix, Color, Coord, GameVariant, Piece, Square};
pub use error::ProtocolError;
pub use events::{
    BoardStatusEvent, MoveEvent, RoomEvent, SelectionEvent, TurnChangeEvent, WinEvent,
};
pub use ids::{ClientId, RoomId};
