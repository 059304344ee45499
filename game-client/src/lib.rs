//! # dama-client
//!
//! Client session library for the dama-sync realtime checkers protocol.
//!
//! This is the crate a game front end embeds. It owns the room session:
//! bootstrap, color negotiation, turn synchronization, echo suppression,
//! and game-over detection - everything between "user clicked a square"
//! and "event went over the relay".
//!
//! ## Architecture
//!
//! ```text
//! Rendering layer → GameSession → Transport → Relay
//!                        ↓
//!                   dama-core (pure state machine + policies)
//! ```
//!
//! The session applies local moves optimistically, publishes
//! fire-and-forget, and funnels remote events through the same apply
//! path with publishing suppressed.
//!
//! ## Example
//!
//! ```ignore
//! use dama_client::{GameSession, MemoryDirectory, MemoryStore, MockTransport};
//! use dama_types::{Color, GameVariant};
//!
//! let mut session = GameSession::create(
//!     GameVariant::Turkish,
//!     Color::White,
//!     transport,
//!     engine,
//!     &directory,
//!     &store,
//! ).await?;
//!
//! while let Ok(event) = session.transport().next_event().await {
//!     session.handle_event(event).await?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod directory;
pub mod session;
pub mod store;
pub mod transport;

pub use directory::{DirectoryError, MemoryDirectory, RoomDirectory, RoomInfo};
pub use session::{ClientError, GameSession, MoveOutcome};
pub use store::{MemoryStore, RoomRecord, SessionStore};
pub use transport::{ChannelEvent, MockTransport, Transport, TransportError};
