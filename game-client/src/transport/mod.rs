//! Transport abstraction for dama-sync.
//!
//! This module provides a pluggable realtime-channel layer that abstracts
//! the underlying pub/sub mechanism (a hosted relay in production, mock
//! for testing).
//!
//! # Design
//!
//! The transport trait is async and room-oriented:
//! - `join()` / `leave()` enter and exit a room channel
//! - `publish()` sends a named event to everyone in the room
//! - `next_event()` yields channel traffic (messages and presence)
//! - `members()` queries current presence
//!
//! Events are delivered one at a time in arrival order; the session
//! never reorders or buffers them. The only ordering the protocol
//! relies on is per-origin send order, which a single relay connection
//! guarantees.

mod mock;

pub use mock::MockTransport;

use async_trait::async_trait;
use thiserror::Error;

use game_types::{ClientId, RoomId};

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Joining the room channel failed.
    #[error("join failed: {0}")]
    JoinFailed(String),

    /// Not in a room channel.
    #[error("not joined")]
    NotJoined,

    /// The channel was closed.
    #[error("channel closed")]
    ChannelClosed,

    /// Publish failed.
    #[error("publish failed: {0}")]
    PublishFailed(String),
}

/// One piece of inbound channel traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A member (possibly the local client) joined the room.
    MemberJoined {
        /// Identity of the joining connection.
        id: ClientId,
    },
    /// A member left the room or its presence dropped.
    MemberLeft {
        /// Identity of the departed connection.
        id: ClientId,
    },
    /// A named event published to the room.
    Message {
        /// Wire event name (e.g. `position`).
        name: String,
        /// JSON payload bytes.
        payload: Vec<u8>,
    },
    /// The transport's own connection dropped; the transport retries by
    /// itself, the session only pauses gameplay.
    ConnectionLost,
    /// The transport reconnected.
    ConnectionRestored,
}

/// Realtime channel trait for room pub/sub.
///
/// Implementations handle the underlying connection mechanism
/// (hosted relay, WebSocket, mock, etc).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Join the room's channel.
    async fn join(&self, room: &RoomId) -> Result<(), TransportError>;

    /// Leave the room's channel and drop all its listeners.
    async fn leave(&self, room: &RoomId) -> Result<(), TransportError>;

    /// Publish a named event to everyone in the room (including the
    /// local client, which receives its own echo).
    async fn publish(&self, room: &RoomId, name: &str, payload: &[u8])
        -> Result<(), TransportError>;

    /// Receive the next channel event. Blocks until traffic arrives or
    /// the channel closes.
    async fn next_event(&self) -> Result<ChannelEvent, TransportError>;

    /// Current members of the room.
    async fn members(&self, room: &RoomId) -> Result<Vec<ClientId>, TransportError>;

    /// The local connection's identity.
    fn local_id(&self) -> ClientId;

    /// Whether the underlying connection is up.
    fn is_connected(&self) -> bool;
}
