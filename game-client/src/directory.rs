//! Room lookup, out-of-band of the realtime channel.
//!
//! A joiner resolves room metadata (variant, creator's color) from a
//! directly-addressed directory *before* joining the channel, so a dead
//! link never renders a broken board. In production this is an HTTP
//! endpoint on the room service; [`MemoryDirectory`] backs tests and
//! single-process demos.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;

use game_types::{Color, GameVariant, RoomId};

/// Room metadata resolvable by room code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomInfo {
    /// The variant fixed for the room's lifetime.
    pub variant: GameVariant,
    /// The color the creator picked; the joiner takes the complement.
    pub creator_color: Color,
}

/// Directory errors.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No room under that code (or it expired). Not retryable; the
    /// caller should redirect to the entry page.
    #[error("room not found")]
    NotFound,

    /// The lookup itself failed (network, service down).
    #[error("lookup failed: {0}")]
    Lookup(String),
}

/// Room existence/metadata lookup by room code.
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    /// Register a new room and return its code.
    async fn create(
        &self,
        variant: GameVariant,
        creator_color: Color,
    ) -> Result<RoomId, DirectoryError>;

    /// Resolve metadata for an existing room.
    async fn lookup(&self, room: &RoomId) -> Result<RoomInfo, DirectoryError>;
}

/// In-memory directory for tests and single-process use.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    rooms: Mutex<HashMap<RoomId, RoomInfo>>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomDirectory for MemoryDirectory {
    async fn create(
        &self,
        variant: GameVariant,
        creator_color: Color,
    ) -> Result<RoomId, DirectoryError> {
        let room = RoomId::generate();
        let mut rooms = self.rooms.lock().await;
        rooms.insert(
            room.clone(),
            RoomInfo {
                variant,
                creator_color,
            },
        );
        Ok(room)
    }

    async fn lookup(&self, room: &RoomId) -> Result<RoomInfo, DirectoryError> {
        let rooms = self.rooms.lock().await;
        rooms.get(room).copied().ok_or(DirectoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_room_is_resolvable() {
        let directory = MemoryDirectory::new();

        let room = directory
            .create(GameVariant::International, Color::White)
            .await
            .unwrap();
        let info = directory.lookup(&room).await.unwrap();

        assert_eq!(info.variant, GameVariant::International);
        assert_eq!(info.creator_color, Color::White);
    }

    #[tokio::test]
    async fn unknown_room_is_not_found() {
        let directory = MemoryDirectory::new();
        let result = directory.lookup(&RoomId::from_code("gone")).await;
        assert!(matches!(result, Err(DirectoryError::NotFound)));
    }

    #[tokio::test]
    async fn rooms_get_distinct_codes() {
        let directory = MemoryDirectory::new();
        let a = directory
            .create(GameVariant::Turkish, Color::Black)
            .await
            .unwrap();
        let b = directory
            .create(GameVariant::Turkish, Color::Black)
            .await
            .unwrap();
        assert_ne!(a, b);
    }
}
