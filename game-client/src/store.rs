//! Session-scoped room data.
//!
//! The creator persists its chosen color and variant keyed by room code
//! so a page reload within the same browser session resumes with the
//! same color. The store survives navigation, not devices - in the
//! browser build it sits on sessionStorage; tests use [`MemoryStore`].

use std::collections::HashMap;
use std::sync::Mutex;

use game_types::{Color, GameVariant, RoomId};

/// What a client remembers about one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomRecord {
    /// The local player's color in that room.
    pub color: Color,
    /// The room's variant.
    pub variant: GameVariant,
}

/// Session-scoped key-value storage keyed by room code.
pub trait SessionStore: Send + Sync {
    /// Remember the local color and variant for a room.
    fn save(&self, room: &RoomId, record: RoomRecord);

    /// Recall a previously saved record, if any.
    fn load(&self, room: &RoomId) -> Option<RoomRecord>;
}

/// In-memory store for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<RoomId, RoomRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, room: &RoomId, record: RoomRecord) {
        let mut records = self.records.lock().unwrap();
        records.insert(room.clone(), record);
    }

    fn load(&self, room: &RoomId) -> Option<RoomRecord> {
        let records = self.records.lock().unwrap();
        records.get(room).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_roundtrip() {
        let store = MemoryStore::new();
        let room = RoomId::generate();
        let record = RoomRecord {
            color: Color::White,
            variant: GameVariant::Turkish,
        };

        store.save(&room, record);
        assert_eq!(store.load(&room), Some(record));
    }

    #[test]
    fn load_unknown_room_is_none() {
        let store = MemoryStore::new();
        assert!(store.load(&RoomId::from_code("never-seen")).is_none());
    }

    #[test]
    fn save_overwrites_previous_record() {
        let store = MemoryStore::new();
        let room = RoomId::generate();

        store.save(
            &room,
            RoomRecord {
                color: Color::White,
                variant: GameVariant::Turkish,
            },
        );
        store.save(
            &room,
            RoomRecord {
                color: Color::Black,
                variant: GameVariant::Turkish,
            },
        );

        assert_eq!(store.load(&room).unwrap().color, Color::Black);
    }
}
