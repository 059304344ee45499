//! Identity types for the dama-sync realtime channel.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The local identity of one realtime-channel connection.
///
/// Assigned fresh per socket by the transport. Equality against the
/// session's own id is the sole discriminator for self-echo suppression;
/// it is never used for authorization.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(uuid::Uuid);

impl ClientId {
    /// Create a new random ClientId.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientId({})", &self.to_string()[..8])
    }
}

/// A room code addressing one two-party game session.
///
/// Maps 1:1 to a realtime channel. Generated by the room creator and
/// shared with the joiner through an invite link.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Number of random bytes behind a generated room code.
    const CODE_BYTES: usize = 6;

    /// Generate a new random room code (8 URL-safe base64 chars).
    pub fn generate() -> Self {
        let mut bytes = [0u8; Self::CODE_BYTES];
        getrandom::getrandom(&mut bytes).expect("getrandom failed");
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Wrap an existing room code (e.g. parsed from a room URL).
    pub fn from_code(code: &str) -> Self {
        Self(code.to_string())
    }

    /// The room code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoomId({})", self.0)
    }
}
