//! Channel events for dama-sync.
//!
//! The relay delivers `(event name, JSON payload)` pairs per room.
//! [`RoomEvent`] maps each wire name to a typed payload and back. Every
//! payload carries the originator's [`ClientId`] so a client can discard
//! its own echoes.

use serde::{Deserialize, Serialize};

use crate::{BoardMatrix, ClientId, Color, Coord, ProtocolError};

/// A committed move, relayed to the rival client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEvent {
    /// Square the piece moved from.
    #[serde(rename = "fromCoordinate")]
    pub from: Coord,
    /// Square the piece moved to.
    #[serde(rename = "toCoordinate")]
    pub to: Coord,
    /// Identity of the sending connection.
    #[serde(rename = "originatorId")]
    pub originator: ClientId,
    /// Sender's committed move count, monotonic per session. Used for
    /// duplicate suppression and snapshot reconciliation.
    #[serde(rename = "moveNumber")]
    pub move_number: u64,
}

/// Turn ownership handoff after a turn-ending move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnChangeEvent {
    /// The color now permitted to move.
    #[serde(rename = "newActiveColor")]
    pub active: Color,
    /// Identity of the sending connection.
    #[serde(rename = "originatorId")]
    pub originator: ClientId,
}

/// Advisory selection highlight; has no effect on turn or legality state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEvent {
    /// The square the rival currently has selected.
    #[serde(rename = "selectedCoordinate")]
    pub coord: Coord,
    /// Identity of the sending connection.
    #[serde(rename = "originatorId")]
    pub originator: ClientId,
}

/// Declaration that the game is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinEvent {
    /// The winning color.
    #[serde(rename = "winnerColor")]
    pub winner: Color,
    /// Identity of the sending connection.
    #[serde(rename = "originatorId")]
    pub originator: ClientId,
}

/// Best-effort state catch-up sent to a newly joined member.
///
/// Advisory only: a receiver applies it solely when `move_number` is
/// ahead of its own committed count (highest-counter wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardStatusEvent {
    /// The color currently permitted to move.
    #[serde(rename = "activeColor")]
    pub active: Color,
    /// Full board snapshot.
    #[serde(rename = "boardMatrix")]
    pub matrix: BoardMatrix,
    /// Sender's committed move count at snapshot time.
    #[serde(rename = "moveNumber")]
    pub move_number: u64,
    /// Identity of the sending connection.
    #[serde(rename = "originatorId")]
    pub originator: ClientId,
}

/// All events exchanged over a room channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// A committed move (`position`).
    Move(MoveEvent),
    /// Turn handoff (`activeColor`).
    TurnChange(TurnChangeEvent),
    /// Advisory selection highlight (`activeItem`).
    Selection(SelectionEvent),
    /// Game-over declaration (`won`).
    Win(WinEvent),
    /// State catch-up for a joining member (`currentBoardStatus`).
    BoardStatus(BoardStatusEvent),
}

impl RoomEvent {
    /// The event name used on the relay channel.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Move(_) => "position",
            Self::TurnChange(_) => "activeColor",
            Self::Selection(_) => "activeItem",
            Self::Win(_) => "won",
            Self::BoardStatus(_) => "currentBoardStatus",
        }
    }

    /// Identity of the connection that published this event.
    pub fn originator(&self) -> ClientId {
        match self {
            Self::Move(e) => e.originator,
            Self::TurnChange(e) => e.originator,
            Self::Selection(e) => e.originator,
            Self::Win(e) => e.originator,
            Self::BoardStatus(e) => e.originator,
        }
    }

    /// Serialize the payload to JSON bytes.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let result = match self {
            Self::Move(e) => serde_json::to_vec(e),
            Self::TurnChange(e) => serde_json::to_vec(e),
            Self::Selection(e) => serde_json::to_vec(e),
            Self::Win(e) => serde_json::to_vec(e),
            Self::BoardStatus(e) => serde_json::to_vec(e),
        };
        result.map_err(ProtocolError::Serialization)
    }

    /// Deserialize a payload delivered under `name`.
    pub fn decode(name: &str, payload: &[u8]) -> Result<Self, ProtocolError> {
        match name {
            "position" => serde_json::from_slice(payload)
                .map(Self::Move)
                .map_err(ProtocolError::Deserialization),
            "activeColor" => serde_json::from_slice(payload)
                .map(Self::TurnChange)
                .map_err(ProtocolError::Deserialization),
            "activeItem" => serde_json::from_slice(payload)
                .map(Self::Selection)
                .map_err(ProtocolError::Deserialization),
            "won" => serde_json::from_slice(payload)
                .map(Self::Win)
                .map_err(ProtocolError::Deserialization),
            "currentBoardStatus" => serde_json::from_slice(payload)
                .map(Self::BoardStatus)
                .map_err(ProtocolError::Deserialization),
            other => Err(ProtocolError::UnknownEvent(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Piece, Square};

    #[test]
    fn move_event_wire_shape() {
        let event = MoveEvent {
            from: Coord::new(2, 1),
            to: Coord::new(3, 1),
            originator: ClientId::random(),
            move_number: 4,
        };
        let json: serde_json::Value =
            serde_json::from_slice(&RoomEvent::Move(event).encode().unwrap()).unwrap();

        assert_eq!(json["fromCoordinate"], "2:1");
        assert_eq!(json["toCoordinate"], "3:1");
        assert_eq!(json["moveNumber"], 4);
        assert!(json["originatorId"].is_string());
    }

    #[test]
    fn turn_change_wire_shape() {
        let event = TurnChangeEvent {
            active: Color::White,
            originator: ClientId::random(),
        };
        let json: serde_json::Value =
            serde_json::from_slice(&RoomEvent::TurnChange(event).encode().unwrap()).unwrap();

        assert_eq!(json["newActiveColor"], "white");
    }

    #[test]
    fn wire_names_match_channel_contract() {
        let originator = ClientId::random();
        let cases = [
            (
                RoomEvent::Move(MoveEvent {
                    from: Coord::new(0, 0),
                    to: Coord::new(1, 0),
                    originator,
                    move_number: 1,
                }),
                "position",
            ),
            (
                RoomEvent::TurnChange(TurnChangeEvent {
                    active: Color::Black,
                    originator,
                }),
                "activeColor",
            ),
            (
                RoomEvent::Selection(SelectionEvent {
                    coord: Coord::new(5, 5),
                    originator,
                }),
                "activeItem",
            ),
            (
                RoomEvent::Win(WinEvent {
                    winner: Color::White,
                    originator,
                }),
                "won",
            ),
            (
                RoomEvent::BoardStatus(BoardStatusEvent {
                    active: Color::Black,
                    matrix: vec![],
                    move_number: 0,
                    originator,
                }),
                "currentBoardStatus",
            ),
        ];

        for (event, name) in cases {
            assert_eq!(event.wire_name(), name);
            assert_eq!(event.originator(), originator);
            let decoded = RoomEvent::decode(name, &event.encode().unwrap()).unwrap();
            assert_eq!(decoded, event);
        }
    }

    #[test]
    fn unknown_event_name_is_rejected() {
        let result = RoomEvent::decode("teleport", b"{}");
        assert!(matches!(result, Err(ProtocolError::UnknownEvent(_))));
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let result = RoomEvent::decode("position", b"not json");
        assert!(matches!(result, Err(ProtocolError::Deserialization(_))));
    }

    #[test]
    fn board_status_carries_full_matrix() {
        let event = BoardStatusEvent {
            active: Color::White,
            matrix: vec![vec![
                Square {
                    coord: Coord::new(0, 0),
                    item: Some(Piece::new(Color::White)),
                },
                Square {
                    coord: Coord::new(0, 1),
                    item: None,
                },
            ]],
            move_number: 12,
            originator: ClientId::random(),
        };

        let encoded = RoomEvent::BoardStatus(event.clone()).encode().unwrap();
        let decoded = RoomEvent::decode("currentBoardStatus", &encoded).unwrap();
        assert_eq!(decoded, RoomEvent::BoardStatus(event));
    }
}
