//! Match state machine for dama-sync.
//!
//! This module provides a pure, side-effect-free state machine for turn
//! ownership. The machine takes events as input and produces a new state
//! plus a list of actions to execute.
//!
//! The actual I/O (publishing `activeColor` / `won` events) is performed
//! by dama-client, not by this module. This enables instant unit testing
//! without channel mocks.

use game_types::Color;

/// Turn state machine - NO I/O, just state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchState {
    /// Only one member in the room; gameplay disabled.
    AwaitingOpponent,
    /// Two members present, game running.
    InProgress {
        /// The color currently permitted to move.
        active: Color,
        /// Number of completed (turn-ending) moves so far.
        turn: u32,
    },
    /// Terminal. Once entered, never left.
    Ended {
        /// How the game ended.
        outcome: Outcome,
    },
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A color won on the board (rival has no pieces left).
    Winner(Color),
    /// The rival's presence was lost mid-game; the remaining player wins.
    Forfeit {
        /// The player still in the room.
        winner: Color,
    },
}

impl Outcome {
    /// The winning color regardless of how the game ended.
    pub fn winner(&self) -> Color {
        match self {
            Self::Winner(color) => *color,
            Self::Forfeit { winner } => *winner,
        }
    }
}

impl MatchState {
    /// Create a new machine waiting for the second member.
    pub fn new() -> Self {
        Self::AwaitingOpponent
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (dama-client)
    /// is responsible for executing the returned actions, and suppresses
    /// the publish-shaped ones when the event originated remotely.
    pub fn on_event(self, event: MatchEvent) -> (Self, Vec<MatchAction>) {
        match (self, event) {
            // Presence reports two members: Black always opens,
            // independent of which player created the room.
            (Self::AwaitingOpponent, MatchEvent::RoomFilled) => (
                Self::InProgress {
                    active: Color::Black,
                    turn: 0,
                },
                vec![],
            ),

            (
                Self::InProgress { active, turn },
                MatchEvent::MoveCommitted {
                    captured,
                    continuation,
                },
            ) => {
                if captured > 0 && continuation {
                    // Forced-capture chain: the mover keeps the turn.
                    (Self::InProgress { active, turn }, vec![])
                } else {
                    let next = active.opposite();
                    (
                        Self::InProgress {
                            active: next,
                            turn: turn + 1,
                        },
                        vec![MatchAction::AnnounceTurn { active: next }],
                    )
                }
            }

            (Self::InProgress { active, turn }, MatchEvent::TurnAnnounced { active: announced }) => {
                if announced == active {
                    // Already there - the rival's move event landed first.
                    (Self::InProgress { active, turn }, vec![])
                } else {
                    (
                        Self::InProgress {
                            active: announced,
                            turn: turn + 1,
                        },
                        vec![],
                    )
                }
            }

            (Self::InProgress { .. }, MatchEvent::PiecesExhausted { loser }) => {
                let winner = loser.opposite();
                (
                    Self::Ended {
                        outcome: Outcome::Winner(winner),
                    },
                    vec![MatchAction::AnnounceWin { winner }],
                )
            }

            (Self::InProgress { .. }, MatchEvent::WinDeclared { winner }) => (
                Self::Ended {
                    outcome: Outcome::Winner(winner),
                },
                vec![],
            ),

            (Self::InProgress { .. }, MatchEvent::PeerLeft { remaining }) => (
                Self::Ended {
                    outcome: Outcome::Forfeit { winner: remaining },
                },
                vec![],
            ),

            // Terminal state is absorbing; invalid transitions stay put.
            (state, _) => (state, vec![]),
        }
    }

    /// Check if the game is running.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress { .. })
    }

    /// Check if the game has ended.
    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended { .. })
    }

    /// The color currently permitted to move, if the game is running.
    pub fn active_color(&self) -> Option<Color> {
        match self {
            Self::InProgress { active, .. } => Some(*active),
            _ => None,
        }
    }

    /// Number of completed turn-ending moves, if the game is running.
    pub fn turn_count(&self) -> Option<u32> {
        match self {
            Self::InProgress { turn, .. } => Some(*turn),
            _ => None,
        }
    }

    /// The outcome, once the game has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Ended { outcome } => Some(*outcome),
            _ => None,
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Events that can occur during a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// Presence reports exactly two members in the room.
    RoomFilled,
    /// A move by the active color was applied to the board.
    MoveCommitted {
        /// How many pieces the move captured.
        captured: u32,
        /// Whether a forced-capture continuation exists from the
        /// destination square (queried from the rules engine).
        continuation: bool,
    },
    /// The rival published an `activeColor` handoff.
    TurnAnnounced {
        /// The color the rival says may now move.
        active: Color,
    },
    /// A color has no pieces left on the board.
    PiecesExhausted {
        /// The color with zero pieces.
        loser: Color,
    },
    /// The rival published a `won` declaration; trusted as-is.
    WinDeclared {
        /// The declared winner.
        winner: Color,
    },
    /// The rival's presence was lost after the game had started.
    PeerLeft {
        /// The player still in the room.
        remaining: Color,
    },
}

/// Actions to be executed by dama-client.
///
/// These are instructions, not side effects. The session interprets
/// them and performs the actual publishes - and skips them entirely
/// when the triggering event came from the rival (no re-broadcast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchAction {
    /// Publish an `activeColor` handoff.
    AnnounceTurn {
        /// The color now permitted to move.
        active: Color,
    },
    /// Publish a `won` declaration.
    AnnounceWin {
        /// The winning color.
        winner: Color,
    },
}
