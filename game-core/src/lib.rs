//! # dama-core
//!
//! Pure logic for dama-sync (no I/O, instant tests).
//!
//! This crate implements the turn-synchronization state machines and
//! policies without any network I/O, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (channel publishes, presence queries) is performed by
//! `dama-client`, which interprets the actions produced by the match
//! state machine. The rules of checkers themselves live behind the
//! [`RulesEngine`] trait - this crate queries them, never reimplements
//! them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ledger;
pub mod promotion;
pub mod rules;
pub mod scripted;
pub mod state;
pub mod victory;

pub use ledger::{MoveKey, MoveLedger};
pub use promotion::{crown_if_promoted, crown_last_pieces};
pub use rules::{CaptureMap, RulesEngine};
pub use scripted::ScriptedBoard;
pub use state::{MatchAction, MatchEvent, MatchState, Outcome};
pub use victory::WinDetector;
