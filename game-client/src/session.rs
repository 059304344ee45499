//! GameSession - the room session orchestrator.
//!
//! This module provides [`GameSession`], the primary API a game front
//! end drives. It owns the board (via the rules engine), the pure match
//! state machine, and the move ledger, and it interprets the machine's
//! actions into channel publishes.
//!
//! # Architecture
//!
//! Local commands apply optimistically: the board mutates and the state
//! machine advances before the publish completes, and publishes are
//! fire-and-forget (the relay offers no delivery acknowledgment).
//! Remote events funnel through the same apply path with publishing
//! suppressed, which is what prevents relay loops.
//!
//! The session is single-threaded by design: one inbound event is
//! processed at a time, in arrival order, and only the apply step
//! mutates the board.

use thiserror::Error;
use tracing::{debug, info, warn};

use game_core::{
    crown_if_promoted, crown_last_pieces, MatchAction, MatchEvent, MatchState, MoveKey,
    MoveLedger, RulesEngine, WinDetector,
};
use game_types::{
    BoardMatrix, BoardStatusEvent, ClientId, Color, Coord, GameVariant, MoveEvent, ProtocolError,
    RoomEvent, RoomId, SelectionEvent, TurnChangeEvent, WinEvent,
};

use crate::directory::{DirectoryError, RoomDirectory};
use crate::store::{RoomRecord, SessionStore};
use crate::transport::{ChannelEvent, Transport, TransportError};

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The room does not exist or has expired; redirect to the entry
    /// page, don't retry.
    #[error("room not found")]
    RoomNotFound,

    /// The room lookup service failed.
    #[error("room lookup failed: {0}")]
    Directory(String),

    /// Wire encode/decode error.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The transport connection is down; gameplay is paused until it
    /// comes back.
    #[error("connection suspended")]
    Suspended,

    /// The session was closed.
    #[error("session closed")]
    Closed,
}

impl From<DirectoryError> for ClientError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound => Self::RoomNotFound,
            DirectoryError::Lookup(msg) => Self::Directory(msg),
        }
    }
}

/// Result of a local move proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was applied to the board and relayed.
    Applied {
        /// Whether turn ownership passed to the rival (false while a
        /// forced-capture chain keeps the turn alive).
        turn_ended: bool,
    },
    /// The move was not legal right now; nothing changed and nothing
    /// was published. The rendering layer decides how to surface this.
    Rejected,
}

/// One client's view of a two-player room.
///
/// Owns the board exclusively: every mutation goes through the apply
/// step in here, which keeps the protocol invariants enforceable in one
/// place.
pub struct GameSession<T: Transport, E: RulesEngine> {
    room: RoomId,
    variant: GameVariant,
    my_color: Color,
    transport: T,
    engine: E,
    state: MatchState,
    detector: WinDetector,
    ledger: MoveLedger,
    selected: Option<Coord>,
    rival_selection: Option<Coord>,
    pending_active: Option<Color>,
    suspended: bool,
    closed: bool,
}

impl<T: Transport, E: RulesEngine> GameSession<T, E> {
    /// Create a room, persist the chosen color and variant for reload
    /// resumption, and join its channel.
    pub async fn create<D, S>(
        variant: GameVariant,
        my_color: Color,
        transport: T,
        mut engine: E,
        directory: &D,
        store: &S,
    ) -> Result<Self, ClientError>
    where
        D: RoomDirectory + ?Sized,
        S: SessionStore + ?Sized,
    {
        let room = directory.create(variant, my_color).await?;
        store.save(&room, RoomRecord { color: my_color, variant });

        engine.init();
        transport.join(&room).await?;
        info!(room = %room, color = %my_color, "created room");

        Ok(Self::bootstrap(room, variant, my_color, transport, engine))
    }

    /// Resolve an existing room and join it as the second player.
    ///
    /// The joiner's color is the complement of the creator's unless the
    /// store already holds a color for this room (page reload within the
    /// same session). Fails with [`ClientError::RoomNotFound`] when the
    /// room is unknown or expired - the caller redirects instead of
    /// rendering a broken board.
    pub async fn join<D, S>(
        room: RoomId,
        transport: T,
        mut engine: E,
        directory: &D,
        store: &S,
    ) -> Result<Self, ClientError>
    where
        D: RoomDirectory + ?Sized,
        S: SessionStore + ?Sized,
    {
        let info = directory.lookup(&room).await?;

        let record = store.load(&room).unwrap_or(RoomRecord {
            color: info.creator_color.opposite(),
            variant: info.variant,
        });
        store.save(&room, record);

        engine.init();
        transport.join(&room).await?;
        info!(room = %room, color = %record.color, "joined room");

        Ok(Self::bootstrap(
            room,
            record.variant,
            record.color,
            transport,
            engine,
        ))
    }

    fn bootstrap(
        room: RoomId,
        variant: GameVariant,
        my_color: Color,
        transport: T,
        engine: E,
    ) -> Self {
        Self {
            room,
            variant,
            my_color,
            transport,
            engine,
            state: MatchState::new(),
            detector: WinDetector::new(),
            ledger: MoveLedger::new(),
            selected: None,
            rival_selection: None,
            pending_active: None,
            suspended: false,
            closed: false,
        }
    }

    /// Process one inbound channel event.
    ///
    /// Events are handled one at a time in arrival order; the caller's
    /// receive loop provides the sequencing.
    pub async fn handle_event(&mut self, event: ChannelEvent) -> Result<(), ClientError> {
        if self.closed {
            return Err(ClientError::Closed);
        }

        match event {
            ChannelEvent::MemberJoined { id } => self.on_member_joined(id).await,
            ChannelEvent::MemberLeft { id } => self.on_member_left(id),
            ChannelEvent::Message { name, payload } => self.on_message(&name, &payload).await,
            ChannelEvent::ConnectionLost => {
                self.suspended = true;
                info!(room = %self.room, "connection lost, gameplay paused");
                Ok(())
            }
            ChannelEvent::ConnectionRestored => {
                self.suspended = false;
                info!(room = %self.room, "connection restored, resuming from local state");
                Ok(())
            }
        }
    }

    async fn on_member_joined(&mut self, id: ClientId) -> Result<(), ClientError> {
        let members = self.transport.members(&self.room).await?;

        if members.len() == 2 && matches!(self.state, MatchState::AwaitingOpponent) {
            self.step(MatchEvent::RoomFilled);
            // A snapshot may have arrived before this presence event;
            // its turn handoff was held back until the game existed.
            if let Some(active) = self.pending_active.take() {
                self.step(MatchEvent::TurnAnnounced { active });
            }
            info!(room = %self.room, "two members present, game started");
        }

        if id != self.transport.local_id() {
            // Best-effort catch-up for the newcomer. Advisory: the
            // receiver ignores it unless its move number is ahead.
            let snapshot = RoomEvent::BoardStatus(BoardStatusEvent {
                active: self.state.active_color().unwrap_or(Color::Black),
                matrix: self.engine.board_matrix(),
                move_number: self.ledger.committed(),
                originator: self.transport.local_id(),
            });
            self.publish(snapshot).await;
        }
        Ok(())
    }

    fn on_member_left(&mut self, id: ClientId) -> Result<(), ClientError> {
        if id == self.transport.local_id() {
            return Ok(());
        }

        if self.state.is_in_progress() {
            let remaining = self.my_color;
            self.step(MatchEvent::PeerLeft { remaining });
            self.detector.mark_declared();
            self.selected = None;
            info!(room = %self.room, winner = %remaining, "rival left mid-game, forfeit win");
        }
        Ok(())
    }

    async fn on_message(&mut self, name: &str, payload: &[u8]) -> Result<(), ClientError> {
        let event = match RoomEvent::decode(name, payload) {
            Ok(event) => event,
            Err(err) => {
                warn!(room = %self.room, name, error = %err, "dropping malformed channel message");
                return Ok(());
            }
        };

        if event.originator() == self.transport.local_id() {
            debug!(room = %self.room, name, "ignoring self-echo");
            return Ok(());
        }

        match event {
            RoomEvent::Move(event) => self.apply_remote_move(event).await,
            RoomEvent::TurnChange(event) => {
                self.step(MatchEvent::TurnAnnounced {
                    active: event.active,
                });
                self.selected = None;
                Ok(())
            }
            RoomEvent::Selection(event) => {
                self.rival_selection = Some(event.coord);
                Ok(())
            }
            RoomEvent::Win(event) => {
                self.step(MatchEvent::WinDeclared {
                    winner: event.winner,
                });
                self.detector.mark_declared();
                info!(room = %self.room, winner = %event.winner, "rival declared game over");
                Ok(())
            }
            RoomEvent::BoardStatus(event) => self.apply_snapshot(event),
        }
    }

    async fn apply_remote_move(&mut self, event: MoveEvent) -> Result<(), ClientError> {
        let applied = self
            .commit_move(
                event.from.clone(),
                event.to,
                event.originator,
                event.move_number,
                false,
            )
            .await?;
        if !applied {
            debug!(
                room = %self.room,
                from = %event.from,
                move_number = event.move_number,
                "remote move dropped (duplicate or stale)"
            );
        }
        Ok(())
    }

    fn apply_snapshot(&mut self, event: BoardStatusEvent) -> Result<(), ClientError> {
        // Highest-counter wins: the snapshot replaces local state only
        // when it is strictly ahead of our committed move count.
        if event.move_number <= self.ledger.committed() {
            debug!(
                room = %self.room,
                snapshot = event.move_number,
                local = self.ledger.committed(),
                "ignoring stale board snapshot"
            );
            return Ok(());
        }

        self.engine.restore(&event.matrix);
        self.ledger.fast_forward(event.move_number);
        if self.state.is_in_progress() {
            self.step(MatchEvent::TurnAnnounced {
                active: event.active,
            });
        } else {
            // The snapshot beat the presence event; replay the handoff
            // once the game starts.
            self.pending_active = Some(event.active);
        }
        self.selected = None;
        info!(room = %self.room, move_number = event.move_number, "applied board snapshot");
        Ok(())
    }

    /// Select a piece and compute where it may go.
    ///
    /// Returns the legal destination squares (empty when the selection
    /// is not allowed right now). When a forced capture exists anywhere
    /// for the local color, the selection is redirected to a capture
    /// origin - a player cannot opt out of capturing.
    ///
    /// Publishes an advisory `activeItem` event so the rival's client
    /// can mirror the highlight.
    pub async fn select(&mut self, coord: Coord) -> Result<Vec<Coord>, ClientError> {
        if self.closed {
            return Err(ClientError::Closed);
        }
        if self.state.active_color() != Some(self.my_color) {
            self.selected = None;
            return Ok(vec![]);
        }

        let captures = self.engine.capture_moves(self.my_color);
        let coord = if !captures.is_empty() && !captures.contains_key(&coord) {
            match captures.keys().next() {
                Some(origin) => origin.clone(),
                None => coord,
            }
        } else {
            coord
        };

        match self.engine.piece_at(&coord) {
            Some(piece) if piece.color == self.my_color => {}
            _ => {
                self.selected = None;
                return Ok(vec![]);
            }
        }

        self.selected = Some(coord.clone());
        if !self.suspended {
            let event = RoomEvent::Selection(SelectionEvent {
                coord: coord.clone(),
                originator: self.transport.local_id(),
            });
            self.publish(event).await;
        }

        let destinations = match captures.get(&coord) {
            Some(destinations) => destinations.clone(),
            None => self.engine.available_destinations(&coord),
        };
        Ok(destinations)
    }

    /// Propose a local move.
    ///
    /// Only the local player's own pieces may be moved, and the
    /// destination must be in the rules engine's legal set for the
    /// piece on `from`; when a forced capture exists anywhere for the
    /// local color, only capture moves are accepted. An accepted move
    /// mutates the board, publishes a `position` event, and advances
    /// the turn machine (publishing `activeColor` if the turn passed).
    pub async fn propose_move(
        &mut self,
        from: Coord,
        to: Coord,
    ) -> Result<MoveOutcome, ClientError> {
        if self.closed {
            return Err(ClientError::Closed);
        }
        if self.suspended {
            return Err(ClientError::Suspended);
        }
        if self.state.active_color() != Some(self.my_color) {
            return Ok(MoveOutcome::Rejected);
        }
        match self.engine.piece_at(&from) {
            Some(piece) if piece.color == self.my_color => {}
            _ => return Ok(MoveOutcome::Rejected),
        }

        let captures = self.engine.capture_moves(self.my_color);
        let legal = if captures.is_empty() {
            self.engine.available_destinations(&from).contains(&to)
        } else {
            // Forced capture: only capture origins/destinations count.
            captures
                .get(&from)
                .is_some_and(|destinations| destinations.contains(&to))
        };
        if !legal {
            return Ok(MoveOutcome::Rejected);
        }

        let originator = self.transport.local_id();
        let move_number = self.ledger.next_move_number();
        let applied = self
            .commit_move(from, to, originator, move_number, true)
            .await?;
        if !applied {
            return Ok(MoveOutcome::Rejected);
        }

        let turn_ended = self.state.active_color() != Some(self.my_color);
        Ok(MoveOutcome::Applied { turn_ended })
    }

    /// The shared apply path for local and remote moves.
    ///
    /// Returns whether the move changed the board. `relay` controls
    /// publishing: true for local moves, false for remote ones (a
    /// received event is never re-broadcast).
    async fn commit_move(
        &mut self,
        from: Coord,
        to: Coord,
        originator: ClientId,
        move_number: u64,
        relay: bool,
    ) -> Result<bool, ClientError> {
        // Structural validation only; legality of remote moves is
        // trusted (unauthenticated peer relay, see the trust boundary
        // notes in DESIGN.md).
        if from.position().is_err() || to.position().is_err() {
            warn!(room = %self.room, %from, %to, "move with unparsable coordinates dropped");
            return Ok(false);
        }
        let mover = match self.engine.piece_at(&from) {
            Some(piece) => piece.color,
            None => {
                warn!(room = %self.room, %from, "move from empty square dropped");
                return Ok(false);
            }
        };

        let admitted = self.ledger.admit(MoveKey {
            from: from.clone(),
            to: to.clone(),
            originator,
            move_number,
        });
        if !admitted {
            return Ok(false);
        }

        let victims = self.engine.pieces_between(&from, &to);
        self.engine.move_piece(&from, &to);

        if relay {
            let event = RoomEvent::Move(MoveEvent {
                from: from.clone(),
                to: to.clone(),
                originator,
                move_number,
            });
            self.publish(event).await;
        }

        for victim in &victims {
            self.engine.remove_piece(victim);
        }

        crown_if_promoted(&mut self.engine, self.variant, &to)?;
        crown_last_pieces(&mut self.engine);

        debug!(
            room = %self.room,
            %from,
            %to,
            mover = %mover,
            captured = victims.len(),
            move_number,
            "move applied"
        );

        if let Some(winner) = self.detector.check(&self.engine) {
            let actions = self.step(MatchEvent::PiecesExhausted {
                loser: winner.opposite(),
            });
            self.run_actions(actions, relay).await;
            self.selected = None;
            info!(room = %self.room, %winner, "game over");
            return Ok(true);
        }

        let captured = victims.len() as u32;
        let continuation = captured > 0 && self.engine.capture_moves(mover).contains_key(&to);
        let actions = self.step(MatchEvent::MoveCommitted {
            captured,
            continuation,
        });
        self.run_actions(actions, relay).await;

        if self.state.active_color() == Some(mover) {
            // Chain continues: keep the moved piece selected.
            self.selected = Some(to);
        } else {
            self.selected = None;
        }
        Ok(true)
    }

    /// Feed the pure machine and store the successor state.
    fn step(&mut self, event: MatchEvent) -> Vec<MatchAction> {
        let state = std::mem::take(&mut self.state);
        let (state, actions) = state.on_event(event);
        self.state = state;
        actions
    }

    async fn run_actions(&mut self, actions: Vec<MatchAction>, relay: bool) {
        if !relay {
            return;
        }
        for action in actions {
            let originator = self.transport.local_id();
            let event = match action {
                MatchAction::AnnounceTurn { active } => RoomEvent::TurnChange(TurnChangeEvent {
                    active,
                    originator,
                }),
                MatchAction::AnnounceWin { winner } => RoomEvent::Win(WinEvent {
                    winner,
                    originator,
                }),
            };
            self.publish(event).await;
        }
    }

    /// Fire-and-forget publish: failures are logged, never retried and
    /// never surfaced (the relay provides no delivery acknowledgment).
    async fn publish(&self, event: RoomEvent) {
        let payload = match event.encode() {
            Ok(payload) => payload,
            Err(err) => {
                warn!(room = %self.room, error = %err, "failed to encode outbound event");
                return;
            }
        };
        if let Err(err) = self
            .transport
            .publish(&self.room, event.wire_name(), &payload)
            .await
        {
            warn!(room = %self.room, name = event.wire_name(), error = %err, "publish failed");
        }
    }

    /// Leave the room and tear down every channel listener in one call.
    ///
    /// Idempotent; in-flight publishes are not cancelled, only ignored
    /// by the departed listener.
    pub async fn close(&mut self) -> Result<(), ClientError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if let Err(err) = self.transport.leave(&self.room).await {
            warn!(room = %self.room, error = %err, "leave failed during teardown");
        }
        info!(room = %self.room, "session closed");
        Ok(())
    }

    /// The room this session belongs to.
    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// The variant played in this room.
    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    /// The local player's color.
    pub fn my_color(&self) -> Color {
        self.my_color
    }

    /// Current match state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// The color currently permitted to move, if the game is running.
    pub fn active_color(&self) -> Option<Color> {
        self.state.active_color()
    }

    /// Current board snapshot for the rendering layer.
    pub fn board_matrix(&self) -> BoardMatrix {
        self.engine.board_matrix()
    }

    /// The locally selected square, if any.
    pub fn selected(&self) -> Option<&Coord> {
        self.selected.as_ref()
    }

    /// The rival's advisory selection highlight, if any.
    pub fn rival_selection(&self) -> Option<&Coord> {
        self.rival_selection.as_ref()
    }

    /// Number of committed moves (local and remote).
    pub fn move_count(&self) -> u64 {
        self.ledger.committed()
    }

    /// Whether gameplay is paused by a transport outage.
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Connection status for the UI pill.
    pub fn is_connected(&self) -> bool {
        !self.suspended && self.transport.is_connected()
    }

    /// Access the underlying transport (for the caller's receive loop
    /// and for tests).
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
